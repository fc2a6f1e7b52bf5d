//! HTTP glue around the lore engine.
//!
//! One learner per process, behind a mutex: each request's mutation runs to
//! completion before the next touches shared state. The engine itself
//! defines no thread-safety guarantee, so the serialization happens here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use lore_core::{synth, GeneratedContent, Learner, LearnerConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use websearch::{SearchClient, SearchHit};

struct AppState {
    learner: Mutex<Learner>,
    search: Option<SearchClient>,
}

#[derive(Deserialize)]
struct GenerateRequest {
    prompt: Option<String>,

    /// Enrich the response with web search hits.
    #[serde(default)]
    search: bool,

    /// Use the flavored generators instead of the learned synthesizer.
    #[serde(default)]
    flavored: bool,

    location: Option<String>,
}

#[derive(Serialize)]
struct Localized {
    en: String,
}

#[derive(Serialize)]
struct ContentBody {
    title: Localized,
    description: Localized,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    message: String,
    content: ContentBody,
    brain_state_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_results: Option<Vec<SearchHit>>,
}

#[derive(Deserialize)]
struct DigestRequest {
    text: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(e: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error", "details": e.to_string() })),
    )
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = match request.prompt.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Err(bad_request("Prompt is required")),
    };

    // Search is optional enrichment with its own timeout; a failed lookup
    // degrades to no hits rather than failing the request.
    let hits = if request.search {
        lookup(&state, &prompt, request.location.as_deref()).await
    } else {
        None
    };

    let mut learner = state.learner.lock().await;

    let content = if request.flavored {
        let location = request.location.as_deref();
        let title = synth::flavored_title(&prompt, location);
        let mut description = synth::flavored_description(&prompt, location);
        if let Some(hits) = &hits {
            description = synth::with_search_hits(&description, hits);
        }
        let content = GeneratedContent { title, description };
        learner.remember(&prompt, content.clone());
        content
    } else {
        learner.generate_content(&prompt)
    };

    let path = learner.save_brain_state().await.map_err(internal_error)?;
    drop(learner);

    Ok(Json(GenerateResponse {
        message: "Content generated".to_string(),
        content: ContentBody {
            title: Localized { en: content.title },
            description: Localized {
                en: content.description,
            },
        },
        brain_state_path: path.to_string_lossy().to_string(),
        search_results: hits,
    }))
}

async fn lookup(state: &AppState, prompt: &str, location: Option<&str>) -> Option<Vec<SearchHit>> {
    let client = state.search.as_ref()?;

    let result = match location {
        Some(place) => client.search_near(prompt, place).await,
        None => client.search(prompt).await,
    };

    match result {
        Ok(hits) => Some(hits),
        Err(e) => {
            log::warn!("Web search failed: {e}");
            None
        }
    }
}

async fn digest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DigestRequest>,
) -> Result<Json<Value>, ApiError> {
    let text = match request.text.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(bad_request("Text is required")),
    };

    let mut learner = state.learner.lock().await;
    learner.digest(&text);
    let path = learner.save_brain_state().await.map_err(internal_error)?;

    Ok(Json(json!({
        "message": "Text digested",
        "vocabularySize": learner.brain().vocabulary_size(),
        "brainStatePath": path.to_string_lossy(),
    })))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = std::env::var("LORE_DIR").unwrap_or_else(|_| "./learned_content".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let learner = Learner::open(LearnerConfig::new(&dir)).await?;
    log::info!(
        "Loaded brain from {dir}: {} known tokens",
        learner.brain().vocabulary_size()
    );

    let search = SearchClient::from_env().ok();
    if search.is_none() {
        log::info!("No search credentials configured; search enrichment disabled");
    }

    let state = Arc::new(AppState {
        learner: Mutex::new(learner),
        search,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", post(generate))
        .route("/digest", post(digest))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("lore server running on http://localhost:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
