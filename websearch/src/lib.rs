//! Minimal web search API client.
//!
//! This crate provides a focused client for a Google Custom Search shaped
//! endpoint, returning the top hits as plain `{title, link, snippet}`
//! records. A lookup is a fallible external call with its own timeout;
//! callers are expected to treat the result as optional enrichment, never
//! as a required input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://www.googleapis.com/customsearch/v1";
const DEFAULT_MAX_HITS: usize = 5;

/// Errors that can occur when searching.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Search credentials not configured")]
    NoCredentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Web search client.
#[derive(Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    max_hits: usize,
}

impl SearchClient {
    /// Create a new client with the given API key and search engine id.
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .connect_timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            max_hits: DEFAULT_MAX_HITS,
        }
    }

    /// Create a client from the `SEARCH_API_KEY` and `SEARCH_ENGINE_ID`
    /// environment variables.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("SEARCH_API_KEY").map_err(|_| Error::NoCredentials)?;
        let engine_id = std::env::var("SEARCH_ENGINE_ID").map_err(|_| Error::NoCredentials)?;
        Ok(Self::new(api_key, engine_id))
    }

    /// Set the maximum number of hits returned per search.
    pub fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Search the web and return up to `max_hits` results.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, Error> {
        let response = self
            .client
            .get(API_BASE)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(hits_from(api_response, self.max_hits))
    }

    /// Search scoped to a location (`"<query> near <location>"`).
    pub async fn search_near(&self, query: &str, location: &str) -> Result<Vec<SearchHit>, Error> {
        self.search(&format!("{query} near {location}")).await
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    items: Vec<ApiItem>,
}

#[derive(Deserialize)]
struct ApiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

fn hits_from(response: ApiResponse, max_hits: usize) -> Vec<SearchHit> {
    response
        .items
        .into_iter()
        .take(max_hits)
        .map(|item| SearchHit {
            title: item.title,
            link: item.link,
            snippet: item.snippet,
        })
        .collect()
}
