//! Content synthesis from accumulated statistics.
//!
//! `generate` is a pure function of the accumulator and the prompt: no
//! randomness, no mutation, byte-identical output for identical inputs.
//! The flavored variants layer fixed adjective/phrase lists on top and take
//! their randomness as an injected `Rng` so tests can pin the choice.

use crate::brain::Brain;
use crate::tokenize::tokenize;
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use websearch::SearchHit;

/// Fixed suffix appended to every synthesized title.
const TITLE_SUFFIX: &str = "Exploration";

/// Maximum successor tokens listed per prompt token.
const MAX_RELATED: usize = 3;

/// Adjective pool for flavored titles.
const ADJECTIVES: &[&str] = &[
    "Captivating",
    "Enthralling",
    "Exciting",
    "Fascinating",
    "Immersive",
];

/// Opening phrase pool for flavored descriptions.
const PHRASES: &[&str] = &[
    "Embark on a journey to discover hidden gems.",
    "Unveil the stories behind the scenes.",
    "Dive deep into an unforgettable adventure.",
    "Explore like never before.",
    "Unlock the secrets waiting to be found.",
];

/// A synthesized title/description pair. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
}

/// Synthesize content for a prompt from the accumulator's current tables.
///
/// Does not mutate the accumulator: digesting generated content back into
/// the knowledge tables is a separate, explicit operation.
pub fn generate(brain: &Brain, prompt: &str) -> GeneratedContent {
    let words = tokenize(prompt);
    GeneratedContent {
        title: generate_title(brain, &words),
        description: generate_description(brain, &words),
    }
}

fn generate_title(brain: &Brain, words: &[String]) -> String {
    let mut parts = Vec::new();

    if !words.is_empty() {
        parts.push(title_case(words));
    }
    if let Some(pattern) = top_pattern(brain) {
        parts.push(format!("({pattern})"));
    }
    parts.push(TITLE_SUFFIX.to_string());

    parts.join(" ")
}

fn generate_description(brain: &Brain, words: &[String]) -> String {
    let mut description = format!("A comprehensive exploration of {}.", words.join(" "));

    for word in words {
        let Some(edges) = brain.relationships.get(word) else {
            continue;
        };
        let related = top_successors(edges, MAX_RELATED);
        if !related.is_empty() {
            description.push_str(&format!(
                " Closely connected concepts include: {}.",
                related.join(", ")
            ));
        }
    }

    description
}

/// The single highest-count pattern. Strictly-greater comparison keeps the
/// first-inserted pattern on ties.
fn top_pattern(brain: &Brain) -> Option<&str> {
    let mut top: Option<(&str, u64)> = None;
    for (pattern, &count) in &brain.generation_rules {
        if top.is_none_or(|(_, best)| count > best) {
            top = Some((pattern, count));
        }
    }
    top.map(|(pattern, _)| pattern)
}

/// Successor tokens ranked by weight descending. The sort is stable, so
/// equal weights keep their insertion order.
fn top_successors(edges: &IndexMap<String, u64>, limit: usize) -> Vec<&str> {
    let mut ranked: Vec<(&str, u64)> = edges.iter().map(|(w, &c)| (w.as_str(), c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}

fn title_case(words: &[String]) -> String {
    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_hunt(words: &[String]) -> bool {
    words.iter().any(|w| w == "treasure" || w == "hunt")
}

/// Flavored title with a random adjective.
pub fn flavored_title(prompt: &str, location: Option<&str>) -> String {
    flavored_title_with_rng(prompt, location, &mut rand::thread_rng())
}

/// Flavored title using the provided rng for the adjective choice.
pub fn flavored_title_with_rng<R: Rng>(
    prompt: &str,
    location: Option<&str>,
    rng: &mut R,
) -> String {
    let words = tokenize(prompt);
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let formatted = title_case(&words);

    if is_hunt(&words) {
        let mut title = format!("{adjective} Treasure Hunt: {formatted}");
        if let Some(place) = location {
            title.push_str(&format!(" in {place}"));
        }
        title
    } else {
        let mut title = format!("{adjective} Audio Guide: {formatted}");
        if let Some(place) = location {
            title.push_str(&format!(" of {place}"));
        }
        title
    }
}

/// Flavored description with a random opening phrase.
pub fn flavored_description(prompt: &str, location: Option<&str>) -> String {
    flavored_description_with_rng(prompt, location, &mut rand::thread_rng())
}

/// Flavored description using the provided rng for the phrase choice.
pub fn flavored_description_with_rng<R: Rng>(
    prompt: &str,
    location: Option<&str>,
    rng: &mut R,
) -> String {
    let words = tokenize(prompt);
    let phrase = PHRASES[rng.gen_range(0..PHRASES.len())];

    if is_hunt(&words) {
        let mut description = format!("Get ready for an adventurous treasure hunt! {phrase}");
        if let Some(place) = location {
            description.push_str(&format!(" This experience awaits you in {place}."));
        }
        description.push_str(" Follow the clues, solve the puzzles, and claim your reward!");
        description
    } else {
        let mut description = format!(
            "Discover the rich history and culture through this immersive audio guide. {phrase}"
        );
        if let Some(place) = location {
            description.push_str(&format!(" Explore the wonders of {place}."));
        }
        description.push_str(" Let the narration lead you through a captivating experience.");
        description
    }
}

/// Append an enrichment sentence built from web search hits.
///
/// Hits are optional input: an empty slice (or hits with empty snippets)
/// returns the description unchanged.
pub fn with_search_hits(description: &str, hits: &[SearchHit]) -> String {
    let snippets: Vec<&str> = hits
        .iter()
        .map(|hit| hit.snippet.as_str())
        .filter(|snippet| !snippet.is_empty())
        .collect();

    if snippets.is_empty() {
        return description.to_string();
    }

    format!("{description} Explore further: {}", snippets.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_from_single_digestion() {
        let mut brain = Brain::new();
        brain.digest("ancient ruins");

        let content = generate(&brain, "ancient");

        assert!(content.title.starts_with("Ancient Exploration"));
        assert_eq!(
            content.description,
            "A comprehensive exploration of ancient. \
             Closely connected concepts include: ruins."
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut brain = Brain::new();
        brain.digest("the deep blue sea holds the deep old wrecks");

        let first = generate(&brain, "blue whale");
        let second = generate(&brain, "blue whale");

        assert_eq!(first, second);
    }

    #[test]
    fn test_title_embeds_top_pattern() {
        let mut brain = Brain::new();
        brain.digest("over the hills and far away");
        brain.digest("over the hills we go");

        let content = generate(&brain, "winter walk");

        assert_eq!(content.title, "Winter Walk (over the hills) Exploration");
    }

    #[test]
    fn test_top_pattern_tie_keeps_first_inserted() {
        let mut brain = Brain::new();
        brain.digest("alpha beta gamma");
        brain.digest("delta epsilon zeta");

        // Both patterns have count 1; the first digested one wins.
        assert_eq!(top_pattern(&brain), Some("alpha beta gamma"));
    }

    #[test]
    fn test_successors_ranked_by_weight() {
        let mut brain = Brain::new();
        brain.digest("sea salt");
        brain.digest("sea breeze");
        brain.digest("sea breeze");
        brain.digest("sea shells");
        brain.digest("sea glass");

        let content = generate(&brain, "sea");

        // breeze (2) first, then salt/shells by insertion order; glass is
        // cut by the top-3 limit.
        assert!(content
            .description
            .contains("Closely connected concepts include: breeze, salt, shells."));
    }

    #[test]
    fn test_unknown_tokens_contribute_nothing() {
        let mut brain = Brain::new();
        brain.digest("ancient ruins");

        let content = generate(&brain, "modern city");

        assert_eq!(
            content.description,
            "A comprehensive exploration of modern city."
        );
    }

    #[test]
    fn test_empty_prompt_degrades_without_panic() {
        let brain = Brain::new();

        let content = generate(&brain, "   ");

        assert_eq!(content.title, "Exploration");
        assert_eq!(content.description, "A comprehensive exploration of .");
    }

    #[test]
    fn test_capitalize_handles_punctuation_tokens() {
        assert_eq!(capitalize("hello,"), "Hello,");
        assert_eq!(capitalize("1st"), "1st");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_flavored_title_is_pinned_by_seed() {
        let mut rng = StdRng::seed_from_u64(7);
        let first = flavored_title_with_rng("city walk", None, &mut rng);

        let mut rng = StdRng::seed_from_u64(7);
        let second = flavored_title_with_rng("city walk", None, &mut rng);

        assert_eq!(first, second);
        assert!(first.contains("Audio Guide: City Walk"));
        assert!(ADJECTIVES.iter().any(|adj| first.starts_with(adj)));
    }

    #[test]
    fn test_flavored_title_treasure_branch() {
        let mut rng = StdRng::seed_from_u64(1);
        let title = flavored_title_with_rng("treasure trail", Some("Reykjavik"), &mut rng);

        assert!(title.contains("Treasure Hunt: Treasure Trail"));
        assert!(title.ends_with("in Reykjavik"));
    }

    #[test]
    fn test_flavored_description_branches() {
        let mut rng = StdRng::seed_from_u64(3);
        let hunt = flavored_description_with_rng("scavenger hunt", None, &mut rng);
        assert!(hunt.starts_with("Get ready for an adventurous treasure hunt!"));
        assert!(hunt.ends_with("claim your reward!"));

        let mut rng = StdRng::seed_from_u64(3);
        let guide = flavored_description_with_rng("old harbor", Some("Bergen"), &mut rng);
        assert!(guide.starts_with("Discover the rich history"));
        assert!(guide.contains("Explore the wonders of Bergen."));
        assert!(PHRASES.iter().any(|phrase| guide.contains(phrase)));
    }

    #[test]
    fn test_with_search_hits() {
        let hits = vec![
            crate::testing::hit("A", "a", "First snippet."),
            crate::testing::hit("B", "b", "Second snippet."),
        ];

        let enriched = with_search_hits("Base.", &hits);
        assert_eq!(enriched, "Base. Explore further: First snippet. Second snippet.");

        assert_eq!(with_search_hits("Base.", &[]), "Base.");
    }
}
