//! Contextual memory - a time-bounded cache of generated content.
//!
//! Keyed by the literal prompt string, pruned by age on every write. The
//! entry map serializes as a plain object so it nests inside the snapshot
//! wire format unchanged; the configured max age is runtime state and is
//! not persisted.

use crate::synth::GeneratedContent;
use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default entry lifetime: 30 days, in milliseconds.
pub const DEFAULT_MAX_AGE_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Current wall-clock time as milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One remembered generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// The content returned for the prompt.
    pub content: GeneratedContent,

    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Prompt-keyed cache of previously generated content.
#[derive(Debug, Clone)]
pub struct ContextualMemory {
    entries: IndexMap<String, MemoryEntry>,
    max_age_ms: u64,
}

impl Default for ContextualMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextualMemory {
    /// Create an empty cache with the default 30-day max age.
    pub fn new() -> Self {
        Self::with_max_age(DEFAULT_MAX_AGE_MS)
    }

    /// Create an empty cache with a custom max entry age.
    pub fn with_max_age(max_age_ms: u64) -> Self {
        Self {
            entries: IndexMap::new(),
            max_age_ms,
        }
    }

    /// Change the max entry age for subsequent writes.
    pub fn set_max_age(&mut self, max_age_ms: u64) {
        self.max_age_ms = max_age_ms;
    }

    /// Insert or overwrite the entry for `prompt`, then prune expired
    /// entries.
    ///
    /// Pruning scans every entry on every write. That is O(entries) per
    /// call, which is fine at the intended single-digit request rate.
    pub fn remember(&mut self, prompt: &str, content: GeneratedContent, now_ms: u64) {
        self.entries.insert(
            prompt.to_string(),
            MemoryEntry {
                content,
                timestamp: now_ms,
            },
        );
        self.prune(now_ms);
    }

    /// Exact-string lookup of previously generated content.
    pub fn recall(&self, prompt: &str) -> Option<&GeneratedContent> {
        self.entries.get(prompt).map(|entry| &entry.content)
    }

    /// Number of remembered prompts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union another cache's entries into this one. On a prompt collision
    /// the incoming entry replaces the existing one.
    pub(crate) fn absorb(&mut self, other: ContextualMemory) {
        for (prompt, entry) in other.entries {
            self.entries.insert(prompt, entry);
        }
    }

    /// Drop entries strictly older than the max age. An entry whose age
    /// equals the max age exactly is kept.
    fn prune(&mut self, now_ms: u64) {
        let max_age_ms = self.max_age_ms;
        self.entries
            .retain(|_, entry| now_ms.saturating_sub(entry.timestamp) <= max_age_ms);
    }
}

impl Serialize for ContextualMemory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContextualMemory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            entries: IndexMap::deserialize(deserializer)?,
            max_age_ms: DEFAULT_MAX_AGE_MS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_AGE: u64 = 1_000;

    fn content(title: &str) -> GeneratedContent {
        GeneratedContent {
            title: title.to_string(),
            description: format!("About {title}."),
        }
    }

    #[test]
    fn test_remember_and_recall() {
        let mut memory = ContextualMemory::new();
        memory.remember("blue whale", content("Blue Whale Exploration"), 100);

        let recalled = memory.recall("blue whale").unwrap();
        assert_eq!(recalled.title, "Blue Whale Exploration");
        assert!(memory.recall("blue").is_none());
    }

    #[test]
    fn test_recall_is_exact_match_only() {
        let mut memory = ContextualMemory::new();
        memory.remember("Blue Whale", content("A"), 100);

        assert!(memory.recall("blue whale").is_none());
        assert!(memory.recall("Blue Whale").is_some());
    }

    #[test]
    fn test_remember_overwrites() {
        let mut memory = ContextualMemory::new();
        memory.remember("castle", content("First"), 100);
        memory.remember("castle", content("Second"), 200);

        assert_eq!(memory.len(), 1);
        assert_eq!(memory.recall("castle").unwrap().title, "Second");
    }

    #[test]
    fn test_eviction_boundary() {
        let inserted_at = 10_000;

        let mut memory = ContextualMemory::with_max_age(MAX_AGE);
        memory.remember("old", content("Old"), inserted_at);

        // Still present one tick before the max age.
        memory.remember("probe", content("P"), inserted_at + MAX_AGE - 1);
        assert!(memory.recall("old").is_some());

        // Present at exactly the max age (strict comparison).
        memory.remember("probe", content("P"), inserted_at + MAX_AGE);
        assert!(memory.recall("old").is_some());

        // Gone one tick past it.
        memory.remember("probe", content("P"), inserted_at + MAX_AGE + 1);
        assert!(memory.recall("old").is_none());
        assert!(memory.recall("probe").is_some());
    }

    #[test]
    fn test_prune_runs_on_every_write() {
        let mut memory = ContextualMemory::with_max_age(MAX_AGE);
        memory.remember("a", content("A"), 0);
        memory.remember("b", content("B"), 10);
        memory.remember("c", content("C"), 5_000);

        assert_eq!(memory.len(), 1);
        assert!(memory.recall("c").is_some());
    }

    #[test]
    fn test_absorb_incoming_wins() {
        let mut base = ContextualMemory::new();
        base.remember("shared", content("Base"), 100);
        base.remember("only-base", content("Kept"), 100);

        let mut incoming = ContextualMemory::new();
        incoming.remember("shared", content("Incoming"), 200);

        base.absorb(incoming);

        assert_eq!(base.recall("shared").unwrap().title, "Incoming");
        assert_eq!(base.recall("only-base").unwrap().title, "Kept");
    }

    #[test]
    fn test_serializes_as_plain_entry_map() {
        let mut memory = ContextualMemory::new();
        memory.remember("key", content("Value"), 99);

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&memory).unwrap()).unwrap();
        assert_eq!(json["key"]["timestamp"], 99);
        assert_eq!(json["key"]["content"]["title"], "Value");

        let restored: ContextualMemory = serde_json::from_value(json).unwrap();
        assert_eq!(restored.recall("key").unwrap().title, "Value");
    }
}
