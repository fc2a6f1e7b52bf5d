//! The knowledge accumulator.
//!
//! A `Brain` holds three statistics tables built by digesting text, plus the
//! contextual memory of previously generated content. The same struct is the
//! serialized snapshot: the serde field names pin the on-disk wire format,
//! and `IndexMap` preserves insertion order so tie-breaking during synthesis
//! stays reproducible across save/load.

use crate::memory::ContextualMemory;
use crate::tokenize::tokenize;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of tokens in a recurring pattern.
const PATTERN_LEN: usize = 3;

/// Accumulated lexical statistics and contextual memory.
///
/// Counts only ever grow during the accumulator's lifetime; the contextual
/// memory is the single table whose entries can be removed, and only by age.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Brain {
    /// Token -> occurrence count across all digested text.
    #[serde(default)]
    pub knowledge: IndexMap<String, u64>,

    /// Token -> (successor token -> co-occurrence count). An edge exists
    /// only for pairs digested as adjacent; no zero-weight edge is stored.
    #[serde(default)]
    pub relationships: IndexMap<String, IndexMap<String, u64>>,

    /// 3-token phrase -> occurrence count.
    #[serde(default, rename = "generationRules")]
    pub generation_rules: IndexMap<String, u64>,

    /// Prompt -> previously generated content, bounded by age.
    #[serde(default, rename = "contextualMemory")]
    pub contextual_memory: ContextualMemory,
}

impl Brain {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one text's statistics into the accumulator.
    ///
    /// Every token's frequency is incremented; each adjacent pair
    /// `(prev, cur)` increments the `prev -> cur` relationship edge (the
    /// first token has no predecessor and contributes frequency only); each
    /// contiguous 3-token window increments its pattern count. Never fails:
    /// empty or whitespace-only text contributes nothing.
    pub fn digest(&mut self, text: &str) {
        let words = tokenize(text);

        for (index, word) in words.iter().enumerate() {
            *self.knowledge.entry(word.clone()).or_insert(0) += 1;

            if index > 0 {
                let prev = &words[index - 1];
                *self
                    .relationships
                    .entry(prev.clone())
                    .or_default()
                    .entry(word.clone())
                    .or_insert(0) += 1;
            }
        }

        for window in words.windows(PATTERN_LEN) {
            let pattern = window.join(" ");
            *self.generation_rules.entry(pattern).or_insert(0) += 1;
        }
    }

    /// Merge another snapshot into this accumulator.
    ///
    /// The three statistics tables are summed key-by-key, so merging is
    /// commutative and associative regardless of load order. Contextual
    /// memory entries are unioned; on a prompt collision the incoming entry
    /// replaces the existing one.
    pub fn merge(&mut self, snapshot: Brain) {
        for (word, count) in snapshot.knowledge {
            *self.knowledge.entry(word).or_insert(0) += count;
        }

        for (word, successors) in snapshot.relationships {
            let edges = self.relationships.entry(word).or_default();
            for (successor, count) in successors {
                *edges.entry(successor).or_insert(0) += count;
            }
        }

        for (pattern, count) in snapshot.generation_rules {
            *self.generation_rules.entry(pattern).or_insert(0) += count;
        }

        self.contextual_memory.absorb(snapshot.contextual_memory);
    }

    /// Number of distinct tokens seen so far.
    pub fn vocabulary_size(&self) -> usize {
        self.knowledge.len()
    }
}
