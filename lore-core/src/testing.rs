//! Testing utilities.
//!
//! Deterministic fixtures for exercising synthesis and persistence without
//! wall-clock time, unseeded randomness, or network access.

use crate::brain::Brain;
use rand::rngs::StdRng;
use rand::SeedableRng;
use websearch::SearchHit;

/// A brain digested from a small fixed corpus.
///
/// The corpus is chosen so that every statistics table is populated:
/// repeated tokens, weighted relationship edges, and a recurring 3-token
/// pattern.
pub fn sample_brain() -> Brain {
    let mut brain = Brain::new();
    brain.digest("the old harbor lights guide the old ships home");
    brain.digest("the old harbor smells of salt and tar");
    brain.digest("fishermen mend their nets beside the old harbor");
    brain
}

/// Construct a search hit literal.
pub fn hit(title: &str, link: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        link: link.to_string(),
        snippet: snippet.to_string(),
    }
}

/// A seeded rng for pinning flavored generation in tests.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth;

    #[test]
    fn test_sample_brain_populates_all_tables() {
        let brain = sample_brain();

        assert!(brain.knowledge["the"] >= 3);
        assert!(brain.relationships["old"]["harbor"] >= 2);
        assert_eq!(brain.generation_rules["the old harbor"], 3);
        assert!(brain.contextual_memory.is_empty());
    }

    #[test]
    fn test_sample_brain_drives_synthesis() {
        let brain = sample_brain();

        let content = synth::generate(&brain, "old harbor");

        assert_eq!(
            content.title,
            "Old Harbor (the old harbor) Exploration"
        );
        assert!(content.description.contains("harbor"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = synth::flavored_title_with_rng("quiet pier", None, &mut seeded_rng(11));
        let b = synth::flavored_title_with_rng("quiet pier", None, &mut seeded_rng(11));
        assert_eq!(a, b);
    }
}
