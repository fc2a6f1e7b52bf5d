//! Learner - the primary public API.
//!
//! Wraps the accumulator, the contextual memory, and snapshot persistence
//! into a single owned instance. There is deliberately no global state:
//! callers construct a `Learner` and pass it where it is needed, so tests
//! can run isolated instances side by side. Mutating operations are plain
//! `&mut self` methods; a concurrent caller (such as an HTTP server) is
//! responsible for serializing them.

use crate::brain::Brain;
use crate::memory::{now_millis, DEFAULT_MAX_AGE_MS};
use crate::persist::{self, PersistError};
use crate::synth::{self, GeneratedContent};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from learner operations.
#[derive(Debug, Error)]
pub enum LearnerError {
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Configuration for opening a learner.
#[derive(Debug, Clone)]
pub struct LearnerConfig {
    /// Directory holding brain snapshots.
    pub snapshot_dir: PathBuf,

    /// Max age of contextual-memory entries, in milliseconds.
    pub max_memory_age_ms: u64,
}

impl LearnerConfig {
    /// Create a config for the given snapshot directory.
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            max_memory_age_ms: DEFAULT_MAX_AGE_MS,
        }
    }

    /// Set the contextual-memory max age.
    pub fn with_max_memory_age_ms(mut self, max_age_ms: u64) -> Self {
        self.max_memory_age_ms = max_age_ms;
        self
    }
}

/// The accumulation-and-synthesis engine.
pub struct Learner {
    brain: Brain,
    snapshot_dir: PathBuf,
}

impl Learner {
    /// Open a learner, replaying every prior snapshot in the directory.
    ///
    /// A missing directory is "no prior knowledge", not an error; corrupt
    /// individual snapshots are skipped by the persistence layer.
    pub async fn open(config: LearnerConfig) -> Result<Self, LearnerError> {
        let mut brain = persist::load_all(&config.snapshot_dir).await?;
        brain.contextual_memory.set_max_age(config.max_memory_age_ms);

        Ok(Self {
            brain,
            snapshot_dir: config.snapshot_dir,
        })
    }

    /// Create a learner around an existing brain, without replaying disk.
    pub fn with_brain(brain: Brain, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            brain,
            snapshot_dir: snapshot_dir.into(),
        }
    }

    /// Digest a text into the knowledge tables.
    pub fn digest(&mut self, text: &str) {
        self.brain.digest(text);
    }

    /// Synthesize content for a prompt and remember it in contextual
    /// memory.
    ///
    /// Synthesis reads the current tables only; the generated content is
    /// not digested back into them. Callers that want that feedback loop
    /// must call `digest` explicitly.
    pub fn generate_content(&mut self, prompt: &str) -> GeneratedContent {
        let content = synth::generate(&self.brain, prompt);
        self.remember(prompt, content.clone());
        content
    }

    /// Store externally assembled content in contextual memory.
    pub fn remember(&mut self, prompt: &str, content: GeneratedContent) {
        self.brain
            .contextual_memory
            .remember(prompt, content, now_millis());
    }

    /// Look up previously generated content for the exact prompt string.
    pub fn recall(&self, prompt: &str) -> Option<&GeneratedContent> {
        self.brain.contextual_memory.recall(prompt)
    }

    /// Persist the current accumulator state to a new snapshot file.
    pub async fn save_brain_state(&self) -> Result<PathBuf, LearnerError> {
        Ok(persist::save(&self.brain, &self.snapshot_dir).await?)
    }

    /// The accumulator's current state.
    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Mutable access to the accumulator.
    ///
    /// Use with caution - direct modifications bypass the digestion
    /// invariants.
    pub fn brain_mut(&mut self) -> &mut Brain {
        &mut self.brain
    }

    /// The snapshot directory this learner persists to.
    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }
}
