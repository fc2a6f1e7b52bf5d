//! Lexical knowledge accumulation and content synthesis.
//!
//! This crate provides:
//! - A knowledge accumulator built by digesting text: word frequencies,
//!   directed word-relationship weights, and recurring 3-token patterns
//! - A time-bounded contextual memory of previously generated content
//! - A deterministic synthesizer that turns a prompt plus the accumulated
//!   statistics into a title/description pair
//! - Snapshot persistence: immutable timestamped JSON files, merged on load
//!
//! # Quick Start
//!
//! ```ignore
//! use lore_core::{Learner, LearnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut learner = Learner::open(LearnerConfig::new("./learned_content")).await?;
//!
//!     learner.digest("ancient ruins rise from the mist");
//!     let content = learner.generate_content("ancient");
//!     println!("{}: {}", content.title, content.description);
//!
//!     learner.save_brain_state().await?;
//!     Ok(())
//! }
//! ```

pub mod brain;
pub mod learner;
pub mod memory;
pub mod persist;
pub mod synth;
pub mod testing;
pub mod tokenize;

// Primary public API
pub use brain::Brain;
pub use learner::{Learner, LearnerConfig, LearnerError};
pub use memory::{now_millis, ContextualMemory, MemoryEntry, DEFAULT_MAX_AGE_MS};
pub use persist::PersistError;
pub use synth::{generate, GeneratedContent};
pub use tokenize::tokenize;
