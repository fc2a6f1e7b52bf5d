//! Corpus and prompt tokenization.
//!
//! Lowercases the input and splits on runs of whitespace. Tokens keep any
//! attached punctuation: all accumulated statistics were built over raw
//! tokens, so stripping punctuation here would orphan existing keys.

/// Split text into a lowercase word sequence.
///
/// Empty or whitespace-only input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
