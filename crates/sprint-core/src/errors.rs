//! Cross-cutting error types.
//!
//! Only malformed input is fatal to an analysis run. Detector failures,
//! narrative failures and loader failures have their own error types in the
//! crates that own them.

use thiserror::Error;

/// Errors raised by the core analysis pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The snapshot cannot be trusted; the run aborts before any detector runs.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

impl CoreError {
    /// Shorthand for a card that points at a list the snapshot does not contain.
    #[must_use]
    pub fn unknown_list(card_id: &str, list_id: &str) -> Self {
        Self::MalformedSnapshot(format!(
            "card {card_id} references unknown list {list_id}"
        ))
    }
}
