//! Detector error types.
//!
//! A detector error is never fatal to a run: the analyzer records it,
//! logs it, and keeps the findings of every other detector.

/// Errors raised inside a single detector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectorError {
    /// A card in the snapshot has no extracted metrics.
    #[error("no metrics extracted for card {card_id}")]
    MissingMetrics { card_id: String },

    /// The detector found input it cannot interpret.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The detector panicked; the payload message is kept when available.
    #[error("detector panicked: {0}")]
    Panicked(String),
}
