//! # sprint-narrative
//!
//! A [`NarrativeRenderer`](sprint_report::NarrativeRenderer) that asks an
//! OpenAI-compatible chat completions endpoint to summarize findings.
//!
//! The renderer is optional. When it is not configured, or any request
//! fails, report assembly falls back to a structured listing.

mod client;
mod error;
pub mod prompt;

pub use client::ChatRenderer;
pub use error::NarrativeError;
