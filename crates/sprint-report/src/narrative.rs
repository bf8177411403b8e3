//! The narrative rendering seam.
//!
//! Report assembly only needs "turn these findings into prose". Whatever
//! implements [`NarrativeRenderer`] (an LLM client, a canned template, a test
//! stub) is interchangeable, and its failure never fails the report.

use async_trait::async_trait;
use serde::Serialize;
use sprint_core::finding::Finding;

/// Context passed to the renderer alongside the findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleHints {
    pub sprint_name: String,
    pub team_name: String,
    pub board_name: String,
    /// Title of the section the prose will appear under.
    pub section_title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer could not produce text (unreachable, timed out, refused).
    #[error("narrative renderer unavailable: {0}")]
    Unavailable(String),

    /// The renderer answered but with no usable text.
    #[error("narrative renderer returned an empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait NarrativeRenderer: Send + Sync {
    /// Summarize `findings` as prose.
    async fn summarize(
        &self,
        findings: &[Finding],
        hints: &StyleHints,
    ) -> Result<String, RenderError>;
}
