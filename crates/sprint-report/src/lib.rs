//! # sprint-report
//!
//! Assembles an [`AnalysisResult`](sprint_core::analysis::AnalysisResult)
//! into a [`Document`] following the configured section template, with an
//! optional [`NarrativeRenderer`] for prose sections.

mod assembler;
pub mod document;
pub mod markdown;
pub mod narrative;
mod recommendations;

pub use assembler::assemble;
pub use document::{Block, Document, Narrative, Recommendation, Section, Table};
pub use markdown::to_markdown;
pub use narrative::{NarrativeRenderer, RenderError, StyleHints};
pub use recommendations::recommend;
