//! # sprint-analysis
//!
//! Turns a [`BoardSnapshot`](sprint_core::board::BoardSnapshot) into an
//! [`AnalysisResult`](sprint_core::analysis::AnalysisResult).
//!
//! The pipeline is pure: the reference time and thresholds are arguments,
//! so the same inputs always produce the same result.
//!
//! ```no_run
//! use sprint_analysis::{analyze, default_detectors};
//! use sprint_config::AnalysisConfig;
//! # fn demo(snapshot: sprint_core::board::BoardSnapshot) -> Result<(), sprint_core::errors::CoreError> {
//! let result = analyze(
//!     &snapshot,
//!     &default_detectors(),
//!     &AnalysisConfig::default(),
//!     snapshot.captured_at,
//! )?;
//! println!("{} findings", result.findings().len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod detectors;
pub mod error;
pub mod metrics;

pub use analyzer::{analyze, deduplicate};
pub use detectors::{DetectionInput, Detector, default_detectors};
pub use error::DetectorError;
pub use metrics::{CardMetrics, MetricsMap, extract};
