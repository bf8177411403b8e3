//! # sprint-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SPRINT_*` prefix, `__` as separator)
//! 2. Project-level `.sprint/config.toml`
//! 3. User-level `~/.config/sprint/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SPRINT_TRELLO__API_KEY` -> `trello.api_key`,
//! `SPRINT_ANALYSIS__STALENESS_DAYS` -> `analysis.staleness_days`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sprint_config::SprintConfig;
//!
//! let config = SprintConfig::load_with_dotenv(Path::new(".")).expect("config");
//! config.validate().expect("valid thresholds");
//!
//! if config.trello.is_configured() {
//!     println!("Board: {}", config.trello.board_id);
//! }
//! ```

mod analysis;
mod error;
mod http;
mod narrative;
mod report;
mod trello;

pub use analysis::{AnalysisConfig, SeverityBands, SeverityBandsConfig};
pub use error::ConfigError;
pub use http::HttpConfig;
pub use narrative::NarrativeConfig;
pub use report::{ReportConfig, SectionKind, SectionSpec, SectionTemplate};
pub use trello::TrelloConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the project-local config file.
pub const PROJECT_DIR: &str = ".sprint";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SprintConfig {
    #[serde(default)]
    pub trello: TrelloConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl SprintConfig {
    /// Load configuration with the project file resolved under `root`.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    pub fn load_from(root: &Path) -> Result<Self, ConfigError> {
        Self::figment_in(root).extract().map_err(ConfigError::from)
    }

    /// Load `root/.env` into the process environment, then the layered config.
    ///
    /// A missing `.env` is not an error.
    pub fn load_with_dotenv(root: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::from_path(root.join(".env"));
        Self::load_from(root)
    }

    /// Build the figment provider chain rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_in(Path::new("."))
    }

    /// Build the figment provider chain with the project file under `root`.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment_in(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SPRINT_").split("__"))
    }

    /// Path to the project-local config file under `root`.
    #[must_use]
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR).join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sprint").join("config.toml"))
    }

    /// Validate every section the analysis and report pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        self.report.sections.validate()
    }

    /// Board to analyze: explicit override first, then `trello.board_id`.
    pub fn board_id<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str, ConfigError> {
        match explicit.filter(|id| !id.is_empty()) {
            Some(id) => Ok(id),
            None if !self.trello.board_id.is_empty() => Ok(&self.trello.board_id),
            None => Err(ConfigError::NotConfigured {
                section: "trello.board_id".to_string(),
            }),
        }
    }

    /// Copy with secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [
            &mut copy.trello.api_key,
            &mut copy.trello.api_token,
            &mut copy.narrative.api_key,
        ] {
            if !secret.is_empty() {
                *secret = "********".to_string();
            }
        }
        copy
    }
}
