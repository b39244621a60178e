//! Generator configuration.
//!
//! Defaults match the hosted endpoint the tool was built against. A TOML
//! file may override any subset of fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use va_core::ArtifactKind;

/// Environment variable consulted for the API key when none is passed.
pub const API_KEY_ENV: &str = "CEREBRAS_API_KEY";

/// How the three code stages are issued once the specification exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactMode {
    /// Markup, then styling, then behavior
    #[default]
    Sequential,
    /// All three at once; the bundle still needs all three
    Concurrent,
}

/// Sampling parameters for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl StageParams {
    pub const fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of the chat-completions API (without `/chat/completions`)
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Timeout applied to each stage's request
    pub stage_timeout_secs: u64,
    /// Sequential or concurrent code stages
    pub artifact_mode: ArtifactMode,
    pub specification: StageParams,
    pub markup: StageParams,
    pub styling: StageParams,
    pub behavior: StageParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cerebras.ai/v1".to_string(),
            model: "llama-3.3-70b".to_string(),
            stage_timeout_secs: 30,
            artifact_mode: ArtifactMode::Sequential,
            specification: StageParams::new(0.7, 800),
            markup: StageParams::new(0.7, 2000),
            styling: StageParams::new(0.8, 2500),
            behavior: StageParams::new(0.7, 2500),
        }
    }
}

impl GeneratorConfig {
    /// Concurrent code stages with a tighter timeout.
    pub fn fast() -> Self {
        Self {
            stage_timeout_secs: 20,
            artifact_mode: ArtifactMode::Concurrent,
            ..Default::default()
        }
    }

    /// Sampling parameters for a stage.
    pub fn params(&self, kind: ArtifactKind) -> StageParams {
        match kind {
            ArtifactKind::Specification => self.specification,
            ArtifactKind::Markup => self.markup,
            ArtifactKind::Styling => self.styling,
            ArtifactKind::Behavior => self.behavior,
        }
    }

    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }

    /// Parse and validate a TOML document. Missing fields keep defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the endpoint would refuse or that make a run hang.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model is empty".into()));
        }
        if self.stage_timeout_secs == 0 {
            return Err(ConfigError::Invalid("stage_timeout_secs must be positive".into()));
        }
        for kind in [
            ArtifactKind::Specification,
            ArtifactKind::Markup,
            ArtifactKind::Styling,
            ArtifactKind::Behavior,
        ] {
            let params = self.params(kind);
            if !(0.0..=2.0).contains(&params.temperature) {
                return Err(ConfigError::Invalid(format!(
                    "{} temperature {} outside [0, 2]",
                    kind, params.temperature
                )));
            }
            if params.max_tokens == 0 {
                return Err(ConfigError::Invalid(format!("{} max_tokens is zero", kind)));
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for va_core::AppError {
    fn from(e: ConfigError) -> Self {
        va_core::AppError::Config(e.to_string())
    }
}
