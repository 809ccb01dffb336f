use crate::error::BomError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Settings for the hosted extraction model.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExtractorConfig {
    /// Load settings from an optional file, then `BOMLENS_*` environment variables.
    ///
    /// The API key falls back to `GEMINI_API_KEY`, then `API_KEY`.
    pub fn load(file: Option<&Path>) -> Result<Self, BomError> {
        let fallback_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok();
        Self::load_from(file, Environment::with_prefix("BOMLENS"), fallback_key)
    }

    fn load_from(
        file: Option<&Path>,
        env: Environment,
        fallback_key: Option<String>,
    ) -> Result<Self, BomError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(env);

        let mut cfg: ExtractorConfig = builder.build()?.try_deserialize()?;
        if cfg.api_key.is_none() {
            cfg.api_key = fallback_key;
        }
        cfg.api_key = cfg.api_key.filter(|k| !k.trim().is_empty());
        Ok(cfg)
    }

    pub fn require_api_key(&self) -> Result<&str, BomError> {
        self.api_key.as_deref().ok_or_else(|| {
            BomError::Config(
                "no API key configured. Set GEMINI_API_KEY or BOMLENS_API_KEY, or add api_key to the config file".into(),
            )
        })
    }
}
