use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::completion::{CompletionConfig, DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MODEL};
use crate::figma::client::DEFAULT_BASE_URL;
use crate::figma::ImageFormat;
use crate::models::DEFAULT_MODELS_ENDPOINT;
use crate::session::DEFAULT_PROJECT_NAME;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub figma: FigmaSettings,
    pub completion: CompletionSettings,
    pub timeouts: Timeouts,
    pub project_name: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigmaSettings {
    pub base_url: String,
    pub thumbnail_format: ImageFormat,
}

impl Default for FigmaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            thumbnail_format: ImageFormat::Svg,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub model: String,
    pub models_endpoint: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            models_endpoint: DEFAULT_MODELS_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub figma: Duration,
    #[serde(with = "humantime_serde")]
    pub completion: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            figma: Duration::from_secs(30),
            completion: Duration::from_secs(120),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            figma: FigmaSettings::default(),
            completion: CompletionSettings::default(),
            timeouts: Timeouts::default(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            output_dir: PathBuf::from("generated"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

impl Config {
    /// `~/.config/figbuild/config.toml`
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("figbuild")
                .join("config.toml")
        })
    }

    /// Load `path`, else the central config if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.is_file()),
        };
        match path {
            Some(p) => Self::from_toml_str(&std::fs::read_to_string(p)?),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("figma.base_url", &self.figma.base_url),
            ("completion.endpoint", &self.completion.endpoint),
            ("completion.models_endpoint", &self.completion.models_endpoint),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{field} '{value}': {e}")))?;
        }
        if self.completion.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "completion.model must not be empty".to_string(),
            ));
        }
        if self.timeouts.figma.is_zero() || self.timeouts.completion.is_zero() {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Completion client settings, with the API key taken from `HF_TOKEN`.
    pub fn completion_config(&self, model: Option<&str>) -> CompletionConfig {
        CompletionConfig {
            endpoint: self.completion.endpoint.clone(),
            api_key: hf_token(),
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(&self.completion.model)
                .to_string(),
            timeout: self.timeouts.completion,
        }
    }
}

pub fn hf_token() -> Option<String> {
    std::env::var("HF_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
}
