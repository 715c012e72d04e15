use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Invalid Figma URL: {0}")]
    InvalidReference(String),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Completion service error (status: {status:?}): {message}")]
    Completion {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("No frames/components found")]
    EmptyCatalogue,

    #[error("Nothing to generate: {0}")]
    NoSelection(String),

    #[error("Failed to fetch nodes: {0}")]
    FetchNodesFailed(String),

    #[error("Code generation failed for {component}: {message}")]
    GenerationFailed { component: String, message: String },

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BuildError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        BuildError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn completion(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        BuildError::Completion {
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BuildError::InvalidUrl(_)
            | BuildError::InvalidReference(_)
            | BuildError::NoSelection(_) => ErrorCategory::Validation,
            BuildError::FigmaApi { .. }
            | BuildError::Completion { .. }
            | BuildError::EmptyCatalogue
            | BuildError::FetchNodesFailed(_)
            | BuildError::GenerationFailed { .. } => ErrorCategory::Upstream,
            BuildError::Network(_) => ErrorCategory::Network,
            BuildError::Io(_) | BuildError::Config(_) | BuildError::Serialization(_) => {
                ErrorCategory::Config
            }
            BuildError::Archive(_) => ErrorCategory::Archive,
            BuildError::Cancelled => ErrorCategory::Unknown,
        }
    }

    /// Text shown as the pipeline status when this error ends a step.
    pub fn status_text(&self) -> String {
        let message = match self {
            BuildError::FigmaApi { message, .. } | BuildError::Completion { message, .. } => {
                message.clone()
            }
            BuildError::FetchNodesFailed(_) => "Failed to fetch nodes".to_string(),
            BuildError::GenerationFailed { .. } => "Code generation failed".to_string(),
            other => other.to_string(),
        };
        format!("Error: {message}")
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let remediation = match self {
            BuildError::Io(_) => "Check output paths/permissions.",
            BuildError::Network(_) => "Check connectivity/proxy/VPN and retry.",
            BuildError::InvalidUrl(_) | BuildError::InvalidReference(_) => {
                "Use a Figma URL like https://www.figma.com/design/<22-char FILE_KEY>/Name?node-id=1-2."
            }
            BuildError::FigmaApi { status, .. } => match status.map(|s| s.as_u16()) {
                Some(403) => "Check FIGMA_TOKEN and that it can read this file.",
                Some(404) => "Verify the file key and node ids exist.",
                Some(429) => "Rate limited by Figma; retry after waiting.",
                _ => "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
            },
            BuildError::Completion { .. } | BuildError::GenerationFailed { .. } => {
                "Check HF_TOKEN, the selected model and free tier limits; retry."
            }
            BuildError::EmptyCatalogue => {
                "The file has no visible frames/components with children; check the URL."
            }
            BuildError::NoSelection(_) => {
                "Select at least one component (--select ID or --all) for a loaded file."
            }
            BuildError::FetchNodesFailed(_) => "Retry; the selected nodes could not be fetched.",
            BuildError::Cancelled => "Re-run the generation.",
            BuildError::Serialization(_) => "Inspect the upstream JSON; run with --verbose.",
            BuildError::Archive(_) => "Check disk space and the archive path.",
            BuildError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("figma_token") || lower.contains("figma token") {
                    "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) before loading a file."
                } else if lower.contains("hf_token") {
                    "Set HF_TOKEN to call the completion service."
                } else if lower.contains("project name") || lower.contains("component name") {
                    "Use plain names without path separators or '..'."
                } else {
                    "Check flags, config file values and required tokens."
                }
            }
        };
        ErrorPayload::new(self.category(), self.to_string(), remediation)
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Validation,
    Upstream,
    Network,
    Config,
    Archive,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
