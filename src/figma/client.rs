//! Figma API client for fetching file data, node sub-documents and previews.

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::api_types::{FigmaFile, FigmaImageExport, FigmaNodesResponse, ImageFormat};
use super::DesignSource;
use crate::error::{BuildError, Result};
use crate::reference::normalize_node_id;

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.trim().is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.trim().is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    /// Like [`FigmaAuth::from_env`], but a missing token is a config error.
    pub fn require_from_env() -> Result<Self> {
        Self::from_env().ok_or_else(|| {
            BuildError::Config("Missing FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN)".to_string())
        })
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            FigmaAuth::PersonalAccessToken(token) => builder.header("X-Figma-Token", token),
            FigmaAuth::OAuthToken(token) => builder.bearer_auth(token),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    auth: FigmaAuth,
    base_url: Url,
    thumbnail_format: ImageFormat,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url_and_timeout(
        auth: FigmaAuth,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BuildError::Network)?;

        Ok(Self {
            http,
            auth,
            base_url,
            thumbnail_format: ImageFormat::default(),
        })
    }

    pub fn thumbnail_format(mut self, format: ImageFormat) -> Self {
        self.thumbnail_format = format;
        self
    }

    pub async fn get_file(&self, file_key: &str) -> Result<FigmaFile> {
        let url = self.endpoint(&format!("/v1/files/{file_key}"))?;
        debug!(file_key, "fetching figma file");
        self.send_json(self.auth.apply(self.http.get(url))).await
    }

    pub async fn get_file_nodes(
        &self,
        file_key: &str,
        node_ids: &[String],
    ) -> Result<FigmaNodesResponse> {
        validate_node_ids(node_ids, "fetching nodes from Figma")?;

        let ids = node_ids
            .iter()
            .map(|id| normalize_node_id(id))
            .collect::<Vec<_>>()
            .join(",");
        let mut url = self.endpoint(&format!("/v1/files/{file_key}/nodes"))?;
        url.query_pairs_mut().append_pair("ids", &ids);
        debug!(file_key, count = node_ids.len(), "fetching figma nodes");
        self.send_json(self.auth.apply(self.http.get(url))).await
    }

    pub async fn export_images(
        &self,
        file_key: &str,
        node_ids: &[String],
        format: ImageFormat,
    ) -> Result<FigmaImageExport> {
        validate_node_ids(node_ids, "exporting Figma images")?;

        let mut url = self.endpoint(&format!("/v1/images/{file_key}"))?;
        url.query_pairs_mut()
            .append_pair("ids", &node_ids.join(","))
            .append_pair("format", format.as_str());
        debug!(file_key, count = node_ids.len(), "exporting figma images");
        self.send_json(self.auth.apply(self.http.get(url))).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(BuildError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(BuildError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str(&body).map_err(BuildError::Serialization);
        }

        Err(BuildError::figma_api(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

#[async_trait]
impl DesignSource for FigmaClient {
    async fn fetch_file(&self, file_id: &str) -> Result<FigmaFile> {
        self.get_file(file_id).await
    }

    async fn fetch_nodes(&self, file_id: &str, node_ids: &[String]) -> Result<FigmaNodesResponse> {
        self.get_file_nodes(file_id, node_ids).await
    }

    async fn fetch_images(&self, file_id: &str, node_ids: &[String]) -> Result<FigmaImageExport> {
        self.export_images(file_id, node_ids, self.thumbnail_format)
            .await
    }
}

fn validate_node_ids(node_ids: &[String], context: &str) -> Result<()> {
    if node_ids.is_empty() {
        return Err(BuildError::Config(format!(
            "node_ids cannot be empty when {context}"
        )));
    }
    Ok(())
}

/// Pull the upstream message out of an `{err}` / `{error}` / `{message}` envelope.
fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Figma API returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| {
            value
                .get("err")
                .or_else(|| value.get("error"))
                .or_else(|| value.get("message"))
        })
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Figma API, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}
