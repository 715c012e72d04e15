//! Figma URL parsing.
//!
//! A design URL such as `https://www.figma.com/design/<FILE_KEY>/Name?node-id=12-34`
//! is reduced to a [`ParsedReference`]: the file key and, when present, the
//! node id in the colon form the REST API expects.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::BuildError;

/// Length of a Figma file key.
pub const FILE_KEY_LEN: usize = 22;

const FIGMA_HOST: &str = "figma.com";
const FILE_KINDS: &[&str] = &["file", "design", "proto", "fig", "community"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReference {
    pub file_id: String,
    pub target_node_id: Option<String>,
}

/// Parse a Figma URL. Returns `None` for blank input, malformed URLs, foreign
/// hosts, or paths without a `/{file|design|proto|fig|community}/{key}` pair.
pub fn parse_reference(raw: &str) -> Option<ParsedReference> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if !is_figma_host(url.host_str()?) {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    let file_id = segments
        .windows(2)
        .find(|pair| FILE_KINDS.contains(&pair[0]) && is_file_key(pair[1]))
        .map(|pair| pair[1].to_string())?;

    let target_node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| normalize_node_id(&v))
        .filter(|id| !id.is_empty());

    Some(ParsedReference {
        file_id,
        target_node_id,
    })
}

/// Like [`parse_reference`], but explains the rejection.
pub fn require_reference(raw: &str) -> Result<ParsedReference, BuildError> {
    parse_reference(raw).ok_or_else(|| {
        let shown = raw.trim();
        if shown.is_empty() {
            BuildError::InvalidReference("URL is empty".to_string())
        } else {
            BuildError::InvalidReference(format!(
                "'{shown}' is not a figma.com file/design URL with a {FILE_KEY_LEN}-character file key"
            ))
        }
    })
}

/// URLs encode `12:34` as `12-34`; the API wants the colon form.
/// Already-normalized ids are returned unchanged.
pub fn normalize_node_id(id: &str) -> String {
    id.trim().replace('-', ":")
}

fn is_figma_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == FIGMA_HOST || host.ends_with(&format!(".{FIGMA_HOST}"))
}

fn is_file_key(segment: &str) -> bool {
    segment.len() == FILE_KEY_LEN && segment.chars().all(|c| c.is_ascii_alphanumeric())
}
