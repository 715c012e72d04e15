//! Figma API response types for parsing JSON from the Figma REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Supported image export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpg,
    #[default]
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

/// Node kinds the catalogue cares about; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Rectangle,
    Vector,
    #[serde(other)]
    Other,
}

impl NodeType {
    pub fn is_container_candidate(self) -> bool {
        matches!(
            self,
            NodeType::Frame | NodeType::Component | NodeType::ComponentSet
        )
    }
}

/// A Figma file response from the files endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub document: DocumentNode,
}

/// One node of the document tree. Only the fields used to build the catalogue
/// are typed; the rest of the payload is ignored here and kept verbatim in
/// [`FigmaNodeWrapper::document`] when a sub-document is fetched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// `visible` is optional in the API; only an explicit `false` hides a node.
    pub fn is_hidden(&self) -> bool {
        self.visible == Some(false)
    }
}

/// Response from the nodes endpoint. Requested ids the API could not resolve
/// come back as `null`, which deserializes to `None`.
#[derive(Debug, Default, Deserialize)]
pub struct FigmaNodesResponse {
    #[serde(default)]
    pub nodes: HashMap<String, Option<FigmaNodeWrapper>>,
}

impl FigmaNodesResponse {
    /// Sub-document for `id`, if the batch resolved it.
    pub fn document(&self, id: &str) -> Option<&Value> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .map(|wrapper| &wrapper.document)
    }
}

/// Wrapper containing the document for a node.
#[derive(Debug, Deserialize)]
pub struct FigmaNodeWrapper {
    pub document: Value,
}

/// Response from the images export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FigmaImageExport {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
}
