use crate::artifact::GeneratedArtifact;
use crate::catalogue::CatalogueEntry;
use crate::error::ErrorPayload;
use crate::models::ModelOption;
use crate::reference::ParsedReference;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BuildOutput {
    Catalogue(CatalogueOutput),
    Generate(GenerateOutput),
    Export(ExportOutput),
    Models(ModelsOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub selected: bool,
}

impl CatalogueItem {
    pub fn new(entry: &CatalogueEntry, thumbnail: Option<&String>, selected: bool) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            thumbnail: thumbnail.cloned(),
            selected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueOutput {
    pub version: String,
    pub reference: ParsedReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub status: String,
    pub components: Vec<CatalogueItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFileSummary {
    pub name: String,
    pub bytes: usize,
}

impl From<&GeneratedArtifact> for GeneratedFileSummary {
    fn from(artifact: &GeneratedArtifact) -> Self {
        Self {
            name: artifact.name.clone(),
            bytes: artifact.code.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub version: String,
    pub reference: ParsedReference,
    pub project_name: String,
    pub status: String,
    pub files: Vec<GeneratedFileSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub version: String,
    pub file_name: String,
    pub content_type: String,
    pub output_path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsOutput {
    pub version: String,
    pub models: Vec<ModelOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ParsedReference {
        ParsedReference {
            file_id: "AbCdEfGhIjKlMnOpQrStUv".to_string(),
            target_node_id: Some("1:2".to_string()),
        }
    }

    #[test]
    fn catalogue_output_serializes() {
        let entry = CatalogueEntry {
            id: "1:2".into(),
            name: "Card".into(),
        };
        let output = BuildOutput::Catalogue(CatalogueOutput {
            version: OUTPUT_VERSION.to_string(),
            reference: reference(),
            file_name: Some("Design".into()),
            status: "Loaded 1 components".into(),
            components: vec![CatalogueItem::new(&entry, None, true)],
        });

        let json = serde_json::to_string(&output).expect("serialize catalogue output");
        assert!(json.contains("\"mode\":\"catalogue\""));
        assert!(json.contains("\"targetNodeId\":\"1:2\""));
        assert!(json.contains("\"selected\":true"));
        assert!(!json.contains("thumbnail"));
    }

    #[test]
    fn generate_output_serializes() {
        let artifact = GeneratedArtifact {
            name: "Card.tsx".into(),
            code: "abc".into(),
        };
        let output = BuildOutput::Generate(GenerateOutput {
            version: OUTPUT_VERSION.to_string(),
            reference: reference(),
            project_name: "demo".into(),
            status: "Success! 1 components generated".into(),
            files: vec![GeneratedFileSummary::from(&artifact)],
            skipped: vec![],
            archive_path: Some(PathBuf::from("demo.zip")),
            saved: vec![],
        });

        let json = serde_json::to_string(&output).expect("serialize generate output");
        assert!(json.contains("\"mode\":\"generate\""));
        assert!(json.contains("\"bytes\":3"));
        assert!(json.contains("\"archivePath\":\"demo.zip\""));
        assert!(!json.contains("skipped"));
    }
}
