//! The state one user works with: the current URL, the catalogue built from
//! it, previews, the selection and the last generation result.
//!
//! Every pipeline step is a `&mut self` method, so steps never overlap.

use tracing::{debug, info};

use crate::artifact::GeneratedArtifact;
use crate::catalogue::{build_catalogue, CatalogueEntry};
use crate::completion::CodeGenerator;
use crate::error::{BuildError, Result};
use crate::figma::DesignSource;
use crate::generate::{generate, GenerationOptions, GenerationReport};
use crate::package::{archive_file_name, to_archive, to_single_file, ExportedFile};
use crate::progress::{PipelineStatus, ProgressCallback};
use crate::reference::{parse_reference, ParsedReference};
use crate::selection::SelectionSet;
use crate::thumbnails::{fetch_thumbnails, ThumbnailMap};

pub const DEFAULT_PROJECT_NAME: &str = "my-figma-app";

#[derive(Debug)]
pub struct Session {
    url: String,
    reference: Option<ParsedReference>,
    project_name: String,
    file_name: Option<String>,
    catalogue: Vec<CatalogueEntry>,
    thumbnails: ThumbnailMap,
    selection: SelectionSet,
    generated: Vec<GeneratedArtifact>,
    skipped: Vec<String>,
    status: PipelineStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Session {
    pub fn new(progress: Option<ProgressCallback>) -> Self {
        Self {
            url: String::new(),
            reference: None,
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            file_name: None,
            catalogue: Vec::new(),
            thumbnails: ThumbnailMap::new(),
            selection: SelectionSet::new(),
            generated: Vec::new(),
            skipped: Vec::new(),
            status: PipelineStatus::new(progress),
        }
    }

    /// Replace the URL. Everything derived from the previous file is dropped.
    pub fn set_url(&mut self, url: impl Into<String>) -> Option<&ParsedReference> {
        self.url = url.into();
        self.reference = parse_reference(&self.url);
        self.file_name = None;
        self.catalogue.clear();
        self.thumbnails.clear();
        self.selection.clear();
        self.generated.clear();
        self.skipped.clear();
        self.reference.as_ref()
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    /// Fetch the file, rebuild the catalogue, fetch previews and apply the
    /// URL's node id as the initial selection. Returns the catalogue size.
    pub async fn load_file(&mut self, source: &dyn DesignSource) -> Result<usize> {
        let result = self.load_file_inner(source).await;
        if let Err(err) = &result {
            self.status.set(err.status_text());
        }
        result
    }

    async fn load_file_inner(&mut self, source: &dyn DesignSource) -> Result<usize> {
        let reference = self.reference.clone().ok_or_else(|| {
            BuildError::InvalidReference(format!("'{}' is not a Figma file URL", self.url.trim()))
        })?;

        self.catalogue.clear();
        self.thumbnails.clear();
        self.selection.clear();
        self.generated.clear();
        self.skipped.clear();

        self.status.set("Fetching Figma file...");
        let file = source.fetch_file(&reference.file_id).await?;
        self.file_name = file.name.clone();
        self.catalogue = build_catalogue(&file.document);
        if self.catalogue.is_empty() {
            return Err(BuildError::EmptyCatalogue);
        }
        debug!(file_id = %reference.file_id, count = self.catalogue.len(), "catalogue built");

        let ids: Vec<String> = self.catalogue.iter().map(|e| e.id.clone()).collect();
        self.thumbnails = fetch_thumbnails(source, &reference.file_id, &ids).await;

        if self
            .selection
            .seed(reference.target_node_id.as_deref(), &self.catalogue)
        {
            debug!(node_id = ?reference.target_node_id, "pre-selected node from URL");
        }

        self.status
            .set(format!("Loaded {} components", self.catalogue.len()));
        Ok(self.catalogue.len())
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Add `id` without deselecting it if already picked.
    pub fn select(&mut self, id: &str) -> bool {
        self.selection.add(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.catalogue);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Generate every selected node. The previous result is replaced, and
    /// when a run stops early the components produced before the failure are
    /// kept. Catalogue and selection are left untouched either way.
    pub async fn generate_selected(
        &mut self,
        source: &dyn DesignSource,
        generator: &dyn CodeGenerator,
        options: &GenerationOptions,
    ) -> Result<&[GeneratedArtifact]> {
        let Some(reference) = self.reference.clone() else {
            let err = BuildError::NoSelection("no Figma file loaded".to_string());
            self.status.set(err.status_text());
            return Err(err);
        };
        if self.selection.is_empty() {
            let err = BuildError::NoSelection("no components selected".to_string());
            self.status.set(err.status_text());
            return Err(err);
        }

        self.generated.clear();
        self.skipped.clear();

        let GenerationReport {
            artifacts,
            skipped,
            aborted,
        } = generate(
            source,
            generator,
            &reference.file_id,
            self.selection.ids(),
            &self.catalogue,
            options,
            &mut self.status,
        )
        .await?;

        info!(
            file_id = %reference.file_id,
            generated = artifacts.len(),
            skipped = skipped.len(),
            "generation run complete"
        );
        self.generated = artifacts;
        self.skipped = skipped;

        match aborted {
            Some(err) => Err(err),
            None => Ok(&self.generated),
        }
    }

    /// Zip of the current artifacts, with its download file name.
    pub fn archive(&self) -> Result<(String, Vec<u8>)> {
        let bytes = to_archive(&self.project_name, &self.generated)?;
        Ok((archive_file_name(&self.project_name), bytes))
    }

    /// Single-file export of the artifact called `name`.
    pub fn export_single(&self, name: &str) -> Option<ExportedFile> {
        self.generated
            .iter()
            .find(|artifact| artifact.name == name)
            .map(to_single_file)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn reference(&self) -> Option<&ParsedReference> {
        self.reference.as_ref()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn catalogue(&self) -> &[CatalogueEntry] {
        &self.catalogue
    }

    pub fn thumbnails(&self) -> &ThumbnailMap {
        &self.thumbnails
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn generated(&self) -> &[GeneratedArtifact] {
        &self.generated
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn status(&self) -> &str {
        self.status.text()
    }
}
