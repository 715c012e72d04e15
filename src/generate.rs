//! Per-node code generation.
//!
//! Sub-documents for the whole selection are fetched in one batch, then each
//! selected node is sent to the completion service in selection order, one
//! at a time. A node missing from the batch is skipped; a failed completion
//! stops the run and keeps what was produced before it.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::artifact::{
    component_file_name, unique_file_name, GeneratedArtifact, FALLBACK_COMPONENT_NAME,
};
use crate::catalogue::{entry_name, CatalogueEntry};
use crate::completion::{CodeGenerator, GenerationRequest};
use crate::error::{BuildError, Result};
use crate::figma::DesignSource;
use crate::progress::PipelineStatus;

#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Model override passed to the completion service.
    pub model: Option<String>,
    pub cancel: CancellationToken,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// In selection order, file names unique within the run.
    pub artifacts: Vec<GeneratedArtifact>,
    /// Selected ids the batched fetch did not return.
    pub skipped: Vec<String>,
    /// Set when a completion failure or cancellation stopped the loop.
    pub aborted: Option<BuildError>,
}

/// Run generation for `selected_ids` of `file_id`.
///
/// Returns `Err` only when nothing could start: an empty selection
/// ([`BuildError::NoSelection`]) or a failed batch fetch
/// ([`BuildError::FetchNodesFailed`]). Per-node failures are reported in
/// [`GenerationReport::aborted`]. `status` is updated before the fetch, before
/// each completion call and once at the end.
pub async fn generate(
    source: &dyn DesignSource,
    generator: &dyn CodeGenerator,
    file_id: &str,
    selected_ids: &[String],
    catalogue: &[CatalogueEntry],
    options: &GenerationOptions,
    status: &mut PipelineStatus,
) -> Result<GenerationReport> {
    if selected_ids.is_empty() {
        let err = BuildError::NoSelection("no components selected".to_string());
        status.set(err.status_text());
        return Err(err);
    }

    status.set("Fetching selected nodes...");
    let nodes = match source.fetch_nodes(file_id, selected_ids).await {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!(file_id, error = %err, "batched node fetch failed");
            let err = BuildError::FetchNodesFailed(err.to_string());
            status.set(err.status_text());
            return Err(err);
        }
    };

    let total = selected_ids.len();
    let mut report = GenerationReport::default();

    for (index, id) in selected_ids.iter().enumerate() {
        if options.cancel.is_cancelled() {
            report.aborted = Some(BuildError::Cancelled);
            break;
        }

        let Some(document) = nodes.document(id) else {
            debug!(node_id = %id, "node missing from batch; skipping");
            report.skipped.push(id.clone());
            continue;
        };

        let component = entry_name(catalogue, id)
            .unwrap_or(FALLBACK_COMPONENT_NAME)
            .to_string();
        status.set(format!("Generating {component} ({}/{total})...", index + 1));

        let request = GenerationRequest {
            figma_json: document.clone(),
            component_name: component.clone(),
            model: options.model.clone(),
        };
        let outcome = tokio::select! {
            _ = options.cancel.cancelled() => Err(BuildError::Cancelled),
            result = generator.generate(&request) => result,
        };

        match outcome {
            Ok(code) => {
                let name =
                    unique_file_name(component_file_name(&component), &report.artifacts);
                debug!(node_id = %id, file = %name, bytes = code.len(), "component generated");
                report.artifacts.push(GeneratedArtifact { name, code });
            }
            Err(BuildError::Cancelled) => {
                report.aborted = Some(BuildError::Cancelled);
                break;
            }
            Err(err) => {
                warn!(node_id = %id, component = %component, error = %err, "generation failed; stopping run");
                report.aborted = Some(BuildError::GenerationFailed {
                    component,
                    message: err.to_string(),
                });
                break;
            }
        }
    }

    match &report.aborted {
        Some(err) => status.set(err.status_text()),
        None => {
            info!(
                file_id,
                count = report.artifacts.len(),
                skipped = report.skipped.len(),
                "generation finished"
            );
            status.set(format!(
                "Success! {} components generated",
                report.artifacts.len()
            ));
        }
    }

    Ok(report)
}
