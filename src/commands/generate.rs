use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figbuild_lib::artifact::ARTIFACT_EXTENSION;
use figbuild_lib::output::{GenerateOutput, GeneratedFileSummary};
use figbuild_lib::{
    normalize_node_id, save_artifact, BuildError, BuildOutput, GenerationOptions, OUTPUT_VERSION,
};
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::commands::{cancel_on_ctrl_c, load_for_generation, Loaded};
use crate::formatting::{render_error, write_output};

/// Run the generate command.
#[allow(clippy::too_many_arguments)]
pub async fn run_generate(
    config_path: Option<PathBuf>,
    verbose: bool,
    url: String,
    select: Option<Vec<String>>,
    all: bool,
    project: Option<String>,
    archive: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    model: Option<String>,
    format: OutputFormat,
) -> ExitCode {
    let Loaded {
        config,
        figma,
        llm,
        mut session,
    } = match load_for_generation(config_path.as_deref(), verbose, &url, model.as_deref()).await
    {
        Ok(loaded) => loaded,
        Err((err, status)) => return render_error(err, format, status),
    };

    if let Some(project) = project {
        session.set_project_name(project);
    }
    if all {
        session.select_all();
    }
    for id in select.unwrap_or_default() {
        let id = normalize_node_id(id.trim());
        if !session.catalogue().iter().any(|entry| entry.id == id) {
            warn!(node_id = %id, "selected id is not in the catalogue");
        }
        session.select(&id);
    }

    let options = GenerationOptions {
        model,
        cancel: cancel_on_ctrl_c(),
    };
    let aborted = session
        .generate_selected(&figma, &llm, &options)
        .await
        .err();
    let aborted = match (aborted, session.generated().is_empty()) {
        (Some(err), true) => {
            let status = session.status().to_string();
            return render_error(err, format, Some(status));
        }
        (aborted, _) => aborted,
    };
    if aborted.is_some() {
        warn!(
            kept = session.generated().len(),
            "generation stopped early; packaging what was produced"
        );
    }

    let mut archive_path = None;
    if let Some(path) = archive {
        let bytes = match session.archive() {
            Ok((_, bytes)) => bytes,
            Err(err) => return render_error(err, format, None),
        };
        if let Err(err) = std::fs::write(&path, bytes) {
            return render_error(BuildError::Io(err), format, None);
        }
        info!(path = %path.display(), "archive written");
        archive_path = Some(path);
    }

    let save_root = match (&archive_path, out_dir) {
        (_, Some(dir)) => Some(dir),
        (None, None) => Some(config.output_dir.clone()),
        (Some(_), None) => None,
    };
    let mut saved = Vec::new();
    if let Some(root) = save_root {
        for artifact in session.generated() {
            match save_artifact(
                &root,
                session.project_name(),
                component_stem(&artifact.name),
                &artifact.code,
            ) {
                Ok(path) => saved.push(path),
                Err(err) => return render_error(err, format, None),
            }
        }
    }

    if let Some(err) = aborted {
        let status = session.status().to_string();
        return render_error(err, format, Some(status));
    }

    let Some(reference) = session.reference().cloned() else {
        return render_error(
            BuildError::NoSelection("no Figma file loaded".to_string()),
            format,
            None,
        );
    };
    let body = BuildOutput::Generate(GenerateOutput {
        version: OUTPUT_VERSION.to_string(),
        reference,
        project_name: session.project_name().to_string(),
        status: session.status().to_string(),
        files: session
            .generated()
            .iter()
            .map(GeneratedFileSummary::from)
            .collect(),
        skipped: session.skipped().to_vec(),
        archive_path,
        saved,
    });
    if let Err(err) = write_output(&body, format) {
        return render_error(BuildError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}

/// `Card.tsx` -> `Card`
fn component_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|_| file_name.ends_with(ARTIFACT_EXTENSION))
        .unwrap_or(file_name)
}
