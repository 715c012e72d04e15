use std::path::PathBuf;
use std::process::ExitCode;

use figbuild_lib::output::ExportOutput;
use figbuild_lib::{normalize_node_id, BuildError, BuildOutput, GenerationOptions, OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::commands::{cancel_on_ctrl_c, load_for_generation, Loaded};
use crate::formatting::{render_error, write_output};

/// Run the export command: generate one node and write it as a single file.
pub async fn run_export(
    config_path: Option<PathBuf>,
    verbose: bool,
    url: String,
    select: Option<String>,
    output: Option<PathBuf>,
    model: Option<String>,
    format: OutputFormat,
) -> ExitCode {
    let Loaded {
        figma,
        llm,
        mut session,
        ..
    } = match load_for_generation(config_path.as_deref(), verbose, &url, model.as_deref()).await
    {
        Ok(loaded) => loaded,
        Err((err, status)) => return render_error(err, format, status),
    };

    let node_id = select
        .map(|id| normalize_node_id(id.trim()))
        .or_else(|| session.reference().and_then(|r| r.target_node_id.clone()));
    let Some(node_id) = node_id else {
        return render_error(
            BuildError::NoSelection("pass --select or a URL with node-id".to_string()),
            format,
            None,
        );
    };
    session.clear_selection();
    session.toggle(&node_id);

    let options = GenerationOptions {
        model,
        cancel: cancel_on_ctrl_c(),
    };
    let generated = session
        .generate_selected(&figma, &llm, &options)
        .await
        .map(|artifacts| artifacts.first().map(|artifact| artifact.name.clone()));
    let name = match generated {
        Ok(Some(name)) => name,
        Ok(None) => {
            let status = session.status().to_string();
            return render_error(
                BuildError::FetchNodesFailed(format!("node {node_id} was not returned")),
                format,
                Some(status),
            );
        }
        Err(err) => {
            let status = session.status().to_string();
            return render_error(err, format, Some(status));
        }
    };

    let Some(file) = session.export_single(&name) else {
        return render_error(
            BuildError::NoSelection(format!("no generated file named {name}")),
            format,
            None,
        );
    };
    let output_path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
    if let Err(err) = std::fs::write(&output_path, &file.bytes) {
        return render_error(BuildError::Io(err), format, None);
    }

    let body = BuildOutput::Export(ExportOutput {
        version: OUTPUT_VERSION.to_string(),
        file_name: file.file_name,
        content_type: file.content_type.to_string(),
        output_path,
        bytes: file.bytes.len(),
    });
    if let Err(err) = write_output(&body, format) {
        return render_error(BuildError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
