use std::path::PathBuf;
use std::process::ExitCode;

use figbuild_lib::logging::init_logging;
use figbuild_lib::output::{CatalogueItem, CatalogueOutput};
use figbuild_lib::reference::require_reference;
use figbuild_lib::{BuildError, BuildOutput, OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::commands::new_session;
use crate::formatting::{render_error, write_output};
use crate::settings::{figma_client, format_effective_config, load_config};

/// Run the catalogue command.
pub async fn run_catalogue(
    config_path: Option<PathBuf>,
    verbose: bool,
    url: String,
    format: OutputFormat,
) -> ExitCode {
    init_logging(verbose);
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&config, config_path.as_deref(), &config.completion.model)
        );
    }

    let reference = match require_reference(&url) {
        Ok(reference) => reference,
        Err(err) => return render_error(err, format, None),
    };
    let figma = match figma_client(&config) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, None),
    };

    let mut session = new_session(verbose);
    session.set_url(url);
    if let Err(err) = session.load_file(&figma).await {
        let status = session.status().to_string();
        return render_error(err, format, Some(status));
    }

    let selection = session.selection();
    let components = session
        .catalogue()
        .iter()
        .map(|entry| {
            CatalogueItem::new(
                entry,
                session.thumbnails().get(&entry.id),
                selection.has(&entry.id),
            )
        })
        .collect();

    let body = BuildOutput::Catalogue(CatalogueOutput {
        version: OUTPUT_VERSION.to_string(),
        reference,
        file_name: session.file_name().map(str::to_string),
        status: session.status().to_string(),
        components,
    });
    if let Err(err) = write_output(&body, format) {
        return render_error(BuildError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
