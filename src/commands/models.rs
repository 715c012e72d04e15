use std::path::PathBuf;
use std::process::ExitCode;

use figbuild_lib::config::hf_token;
use figbuild_lib::logging::init_logging;
use figbuild_lib::models::list_models;
use figbuild_lib::output::ModelsOutput;
use figbuild_lib::{BuildError, BuildOutput, OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the models command. An unreachable catalogue yields the built-in list.
pub async fn run_models(config_path: Option<PathBuf>, verbose: bool, format: OutputFormat) -> ExitCode {
    init_logging(verbose);
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    if verbose {
        eprintln!("Fetching models from {}", config.completion.models_endpoint);
    }

    let token = hf_token();
    let models = list_models(
        &config.completion.models_endpoint,
        token.as_deref(),
        config.timeouts.figma,
    )
    .await;

    let body = BuildOutput::Models(ModelsOutput {
        version: OUTPUT_VERSION.to_string(),
        models,
    });
    if let Err(err) = write_output(&body, format) {
        return render_error(BuildError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
