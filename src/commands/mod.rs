mod catalogue;
mod export;
mod generate;
mod models;

pub use catalogue::run_catalogue;
pub use export::run_export;
pub use generate::run_generate;
pub use models::run_models;

use std::path::Path;
use std::sync::Arc;

use figbuild_lib::logging::init_logging;
use figbuild_lib::reference::require_reference;
use figbuild_lib::{
    BuildError, CompletionClient, Config, FigmaClient, ProgressCallback, Session,
};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::settings::{figma_client, format_effective_config, load_config};

/// Clients plus a session with the file already loaded.
pub(crate) struct Loaded {
    pub config: Config,
    pub figma: FigmaClient,
    pub llm: CompletionClient,
    pub session: Session,
}

/// Failure while preparing, with the status line at the time it happened.
pub(crate) type Failure = (BuildError, Option<String>);

/// Session whose status line is echoed to stderr in verbose mode.
pub(crate) fn new_session(verbose: bool) -> Session {
    let progress: Option<ProgressCallback> = if verbose {
        Some(Arc::new(|msg: &str| eprintln!("{msg}")))
    } else {
        None
    };
    Session::new(progress)
}

/// Config, clients and a loaded session for the generating commands.
pub(crate) async fn load_for_generation(
    config_path: Option<&Path>,
    verbose: bool,
    url: &str,
    model: Option<&str>,
) -> Result<Loaded, Failure> {
    init_logging(verbose);
    let config = load_config(config_path).map_err(|err| (err, None))?;
    let completion = config.completion_config(model);
    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&config, config_path, &completion.model)
        );
    }
    if completion.api_key.is_none() {
        warn!("HF_TOKEN is not set; completion requests will likely be rejected");
    }

    require_reference(url).map_err(|err| (err, None))?;
    let figma = figma_client(&config).map_err(|err| (err, None))?;
    let llm = CompletionClient::new(completion).map_err(|err| (err, None))?;

    let mut session = new_session(verbose);
    session.set_url(url);
    session.set_project_name(config.project_name.clone());
    if let Err(err) = session.load_file(&figma).await {
        let status = session.status().to_string();
        return Err((err, Some(status)));
    }

    Ok(Loaded {
        config,
        figma,
        llm,
        session,
    })
}

/// Token cancelled on the first Ctrl-C.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling generation...");
            cancel.cancel();
        }
    });
    token
}
