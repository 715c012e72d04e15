mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_catalogue, run_export, run_generate, run_models};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();

    match args.command {
        Commands::Catalogue { url } => {
            run_catalogue(args.config, args.verbose, url, args.format).await
        }
        Commands::Generate {
            url,
            select,
            all,
            project,
            archive,
            out_dir,
            model,
        } => {
            run_generate(
                args.config,
                args.verbose,
                url,
                select,
                all,
                project,
                archive,
                out_dir,
                model,
                args.format,
            )
            .await
        }
        Commands::Export {
            url,
            select,
            output,
            model,
        } => {
            run_export(
                args.config,
                args.verbose,
                url,
                select,
                output,
                model,
                args.format,
            )
            .await
        }
        Commands::Models => run_models(args.config, args.verbose, args.format).await,
    }
}
