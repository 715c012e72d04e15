use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use figbuild_lib::{BuildError, BuildOutput, ErrorOutput, OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write output in the requested format to stdout.
pub fn write_output(body: &BuildOutput, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(body)?),
        OutputFormat::Pretty => write_pretty_output(body)?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: BuildError, format: OutputFormat, status: Option<String>) -> ExitCode {
    let payload = BuildOutput::Error(ErrorOutput {
        version: OUTPUT_VERSION.to_string(),
        status,
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            println!("{content}");
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_pretty_output(body: &BuildOutput) -> io::Result<()> {
    if io::stdout().is_terminal() {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Non-tty: keep JSON shape for pipelines.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    println!("{content}");
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &BuildOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        BuildOutput::Catalogue(out) => {
            let header = color("[CATALOGUE]", "36", colorize);
            let title = out.file_name.as_deref().unwrap_or(&out.reference.file_id);
            writeln!(buf, "{header} {title}: {}", out.status).ok();
            for item in &out.components {
                let mark = if item.selected { "[x]" } else { "[ ]" };
                let preview = if item.thumbnail.is_some() { "" } else { " (no preview)" };
                writeln!(buf, "{mark} {:10} {}{preview}", item.id, item.name).ok();
            }
        }
        BuildOutput::Generate(out) => {
            let header = color("[GENERATE]", "32", colorize);
            writeln!(buf, "{header} {}", out.status).ok();
            for file in &out.files {
                writeln!(buf, "- {} ({} bytes)", file.name, file.bytes).ok();
            }
            if !out.skipped.is_empty() {
                writeln!(buf, "Skipped (not returned by Figma): {}", out.skipped.join(", ")).ok();
            }
            if let Some(path) = &out.archive_path {
                writeln!(buf, "Archive: {}", path.display()).ok();
            }
            for path in &out.saved {
                writeln!(buf, "Saved: {}", path.display()).ok();
            }
        }
        BuildOutput::Export(out) => {
            let header = color("[EXPORT]", "32", colorize);
            writeln!(
                buf,
                "{header} {} -> {} ({}, {} bytes)",
                out.file_name,
                out.output_path.display(),
                out.content_type,
                out.bytes
            )
            .ok();
        }
        BuildOutput::Models(out) => {
            let header = color("[MODELS]", "34", colorize);
            writeln!(buf, "{header} {} available", out.models.len()).ok();
            for model in &out.models {
                writeln!(buf, "- {:40} {} ({})", model.id, model.name, model.providers.join(", "))
                    .ok();
            }
        }
        BuildOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
