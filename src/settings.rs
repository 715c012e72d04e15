use std::path::Path;

use figbuild_lib::config::ConfigError;
use figbuild_lib::{BuildError, Config, FigmaAuth, FigmaClient};

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/figbuild/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, BuildError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        BuildError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e: ConfigError| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        BuildError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Figma client from env credentials and config endpoints.
pub fn figma_client(config: &Config) -> Result<FigmaClient, BuildError> {
    let auth = FigmaAuth::require_from_env()?;
    Ok(FigmaClient::with_base_url_and_timeout(
        auth,
        &config.figma.base_url,
        config.timeouts.figma,
    )?
    .thumbnail_format(config.figma.thumbnail_format))
}

/// One-line summary of the effective config (verbose mode).
pub fn format_effective_config(config: &Config, source: Option<&Path>, model: &str) -> String {
    let source = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: figma={} (thumbnails {}), completion={} model={}, timeouts: figma={}s, completion={}s, project={}, output_dir={}",
        config.figma.base_url,
        config.figma.thumbnail_format.as_str(),
        config.completion.endpoint,
        model,
        config.timeouts.figma.as_secs(),
        config.timeouts.completion.as_secs(),
        config.project_name,
        config.output_dir.display(),
    )
}
