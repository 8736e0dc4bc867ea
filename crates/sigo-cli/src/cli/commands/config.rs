//! `sigo config` handlers.

use anyhow::{Context, Result};
use sigo_core::config::{Config, paths};
use sigo_core::logging;

pub fn path() {
    let config_path = paths::config_path();
    println!("{}", config_path.display());
    if !config_path.exists() {
        eprintln!("No existe todavía; usa `sigo config init` para crearlo.");
    }
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Configuración creada en {}", config_path.display());
    Ok(())
}

/// Prints the settings after environment overrides are applied.
pub fn show(config: &Config) -> Result<()> {
    let base_url = config.api.effective_base_url().context("resolve base URL")?;
    let timeout = config
        .api
        .timeout()
        .map_or_else(|| "sin límite".to_string(), |t| format!("{}s", t.as_secs()));

    println!("base_url: {base_url}");
    println!("timeout: {timeout}");
    println!("log: {}", logging::effective_filter(&config.log));
    println!("log_file: {}", if config.log.file { "sí" } else { "no" });
    println!("session: {}", paths::session_path().display());
    Ok(())
}
