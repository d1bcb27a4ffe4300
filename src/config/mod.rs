// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use config::{Environment, File};
use std::path::Path;

/// Load settings from the process environment, optionally layered over a
/// config file (YAML, JSON or TOML, picked by extension).
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_settings_from(path, Environment::default())
}

fn load_settings_from(path: Option<&Path>, env: Environment) -> Result<Settings> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }

    let merged = builder
        .add_source(env.try_parsing(true))
        .build()
        .context("Failed to assemble configuration sources")?;
    let webhook_override = merged.get_string(WEBHOOK_URL_KEY).ok();

    let mut settings: Settings = merged
        .try_deserialize()
        .context("Failed to parse settings")?;
    if let Some(webhook_url) = webhook_override {
        settings.webhook_url = webhook_url;
    }

    settings.validate()?;
    Ok(settings)
}
