//! Layered configuration: built-in defaults, an optional TOML file, then
//! `NEOFAX_*` environment variables.

use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::Deserialize;

use neofax_core::Category;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "neofax.toml";

const ENV_PREFIX: &str = "NEOFAX";

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Calculator settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Reference document shown next to each page number
    pub reference_document: String,
    /// Category used when `--category` is not given
    pub default_category: Category,
    pub output_format: OutputFormat,
    pub log_level: String,
    /// Reject out-of-range patient data instead of warning
    pub strict_domain: bool,
}

impl Settings {
    /// Load settings from `path` (missing file is fine) and the environment.
    pub fn load(path: &str) -> Result<Self> {
        Self::from_sources(path, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_sources(path: &str, env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("reference_document", "neofax.pdf")?
            .set_default("default_category", "all")?
            .set_default("output_format", "text")?
            .set_default("log_level", "info")?
            .set_default("strict_domain", false)?
            .add_source(File::with_name(path).required(false))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
