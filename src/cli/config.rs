//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::SynthesisConfig;
use anyhow::{Context, Result};

/// Convert CLI arguments to a unified `SynthesisConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a `SynthesisConfig` from CLI arguments
    ///
    /// A configuration file forms the base when given; positional and
    /// flag arguments override it.
    pub(crate) fn from_cli(cli: &Cli) -> Result<SynthesisConfig> {
        let mut config = match &cli.config {
            Some(path) => SynthesisConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => SynthesisConfig::default(),
        };

        config.dataset_root = cli.dataset_root.clone();
        config.mode = cli.mode.into();
        if let Some(size) = cli.output_size {
            config.output_size = size;
        }

        config
            .validate()
            .context("Invalid synthesis configuration")?;
        Ok(config)
    }
}
