//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{read_config, validate_config, AdapterConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "streaming-http-adapter")]
#[command(about = "Bridges plain HTTP requests to a streaming function invoker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP bind address, overrides `listener.bind_address`.
    #[arg(long)]
    pub bind: Option<String>,

    /// Invoker gRPC address, overrides `backend.address`.
    #[arg(long)]
    pub backend: Option<String>,

    /// Log level, overrides `observability.log_level`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Invoker command to launch, overrides `invoker.command`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Config file (or defaults) with command line overrides applied, validated.
    pub fn load_config(&self) -> Result<AdapterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => AdapterConfig::default(),
        };
        self.apply_overrides(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AdapterConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(backend) = &self.backend {
            config.backend.address = backend.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if !self.command.is_empty() {
            config.invoker.command = self.command.clone();
        }
    }
}
