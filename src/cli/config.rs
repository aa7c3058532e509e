//! Configuration management command

use clap::Subcommand;
use feedback_core::{
    config::default_config_path, error::Result, PortalConfig, PortalError,
};
use std::path::PathBuf;

use super::helpers::{load_config, GlobalOpts};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Handle configuration management command
pub fn handle(action: ConfigAction, opts: &GlobalOpts) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut config = load_config(opts)?;
            // Never echo a secret
            if config.llm.api_key.is_some() {
                config.llm.api_key = Some("***".to_string());
            }
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { output, force } => {
            let path = output.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                return Err(PortalError::Validation(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }

            let mut config = PortalConfig::default();
            if let Some(dir) = &opts.data_dir {
                config.storage.data_dir = dir.clone();
            }
            config.to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}
