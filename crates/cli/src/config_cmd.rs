//! `scholar config`: validate and print configuration.

use std::path::PathBuf;

use clap::Subcommand;

use scholar_cli::exit_codes::EXIT_CONFIG;
use scholar_config::ScholarConfig;

use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a config file (default location when omitted)
    #[command(after_help = "\
Examples:
  scholar config validate
  scholar config validate ./scholar.toml")]
    Validate {
        /// Path to the config file
        file: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Show {
        /// Config file (default: ~/.config/scholar/config.toml)
        #[arg(long, env = "SCHOLAR_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the default config file location
    Path,
}

fn config_err(e: scholar_config::ConfigError) -> CliError {
    CliError::new(EXIT_CONFIG, e.to_string())
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { file } => {
            let config = ScholarConfig::load(file.as_deref()).map_err(config_err)?;
            let shown = file.unwrap_or_else(ScholarConfig::config_path);
            eprintln!(
                "ok: {} (cache {} entries / {}h, export {})",
                shown.display(),
                config.cache.max_size,
                config.cache.ttl_hours,
                config.export.format,
            );
            Ok(())
        }
        ConfigCommands::Show { config } => {
            let config = ScholarConfig::load(config.as_deref()).map_err(config_err)?;
            print!("{}", config.to_toml().map_err(config_err)?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", ScholarConfig::config_path().display());
            Ok(())
        }
    }
}
