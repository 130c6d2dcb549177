//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tamiz using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tamiz - Customer and card CSV loader
#[derive(Parser, Debug)]
#[command(name = "tamiz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tamiz.toml", env = "TAMIZ_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TAMIZ_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load customer and card CSV files into the target store
    Load(commands::load::LoadArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_load() {
        let cli = Cli::parse_from(["tamiz", "load", "--clientes", "clientes.csv"]);
        assert_eq!(cli.config, "tamiz.toml");
        assert!(matches!(cli.command, Commands::Load(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["tamiz", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["tamiz", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["tamiz", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["tamiz", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_load_with_date() {
        let cli = Cli::parse_from([
            "tamiz",
            "load",
            "--clientes",
            "clientes.csv",
            "--load-date",
            "2024-03-01",
        ]);
        let Commands::Load(args) = cli.command else {
            panic!("expected load command");
        };
        assert!(args.load_date.is_some());
    }
}
