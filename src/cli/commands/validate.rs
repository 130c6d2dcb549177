//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Tamiz configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing; secrets never printed
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Dry Run: {}", config.application.dry_run);
                println!("  Load Date: {}", config.load.effective_load_date());
                println!("  Max Connections: {}", config.postgresql.max_connections);
                println!("  Rejects Dir: {}", config.rejects.dir);
                println!("  File Logging: {}", config.logging.local_enabled);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
