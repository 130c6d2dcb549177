// Tamiz - Customer and Card CSV Loader
// Copyright (c) 2025 Tamiz Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tamiz::cli::{Cli, Commands};
use tamiz::config::LoggingConfig;
use tamiz::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI; file logging is driven by the
    // configuration file once a command loads it
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = LoggingConfig::console_only();
    if let Err(e) = init_logging(log_level, &logging_config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(5);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Tamiz - Customer and Card CSV Loader"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Load(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
