//! Load command implementation
//!
//! This module implements the `load` command: extract, validate,
//! anonymize and upsert the customer and card CSV files.

use crate::config::load_config;
use crate::core::PipelineCoordinator;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Path to the customers CSV file
    #[arg(long)]
    pub clientes: Option<PathBuf>,

    /// Path to the cards CSV file
    #[arg(long)]
    pub tarjetas: Option<PathBuf>,

    /// Load date stamped on every row (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub load_date: Option<NaiveDate>,

    /// Dry run mode - validate and report without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl LoadArgs {
    /// Execute the load command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting load command");

        if self.clientes.is_none() && self.tarjetas.is_none() {
            eprintln!("Nothing to load: pass --clientes and/or --tarjetas");
            return Ok(2); // Configuration error exit code
        }

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration loading failed");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(date) = self.load_date {
            tracing::info!(load_date = %date, "Overriding load date from CLI");
            config.load.load_date = Some(date);
        }

        if config.application.dry_run {
            println!("DRY RUN - nothing will be written to the store or the reject sink");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.application.dry_run {
            println!("Load Configuration:");
            println!("  Load date: {}", config.load.effective_load_date());
            if let Some(path) = &self.clientes {
                println!("  Customers: {}", path.display());
            }
            if let Some(path) = &self.tarjetas {
                println!("  Cards: {}", path.display());
            }
            println!("  Rejects dir: {}", config.rejects.dir);
            println!();
            print!("Proceed with load? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Load cancelled.");
                return Ok(0);
            }
        }

        tracing::info!("Creating pipeline coordinator");
        let coordinator = match PipelineCoordinator::new(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create pipeline coordinator");
                eprintln!("Failed to initialize load: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let summary = match coordinator
            .run(self.clientes.as_deref(), self.tarjetas.as_deref())
            .await
        {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Load failed");
                eprintln!("Load failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!();
        println!("Load Summary:");
        println!("  Total rows: {}", summary.total_rows);
        println!("  Accepted: {}", summary.accepted);
        println!("  Rejected: {}", summary.rejected);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Acceptance rate: {:.2}%", summary.acceptance_rate());
        println!();

        if !summary.errors.is_empty() {
            println!("Errors encountered:");
            for error in &summary.errors {
                println!("  - {:?}: {}", error.kind, error.message);
                if let Some(context) = &error.context {
                    println!("    Context: {context}");
                }
            }
            println!();
        }

        let exit_code = if !summary.is_successful() {
            println!("Load completed with errors");
            5
        } else if summary.rejected > 0 {
            println!("Load completed with rejected rows (see {})", config.rejects.dir);
            1 // Partial success
        } else {
            println!("Load completed successfully");
            0
        };

        Ok(exit_code)
    }
}
