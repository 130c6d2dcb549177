// Tamiz - Customer and Card CSV Loader
// Copyright (c) 2025 Tamiz Contributors
// Licensed under the MIT License

//! # Tamiz - Customer and Card CSV Loader
//!
//! Tamiz is an ETL tool built in Rust that loads `;`-delimited customer and
//! card CSV extracts into PostgreSQL, validating and anonymizing every row
//! on the way in.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** rows from `;`-delimited CSV files with header normalization
//! - **Validating** identity documents, emails, phones and card numbers
//! - **Anonymizing** identity and card numbers with deterministic salted hashes
//! - **Loading** rows into PostgreSQL with idempotent upserts, diverting
//!   rejected rows to append-only CSV files
//!
//! ## Architecture
//!
//! Tamiz follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (validate, anonymize, transform, load)
//! - [`adapters`] - External integrations (CSV files, PostgreSQL, reject sink)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tamiz::config::load_config;
//! use tamiz::core::PipelineCoordinator;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tamiz.toml")?;
//!
//!     let coordinator = PipelineCoordinator::new(&config).await?;
//!     let summary = coordinator
//!         .run(Some(Path::new("clientes.csv")), Some(Path::new("tarjetas.csv")))
//!         .await?;
//!
//!     println!("Accepted {} rows, rejected {}", summary.accepted, summary.rejected);
//!     Ok(())
//! }
//! ```
//!
//! ## Partial failure
//!
//! A malformed row never aborts a run. Rows missing a business key are
//! diverted to per-entity reject files with every failing field named;
//! optional fields that fail validation are loaded anyway with their
//! quality flags set. Replaying the same file is safe: accepted rows
//! upsert on their business key, rejects append.
//!
//! ## Error Handling
//!
//! Tamiz uses the [`domain::TamizError`] type for all errors:
//!
//! ```rust,no_run
//! use tamiz::domain::TamizError;
//!
//! fn example() -> Result<(), TamizError> {
//!     let config = tamiz::config::load_config("tamiz.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
