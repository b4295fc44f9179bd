//! Command-line interface for Vettra.

pub mod commands;

use clap::{Parser, Subcommand};

/// Vettra - worker onboarding & compliance document tracker
#[derive(Parser)]
#[command(name = "vettra")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Create a default config.toml in the working directory
    Init,

    /// Create or refresh the document-type catalog
    SeedTypes,

    /// Backfill missing filename/size metadata from stored blobs
    FixMetadata,
}
