//! # rudder CLI
//!
//! Command-line interface for Rudder - client-side navigation and session
//! state for single-page applications.
//!
//! ## Usage
//!
//! - `rudder routes` - List the registered routes
//! - `rudder navigate <path>...` - Apply a navigation sequence
//! - `rudder to <name> [key=value]...` - Navigate to a route by name
//!
//! Routes are read from a JSON route file (`--routes`, default
//! `routes.json`) once at startup.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{navigate_command, navigate_to_command, routes_command};

/// rudder - client-side navigation and session state
#[derive(Parser)]
#[command(name = "rudder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client-side navigation and session state for single-page applications")]
#[command(long_about = None)]
struct Cli {
    /// Route configuration file
    #[arg(short, long, default_value = "routes.json")]
    routes: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered routes
    Routes,

    /// Apply a sequence of navigations and print the final state
    Navigate {
        /// Paths to navigate to, in order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Navigate to a route by name, with optional path parameters
    To {
        /// Route name
        name: String,

        /// Path parameters as key=value pairs
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Routes => routes_command(&cli.routes).await,
        Commands::Navigate { paths } => navigate_command(&cli.routes, &paths).await,
        Commands::To { name, params } => navigate_to_command(&cli.routes, &name, &params).await,
    }
}
