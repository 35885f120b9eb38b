//! CLI module for the authentication gateway
//!
//! Provides subcommands for running the gateway:
//! - `serve`: run the HTTP API server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Auth Gateway - user registration and token-based authentication API
#[derive(Parser)]
#[command(name = "auth-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
