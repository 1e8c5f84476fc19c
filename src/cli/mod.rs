//! CLI module
//!
//! - `serve`: run the forward-auth HTTP service
//! - `check`: evaluate a single address and exit

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// Geo Forward Auth - IP and geographic allowlist decisions for reverse proxies
#[derive(Parser)]
#[command(name = "geo-forward-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Evaluate one address against allowlists and exit (0 = allow, 1 = deny)
    Check(check::CheckArgs),
}
