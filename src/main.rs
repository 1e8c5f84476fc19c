use clap::Parser;
use geo_forward_auth::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Check(args) => cli::check::run(args).await,
    }
}
