//! Check command - evaluates one address from the command line

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::logging::{self, LoggingConfig};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Client address to evaluate
    pub address: String,

    /// Address allowlist: comma-separated addresses and CIDR blocks
    #[arg(long, default_value = "")]
    pub ips: String,

    /// Area allowlist: `;`-separated `COUNTRY` or `COUNTRY:SUB1,SUB2` entries
    #[arg(long, default_value = "")]
    pub locations: String,

    /// Override the configured GeoIP database path
    #[arg(long)]
    pub database: Option<String>,
}

/// Prints ALLOW or DENY; exits with status 1 on deny
pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&LoggingConfig::from(&config.logging));

    if let Some(database) = args.database.clone() {
        config.geoip.database_path = database;
    }

    let engine = crate::create_engine(&config)?;
    let allowed = engine
        .evaluate(&args.address, &args.ips, &args.locations, true)
        .await?;

    println!("{}", verdict(allowed));

    if !allowed {
        std::process::exit(1);
    }

    Ok(())
}

fn verdict(allowed: bool) -> &'static str {
    if allowed { "ALLOW" } else { "DENY" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CheckArgs,
    }

    #[test]
    fn test_parse_args() {
        let cli = TestCli::parse_from([
            "check",
            "198.51.100.7",
            "--ips",
            "10.0.0.0/8",
            "--locations",
            "US:CA,NY;DE",
        ]);

        assert_eq!(cli.args.address, "198.51.100.7");
        assert_eq!(cli.args.ips, "10.0.0.0/8");
        assert_eq!(cli.args.locations, "US:CA,NY;DE");
        assert!(cli.args.database.is_none());
    }

    #[test]
    fn test_parse_args_defaults() {
        let cli = TestCli::parse_from(["check", "::1"]);

        assert_eq!(cli.args.ips, "");
        assert_eq!(cli.args.locations, "");
    }

    #[test]
    fn test_verdict() {
        assert_eq!(verdict(true), "ALLOW");
        assert_eq!(verdict(false), "DENY");
    }
}
