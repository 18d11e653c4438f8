//! GBP Badge - render a Google rating badge
//!
//! Prints the badge markup for the configured place to stdout. Logs go to
//! stderr, filtered by `RUST_LOG` (default `warn`).

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gbp_badge::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(cli).await?;
    println!("{}", output);

    Ok(())
}
