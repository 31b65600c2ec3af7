//! # evacuate CLI entry point
//!
//! ```text
//! evacuate route "Ward 1" "Ring Road"          # every tied fastest path
//! evacuate 1 "Ward 1" "Ring Road" --single     # one path
//! evacuate nearest "Ward 1"                    # nearest facility
//! evacuate 2 --from-coords 27.708,85.305 --coordinates coordinate.csv
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to trace each search.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use evacuate::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    evacuate::run(&cli, &mut std::io::stdout().lock())?;
    Ok(())
}
