use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use mvg_departures::cli::{self, Options};
use mvg_departures::{fetch_board, render, ClientConfig, MvgClient};

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mvg_departures={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(options: &Options) -> Result<()> {
    let config = ClientConfig::with_base_url(&options.api_base);
    let client = MvgClient::new(&config).context("failed to set up the MVG client")?;

    let board = fetch_board(&client, options.latitude, options.longitude, &options.query)
        .context("failed to fetch departures")?;

    let output = render(&board, options.mode, Utc::now()).context("failed to render output")?;
    println!("{}", output);

    Ok(())
}

fn main() -> Result<()> {
    let options = cli::parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit());
    init_logging(options.verbosity);

    run(&options)
}
