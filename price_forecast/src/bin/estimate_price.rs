//! Estimate prices from a `Dates,Prices` CSV file.
//!
//! ```text
//! estimate_price <file.csv> [DATE...] [--config engine.json] [--combined]
//! ```
//!
//! Without dates, the program prices 2022-06-15, 2024-11-30 and 2025-05-01.
//! `--combined` prints the observed and forecast series as JSON.
//!
//! Environment variables:
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::{bail, Context};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use price_forecast::{DataLoader, EngineConfig, PriceEstimationEngine};

const DEFAULT_DATES: [&str; 3] = ["2022-06-15", "2024-11-30", "2025-05-01"];

struct Args {
    csv: String,
    dates: Vec<String>,
    config: Option<String>,
    combined: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut csv = None;
    let mut dates = Vec::new();
    let mut config = None;
    let mut combined = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(args.next().context("--config needs a file path")?);
            }
            "--combined" => combined = true,
            "-h" | "--help" => {
                println!("usage: estimate_price <file.csv> [DATE...] [--config engine.json] [--combined]");
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            _ if csv.is_none() => csv = Some(arg),
            _ => dates.push(arg),
        }
    }

    let csv = csv.context("missing CSV file argument")?;
    if dates.is_empty() {
        dates = DEFAULT_DATES.iter().map(|d| d.to_string()).collect();
    }

    Ok(Args {
        csv,
        dates,
        config,
        combined,
    })
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path))?,
        None => EngineConfig::default(),
    };

    let series = DataLoader::from_csv(&args.csv)
        .with_context(|| format!("loading observations from {}", args.csv))?;
    info!(observations = series.len(), file = %args.csv, "loaded observations");

    let engine = PriceEstimationEngine::with_config(series, config)?;

    if let Ok(accuracy) = engine.fit_accuracy() {
        info!(rmse = accuracy.rmse, mape = accuracy.mape, "seasonal model in-sample fit");
    }

    for date in &args.dates {
        match engine.estimate_str(date) {
            Ok(price) => println!("Estimated price on {}: ${:.2}", date, price),
            Err(e) => println!("Error for {}: {}", date, e),
        }
    }

    if args.combined {
        println!("{}", engine.combined_series_json()?);
    }

    Ok(())
}
