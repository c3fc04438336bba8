//! Miner dispatch entry point: CLI wiring, input loading and report output.

use std::process;

use tracing::{error, info};

use miner_dispatch::cli::{self, CliOptions, ConfigSource, Parsed, PriceSource};
use miner_dispatch::config::DispatchConfig;
use miner_dispatch::io::export::export_csv;
use miner_dispatch::io::input::{parse_prices, read_prices, read_pv_file};
use miner_dispatch::sim::simulate;
use miner_dispatch::sim::summary::DaySummary;

fn load_config(source: &ConfigSource) -> DispatchConfig {
    let loaded = match source {
        ConfigSource::File(path) => DispatchConfig::from_toml_file(path),
        ConfigSource::Preset(name) => DispatchConfig::from_preset(name),
    };
    let config = loaded.unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }
    config
}

fn run(cli: &CliOptions, config: &DispatchConfig) -> Result<(), String> {
    let prices = match &cli.prices {
        PriceSource::Inline(text) => parse_prices(text),
        PriceSource::File(path) => read_prices(path),
    }
    .map_err(|e| format!("cannot load prices: {e}"))?;

    let pv = read_pv_file(&cli.pv)
        .map_err(|e| format!("cannot load PV forecast \"{}\": {e}", cli.pv.display()))?;

    let pv_threshold = cli.pv_threshold.unwrap_or(config.prices.pv_threshold);
    info!(
        pv_threshold,
        priority = %config.charging.priority,
        "simulating day"
    );

    let schedule = simulate(config, &prices, &pv, pv_threshold).map_err(|e| e.to_string())?;
    info!(basis = ?schedule.basis, rows = schedule.len(), "simulation finished");

    for row in &schedule.rows {
        println!("{row}");
    }
    println!("\n{}", DaySummary::from_rows(&schedule.rows));

    if let Some(ref path) = cli.out {
        export_csv(&schedule.rows, path)
            .map_err(|e| format!("failed to write CSV: {e}"))?;
        info!(path = %path.display(), "schedule written");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let opts = match cli::parse_args() {
        Ok(Parsed::Run(opts)) => opts,
        Ok(Parsed::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let config = load_config(&opts.config);
    if let Err(e) = run(&opts, &config) {
        error!("{e}");
        process::exit(1);
    }
}
