//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// Where the 24 hourly prices come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceSource {
    Inline(String),
    File(PathBuf),
}

/// Where the dispatch configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Preset(String),
}

#[derive(Debug)]
pub struct CliOptions {
    pub prices: PriceSource,
    pub pv: PathBuf,
    pub pv_threshold: Option<f64>,
    pub config: ConfigSource,
    pub out: Option<PathBuf>,
}

/// Outcome of parsing: either options to run with, or a help request.
#[derive(Debug)]
pub enum Parsed {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Parsed, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<Parsed, String> {
    let mut i = 0usize;
    let mut prices = None;
    let mut pv = None;
    let mut pv_threshold = None;
    let mut config = None;
    let mut out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--prices" => {
                i += 1;
                let text = args.next_or_err(
                    i,
                    "missing value for --prices (expected 24 comma-separated prices)",
                )?;
                if prices.replace(PriceSource::Inline(text.to_string())).is_some() {
                    return Err("prices provided more than once".to_string());
                }
            }
            "--prices-file" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --prices-file (expected a file path)")?;
                if prices.replace(PriceSource::File(PathBuf::from(path))).is_some() {
                    return Err("prices provided more than once".to_string());
                }
            }
            "--pv" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --pv (expected a CSV path)")?;
                if pv.replace(PathBuf::from(path)).is_some() {
                    return Err("--pv provided more than once".to_string());
                }
            }
            "--pv-threshold" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    "missing value for --pv-threshold (expected a price per MWh)",
                )?;
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| {
                        format!("--pv-threshold value \"{raw}\" is not a non-negative number")
                    })?;
                pv_threshold = Some(value);
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML path)")?;
                if config
                    .replace(ConfigSource::File(PathBuf::from(path)))
                    .is_some()
                {
                    return Err(
                        "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                            .to_string(),
                    );
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if config
                    .replace(ConfigSource::Preset(name.to_string()))
                    .is_some()
                {
                    return Err(
                        "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                            .to_string(),
                    );
                }
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--help" | "-h" => return Ok(Parsed::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let prices = prices.ok_or("missing prices: use --prices or --prices-file")?;
    let pv = pv.ok_or("missing PV forecast: use --pv <csv>")?;

    Ok(Parsed::Run(CliOptions {
        prices,
        pv,
        pv_threshold,
        config: config.unwrap_or_else(|| ConfigSource::Preset("reference".to_string())),
        out,
    }))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("miner-dispatch: battery dispatch for a fixed-load miner");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  miner-dispatch --pv <csv> (--prices <list> | --prices-file <path>) \
         [--pv-threshold <price>] [--config <toml> | --preset <name>] [--out <csv>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --prices <list>          24 hourly spot prices, comma-separated");
    eprintln!("  --prices-file <path>     Read the hourly prices from a file");
    eprintln!("  --pv <csv>               96 quarter-hour PV forecasts (first column)");
    eprintln!("  --pv-threshold <price>   PV cost price per MWh (default from config)");
    eprintln!("  --config <toml>          Load configuration from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (reference, corrected)");
    eprintln!("  --out <csv>              Write the schedule to a CSV file");
    eprintln!("  --help                   Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn run_options(list: &[&str]) -> CliOptions {
        match parse_args_from(&args(list)).expect("parse should succeed") {
            Parsed::Run(opts) => opts,
            Parsed::Help => panic!("expected run options"),
        }
    }

    #[test]
    fn supports_inline_prices() {
        let opts = run_options(&["--prices", "1,2,3", "--pv", "pv.csv"]);
        assert_eq!(opts.prices, PriceSource::Inline("1,2,3".to_string()));
        assert_eq!(opts.pv, PathBuf::from("pv.csv"));
        assert_eq!(opts.config, ConfigSource::Preset("reference".to_string()));
        assert!(opts.pv_threshold.is_none());
        assert!(opts.out.is_none());
    }

    #[test]
    fn supports_all_options() {
        let opts = run_options(&[
            "--prices-file",
            "prices.txt",
            "--pv",
            "pv.csv",
            "--pv-threshold",
            "42.5",
            "--config",
            "site.toml",
            "--out",
            "schedule.csv",
        ]);
        assert_eq!(opts.prices, PriceSource::File(PathBuf::from("prices.txt")));
        assert_eq!(opts.pv_threshold, Some(42.5));
        assert_eq!(opts.config, ConfigSource::File(PathBuf::from("site.toml")));
        assert_eq!(opts.out, Some(PathBuf::from("schedule.csv")));
    }

    #[test]
    fn config_and_preset_are_exclusive() {
        let err = parse_args_from(&args(&[
            "--prices", "1", "--pv", "pv.csv", "--config", "a.toml", "--preset", "reference",
        ]))
        .unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn prices_twice_rejected() {
        let err = parse_args_from(&args(&[
            "--prices", "1", "--prices-file", "p.txt", "--pv", "pv.csv",
        ]))
        .unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn missing_pv_rejected() {
        let err = parse_args_from(&args(&["--prices", "1"])).unwrap_err();
        assert!(err.contains("--pv"));
    }

    #[test]
    fn bad_threshold_rejected() {
        let err = parse_args_from(&args(&[
            "--prices", "1", "--pv", "pv.csv", "--pv-threshold", "cheap",
        ]))
        .unwrap_err();
        assert!(err.contains("--pv-threshold"));
    }

    #[test]
    fn help_requested() {
        assert!(matches!(
            parse_args_from(&args(&["--help"])),
            Ok(Parsed::Help)
        ));
    }

    #[test]
    fn unknown_argument_rejected() {
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
    }
}
