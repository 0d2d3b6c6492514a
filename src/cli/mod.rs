//! Command-line parsing for the EasyData client.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/reshape/render code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::ResponseFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "easydata", version, about = "SBP EasyData time-series client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify an API key and show the key for the session.
    Key(KeyArgs),
    /// Download a series, save the raw payload, and print/plot it.
    Fetch(FetchArgs),
    /// Plot a previously saved payload.
    Plot(PlotArgs),
    /// Open a saved payload in the interactive terminal viewer.
    View(ViewArgs),
}

#[derive(Debug, Args, Clone)]
pub struct KeyArgs {
    /// API key (falls back to EASYDATA_API_KEY / .env).
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Series identifier, e.g. TS_GP_BOP_BPM6SUM_M.P00010.
    pub series_id: String,

    /// First observation date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub start: NaiveDate,

    /// Last observation date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub end: NaiveDate,

    /// Response format requested from the API.
    #[arg(long, value_enum, default_value_t = ResponseFormat::Csv)]
    pub format: ResponseFormat,

    /// API key (falls back to EASYDATA_API_KEY / .env).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Directory the raw payload is written to (falls back to EASYDATA_OUTPUT_DIR, then the current directory).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// API base URL (falls back to EASYDATA_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Transport timeout in seconds (none by default).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(flatten)]
    pub plot: PlotOptions,

    /// Export the reshaped series (date, value) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Saved payload (`{series}_{start}_{end}.csv|json`).
    pub file: PathBuf,

    /// Payload format (inferred from the extension by default).
    #[arg(long, value_enum)]
    pub format: Option<ResponseFormat>,

    #[command(flatten)]
    pub plot: PlotOptions,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Saved payload (`{series}_{start}_{end}.csv|json`).
    pub file: PathBuf,

    /// Payload format (inferred from the extension by default).
    #[arg(long, value_enum)]
    pub format: Option<ResponseFormat>,
}

/// Output options shared by `fetch` and `plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotOptions {
    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write the chart as an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Number of observations to list.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_parses_dates_and_format() {
        let cli = Cli::try_parse_from([
            "easydata", "fetch", "123", "--start", "2023-01-01", "--end", "2023-01-02", "--format", "json",
            "--no-plot",
        ])
        .unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.series_id, "123");
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(args.format, ResponseFormat::Json);
        assert!(args.plot.no_plot);
    }

    #[test]
    fn fetch_rejects_unknown_format_and_bad_dates() {
        assert!(
            Cli::try_parse_from(["easydata", "fetch", "1", "--start", "2023-01-01", "--end", "2023-01-02", "--format", "xml"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["easydata", "fetch", "1", "--start", "01/01/2023", "--end", "2023-01-02"]).is_err());
    }
}
