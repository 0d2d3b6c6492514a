//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - runs the fetch pipeline or loads a saved payload
//! - prints summaries/plots and writes optional exports

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Command, FetchArgs, KeyArgs, PlotArgs, PlotOptions, ViewArgs};
use crate::data::{ClientConfig, Credential, EasyDataClient, ReqwestTransport, Session};
use crate::domain::{SeriesRequest, TimeSeries};
use crate::error::{AppError, EasyDataError};
use crate::plot::ChartStyle;

pub mod pipeline;

/// Entry point for the `easydata` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry the API key, base URL and output directory.
    dotenvy::dotenv().ok();
    init_logging();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Key(args) => handle_key(args),
        Command::Fetch(args) => handle_fetch(args),
        Command::Plot(args) => handle_plot(args),
        Command::View(args) => handle_view(args),
    }
}

/// Log to stderr so stdout only carries reports and plots.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,easydata=info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_key(args: KeyArgs) -> Result<(), AppError> {
    let session = Session::with_credential(resolve_key(args.api_key)?);

    println!("EasyData API key verified");
    println!("EasyData API key for the current session: {}", session.get_key()?);
    Ok(())
}

/// `--api-key` if given, otherwise `EASYDATA_API_KEY`. The key is validated
/// exactly as typed; surrounding whitespace counts toward the length.
fn resolve_key(flag: Option<String>) -> Result<Credential, EasyDataError> {
    match flag {
        Some(key) => Credential::parse(&key),
        None => Credential::from_env(),
    }
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let transport = match args.timeout_secs {
        Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))?,
        None => ReqwestTransport::new(),
    };

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(dir) = args.out_dir {
        config.output_dir = dir;
    }

    let session = Session::with_credential(resolve_key(args.api_key)?);
    let client = EasyDataClient::new(transport, config).with_session(session);

    let request = SeriesRequest::new(args.series_id, args.start, args.end, args.format);
    let run = pipeline::run_fetch(&client, request)?;

    println!(
        "{}",
        crate::report::format_fetch_summary(&run.request, &run.table, &run.saved_to)
    );
    present(&run.series, &args.plot)?;

    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &run.series)?;
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let (_, series) = pipeline::load_series(&args.file, args.format)?;
    present(&series, &args.plot)
}

fn handle_view(args: ViewArgs) -> Result<(), AppError> {
    let (_, series) = pipeline::load_series(&args.file, args.format)?;
    let title = file_stem(&args.file);
    crate::tui::run(&series, &title)?;
    Ok(())
}

/// Print the series listing, then the optional terminal plot and SVG.
fn present(series: &TimeSeries, opts: &PlotOptions) -> Result<(), AppError> {
    println!("{}", crate::report::format_series(series, opts.rows));

    if !opts.no_plot {
        let plot = crate::plot::render_ascii(series, opts.width, opts.height)?;
        println!("{plot}");
    }
    if let Some(path) = &opts.svg {
        crate::plot::render_svg(series, path, &ChartStyle::default())?;
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
