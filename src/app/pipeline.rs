//! Shared "fetch pipeline" logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> save -> parse -> reshape
//!
//! The commands can then focus on presentation (printing, plotting, viewing).

use std::path::{Path, PathBuf};

use crate::data::{EasyDataClient, Transport};
use crate::domain::{ResponseFormat, SeriesRequest, SeriesTable, TimeSeries};
use crate::error::EasyDataError;
use crate::io::{load_saved, payload_path};
use crate::reshape::to_time_series;

/// Everything a single download produced.
#[derive(Debug, Clone)]
pub struct FetchOutput {
    pub request: SeriesRequest,
    pub saved_to: PathBuf,
    pub table: SeriesTable,
    pub series: TimeSeries,
}

/// Download, save, parse and reshape one series.
pub fn run_fetch<T: Transport>(
    client: &EasyDataClient<T>,
    request: SeriesRequest,
) -> Result<FetchOutput, EasyDataError> {
    let table = client.fetch(&request)?;
    let series = to_time_series(&table)?;
    let saved_to = payload_path(&client.config().output_dir, &request);

    Ok(FetchOutput {
        request,
        saved_to,
        table,
        series,
    })
}

/// Load a saved payload and reshape it. The format defaults to the file extension.
pub fn load_series(path: &Path, format: Option<ResponseFormat>) -> Result<(SeriesTable, TimeSeries), EasyDataError> {
    let format = match format {
        Some(f) => f,
        None => ResponseFormat::from_path(path)?,
    };
    let table = load_saved(path, format)?;
    let series = to_time_series(&table)?;
    Ok((table, series))
}
