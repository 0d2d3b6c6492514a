//! Export a reshaped series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: two columns, one row per observation, blank cells for missing values.

use std::path::Path;

use crate::domain::TimeSeries;
use crate::error::EasyDataError;

/// Write `series` as `Observation Date,Observation Value` rows.
pub fn write_series_csv(path: &Path, series: &TimeSeries) -> Result<(), EasyDataError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    for obs in series {
        writer.serialize(obs).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| EasyDataError::io(path, e))?;
    Ok(())
}

fn csv_error(path: &Path, err: csv::Error) -> EasyDataError {
    EasyDataError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write series CSV: {err}"),
    }
}
