//! Raw payload persistence.
//!
//! The response body is written verbatim as UTF-8, overwriting any file of the
//! same name. The write is a plain `fs::write` (no temp file + rename), so a
//! crash mid-write can leave a truncated file behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::SeriesRequest;
use crate::error::EasyDataError;

/// Path the payload for `request` is saved to inside `dir`.
pub fn payload_path(dir: &Path, request: &SeriesRequest) -> PathBuf {
    dir.join(request.file_name())
}

/// Write `body` for `request` into `dir` and return the file path.
pub fn write_payload(dir: &Path, request: &SeriesRequest, body: &str) -> Result<PathBuf, EasyDataError> {
    let path = payload_path(dir, request);
    fs::write(&path, body).map_err(|e| EasyDataError::io(&path, e))?;
    info!("data saved to {}", path.display());
    Ok(path)
}
