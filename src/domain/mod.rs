//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - request description (`ResponseFormat`, `SeriesRequest`)
//! - the loaded payload (`SeriesTable`, `Cell`)
//! - the reshaped series (`TimeSeries`, `Observation`)

pub mod types;

pub use types::*;
