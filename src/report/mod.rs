//! Reporting utilities: formatted terminal output for downloads and series.

pub mod format;

pub use format::*;
