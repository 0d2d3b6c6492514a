//! `easydata` library crate.
//!
//! A client for the State Bank of Pakistan EasyData API:
//!
//! - hold and validate an API key (`data::credential`)
//! - fetch a series, save the raw payload, parse it (`data::easydata`, `io`)
//! - narrow the table to a date-indexed series (`reshape`)
//! - draw it (`plot`, `tui`)
//!
//! The binary (`easydata`) is a thin wrapper around this library so that the
//! pipeline is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod reshape;
pub mod tui;
