//! Input/output helpers.
//!
//! - raw payload persistence (`payload`)
//! - payload parsing + re-loading saved files (`table`)
//! - reshaped series export (`export`)

pub mod export;
pub mod payload;
pub mod table;

pub use export::*;
pub use payload::*;
pub use table::*;
