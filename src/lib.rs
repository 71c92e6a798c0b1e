//! Oscillator Report Library
//!
//! Loads a (time, position, velocity) trajectory from CSV, summarizes it and
//! renders a multi-panel PNG report. Used by the `oscillator_report` binary.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod properties;
pub mod render;
pub mod series;

pub use config::{ReportConfig, ReportOverrides, Variant};
pub use error::{ErrorKind, ReportError, Result};
pub use pipeline::{run, run_with, ReportOutcome};
