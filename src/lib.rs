//! Headless host for the phosphorus runoff simulation.
//!
//! The kernels live in `runoff_core`; this crate wires them to a config file,
//! snapshot files and terminal output.

pub mod app;
pub mod model;
pub mod report;

pub use app::{App, RunSummary};
