//! # Runoff IO
//!
//! Persistence layer for the phosphorus simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON helpers with validation
//! - Snapshot save/load as JSON, gzip-compressed JSON and rkyv archives

/// Error types and result aliases for I/O operations
pub mod error;
/// Snapshot save files
pub mod persistence;
/// Validated serialization helpers for JSON
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{
    load_rkyv, load_snapshot, load_snapshot_as, load_snapshot_json, save_rkyv, save_snapshot,
    save_snapshot_as, save_snapshot_json, SaveFormat,
};
pub use serialization::{from_json, to_json, to_json_pretty};
