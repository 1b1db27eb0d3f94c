//! # Runoff Core
//!
//! Phosphorus transport over a hex heightfield.
//!
//! The crate is split into small pure kernels and one reference driver:
//! - [`hex`]: index/coordinate/neighbor addressing behind the [`HexTopology`] trait
//! - [`flow`]: per-tile downhill direction masks, evaluated once per heightfield
//! - [`tick`]: one transport step from a read buffer into a write buffer
//! - [`buffers`]: ping-pong state buffers and saturating injection
//! - [`sim`]: [`PhosphorusSim`], which owns all of the above and drives ticks
//!
//! Kernels never allocate and never own buffers. Given the same heightfield,
//! input counts and generator seed, a tick is bit-for-bit reproducible.
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use runoff_core::{evaluate_flow_field, tick, StateBuffers, TransportRules};
//! use runoff_data::{HexGridSize, TileInfo};
//!
//! let grid = HexGridSize::new(3, 1).unwrap();
//! let mut tiles: Vec<TileInfo> = [10, 5, 0].iter().map(|&h| TileInfo::new(h, 0)).collect();
//! evaluate_flow_field(&mut tiles, &grid);
//!
//! let mut buffers = StateBuffers::new(3);
//! buffers.add_phosphorus(0, 10);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let (read, write) = buffers.read_write();
//! tick(&tiles, read, write, &grid, &TransportRules::default(), &mut rng);
//! buffers.swap();
//!
//! assert_eq!(buffers.active()[1].count, 10);
//! ```

/// Ping-pong state buffers
pub mod buffers;
/// Configuration management for simulation parameters
pub mod config;
/// Downhill flow-field evaluation
pub mod flow;
/// Seeded heightfield generation
pub mod generation;
/// Hex grid addressing
pub mod hex;
/// Tick metrics and structured logging
pub mod metrics;
/// Reference simulation driver
pub mod sim;
/// Per-tick transport kernels
pub mod tick;

pub use buffers::{add_phosphorus, StateBuffers};
pub use config::{PhosphorusSource, SimConfig, WorldConfig};
pub use flow::{evaluate_flow_field, evaluate_flow_field_parallel, flow_mask_for, FlowSummary};
pub use generation::generate_tiles;
pub use hex::HexTopology;
pub use metrics::{init_logging, Metrics};
pub use sim::PhosphorusSim;
pub use tick::{tick, tick_parallel, TickReport, TransportRules};
