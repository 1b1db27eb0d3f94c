//! Plain data types shared by the runoff crates.
//!
//! Nothing in here runs the simulation; the types only describe the grid,
//! the per-tile static and dynamic state, and the persisted snapshot.

pub mod data;

pub use data::grid::{AxialCoord, HexGridSize, OffsetCoord};
pub use data::direction::{Direction, DirectionSet, DirectionSetIter};
pub use data::snapshot::SimSnapshot;
pub use data::tile::{PhosphorusCount, TileInfo, TileState, MAX_COUNT};
