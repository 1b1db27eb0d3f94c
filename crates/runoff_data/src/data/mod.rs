pub mod direction;
pub mod grid;
pub mod snapshot;
pub mod tile;
