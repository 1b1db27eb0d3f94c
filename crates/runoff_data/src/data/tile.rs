use serde::{Deserialize, Serialize};

use super::direction::DirectionSet;

/// Units of phosphorus resident on a tile.
pub type PhosphorusCount = u16;

/// Largest representable tile count. Additions saturate here.
pub const MAX_COUNT: PhosphorusCount = PhosphorusCount::MAX;

/// Static per-tile data. Only `flow_mask` is ever rewritten, and only by
/// flow-field evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileInfo {
    /// Elevation. Only used to derive `flow_mask`.
    pub height: u16,
    /// Opaque zone identifier, carried through untouched.
    pub region_id: u16,
    /// Strictly-lower neighbors. Empty for sinks.
    #[serde(skip)]
    pub flow_mask: DirectionSet,
}

impl TileInfo {
    #[must_use]
    pub const fn new(height: u16, region_id: u16) -> Self {
        Self {
            height,
            region_id,
            flow_mask: DirectionSet::EMPTY,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_sink(&self) -> bool {
        self.flow_mask.is_empty()
    }
}

/// Dynamic per-tile data, double-buffered by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileState {
    pub count: PhosphorusCount,
}

impl TileState {
    #[must_use]
    pub const fn new(count: PhosphorusCount) -> Self {
        Self { count }
    }

    /// Saturating add. Returns the amount that actually landed.
    #[inline]
    pub fn add(&mut self, amount: PhosphorusCount) -> PhosphorusCount {
        let before = self.count;
        self.count = before.saturating_add(amount);
        self.count - before
    }
}
