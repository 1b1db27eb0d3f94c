//! Downhill flow-field precomputation.
//!
//! Every tile gets the set of neighbor directions whose height is strictly
//! lower than its own. All strictly-lower neighbors are included, not just
//! the steepest one. Masks are a pure function of the heightfield and must be
//! recomputed whenever heights change.

use rayon::prelude::*;
use runoff_data::{DirectionSet, TileInfo};

use crate::hex::HexTopology;

/// Aggregate facts about an evaluated flow field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSummary {
    /// Tiles with an empty mask.
    pub sinks: usize,
    /// Largest mask size seen.
    pub max_fanout: usize,
}

impl FlowSummary {
    fn record(&mut self, mask: DirectionSet) {
        if mask.is_empty() {
            self.sinks += 1;
        }
        self.max_fanout = self.max_fanout.max(mask.len());
    }
}

/// Downhill mask for a single tile.
#[inline]
#[must_use]
pub fn flow_mask_for<G: HexTopology>(tiles: &[TileInfo], grid: &G, index: usize) -> DirectionSet {
    let height = tiles[index].height;
    let mut mask = DirectionSet::EMPTY;
    for (dir, n) in grid.neighbors(index) {
        if tiles[n].height < height {
            mask.insert(dir);
        }
    }
    mask
}

/// Writes `flow_mask` for every tile in place.
pub fn evaluate_flow_field<G: HexTopology>(tiles: &mut [TileInfo], grid: &G) -> FlowSummary {
    debug_assert_eq!(tiles.len(), grid.size(), "tile array does not match grid");

    let mut summary = FlowSummary::default();
    for i in 0..tiles.len() {
        let mask = flow_mask_for(tiles, grid, i);
        tiles[i].flow_mask = mask;
        summary.record(mask);
    }

    tracing::debug!(
        tiles = tiles.len(),
        sinks = summary.sinks,
        max_fanout = summary.max_fanout,
        "Flow field evaluated"
    );
    summary
}

/// Same result as [`evaluate_flow_field`], computed across the rayon pool.
///
/// Masks only depend on heights, so they are gathered first and written in a
/// second pass.
pub fn evaluate_flow_field_parallel<G>(tiles: &mut [TileInfo], grid: &G) -> FlowSummary
where
    G: HexTopology + Sync,
{
    debug_assert_eq!(tiles.len(), grid.size(), "tile array does not match grid");

    let masks: Vec<DirectionSet> = {
        let view: &[TileInfo] = tiles;
        (0..view.len())
            .into_par_iter()
            .map(|i| flow_mask_for(view, grid, i))
            .collect()
    };

    let mut summary = FlowSummary::default();
    for (tile, mask) in tiles.iter_mut().zip(masks) {
        tile.flow_mask = mask;
        summary.record(mask);
    }

    tracing::debug!(
        tiles = tiles.len(),
        sinks = summary.sinks,
        max_fanout = summary.max_fanout,
        "Flow field evaluated (parallel)"
    );
    summary
}
