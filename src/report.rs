//! Plain-text views of the active buffer.

use std::collections::BTreeMap;

use runoff_data::{HexGridSize, TileInfo, TileState};

const RAMP: &[u8] = b" .:-=+*#%@";

/// One character per tile, darker for more phosphorus relative to the
/// fullest tile. Odd rows are shifted half a cell to suggest the hex offset.
#[must_use]
pub fn density_map(grid: &HexGridSize, counts: &[TileState]) -> String {
    let width = grid.width() as usize;
    let max = counts.iter().map(|s| s.count).max().unwrap_or(0);
    let mut out = String::with_capacity((width * 2 + 2) * grid.height() as usize);

    for (y, row) in counts.chunks(width).enumerate() {
        if y % 2 == 1 {
            out.push(' ');
        }
        for (x, state) in row.iter().enumerate() {
            let level = if max == 0 || state.count == 0 {
                0
            } else {
                // any non-empty tile gets at least the first visible shade
                1 + (state.count as usize * (RAMP.len() - 2)) / max as usize
            };
            out.push(RAMP[level.min(RAMP.len() - 1)] as char);
            if x + 1 < row.len() {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}

/// Total phosphorus per region id, ascending by id.
#[must_use]
pub fn region_totals(tiles: &[TileInfo], counts: &[TileState]) -> Vec<(u16, u64)> {
    let mut totals: BTreeMap<u16, u64> = BTreeMap::new();
    for (tile, state) in tiles.iter().zip(counts) {
        *totals.entry(tile.region_id).or_default() += state.count as u64;
    }
    totals.into_iter().collect()
}
