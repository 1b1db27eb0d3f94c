//! Seeded heightfield generation for hosts that have no map of their own.

use runoff_data::{HexGridSize, OffsetCoord, TileInfo};

use crate::hex::HexTopology;

/// Row pitch of pointy-top hexes with unit column spacing.
const ROW_PITCH: f64 = 0.866_025_403_784_438_6;

/// (wavelength in tiles, weight) per octave. Weights sum to one.
const OCTAVES: [(f64, f64); 3] = [(10.0, 0.5), (20.0, 0.3), (50.0, 0.2)];

/// Builds tiles with fractal heights in `0..=max_height`.
///
/// Heights are sampled at hex centres, so neighbours on odd and even rows
/// are equally close in the noise field. Region ids number the
/// `region_size`-square blocks row by row.
#[must_use]
pub fn generate_tiles(grid: &HexGridSize, seed: u64, max_height: u16, region_size: u16) -> Vec<TileInfo> {
    let block = region_size.max(1) as i32;
    let blocks_per_row = (grid.width() as i32 + block - 1) / block;

    (0..grid.size())
        .map(|i| {
            let c = grid.index_to_coord(i);
            let height = (hex_height(c, seed) * max_height as f64).round() as u16;
            let region = (c.y / block) * blocks_per_row + c.x / block;
            TileInfo::new(height.min(max_height), region as u16)
        })
        .collect()
}

/// Fractal value in `0.0..=1.0` at the centre of tile `c`.
pub(crate) fn hex_height(c: OffsetCoord, seed: u64) -> f64 {
    let px = c.x as f64 + 0.5 * (c.y & 1) as f64;
    let py = c.y as f64 * ROW_PITCH;
    OCTAVES
        .iter()
        .enumerate()
        .map(|(n, &(wavelength, weight))| {
            let octave_seed = seed ^ (n as u64 + 1).wrapping_mul(0xD6E8_FEB8_6659_FD93);
            weight * smooth_lattice(px / wavelength, py / wavelength, octave_seed)
        })
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

/// Bilinear blend of the four surrounding lattice values with a smoothstep
/// weight.
fn smooth_lattice(x: f64, y: f64, seed: u64) -> f64 {
    let (x0, y0) = (x.floor(), y.floor());
    let (tx, ty) = (smoothstep(x - x0), smoothstep(y - y0));
    let (ix, iy) = (x0 as i64, y0 as i64);

    let top = lerp(lattice(ix, iy, seed), lattice(ix + 1, iy, seed), tx);
    let bottom = lerp(lattice(ix, iy + 1, seed), lattice(ix + 1, iy + 1, seed), tx);
    lerp(top, bottom, ty)
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Uniform value in `0.0..1.0` for a lattice point (splitmix64 finalizer).
fn lattice(ix: i64, iy: i64, seed: u64) -> f64 {
    let mut z = seed
        ^ (ix as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (iy as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}
