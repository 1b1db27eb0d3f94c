use serde::{Deserialize, Serialize};

/// Column/row position in "odd-r" offset layout (odd rows shoved right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OffsetCoord {
    pub x: i32,
    pub y: i32,
}

impl OffsetCoord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axial hex position. `r` equals the offset row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

impl From<OffsetCoord> for AxialCoord {
    fn from(c: OffsetCoord) -> Self {
        Self {
            q: c.x - (c.y - (c.y & 1)) / 2,
            r: c.y,
        }
    }
}

impl From<AxialCoord> for OffsetCoord {
    fn from(c: AxialCoord) -> Self {
        Self {
            x: c.q + (c.r - (c.r & 1)) / 2,
            y: c.r,
        }
    }
}

/// Immutable topology descriptor of a rectangular hex map.
///
/// Tiles are stored row-major: `index = y * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexGridSize {
    width: u16,
    height: u16,
    size: usize,
}

impl HexGridSize {
    /// Creates a grid descriptor. Both dimensions must be non-zero.
    pub fn new(width: u16, height: u16) -> anyhow::Result<Self> {
        anyhow::ensure!(width > 0, "Grid width must be positive");
        anyhow::ensure!(height > 0, "Grid height must be positive");
        Ok(Self {
            width,
            height,
            size: width as usize * height as usize,
        })
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total tile count.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn contains_offset(&self, c: OffsetCoord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width as i32 && c.y < self.height as i32
    }
}
