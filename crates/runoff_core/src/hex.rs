//! Hex grid addressing.
//!
//! The simulation only ever talks to the grid through [`HexTopology`], so a
//! host can plug in its own map layout as long as direction bits written by
//! the flow field round-trip through [`HexTopology::neighbor_index`].

use runoff_data::{AxialCoord, Direction, HexGridSize, OffsetCoord};

/// Read-only index/coordinate/neighbor queries over a fixed hex map.
pub trait HexTopology {
    /// Total tile count.
    fn size(&self) -> usize;

    /// Offset coordinate of a tile. `index` must be `< size()`.
    fn index_to_coord(&self, index: usize) -> OffsetCoord;

    /// Inverse of [`index_to_coord`](Self::index_to_coord); `None` outside the map.
    fn coord_to_index(&self, coord: OffsetCoord) -> Option<usize>;

    fn is_valid_coord(&self, coord: OffsetCoord) -> bool;

    /// Tile one step from `index` in `dir`, or `None` past the map edge.
    fn neighbor_index(&self, index: usize, dir: Direction) -> Option<usize>;

    /// Direction leading from `a` to `b` when they are adjacent.
    fn is_neighbor(&self, a: usize, b: usize) -> Option<Direction> {
        if a == b {
            return None;
        }
        Direction::ALL
            .into_iter()
            .find(|&dir| self.neighbor_index(a, dir) == Some(b))
    }

    /// In-bounds neighbors of `index` in clockwise order.
    fn neighbors(&self, index: usize) -> impl Iterator<Item = (Direction, usize)> + '_
    where
        Self: Sized,
    {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor_index(index, dir).map(|n| (dir, n)))
    }
}

impl HexTopology for HexGridSize {
    #[inline]
    fn size(&self) -> usize {
        HexGridSize::size(self)
    }

    #[inline]
    fn index_to_coord(&self, index: usize) -> OffsetCoord {
        let w = self.width() as usize;
        OffsetCoord::new((index % w) as i32, (index / w) as i32)
    }

    #[inline]
    fn coord_to_index(&self, coord: OffsetCoord) -> Option<usize> {
        if self.contains_offset(coord) {
            Some(coord.y as usize * self.width() as usize + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    fn is_valid_coord(&self, coord: OffsetCoord) -> bool {
        self.contains_offset(coord)
    }

    #[inline]
    fn neighbor_index(&self, index: usize, dir: Direction) -> Option<usize> {
        let axial = AxialCoord::from(self.index_to_coord(index));
        let (dq, dr) = dir.axial_offset();
        let next = OffsetCoord::from(AxialCoord::new(axial.q + dq, axial.r + dr));
        self.coord_to_index(next)
    }
}
