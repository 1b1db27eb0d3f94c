use serde::{Deserialize, Serialize};

/// One of the six neighbor directions of a pointy-top hex.
///
/// Order is clockwise starting at East. The discriminant doubles as the bit
/// position inside a [`DirectionSet`], so it must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Axial (+1, 0).
    East = 0,
    /// Axial (0, +1).
    SouthEast = 1,
    /// Axial (-1, +1).
    SouthWest = 2,
    /// Axial (-1, 0).
    West = 3,
    /// Axial (0, -1).
    NorthWest = 4,
    /// Axial (+1, -1).
    NorthEast = 5,
}

impl Direction {
    pub const COUNT: usize = 6;

    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
    ];

    /// Axial `(dq, dr)` step for this direction. `r` grows southward.
    #[inline]
    #[must_use]
    pub const fn axial_offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::SouthEast => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (0, -1),
            Direction::NorthEast => (1, -1),
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Direction> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

/// Compact set of [`Direction`]s stored as a 6-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionSet(u8);

impl DirectionSet {
    const VALID_BITS: u8 = 0b0011_1111;

    pub const EMPTY: DirectionSet = DirectionSet(0);
    pub const FULL: DirectionSet = DirectionSet(Self::VALID_BITS);

    /// Builds a set from raw bits, ignoring anything above bit 5.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::VALID_BITS)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The `n`-th member in clockwise order, if the set has that many.
    #[must_use]
    pub fn nth(self, n: usize) -> Option<Direction> {
        self.iter().nth(n)
    }

    #[inline]
    #[must_use]
    pub fn iter(self) -> DirectionSetIter {
        DirectionSetIter { bits: self.0 }
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::EMPTY;
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl IntoIterator for DirectionSet {
    type Item = Direction;
    type IntoIter = DirectionSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Clockwise iterator over the members of a [`DirectionSet`].
#[derive(Debug, Clone)]
pub struct DirectionSetIter {
    bits: u8,
}

impl Iterator for DirectionSetIter {
    type Item = Direction;

    #[inline]
    fn next(&mut self) -> Option<Direction> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Direction::from_index(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for DirectionSetIter {}
