// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The eight compass directions to a cell's neighbors.

use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// A compass direction to one of a cell's up-to-eight neighbors.
///
/// Ordered the way the neighbors sit in linear row-major memory, so the
/// discriminant doubles as the neighbor's bit position in a cell's
/// valid-neighbor flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCountMacro, EnumIter)]
#[repr(u8)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

/// Number of compass directions.
pub const NEIGHBOR_COUNT: usize = Direction::COUNT;

impl Direction {
    /// Bit position of this direction in a neighbor flags byte.
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// (row, column) deltas for stepping one cell in this direction.
    pub fn offsets(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
            Direction::SouthWest => (1, -1),
            Direction::South => (1, 0),
            Direction::SouthEast => (1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_eight_directions() {
        assert_eq!(NEIGHBOR_COUNT, 8);
        assert_eq!(Direction::iter().count(), 8);
    }

    #[test]
    fn test_bits_are_distinct() {
        let mut seen = 0u8;
        for direction in Direction::iter() {
            let flag = 1u8 << direction.bit();
            assert_eq!(seen & flag, 0);
            seen |= flag;
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn test_offsets_cover_all_neighbors() {
        let offsets: Vec<_> = Direction::iter().map(Direction::offsets).collect();
        for row_delta in -1..=1 {
            for column_delta in -1..=1 {
                if row_delta == 0 && column_delta == 0 {
                    continue;
                }
                assert!(offsets.contains(&(row_delta, column_delta)));
            }
        }
    }
}
