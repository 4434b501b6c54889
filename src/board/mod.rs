// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Board model: a 2-D grid of letter cells.
//!
//! A board is created fresh for each solve from its width, height, and
//! a row-major character string. Each cell caches which of its eight
//! compass neighbors exist (boundary geometry, computed once) and the
//! set of distinct letters among those neighbors (computed once per
//! letter assignment).

pub mod cell;
pub mod neighbor;

pub use cell::{Cell, CellIndex, MAX_AXIS_LENGTH, MAX_CELL_COUNT};
pub use neighbor::{Direction, NEIGHBOR_COUNT};

use strum::IntoEnumIterator;

use crate::error::BoardError;
use crate::letters::{Letter, LetterSet};

/// A rectangular letter grid.
#[derive(Debug)]
pub struct Board {
    width: usize,
    height: usize,
    occurring_letters: LetterSet,
    cells: Vec<Cell>,
}

impl Board {
    /// Whether a width/height pair fits the cell addressing limits.
    pub fn is_valid_size(width: usize, height: usize) -> bool {
        width >= 1
            && width <= MAX_AXIS_LENGTH
            && height >= 1
            && height <= MAX_AXIS_LENGTH
            && width * height <= MAX_CELL_COUNT
    }

    /// Build a board from `width * height` row-major characters.
    ///
    /// Characters must be ASCII letters (case-insensitive); a lone 'q'
    /// cell is accepted as the qu ligature marker.
    pub fn new(width: usize, height: usize, board_letters: &str) -> Result<Self, BoardError> {
        if !Self::is_valid_size(width, height) {
            return Err(BoardError::InvalidSize { width, height });
        }

        let cell_count = width * height;
        if board_letters.chars().count() != cell_count {
            return Err(BoardError::WrongLetterCount {
                expected: cell_count,
                actual: board_letters.chars().count(),
            });
        }

        let mut occurring_letters = LetterSet::empty();
        let mut cells = Vec::with_capacity(cell_count);
        for (index, character) in board_letters.chars().enumerate() {
            let Some(letter) = Letter::from_char(character) else {
                return Err(BoardError::InvalidCharacter { index, character });
            };
            occurring_letters.insert(letter);

            cells.push(Cell {
                row: (index / width) as u8,
                column: (index % width) as u8,
                letter,
                valid_neighbor_flags: 0,
                neighbor_letters: LetterSet::empty(),
            });
        }

        let mut board = Self {
            width,
            height,
            occurring_letters,
            cells,
        };
        board.build_neighbor_data();
        Ok(board)
    }

    /// Fill in each cell's neighbor-existence flags and neighbor-letter
    /// mask.
    fn build_neighbor_data(&mut self) {
        for index in 0..self.cells.len() {
            let (row, column) = (self.cells[index].row, self.cells[index].column);

            let mut valid_neighbor_flags = 0u8;
            let mut neighbor_letters = LetterSet::empty();
            for direction in Direction::iter() {
                if let Some(neighbor_index) =
                    self.neighbor_position_index(row as i32, column as i32, direction)
                {
                    valid_neighbor_flags |= 1 << direction.bit();
                    neighbor_letters.insert(self.cells[neighbor_index as usize].letter);
                }
            }

            let cell = &mut self.cells[index];
            cell.valid_neighbor_flags = valid_neighbor_flags;
            cell.neighbor_letters = neighbor_letters;
        }
    }

    fn neighbor_position_index(
        &self,
        row: i32,
        column: i32,
        direction: Direction,
    ) -> Option<CellIndex> {
        let (row_delta, column_delta) = direction.offsets();
        let neighbor_row = row + row_delta;
        let neighbor_column = column + column_delta;

        if neighbor_row >= 0
            && (neighbor_row as usize) < self.height
            && neighbor_column >= 0
            && (neighbor_column as usize) < self.width
        {
            Some((neighbor_row as usize * self.width + neighbor_column as usize) as CellIndex)
        } else {
            None
        }
    }

    /// Board width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Mask of the distinct letters appearing anywhere on the board.
    pub fn occurring_letters(&self) -> LetterSet {
        self.occurring_letters
    }

    /// Borrow a cell by index.
    pub fn cell(&self, cell_index: CellIndex) -> &Cell {
        &self.cells[cell_index as usize]
    }

    /// Index of `cell_index`'s neighbor in `direction`, None at the
    /// grid boundary.
    pub fn neighbor_index(&self, cell_index: CellIndex, direction: Direction) -> Option<CellIndex> {
        let cell = &self.cells[cell_index as usize];
        if cell.valid_neighbor_flags & (1 << direction.bit()) == 0 {
            return None;
        }
        self.neighbor_position_index(cell.row as i32, cell.column as i32, direction)
    }

    /// Find the first cell at or after `start_index` holding `letter`.
    pub fn cell_index_of(&self, letter: Letter, start_index: usize) -> Option<CellIndex> {
        self.cells[start_index.min(self.cells.len())..]
            .iter()
            .position(|cell| cell.letter == letter)
            .map(|offset| (start_index + offset) as CellIndex)
    }

    /// Estimate of the memory held by the cell array.
    pub fn estimate_memory_used(&self) -> usize {
        std::mem::size_of::<Self>() + self.cells.capacity() * std::mem::size_of::<Cell>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(ch: char) -> Letter {
        Letter::from_char(ch).unwrap()
    }

    #[test]
    fn test_build_2x2() {
        let board = Board::new(2, 2, "cats").unwrap();
        assert_eq!(board.cell_count(), 4);
        assert_eq!(board.cell(0).letter, letter('c'));
        assert_eq!(board.cell(1).letter, letter('a'));
        assert_eq!(board.cell(2).letter, letter('t'));
        assert_eq!(board.cell(3).letter, letter('s'));

        let expected: LetterSet = "cats".chars().filter_map(Letter::from_char).collect();
        assert_eq!(board.occurring_letters(), expected);
    }

    #[test]
    fn test_row_major_layout() {
        let board = Board::new(3, 2, "abcdef").unwrap();
        // second row starts at index 3
        assert_eq!(board.cell(3).letter, letter('d'));
        assert_eq!(board.cell(3).row, 1);
        assert_eq!(board.cell(3).column, 0);
    }

    #[test]
    fn test_2x2_is_fully_adjacent() {
        let board = Board::new(2, 2, "cats").unwrap();
        for index in 0..4u16 {
            let mut neighbors: Vec<CellIndex> = Direction::iter()
                .filter_map(|direction| board.neighbor_index(index, direction))
                .collect();
            neighbors.sort_unstable();
            let expected: Vec<CellIndex> = (0..4).filter(|&other| other != index).collect();
            assert_eq!(neighbors, expected);
        }
    }

    #[test]
    fn test_corner_and_center_neighbor_counts() {
        let board = Board::new(3, 3, "abcdefghi").unwrap();
        let count = |index: CellIndex| {
            board.cell(index).valid_neighbor_flags.count_ones() as usize
        };
        assert_eq!(count(0), 3); // corner
        assert_eq!(count(1), 5); // edge
        assert_eq!(count(4), 8); // center
    }

    #[test]
    fn test_neighbor_letters() {
        let board = Board::new(3, 1, "abc").unwrap();
        // middle cell sees both ends; left end sees only 'b'
        let expected: LetterSet = "ac".chars().filter_map(Letter::from_char).collect();
        assert_eq!(board.cell(1).neighbor_letters, expected);

        let expected: LetterSet = "b".chars().filter_map(Letter::from_char).collect();
        assert_eq!(board.cell(0).neighbor_letters, expected);
    }

    #[test]
    fn test_1x1_has_no_neighbors() {
        let board = Board::new(1, 1, "a").unwrap();
        assert_eq!(board.cell(0).valid_neighbor_flags, 0);
        assert!(board.cell(0).neighbor_letters.is_empty());
    }

    #[test]
    fn test_cell_index_of_scans_forward() {
        let board = Board::new(2, 2, "abab").unwrap();
        assert_eq!(board.cell_index_of(letter('a'), 0), Some(0));
        assert_eq!(board.cell_index_of(letter('a'), 1), Some(2));
        assert_eq!(board.cell_index_of(letter('a'), 3), None);
        assert_eq!(board.cell_index_of(letter('z'), 0), None);
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(!Board::is_valid_size(0, 4));
        assert!(!Board::is_valid_size(4, 0));
        assert!(!Board::is_valid_size(256, 4));
        assert!(Board::is_valid_size(255, 255));

        assert!(matches!(
            Board::new(0, 4, ""),
            Err(BoardError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_wrong_letter_count() {
        assert!(matches!(
            Board::new(2, 2, "cat"),
            Err(BoardError::WrongLetterCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(
            Board::new(2, 2, "ca7s"),
            Err(BoardError::InvalidCharacter {
                index: 2,
                character: '7'
            })
        ));
    }

    #[test]
    fn test_uppercase_accepted() {
        let board = Board::new(2, 2, "CaTs").unwrap();
        assert_eq!(board.cell(0).letter, letter('c'));
        assert_eq!(board.cell(2).letter, letter('t'));
    }
}
