// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Board solver: parallel backtracking search over the compact trie.
//!
//! One independent search runs per distinct letter that both has a trie
//! root and occurs on the board. Searches share nothing mutable except
//! the trie's atomic per-node found marks: each owns its in-use-cell
//! bitset and accumulates found word indices into its own local bitset,
//! and the locals are merged with a word-wise OR once the parallel phase
//! ends. Duplicate reports from racing claims are idempotent by
//! construction.
//!
//! The searches are synchronous, CPU-bound work fanned out across
//! rayon's worker pool (bounded at the available processor count); there
//! is no I/O on the hot path and a solve always runs to completion.
//!
//! # The qu ligature rule
//!
//! While expanding a node whose own letter is 'q', every neighbor is
//! additionally tried against the node's 'u'-keyed child, consuming the
//! *same* neighbor cell. A board "qu" pair therefore occupies one cell
//! conceptually while the index still spells out the 'u', and boards
//! holding a bare 'q' still match words spelled with "qu".

use std::time::Instant;

use rayon::prelude::*;
use strum::IntoEnumIterator;
use tracing::{debug, info, trace};

use crate::bits::BitVector;
use crate::board::{Board, CellIndex, Direction};
use crate::letters::Letter;
use crate::trie::CompactTrie;

/// One depth-first backtracking search for a single starting letter.
struct RootLetterSolver<'a> {
    trie: &'a CompactTrie,
    board: &'a Board,
    root_letter: Letter,
    /// Cells occupied by the path currently being extended.
    in_use_cells: BitVector,
    /// Word indices found by this search alone.
    found_words: BitVector,
}

impl<'a> RootLetterSolver<'a> {
    fn new(
        trie: &'a CompactTrie,
        board: &'a Board,
        root_letter: Letter,
        dictionary_word_count: u32,
    ) -> Self {
        Self {
            trie,
            board,
            root_letter,
            in_use_cells: BitVector::new(board.cell_count()),
            found_words: BitVector::new(dictionary_word_count as usize),
        }
    }

    /// Memory one search instance needs for the given board.
    fn estimate_memory_needed(board: &Board) -> usize {
        std::mem::size_of::<Self>() + BitVector::new(board.cell_count()).memory_used()
    }

    /// Run the search from every cell holding the root letter.
    fn solve_words(mut self) -> BitVector {
        let Some(root_node_index) = self.trie.root_index(self.root_letter) else {
            return self.found_words;
        };

        let mut cell_cursor = 0usize;
        while let Some(cell_index) = self.board.cell_index_of(self.root_letter, cell_cursor) {
            self.in_use_cells.set(cell_index as usize, true);
            self.descend(root_node_index, cell_index);
            self.in_use_cells.set(cell_index as usize, false);

            cell_cursor = cell_index as usize + 1;
        }

        self.found_words
    }

    /// One backtracking step: report a completed word, then extend the
    /// path through every usable neighbor the trie can follow.
    fn descend(&mut self, node_index: usize, cell_index: CellIndex) {
        let node = self.trie.node(node_index);
        if let Some(word_index) = node.completed_word_index() {
            if self.trie.claim_word_found(node_index) {
                trace!(word_index, cell_index = cell_index as usize, "word completed");
                self.found_words.set(word_index, true);
            }
        }

        let node_letter = node.letter();

        for direction in Direction::iter() {
            // no neighbor there, or the cell is already spent on this path
            let Some(neighbor_index) = self.board.neighbor_index(cell_index, direction) else {
                continue;
            };
            if self.in_use_cells.test(neighbor_index as usize) {
                continue;
            }

            let neighbor_letter = self.board.cell(neighbor_index).letter;
            if let Some(child_index) = self.trie.child_index(node_index, neighbor_letter) {
                self.in_use_cells.set(neighbor_index as usize, true);
                self.descend(child_index, neighbor_index);
                self.in_use_cells.set(neighbor_index as usize, false);
            }

            // SPECIAL CASE: a 'q' node also offers its 'u'-keyed child
            // onto this same neighbor cell
            if node_letter == Letter::Q {
                if let Some(child_index) = self.trie.child_index(node_index, Letter::U) {
                    self.in_use_cells.set(neighbor_index as usize, true);
                    self.descend(child_index, neighbor_index);
                    self.in_use_cells.set(neighbor_index as usize, false);
                }
            }
        }
    }
}

/// Coordinates the per-letter searches for one solve call.
pub struct BoardSolver<'a> {
    trie: &'a CompactTrie,
    board: &'a Board,
    dictionary_word_count: u32,
    /// Letters with at least one trie root and at least one board cell.
    root_letters: Vec<Letter>,
}

impl<'a> BoardSolver<'a> {
    /// Prepare a solver for one board against one compact trie.
    ///
    /// `dictionary_word_count` sizes the found-word bitsets: completed
    /// word indices are dictionary indices even in a filtered trie.
    pub fn new(trie: &'a CompactTrie, board: &'a Board, dictionary_word_count: u32) -> Self {
        let root_letters: Vec<Letter> = Letter::all()
            .filter(|&letter| {
                trie.root_index(letter).is_some() && board.occurring_letters().contains(letter)
            })
            .collect();

        Self {
            trie,
            board,
            dictionary_word_count,
            root_letters,
        }
    }

    /// Run every per-letter search across the worker pool and merge
    /// their findings into one bitset of dictionary word indices.
    ///
    /// The caller is responsible for clearing the trie's found marks
    /// before this trie is solved again.
    pub fn solve_board(&self) -> BitVector {
        let worker_count = rayon::current_num_threads();
        debug!(
            worker_count,
            search_count = self.root_letters.len(),
            "starting per-letter searches"
        );

        let start_time = Instant::now();
        let found_words = self
            .root_letters
            .par_iter()
            .map(|&root_letter| {
                RootLetterSolver::new(
                    self.trie,
                    self.board,
                    root_letter,
                    self.dictionary_word_count,
                )
                .solve_words()
            })
            .reduce(
                || BitVector::new(self.dictionary_word_count as usize),
                |mut merged, found| {
                    merged.union_with(&found);
                    merged
                },
            );
        let elapsed = start_time.elapsed();

        info!(
            found_count = found_words.count_ones(),
            elapsed_us = elapsed.as_micros() as u64,
            "finished solving board"
        );

        found_words
    }

    /// Estimate of the memory a solve needs: the merged found-word
    /// bitset plus one search instance per worker.
    pub fn estimate_memory_used(&self) -> usize {
        let mut estimated = std::mem::size_of::<Self>();
        estimated += BitVector::new(self.dictionary_word_count as usize).memory_used();

        let per_search = RootLetterSolver::estimate_memory_needed(self.board);
        estimated += per_search * rayon::current_num_threads().max(1);

        estimated
    }
}
