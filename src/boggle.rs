// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The public boggle-solving session.
//!
//! A [`Boggle`] owns the dictionary and the cached compact trie, and
//! coordinates their lifecycle across solves:
//!
//! - The dictionary persists for the session's lifetime (or until the
//!   legal words are replaced).
//! - The expanded trie is a build-time intermediate, discarded as soon
//!   as it has been compacted.
//! - The compact trie is cached and reused across solves while the
//!   letters-present filter is stable, and rebuilt when the filter is
//!   enabled and a board's letter set changes.
//! - Board and solver are created fresh per solve and dropped after.
//!
//! Given that dictionaries rarely change, both the dictionary and the
//! compacted trie can be saved to (and reloaded from) one binary
//! container file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::blob::{read_i32, read_u32, signature, write_i32, write_u32};
use crate::board::Board;
use crate::dictionary::Dictionary;
use crate::error::BoggleError;
use crate::letters::LetterSet;
use crate::solver::BoardSolver;
use crate::trie::{CompactTrie, ExpandedTrie};

const CONTAINER_SIGNATURE: u32 = signature(b"bdic");
const CONTAINER_VERSION: u32 = 1;
/// signature + version + two {offset, length} pairs
const CONTAINER_HEADER_SIZE: i32 = 24;

/// Per-substructure memory-usage estimates from the most recent
/// operations that touched each structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryEstimates {
    /// The build-time expanded trie (already discarded when reported).
    pub expanded_trie: usize,
    /// The cached compact trie.
    pub compact_trie: usize,
    /// The most recently solved board.
    pub board: usize,
    /// The most recent solve's solver state, scaled by the worker pool.
    pub solver: usize,
}

/// A boggle-solving session: dictionary, cached trie, and solve entry
/// point.
#[derive(Debug, Default)]
pub struct Boggle {
    dictionary: Option<Dictionary>,
    compact_trie: Option<CompactTrie>,
    currently_solving_board: AtomicBool,
    /// Should the trie only index words spelled from letters that
    /// actually appear on input boards?
    filter_dictionary_to_board_letters: bool,
    memory_estimates: MemoryEstimates,
}

impl Boggle {
    /// Create a session with no legal words yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_not_solving(&self, operation: &'static str) -> Result<(), BoggleError> {
        if self.currently_solving_board.load(Ordering::Acquire) {
            return Err(BoggleError::SolveInFlight { operation });
        }
        Ok(())
    }

    /// Configure the legal words prior to solving any board.
    ///
    /// The input must be alphabetically sorted and deduplicated; the
    /// session builds its own private representation of the words.
    /// Replaces any previously loaded dictionary and cached trie.
    pub fn set_legal_words<S: AsRef<str>>(&mut self, all_words: &[S]) -> Result<(), BoggleError> {
        self.ensure_not_solving("set_legal_words")?;

        self.compact_trie = None;
        self.dictionary = None;
        self.dictionary = Some(Dictionary::from_sorted_words(all_words)?);
        Ok(())
    }

    /// The current dictionary, if legal words have been supplied.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dictionary.as_ref()
    }

    /// The cached compact trie, if one has been built or loaded.
    pub fn dictionary_trie(&self) -> Option<&CompactTrie> {
        self.compact_trie.as_ref()
    }

    /// Whether solves filter the trie to the board's letters.
    pub fn is_filtering_dictionary_to_board_letters(&self) -> bool {
        self.filter_dictionary_to_board_letters
    }

    /// Toggle letters-present filtering.
    ///
    /// The change is not respected until the next `solve_board` call.
    pub fn set_filter_dictionary_to_board_letters(
        &mut self,
        filter: bool,
    ) -> Result<(), BoggleError> {
        self.ensure_not_solving("set_filter_dictionary_to_board_letters")?;
        self.filter_dictionary_to_board_letters = filter;
        Ok(())
    }

    /// Memory-usage estimates from the most recent operations.
    pub fn memory_estimates(&self) -> MemoryEstimates {
        self.memory_estimates
    }

    /// Build the compact trie for the given letter filter, discarding
    /// the expanded intermediate.
    fn build_dictionary_trie(&mut self, allowed_letters: LetterSet) -> Result<(), BoggleError> {
        let dictionary = self
            .dictionary
            .as_ref()
            .ok_or(BoggleError::NoDictionary {
                operation: "build_dictionary_trie",
            })?;

        let expanded = ExpandedTrie::build(dictionary, allowed_letters);
        self.memory_estimates.expanded_trie = expanded.estimate_memory_used();

        let compact = CompactTrie::build(&expanded)?;
        self.memory_estimates.compact_trie = compact.estimate_memory_used();
        self.compact_trie = Some(compact);

        Ok(())
    }

    /// Reuse, rebuild, or first-build the trie for this board.
    fn ensure_dictionary_trie(&mut self, board: &Board) -> Result<(), BoggleError> {
        if let Some(trie) = &self.compact_trie {
            if self.filter_dictionary_to_board_letters
                && trie.board_letters() != board.occurring_letters()
            {
                debug!(
                    old = %trie.board_letters(),
                    new = %board.occurring_letters(),
                    "board letter set changed, rebuilding filtered trie"
                );
                self.compact_trie = None;
            }
        }

        if self.compact_trie.is_none() {
            let allowed_letters = if self.filter_dictionary_to_board_letters {
                board.occurring_letters()
            } else {
                LetterSet::full()
            };
            self.build_dictionary_trie(allowed_letters)?;
        }

        Ok(())
    }

    /// Find all words on the specified board, returning them in
    /// lexicographic order.
    ///
    /// `board_letters` holds `board_width * board_height` characters in
    /// row-major order; 'q' cells act as the qu ligature marker.
    pub fn solve_board(
        &mut self,
        board_width: usize,
        board_height: usize,
        board_letters: &str,
    ) -> Result<Vec<String>, BoggleError> {
        if self.currently_solving_board.swap(true, Ordering::Acquire) {
            return Err(BoggleError::SolveInFlight {
                operation: "solve_board",
            });
        }

        let result = self.solve_board_in_flight(board_width, board_height, board_letters);
        self.currently_solving_board.store(false, Ordering::Release);
        result
    }

    /// Body of [`Boggle::solve_board`], run with the in-flight flag held.
    fn solve_board_in_flight(
        &mut self,
        board_width: usize,
        board_height: usize,
        board_letters: &str,
    ) -> Result<Vec<String>, BoggleError> {
        self.memory_estimates.board = 0;
        self.memory_estimates.solver = 0;

        if self.dictionary.is_none() {
            return Err(BoggleError::NoDictionary {
                operation: "solve_board",
            });
        }

        let board = Board::new(board_width, board_height, board_letters)?;
        self.memory_estimates.board = board.estimate_memory_used();

        self.ensure_dictionary_trie(&board)?;

        let (found_words, solver_memory) = {
            // both were just ensured above
            let dictionary = self.dictionary.as_ref().expect("dictionary present");
            let trie = self.compact_trie.as_ref().expect("compact trie present");

            let solver = BoardSolver::new(trie, &board, dictionary.word_count());
            let found = solver.solve_board();
            let solver_memory = solver.estimate_memory_used();

            trie.clear_found_marks();

            let mut found_words = Vec::with_capacity(found.count_ones());
            for word_index in found.iter_set_bits() {
                if let Some(record) = dictionary.word(word_index) {
                    found_words.push(dictionary.word_string(record).to_string());
                }
            }
            (found_words, solver_memory)
        };
        self.memory_estimates.solver = solver_memory;

        info!(
            found_words = found_words.len(),
            board_width, board_height, "finished solving board"
        );

        Ok(found_words)
    }

    /// Save the dictionary and its optimized trie to one binary file.
    ///
    /// Builds an unfiltered trie first if none is cached.
    pub fn save_binary_legal_words<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BoggleError> {
        self.ensure_not_solving("save_binary_legal_words")?;

        if self.dictionary.is_none() {
            return Err(BoggleError::NoDictionary {
                operation: "save_binary_legal_words",
            });
        }
        if self.compact_trie.is_none() {
            self.build_dictionary_trie(LetterSet::full())?;
        }

        let dictionary = self.dictionary.as_ref().expect("dictionary present");
        let trie = self.compact_trie.as_ref().expect("compact trie present");

        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        // placeholder header, rewritten once the blob extents are known
        write_container_header(&mut writer, CONTAINER_HEADER_SIZE, 0, CONTAINER_HEADER_SIZE, 0)?;

        let dictionary_offset = writer.stream_position()? as i32;
        dictionary.write_to(&mut writer)?;
        let dictionary_length = writer.stream_position()? as i32 - dictionary_offset;

        let trie_offset = writer.stream_position()? as i32;
        trie.write_to(&mut writer)?;
        let trie_length = writer.stream_position()? as i32 - trie_offset;

        writer.seek(SeekFrom::Start(0))?;
        write_container_header(
            &mut writer,
            dictionary_offset,
            dictionary_length,
            trie_offset,
            trie_length,
        )?;
        writer.flush()?;

        info!(
            path = %path.as_ref().display(),
            dictionary_length,
            trie_length,
            "saved binary legal words"
        );

        Ok(())
    }

    /// Load the dictionary and its optimized trie from a binary file
    /// written by [`Boggle::save_binary_legal_words`].
    ///
    /// Replaces the current dictionary and trie on success; any failure
    /// leaves the session without a dictionary rather than half-loaded.
    pub fn load_binary_legal_words<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BoggleError> {
        self.ensure_not_solving("load_binary_legal_words")?;

        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);

        let file_signature = read_u32(&mut reader)?;
        let file_version = read_u32(&mut reader)?;
        let dictionary_offset = read_i32(&mut reader)?;
        let dictionary_length = read_i32(&mut reader)?;
        let trie_offset = read_i32(&mut reader)?;
        let trie_length = read_i32(&mut reader)?;

        if file_signature != CONTAINER_SIGNATURE
            || file_version != CONTAINER_VERSION
            || dictionary_offset <= 0
            || dictionary_length <= 0
            || trie_offset <= 0
            || trie_length <= 0
        {
            return Err(BoggleError::InvalidContainerHeader);
        }

        self.compact_trie = None;
        self.dictionary = None;

        reader.seek(SeekFrom::Start(dictionary_offset as u64))?;
        let dictionary = Dictionary::read_from(&mut reader)?;

        reader.seek(SeekFrom::Start(trie_offset as u64))?;
        let trie = CompactTrie::read_from(&mut reader, dictionary.word_count())?;

        self.memory_estimates.compact_trie = trie.estimate_memory_used();
        self.dictionary = Some(dictionary);
        self.compact_trie = Some(trie);

        info!(path = %path.as_ref().display(), "loaded binary legal words");

        Ok(())
    }
}

fn write_container_header<W: Write>(
    writer: &mut W,
    dictionary_offset: i32,
    dictionary_length: i32,
    trie_offset: i32,
    trie_length: i32,
) -> Result<(), BoggleError> {
    write_u32(writer, CONTAINER_SIGNATURE)?;
    write_u32(writer, CONTAINER_VERSION)?;
    write_i32(writer, dictionary_offset)?;
    write_i32(writer, dictionary_length)?;
    write_i32(writer, trie_offset)?;
    write_i32(writer, trie_length)?;
    Ok(())
}
