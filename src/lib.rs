// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trie-driven Boggle board solver.
//!
//! Finds every dictionary word that can be traced as a connected path
//! of 8-adjacent, pairwise-distinct cells on a letter grid, driven by a
//! compact trie over the legal-word list.
//!
//! # Architecture
//!
//! The word index is built in two tiers:
//!
//! ## Tier 1: Word Store (immutable)
//!
//! [`dictionary::Dictionary`] holds the canonical legal words as a
//! packed string pool plus fixed-size records, in input order. It
//! persists for the session lifetime and has no trie awareness.
//!
//! ## Tier 2: Tries (built once per letter filter)
//!
//! - [`trie::ExpandedTrie`] - a growable prefix tree built in one
//!   linear pass over the sorted words, exploiting shared prefixes
//!   between adjacent words. Disposable intermediate.
//! - [`trie::CompactTrie`] - the cache-dense, pointer-free form the
//!   search walks: 16-byte nodes, relative parent/child index deltas,
//!   and one shared child-table side array. Read-only at solve time
//!   except for atomic per-node found marks.
//!
//! # Search Algorithm
//!
//! [`solver::BoardSolver`] runs one independent backtracking
//! depth-first search per distinct starting letter present on the
//! board, walking the compact trie and the [`board::Board`] in
//! lock-step with a bitset of in-use cells. A 'q' trie node also offers
//! its 'u'-keyed child against the current neighbor cell, so a "qu"
//! pair occupies one physical cell (the ligature rule).
//!
//! # Parallelization
//!
//! The per-letter searches are data-independent: each owns its cell
//! bitset and accumulates found words into a thread-local bitset, and
//! the trie's found marks flip through atomic test-and-set. They fan
//! out across rayon's worker pool and the local bitsets are merged
//! with a word-wise OR after the parallel phase.
//!
//! # Persistence
//!
//! Dictionaries rarely change, so [`boggle::Boggle`] can save the word
//! store together with the compacted trie into one binary container
//! and reload both later, skipping trie construction entirely.

pub mod bits;
pub mod board;
pub mod boggle;
pub mod dictionary;
pub mod error;
pub mod letters;
pub mod solver;
pub mod trie;

mod blob;

// Re-export commonly used types
pub use boggle::{Boggle, MemoryEstimates};
pub use error::{BoardError, BoggleError, DictionaryError, TrieError};
pub use letters::{Letter, LetterSet};
