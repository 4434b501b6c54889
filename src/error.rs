// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for dictionary construction, trie compaction, board
//! validation, and the public solving API.

use std::io;
use thiserror::Error;

/// Errors raised while building the word store.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The caller-supplied word list violated the sorted-and-deduplicated
    /// input contract.
    #[error("word list is not sorted and deduplicated: {previous:?} precedes {current:?}")]
    NotSorted { previous: String, current: String },
}

/// Hard structural-limit failures during compact trie construction.
///
/// There is no degraded fallback for any of these; the partially built
/// structure is discarded.
#[derive(Debug, Error)]
pub enum TrieError {
    #[error("expanded trie has {node_count} nodes, more than the compact trie supports ({limit})")]
    TooManyNodes { node_count: usize, limit: usize },

    #[error("node {node_index} parent delta {delta} outside the packed relative-index budget")]
    ParentDeltaOutOfRange { node_index: usize, delta: i64 },

    #[error("node {node_index} child delta {delta} for '{letter}' outside the packed relative-index budget")]
    ChildDeltaOutOfRange {
        node_index: usize,
        letter: char,
        delta: i64,
    },

    #[error("child table offset would exceed {limit} entries")]
    ChildTableOverflow { limit: usize },
}

/// Input-validation failures for a board passed to a solve.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid or too large board size: {width} by {height}")]
    InvalidSize { width: usize, height: usize },

    #[error("board letters length {actual} does not match {expected} cells")]
    WrongLetterCount { expected: usize, actual: usize },

    #[error("board letters contain invalid character {character:?} at index {index}")]
    InvalidCharacter { index: usize, character: char },
}

/// Top-level error for every fallible public operation.
#[derive(Debug, Error)]
pub enum BoggleError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Trie(#[from] TrieError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A blob's signature or version did not match the current format.
    /// Loads fail closed; there is no cross-version compatibility.
    #[error("{blob} blob has a bad signature or unsupported version")]
    HeaderMismatch { blob: &'static str },

    /// The combined container's header fields are inconsistent.
    #[error("container file has an invalid header")]
    InvalidContainerHeader,

    /// A stored compact trie does not describe the loaded dictionary.
    #[error("compact trie word count {trie_words} does not match dictionary word count {dictionary_words}")]
    WordCountMismatch {
        trie_words: u32,
        dictionary_words: u32,
    },

    /// The operation requires legal words to have been supplied first.
    #[error("{operation} called before any legal words were supplied")]
    NoDictionary { operation: &'static str },

    /// A second solve, or a dictionary/filter mutation, was attempted
    /// while a solve was in flight. Reported, never waited out.
    #[error("{operation} called while a board solve is in flight")]
    SolveInFlight { operation: &'static str },
}
