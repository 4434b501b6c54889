// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed-width-word bit vectors with "find next set/clear bit" iteration.
//!
//! Two flavors are provided:
//!
//! - [`BitVector`] - a plain, single-owner bitset. Used by each per-letter
//!   search for tracking which board cells its current path occupies, and
//!   for accumulating found-word indices.
//! - [`AtomicBitVector`] - a shareable bitset whose bits flip via atomic
//!   test-and-set. Used for the per-trie-node "word already reported this
//!   solve" marks that concurrent searches consult.
//!
//! Both store bits in `u32` words, LSB first within each word.

pub mod bit_vector;

pub use bit_vector::{AtomicBitVector, BitVector, SetBitsIter};
