// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Compact trie: the cache-dense, pointer-free search structure.
//!
//! Built once from an [`ExpandedTrie`](crate::trie::ExpandedTrie) and
//! read-only thereafter, except for the per-solve found marks which live
//! in a separate atomic bitset so concurrent searches can claim them
//! without touching the node array.
//!
//! Children are reached through a shared side array of relative deltas:
//! a node with children stores the side-array offset of its first..last
//! child letter range, with delta 0 filling the gaps inside the range.

use std::io::{Read, Write};

use tracing::debug;

use crate::bits::AtomicBitVector;
use crate::blob::{read_header, read_i32, read_u32, signature, write_i32, write_u32};
use crate::error::{BoggleError, TrieError};
use crate::letters::{Letter, LetterSet, ALPHABET_SIZE};
use crate::trie::compact_node::{
    CompactNode, INVALID_RELATIVE_INDEX, NO_COMPLETED_WORD, RELATIVE_INDEX_MAX,
};
use crate::trie::expanded::{ExpandedTrie, INVALID_NODE_INDEX};

const TRIE_BLOB_SIGNATURE: u32 = signature(b"trie");
const TRIE_BLOB_VERSION: u32 = 1;

/// The compacted dictionary trie.
#[derive(Debug)]
pub struct CompactTrie {
    nodes: Vec<CompactNode>,
    /// Shared side array of relative child deltas, in ascending letter
    /// order per node, gaps stored as 0.
    child_deltas: Vec<u32>,
    /// Absolute root node index per starting letter, -1 where absent.
    roots: [i32; ALPHABET_SIZE],
    root_count: u32,
    /// The letters-present filter this trie was built with.
    board_letters: LetterSet,
    /// Number of words reachable in this trie.
    word_count: u32,
    /// Per-node "word reported this solve" marks; cleared between solves.
    found_marks: AtomicBitVector,
}

impl CompactTrie {
    /// Compact a built expanded trie.
    ///
    /// Fails hard if the node count or any relative delta exceeds the
    /// packed-format budget; no partially built structure is returned.
    pub fn build(source: &ExpandedTrie) -> Result<Self, TrieError> {
        let node_count = source.node_count();
        let limit = i32::MAX as usize;
        if node_count > limit {
            return Err(TrieError::TooManyNodes { node_count, limit });
        }

        let mut nodes = Vec::with_capacity(node_count);
        let mut child_deltas: Vec<u32> = Vec::new();

        for node_index in 0..node_count {
            let src = source.node(node_index);
            let mut node = CompactNode::new(
                src.letter,
                src.child_letters,
                if src.completed_word_index == INVALID_NODE_INDEX {
                    NO_COMPLETED_WORD
                } else {
                    src.completed_word_index
                },
            );

            if src.parent != INVALID_NODE_INDEX {
                // parents always precede children in the arena
                let delta = node_index as i64 - src.parent as i64;
                if delta < 1 || delta > RELATIVE_INDEX_MAX as i64 {
                    return Err(TrieError::ParentDeltaOutOfRange { node_index, delta });
                }
                node.set_parent_delta(delta as u32);
            }

            if let (Some(first), Some(last)) =
                (src.child_letters.first(), src.child_letters.last())
            {
                if child_deltas.len() > limit {
                    return Err(TrieError::ChildTableOverflow { limit });
                }
                node.set_child_table_offset(child_deltas.len() as i32);

                for letter_index in first.index()..=last.index() {
                    let child_index = src.children[letter_index as usize];
                    if child_index == INVALID_NODE_INDEX {
                        // gap inside the contiguous letter range
                        child_deltas.push(INVALID_RELATIVE_INDEX);
                        continue;
                    }

                    let delta = child_index as i64 - node_index as i64;
                    if delta < 1 || delta > RELATIVE_INDEX_MAX as i64 {
                        return Err(TrieError::ChildDeltaOutOfRange {
                            node_index,
                            letter: Letter::new(letter_index).to_char(),
                            delta,
                        });
                    }
                    child_deltas.push(delta as u32);
                }
            }

            nodes.push(node);
        }

        debug!(
            node_count,
            child_delta_count = child_deltas.len(),
            word_count = source.word_count(),
            "compact trie built"
        );

        Ok(Self {
            nodes,
            child_deltas,
            roots: *source.roots(),
            root_count: source.root_count(),
            board_letters: source.allowed_letters(),
            word_count: source.word_count(),
            found_marks: AtomicBitVector::new(node_count),
        })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of entries in the shared child-delta side array.
    pub fn child_delta_count(&self) -> usize {
        self.child_deltas.len()
    }

    /// Number of words reachable in this trie.
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Number of starting letters that have a root.
    pub fn root_count(&self) -> u32 {
        self.root_count
    }

    /// The letters-present filter this trie was built with.
    pub fn board_letters(&self) -> LetterSet {
        self.board_letters
    }

    /// Borrow a node by index.
    pub fn node(&self, node_index: usize) -> &CompactNode {
        &self.nodes[node_index]
    }

    /// Root node index for a starting letter, if any word starts there.
    pub fn root_index(&self, letter: Letter) -> Option<usize> {
        let root = self.roots[letter.as_usize()];
        (root != INVALID_NODE_INDEX).then_some(root as usize)
    }

    /// Absolute index of the child of `node_index` keyed by `letter`.
    pub fn child_index(&self, node_index: usize, letter: Letter) -> Option<usize> {
        let node = &self.nodes[node_index];
        if !node.child_letters().contains(letter) {
            return None;
        }
        let table_offset = node.child_table_offset()?;

        // contains() implies a non-empty letter range
        let first = node.child_letters().first()?;
        let slot = (letter.index() - first.index()) as usize;
        let delta = self.child_deltas[table_offset + slot];
        debug_assert_ne!(delta, INVALID_RELATIVE_INDEX);

        Some(node_index + delta as usize)
    }

    /// Absolute index of the parent of `node_index`, None for roots.
    pub fn parent_index(&self, node_index: usize) -> Option<usize> {
        let delta = self.nodes[node_index].parent_delta();
        (delta != INVALID_RELATIVE_INDEX).then(|| node_index - delta as usize)
    }

    /// Atomically claim the found mark of a word-completing node.
    ///
    /// Returns true when this call flipped the mark, i.e. the word has
    /// not been reported yet in the current solve. Duplicate claims from
    /// racing searches are tolerated by the caller's idempotent
    /// accumulation.
    pub fn claim_word_found(&self, node_index: usize) -> bool {
        !self.found_marks.test_and_set(node_index)
    }

    /// Clear every per-solve found mark. Must run between solves;
    /// leftover marks would silently drop words from the next solve.
    pub fn clear_found_marks(&self) {
        self.found_marks.clear_all();
    }

    /// Reconstruct every reachable word by walking the trie depth-first.
    ///
    /// Words come out in lexicographic order.
    pub fn dump_words(&self) -> Vec<String> {
        let mut all_words = Vec::with_capacity(self.word_count as usize);
        let mut chars = String::new();
        for &root_index in &self.roots {
            if root_index == INVALID_NODE_INDEX {
                continue;
            }
            self.dump_from(&mut all_words, &mut chars, root_index as usize);
            chars.clear();
        }
        all_words
    }

    fn dump_from(&self, all_words: &mut Vec<String>, chars: &mut String, node_index: usize) {
        let node = &self.nodes[node_index];
        chars.push(node.letter().to_char());

        if node.completed_word_index().is_some() {
            all_words.push(chars.clone());
        }

        for letter in node.child_letters().iter() {
            if let Some(child_index) = self.child_index(node_index, letter) {
                self.dump_from(all_words, chars, child_index);
            }
        }

        chars.pop();
    }

    /// Estimate of the memory held by the node and side arrays.
    pub fn estimate_memory_used(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.nodes.capacity() * std::mem::size_of::<CompactNode>()
            + self.child_deltas.capacity() * std::mem::size_of::<u32>()
            + self.found_marks.memory_used()
    }

    /// Write the compact trie blob: signature/version, counts, root
    /// table, letter filter, word count, node records, child deltas.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BoggleError> {
        write_u32(writer, TRIE_BLOB_SIGNATURE)?;
        write_u32(writer, TRIE_BLOB_VERSION)?;

        write_u32(writer, self.nodes.len() as u32)?;
        write_u32(writer, self.child_deltas.len() as u32)?;
        write_u32(writer, self.root_count)?;

        for &root in &self.roots {
            write_i32(writer, root)?;
        }

        write_u32(writer, self.board_letters.bits())?;
        write_u32(writer, self.word_count)?;

        for node in &self.nodes {
            node.write_to(writer)?;
        }
        for &delta in &self.child_deltas {
            write_u32(writer, delta)?;
        }

        Ok(())
    }

    /// Read a compact trie blob.
    ///
    /// The stored word count must match the dictionary the trie is being
    /// attached to, or the load fails.
    pub fn read_from<R: Read>(
        reader: &mut R,
        dictionary_word_count: u32,
    ) -> Result<Self, BoggleError> {
        read_header(reader, TRIE_BLOB_SIGNATURE, TRIE_BLOB_VERSION, "compact trie")?;

        let node_count = read_u32(reader)? as usize;
        let child_delta_count = read_u32(reader)? as usize;
        let root_count = read_u32(reader)?;

        let mut roots = [INVALID_NODE_INDEX; ALPHABET_SIZE];
        for root in roots.iter_mut() {
            *root = read_i32(reader)?;
        }

        let board_letters = LetterSet::from_bits(read_u32(reader)?);
        let word_count = read_u32(reader)?;

        if word_count != dictionary_word_count {
            return Err(BoggleError::WordCountMismatch {
                trie_words: word_count,
                dictionary_words: dictionary_word_count,
            });
        }

        let mut nodes = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            nodes.push(CompactNode::read_from(reader)?);
        }

        let mut child_deltas = Vec::with_capacity(child_delta_count);
        for _ in 0..child_delta_count {
            child_deltas.push(read_u32(reader)?);
        }

        Ok(Self {
            nodes,
            child_deltas,
            roots,
            root_count,
            board_letters,
            word_count,
            found_marks: AtomicBitVector::new(node_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    fn compact(words: &[&str]) -> CompactTrie {
        let dictionary = Dictionary::from_sorted_words(words).unwrap();
        let expanded = ExpandedTrie::build(&dictionary, LetterSet::full());
        CompactTrie::build(&expanded).unwrap()
    }

    fn letter(ch: char) -> Letter {
        Letter::from_char(ch).unwrap()
    }

    #[test]
    fn test_compact_matches_expanded_structure() {
        let dictionary =
            Dictionary::from_sorted_words(&["car", "cart", "cat", "dog"]).unwrap();
        let expanded = ExpandedTrie::build(&dictionary, LetterSet::full());
        let compact = CompactTrie::build(&expanded).unwrap();

        assert_eq!(compact.node_count(), expanded.node_count());
        assert_eq!(compact.word_count(), expanded.word_count());
        assert_eq!(compact.root_count(), expanded.root_count());
        assert_eq!(compact.dump_words(), expanded.dump_words());
    }

    #[test]
    fn test_parent_and_child_deltas_decode() {
        let dictionary =
            Dictionary::from_sorted_words(&["abc", "abd", "axe", "bat"]).unwrap();
        let expanded = ExpandedTrie::build(&dictionary, LetterSet::full());
        let compact = CompactTrie::build(&expanded).unwrap();

        for node_index in 0..compact.node_count() {
            let src = expanded.node(node_index);

            // decoding the parent delta reproduces the expanded link
            match compact.parent_index(node_index) {
                Some(parent) => assert_eq!(parent as i32, src.parent),
                None => assert_eq!(src.parent, INVALID_NODE_INDEX),
            }

            // decoding every child delta lands on a node of the right letter
            for child_letter in src.child_letters.iter() {
                let child_index = compact
                    .child_index(node_index, child_letter)
                    .expect("expanded child must survive compaction");
                assert_eq!(child_index as i32, src.children[child_letter.as_usize()]);
                assert_eq!(compact.node(child_index).letter(), child_letter);
            }
        }
    }

    #[test]
    fn test_child_table_gaps() {
        // root 'a' has children 'b' and 'x': the range b..=x is mostly gaps
        let compact = compact(&["aba", "axa"]);
        let root = compact.root_index(letter('a')).unwrap();

        assert_eq!(
            compact
                .child_index(root, letter('b'))
                .map(|i| compact.node(i).letter()),
            Some(letter('b'))
        );
        assert_eq!(
            compact
                .child_index(root, letter('x'))
                .map(|i| compact.node(i).letter()),
            Some(letter('x'))
        );
        // letters inside the gap resolve to no child
        assert_eq!(compact.child_index(root, letter('m')), None);
        // letters outside the range resolve to no child
        assert_eq!(compact.child_index(root, letter('z')), None);
    }

    #[test]
    fn test_roots_per_letter() {
        let compact = compact(&["ant", "cat"]);
        assert_eq!(compact.root_count(), 2);
        assert!(compact.root_index(letter('a')).is_some());
        assert!(compact.root_index(letter('b')).is_none());
        assert!(compact.root_index(letter('c')).is_some());
    }

    #[test]
    fn test_found_marks_claim_once_and_clear() {
        let compact = compact(&["cat"]);
        let root = compact.root_index(letter('c')).unwrap();
        let a_node = compact.child_index(root, letter('a')).unwrap();
        let t_node = compact.child_index(a_node, letter('t')).unwrap();

        assert!(compact.claim_word_found(t_node));
        assert!(!compact.claim_word_found(t_node));

        compact.clear_found_marks();
        assert!(compact.claim_word_found(t_node));
    }

    #[test]
    fn test_dump_words_is_lexicographic() {
        let words = ["ant", "anteater", "bat", "cat", "cats"];
        let compact = compact(&words);
        assert_eq!(compact.dump_words(), words);
    }

    #[test]
    fn test_blob_round_trip() {
        let original = compact(&["cat", "cats", "queen"]);

        let mut blob = Vec::new();
        original.write_to(&mut blob).unwrap();

        let loaded = CompactTrie::read_from(&mut blob.as_slice(), 3).unwrap();
        assert_eq!(loaded.node_count(), original.node_count());
        assert_eq!(loaded.child_delta_count(), original.child_delta_count());
        assert_eq!(loaded.root_count(), original.root_count());
        assert_eq!(loaded.board_letters(), original.board_letters());
        assert_eq!(loaded.dump_words(), original.dump_words());
    }

    #[test]
    fn test_blob_rejects_word_count_mismatch() {
        let original = compact(&["cat", "cats"]);
        let mut blob = Vec::new();
        original.write_to(&mut blob).unwrap();

        assert!(matches!(
            CompactTrie::read_from(&mut blob.as_slice(), 99),
            Err(BoggleError::WordCountMismatch {
                trie_words: 2,
                dictionary_words: 99
            })
        ));
    }

    #[test]
    fn test_blob_rejects_bad_signature() {
        let original = compact(&["cat"]);
        let mut blob = Vec::new();
        original.write_to(&mut blob).unwrap();
        blob[3] ^= 0xFF;

        assert!(matches!(
            CompactTrie::read_from(&mut blob.as_slice(), 1),
            Err(BoggleError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_trie() {
        let dictionary = Dictionary::from_sorted_words::<&str>(&[]).unwrap();
        let expanded = ExpandedTrie::build(&dictionary, LetterSet::full());
        let compact = CompactTrie::build(&expanded).unwrap();

        assert_eq!(compact.node_count(), 0);
        assert_eq!(compact.root_count(), 0);
        assert!(compact.dump_words().is_empty());
    }
}
