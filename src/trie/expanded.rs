// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Expanded trie: the growable intermediate built from the word store.
//!
//! Nodes are addressed by plain `i32` index into a single arena; each
//! node owns an explicit 26-entry child table plus a parent index. The
//! builder exploits the sorted input: for two lexicographically adjacent
//! words sharing a K-letter prefix, insertion of the second resumes from
//! the node common to both instead of re-descending from the root. That
//! one optimization makes construction a single linear pass.
//!
//! The 'u' after a 'q' is inserted like any other letter; the qu
//! ligature is a search-time rule, not an index-time one.

use tracing::debug;

use crate::dictionary::Dictionary;
use crate::letters::{Letter, LetterSet, ALPHABET_SIZE};

/// Index of a node in the arena; -1 marks "no node".
pub(crate) const INVALID_NODE_INDEX: i32 = -1;

/// One expanded trie node with a fixed-size child table.
#[derive(Debug, Clone)]
pub struct ExpandedNode {
    /// Arena index of the parent, -1 for roots.
    pub parent: i32,
    /// The letter this node represents.
    pub letter: Letter,
    /// Dictionary index of the word this node completes, -1 if none.
    pub completed_word_index: i32,
    /// Mask of letters for which a child exists.
    pub child_letters: LetterSet,
    /// Child arena index per letter, -1 where absent.
    pub children: [i32; ALPHABET_SIZE],
}

impl ExpandedNode {
    fn new(letter: Letter) -> Self {
        Self {
            parent: INVALID_NODE_INDEX,
            letter,
            completed_word_index: INVALID_NODE_INDEX,
            child_letters: LetterSet::empty(),
            children: [INVALID_NODE_INDEX; ALPHABET_SIZE],
        }
    }

    /// Whether this node starts a word (has no parent).
    pub fn is_root(&self) -> bool {
        self.parent == INVALID_NODE_INDEX
    }
}

/// Length of the common prefix between two adjacent sorted words.
fn matching_prefix_length(previous: &str, current: &str) -> usize {
    previous
        .bytes()
        .zip(current.bytes())
        .take_while(|(previous_byte, current_byte)| previous_byte == current_byte)
        .count()
}

/// Insertion state threaded between consecutive words.
struct AddWordState {
    /// Dictionary index of the previous *inserted* (not skipped) word.
    previous_word_index: Option<usize>,
    /// Arena index of that word's terminal node.
    previous_word_last_node: i32,
}

/// The growable prefix trie, built once and then compacted away.
#[derive(Debug)]
pub struct ExpandedTrie {
    allowed_letters: LetterSet,
    roots: [i32; ALPHABET_SIZE],
    root_count: u32,
    nodes: Vec<ExpandedNode>,
    word_count: u32,
}

impl ExpandedTrie {
    /// Estimate of the node count a dictionary will expand to, used to
    /// front-load the arena allocation.
    ///
    /// Observed across dictionaries from a few hundred to 400k+ words:
    /// (total nodes / word count) is roughly (average word length / 2).
    pub fn estimated_node_count(word_count: u32, average_word_length: u32) -> usize {
        word_count as usize * (average_word_length as usize / 2)
    }

    /// Build the trie containing exactly the dictionary words fully
    /// expressible with `allowed_letters`.
    ///
    /// Words whose letter mask is not a subset of the permitted mask are
    /// skipped entirely, never partially inserted. Construction cannot
    /// fail short of allocation failure.
    pub fn build(dictionary: &Dictionary, allowed_letters: LetterSet) -> Self {
        let mut trie = Self {
            allowed_letters,
            roots: [INVALID_NODE_INDEX; ALPHABET_SIZE],
            root_count: 0,
            nodes: Vec::with_capacity(Self::estimated_node_count(
                dictionary.word_count(),
                dictionary.average_word_length(),
            )),
            word_count: 0,
        };

        let mut state = AddWordState {
            previous_word_index: None,
            previous_word_last_node: INVALID_NODE_INDEX,
        };

        for word_index in 0..dictionary.word_count() as usize {
            trie.add_word(dictionary, &mut state, word_index);
        }

        debug!(
            node_count = trie.nodes.len(),
            word_count = trie.word_count,
            root_count = trie.root_count,
            allowed_letters = %allowed_letters,
            "expanded trie built"
        );

        trie
    }

    fn add_word(&mut self, dictionary: &Dictionary, state: &mut AddWordState, word_index: usize) {
        let record = match dictionary.word(word_index) {
            Some(record) => record,
            None => return,
        };
        if !record.letters().is_subset_of(self.allowed_letters) {
            // word contains letters not present on the board, skip it
            return;
        }

        let word = dictionary.word_string(record);
        let mut starting_node = INVALID_NODE_INDEX;
        let mut letter_index = 0usize;

        if let Some(previous_index) = state.previous_word_index {
            let previous_record = dictionary
                .word(previous_index)
                .expect("previous inserted word index is valid");
            let previous_word = dictionary.word_string(previous_record);
            let prefix_length = matching_prefix_length(previous_word, word);

            if prefix_length == 0 {
                // nothing shared, descend from a root as usual
            } else if prefix_length == previous_record.length() {
                // current word is a continuation of the previous one,
                // pick up where we left off
                starting_node = state.previous_word_last_node;
                letter_index = prefix_length;
            } else {
                // shares a root but branches further up the trie: back
                // out of the previous word's unshared suffix
                let backup = previous_record.length() - prefix_length;
                starting_node = self.nth_parent(state.previous_word_last_node, backup);
                letter_index = prefix_length;
            }
        }

        let word_bytes = word.as_bytes();
        let mut node_index = if starting_node == INVALID_NODE_INDEX {
            let first = Letter::from_byte(word_bytes[letter_index])
                .expect("dictionary pool holds validated letters");
            letter_index += 1;
            self.get_or_add_root(first)
        } else {
            starting_node
        };

        for &byte in &word_bytes[letter_index..] {
            let letter =
                Letter::from_byte(byte).expect("dictionary pool holds validated letters");
            node_index = self.get_or_add_child(node_index, letter);
        }

        let node = &mut self.nodes[node_index as usize];
        debug_assert_eq!(
            node.completed_word_index, INVALID_NODE_INDEX,
            "deduplicated input cannot complete one node twice"
        );
        node.completed_word_index = word_index as i32;
        self.word_count += 1;

        state.previous_word_index = Some(word_index);
        state.previous_word_last_node = node_index;
    }

    /// Walk `n` parent links up from `node_index`.
    fn nth_parent(&self, node_index: i32, n: usize) -> i32 {
        let mut cursor = node_index;
        let mut lookups_remaining = n;
        while cursor != INVALID_NODE_INDEX && lookups_remaining != 0 {
            cursor = self.nodes[cursor as usize].parent;
            lookups_remaining -= 1;
        }

        debug_assert_eq!(lookups_remaining, 0);
        cursor
    }

    fn add_node(&mut self, letter: Letter) -> i32 {
        let node_index = self.nodes.len() as i32;
        self.nodes.push(ExpandedNode::new(letter));
        node_index
    }

    fn get_or_add_root(&mut self, letter: Letter) -> i32 {
        debug_assert!(self.allowed_letters.contains(letter));

        let mut root_index = self.roots[letter.as_usize()];
        if root_index == INVALID_NODE_INDEX {
            root_index = self.add_node(letter);
            self.roots[letter.as_usize()] = root_index;
            self.root_count += 1;
        }

        root_index
    }

    fn get_or_add_child(&mut self, node_index: i32, letter: Letter) -> i32 {
        let mut child_index = self.nodes[node_index as usize].children[letter.as_usize()];
        if child_index == INVALID_NODE_INDEX {
            child_index = self.add_node(letter);

            let node = &mut self.nodes[node_index as usize];
            node.children[letter.as_usize()] = child_index;
            node.child_letters.insert(letter);

            let child = &mut self.nodes[child_index as usize];
            debug_assert_eq!(child.parent, INVALID_NODE_INDEX);
            child.parent = node_index;
        }

        child_index
    }

    /// The letter filter this trie was built with.
    pub fn allowed_letters(&self) -> LetterSet {
        self.allowed_letters
    }

    /// Root node index per starting letter, -1 where no word starts
    /// with that letter.
    pub fn roots(&self) -> &[i32; ALPHABET_SIZE] {
        &self.roots
    }

    /// Number of letters that actually have a root.
    pub fn root_count(&self) -> u32 {
        self.root_count
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of words inserted (words surviving the letter filter).
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Borrow a node by arena index.
    pub fn node(&self, node_index: usize) -> &ExpandedNode {
        &self.nodes[node_index]
    }

    /// Reconstruct every inserted word by walking the trie depth-first.
    ///
    /// Words come out in lexicographic order: roots ascend by letter and
    /// children ascend within each node.
    pub fn dump_words(&self) -> Vec<String> {
        let mut all_words = Vec::with_capacity(self.word_count as usize);
        let mut chars = String::new();
        for &root_index in &self.roots {
            if root_index == INVALID_NODE_INDEX {
                continue;
            }
            self.dump_from(&mut all_words, &mut chars, root_index);
            chars.clear();
        }
        all_words
    }

    fn dump_from(&self, all_words: &mut Vec<String>, chars: &mut String, node_index: i32) {
        let node = &self.nodes[node_index as usize];
        chars.push(node.letter.to_char());

        if node.completed_word_index != INVALID_NODE_INDEX {
            all_words.push(chars.clone());
        }

        for letter in node.child_letters.iter() {
            self.dump_from(all_words, chars, node.children[letter.as_usize()]);
        }

        chars.pop();
    }

    /// Estimate of the memory held by the arena.
    pub fn estimate_memory_used(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.nodes.capacity() * std::mem::size_of::<ExpandedNode>()
    }
}
