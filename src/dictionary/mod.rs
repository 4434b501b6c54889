// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Word store: the canonical list of legal words.
//!
//! Words live in a single packed string pool with NUL terminators;
//! fixed-size [`WordRecord`]s index into the pool in the same
//! lexicographic order as the caller-supplied input. The store has no
//! trie awareness; the tries are built *from* it.
//!
//! # Input contract
//!
//! The caller supplies words pre-sorted ascending and deduplicated.
//! Violating that fails construction. Individual words that are too
//! short, too long, or contain non-letter characters are skipped with a
//! logged warning; the store keeps every word that passed validation.

pub mod word;

pub use word::WordRecord;

use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::blob::{read_header, read_u16, read_u32, signature, write_u16, write_u32};
use crate::error::{BoggleError, DictionaryError};
use crate::letters::{Letter, LetterSet, ALPHABET_SIZE};

/// Words shorter than this are rejected.
pub const SHORTEST_ACCEPTABLE_WORD_LENGTH: usize = 3;
/// Words longer than this are rejected.
pub const LONGEST_ACCEPTABLE_WORD_LENGTH: usize = 127;

const DICTIONARY_BLOB_SIGNATURE: u32 = signature(b"dict");
const DICTIONARY_BLOB_VERSION: u32 = 1;

/// Shortest and longest accepted word length among words starting with
/// one particular letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootLetterWordLengths {
    pub shortest: u16,
    pub longest: u16,
}

impl Default for RootLetterWordLengths {
    fn default() -> Self {
        // shortest saturates downward from MAX; longest upward from 0
        Self {
            shortest: u16::MAX,
            longest: 0,
        }
    }
}

impl RootLetterWordLengths {
    /// Whether any accepted word starts with this letter.
    pub fn has_words(&self) -> bool {
        self.longest > 0
    }
}

/// The canonical store of legal words.
#[derive(Debug, Default)]
pub struct Dictionary {
    shortest_word_length: u16,
    longest_word_length: u16,
    average_word_length: u32,
    string_pool: Vec<u8>,
    words: Vec<WordRecord>,
    root_letter_lengths: [RootLetterWordLengths; ALPHABET_SIZE],
}

impl Dictionary {
    /// Build a dictionary from an alphabetically sorted, deduplicated
    /// word list.
    ///
    /// Words failing length or character validation are skipped (with a
    /// warning); an out-of-order or duplicate word fails the whole build.
    pub fn from_sorted_words<S: AsRef<str>>(all_words: &[S]) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::default();
        dictionary.set_legal_words(all_words)?;
        Ok(dictionary)
    }

    fn set_legal_words<S: AsRef<str>>(&mut self, all_words: &[S]) -> Result<(), DictionaryError> {
        let pool_size: usize = all_words.iter().map(|w| w.as_ref().len() + 1).sum();
        self.string_pool.reserve(pool_size);
        self.words.reserve(all_words.len());

        self.shortest_word_length = LONGEST_ACCEPTABLE_WORD_LENGTH as u16;
        self.longest_word_length = 0;

        let mut length_sum: u64 = 0;
        let mut previous_word: Option<&str> = None;
        for word in all_words {
            let word = word.as_ref();
            if let Some(previous) = previous_word {
                if word <= previous {
                    // abandon the half-built store entirely
                    *self = Self::default();
                    return Err(DictionaryError::NotSorted {
                        previous: previous.to_string(),
                        current: word.to_string(),
                    });
                }
            }
            previous_word = Some(word);

            if self.add_word(word) {
                length_sum += word.len() as u64;
            }
        }

        if self.words.is_empty() {
            self.shortest_word_length = 0;
        } else {
            self.average_word_length = (length_sum / self.words.len() as u64) as u32;
        }

        debug!(
            word_count = self.words.len(),
            pool_bytes = self.string_pool.len(),
            average_word_length = self.average_word_length,
            "dictionary built"
        );

        Ok(())
    }

    /// Validate one word and append it to the pool and record array.
    ///
    /// Returns false (leaving the pool untouched) when the word is
    /// rejected.
    fn add_word(&mut self, word: &str) -> bool {
        let word_length = word.len();
        if word_length < SHORTEST_ACCEPTABLE_WORD_LENGTH {
            warn!(word, "skipping legal word shorter than the accepted word length");
            return false;
        }
        if word_length > LONGEST_ACCEPTABLE_WORD_LENGTH {
            warn!(word, "skipping legal word longer than the accepted word length");
            return false;
        }

        let pool_offset = self.string_pool.len();
        let mut previous_char: Option<char> = None;
        let mut first_letter: Option<Letter> = None;
        let mut contains_qu = false;
        let mut length_with_qu_as_one = 0usize;
        let mut letters = LetterSet::empty();

        for current_char in word.chars() {
            let Some(letter) = Letter::from_char(current_char) else {
                // undo the bytes already committed to the pool
                self.string_pool.truncate(pool_offset);
                warn!(word, "skipping legal word with an invalid character");
                return false;
            };

            let current_char = current_char.to_ascii_lowercase();
            self.string_pool.push(current_char as u8);
            first_letter.get_or_insert(letter);
            length_with_qu_as_one += 1;

            if current_char == 'u' && previous_char == Some('q') {
                // always >= 1 here, the 'q' already counted
                length_with_qu_as_one -= 1;
                contains_qu = true;
            } else {
                letters.insert(letter);
            }

            previous_char = Some(current_char);
        }

        // the length check above guarantees at least one letter was seen
        let Some(first_letter) = first_letter else {
            self.string_pool.truncate(pool_offset);
            return false;
        };

        self.string_pool.push(b'\0');

        self.words.push(WordRecord::new(
            word_length,
            length_with_qu_as_one,
            pool_offset as u32,
            contains_qu,
            letters,
        ));

        let lengths = &mut self.root_letter_lengths[first_letter.as_usize()];
        lengths.shortest = lengths.shortest.min(word_length as u16);
        lengths.longest = lengths.longest.max(word_length as u16);

        self.shortest_word_length = self.shortest_word_length.min(lengths.shortest);
        self.longest_word_length = self.longest_word_length.max(lengths.longest);

        true
    }

    /// Number of stored words.
    pub fn word_count(&self) -> u32 {
        self.words.len() as u32
    }

    /// Look up a word record by its (lexicographic) index.
    pub fn word(&self, word_index: usize) -> Option<&WordRecord> {
        self.words.get(word_index)
    }

    /// Iterate over all word records in lexicographic order.
    pub fn words(&self) -> impl Iterator<Item = &WordRecord> {
        self.words.iter()
    }

    /// Get the string for a word record from the pool.
    pub fn word_string(&self, record: &WordRecord) -> &str {
        let start = record.pool_offset() as usize;
        let bytes = &self.string_pool[start..start + record.length()];
        std::str::from_utf8(bytes).expect("string pool holds validated ASCII")
    }

    /// Shortest accepted word length across the whole store.
    pub fn shortest_word_length(&self) -> u32 {
        self.shortest_word_length as u32
    }

    /// Longest accepted word length across the whole store.
    pub fn longest_word_length(&self) -> u32 {
        self.longest_word_length as u32
    }

    /// Mean accepted word length, truncated to whole characters.
    pub fn average_word_length(&self) -> u32 {
        self.average_word_length
    }

    /// Length bounds for words starting with the given letter.
    pub fn root_letter_lengths(&self, letter: Letter) -> RootLetterWordLengths {
        self.root_letter_lengths[letter.as_usize()]
    }

    /// Estimate of the heap plus inline memory held by the store.
    pub fn estimate_memory_used(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.string_pool.capacity()
            + self.words.capacity() * std::mem::size_of::<WordRecord>()
    }

    /// Write the dictionary blob: signature/version, length summary,
    /// string pool, word records, per-root-letter length table.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BoggleError> {
        write_u32(writer, DICTIONARY_BLOB_SIGNATURE)?;
        write_u32(writer, DICTIONARY_BLOB_VERSION)?;

        write_u16(writer, self.shortest_word_length)?;
        write_u16(writer, self.longest_word_length)?;
        write_u32(writer, self.average_word_length)?;

        write_u32(writer, self.string_pool.len() as u32)?;
        writer.write_all(&self.string_pool)?;

        write_u32(writer, self.words.len() as u32)?;
        for word in &self.words {
            word.write_to(writer)?;
        }

        for lengths in &self.root_letter_lengths {
            write_u16(writer, lengths.shortest)?;
            write_u16(writer, lengths.longest)?;
        }

        Ok(())
    }

    /// Read a dictionary blob, rejecting signature/version mismatches.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, BoggleError> {
        read_header(
            reader,
            DICTIONARY_BLOB_SIGNATURE,
            DICTIONARY_BLOB_VERSION,
            "dictionary",
        )?;

        let mut dictionary = Self {
            shortest_word_length: read_u16(reader)?,
            longest_word_length: read_u16(reader)?,
            average_word_length: read_u32(reader)?,
            ..Self::default()
        };

        let pool_size = read_u32(reader)? as usize;
        dictionary.string_pool = vec![0u8; pool_size];
        reader.read_exact(&mut dictionary.string_pool)?;

        let word_count = read_u32(reader)? as usize;
        dictionary.words = Vec::with_capacity(word_count);
        for _ in 0..word_count {
            dictionary.words.push(WordRecord::read_from(reader)?);
        }

        for lengths in dictionary.root_letter_lengths.iter_mut() {
            lengths.shortest = read_u16(reader)?;
            lengths.longest = read_u16(reader)?;
        }

        Ok(dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(ch: char) -> Letter {
        Letter::from_char(ch).unwrap()
    }

    #[test]
    fn test_basic_build() {
        let dictionary =
            Dictionary::from_sorted_words(&["car", "cat", "cats", "dog"]).unwrap();

        assert_eq!(dictionary.word_count(), 4);
        assert_eq!(dictionary.shortest_word_length(), 3);
        assert_eq!(dictionary.longest_word_length(), 4);
        assert_eq!(dictionary.average_word_length(), 3);

        let cat = dictionary.word(1).unwrap();
        assert_eq!(dictionary.word_string(cat), "cat");
        assert_eq!(cat.length(), 3);
        assert!(!cat.contains_qu());
    }

    #[test]
    fn test_words_keep_input_order() {
        let words = ["ant", "bee", "cow"];
        let dictionary = Dictionary::from_sorted_words(&words).unwrap();
        let stored: Vec<&str> = dictionary
            .words()
            .map(|w| dictionary.word_string(w))
            .collect();
        assert_eq!(stored, words);
    }

    #[test]
    fn test_unsorted_input_fails() {
        let result = Dictionary::from_sorted_words(&["cat", "car"]);
        assert!(matches!(result, Err(DictionaryError::NotSorted { .. })));
    }

    #[test]
    fn test_duplicate_input_fails() {
        let result = Dictionary::from_sorted_words(&["cat", "cat"]);
        assert!(matches!(result, Err(DictionaryError::NotSorted { .. })));
    }

    #[test]
    fn test_invalid_words_are_skipped() {
        let dictionary =
            Dictionary::from_sorted_words(&["ab", "bad-word", "cat"]).unwrap();

        // "ab" too short, "bad-word" has a non-letter
        assert_eq!(dictionary.word_count(), 1);
        assert_eq!(dictionary.word_string(dictionary.word(0).unwrap()), "cat");
    }

    #[test]
    fn test_rejected_word_leaves_no_pool_bytes() {
        let dictionary = Dictionary::from_sorted_words(&["b-d", "cat"]).unwrap();
        // the rejected word's committed prefix byte was truncated back out
        assert_eq!(dictionary.string_pool, b"cat\0");
    }

    #[test]
    fn test_too_long_word_is_skipped() {
        let long_word = "z".repeat(LONGEST_ACCEPTABLE_WORD_LENGTH + 1);
        let dictionary = Dictionary::from_sorted_words(&["cat".to_string(), long_word]).unwrap();
        assert_eq!(dictionary.word_count(), 1);
    }

    #[test]
    fn test_mixed_case_is_lowercased() {
        let dictionary = Dictionary::from_sorted_words(&["CaT"]).unwrap();
        assert_eq!(dictionary.word_string(dictionary.word(0).unwrap()), "cat");
    }

    #[test]
    fn test_qu_accounting() {
        let dictionary = Dictionary::from_sorted_words(&["queen", "quiz", "umbra"]).unwrap();

        let queen = dictionary.word(0).unwrap();
        assert!(queen.contains_qu());
        assert_eq!(queen.length(), 5);
        assert_eq!(queen.length_with_qu_as_one(), 4);
        // the ligature 'u' stays out of the letter mask
        assert!(!queen.letters().contains(Letter::U));
        assert!(queen.letters().contains(Letter::Q));

        let umbra = dictionary.word(2).unwrap();
        assert!(!umbra.contains_qu());
        assert!(umbra.letters().contains(Letter::U));
    }

    #[test]
    fn test_root_letter_lengths() {
        let dictionary =
            Dictionary::from_sorted_words(&["cat", "cattle", "dog"]).unwrap();

        let c_lengths = dictionary.root_letter_lengths(letter('c'));
        assert!(c_lengths.has_words());
        assert_eq!(c_lengths.shortest, 3);
        assert_eq!(c_lengths.longest, 6);

        assert!(!dictionary.root_letter_lengths(letter('z')).has_words());
    }

    #[test]
    fn test_empty_input() {
        let dictionary = Dictionary::from_sorted_words::<&str>(&[]).unwrap();
        assert_eq!(dictionary.word_count(), 0);
        assert_eq!(dictionary.shortest_word_length(), 0);
        assert_eq!(dictionary.longest_word_length(), 0);
    }

    #[test]
    fn test_blob_round_trip() {
        let dictionary =
            Dictionary::from_sorted_words(&["cat", "cats", "queen"]).unwrap();

        let mut blob = Vec::new();
        dictionary.write_to(&mut blob).unwrap();

        let loaded = Dictionary::read_from(&mut blob.as_slice()).unwrap();
        assert_eq!(loaded.word_count(), 3);
        assert_eq!(loaded.shortest_word_length(), 3);
        assert_eq!(loaded.longest_word_length(), 5);
        let words: Vec<&str> = loaded.words().map(|w| loaded.word_string(w)).collect();
        assert_eq!(words, vec!["cat", "cats", "queen"]);
        assert_eq!(
            loaded.root_letter_lengths(letter('c')),
            dictionary.root_letter_lengths(letter('c'))
        );
    }

    #[test]
    fn test_blob_rejects_corrupt_signature() {
        let dictionary = Dictionary::from_sorted_words(&["cat"]).unwrap();
        let mut blob = Vec::new();
        dictionary.write_to(&mut blob).unwrap();
        blob[0] ^= 0xFF;

        assert!(matches!(
            Dictionary::read_from(&mut blob.as_slice()),
            Err(BoggleError::HeaderMismatch { .. })
        ));
    }
}
