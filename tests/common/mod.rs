// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

use boggle_solver::Boggle;

/// Route solver tracing through the test harness; enable with
/// `RUST_LOG=debug cargo test`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sort and deduplicate a word list the way the public API requires.
pub fn sorted_unique(words: &[&str]) -> Vec<String> {
    let mut sorted: Vec<String> = words.iter().map(|word| word.to_string()).collect();
    sorted.sort();
    sorted.dedup();
    sorted
}

/// A session preloaded with the given (unsorted is fine) word list.
pub fn boggle_with_words(words: &[&str]) -> Boggle {
    let mut boggle = Boggle::new();
    boggle
        .set_legal_words(&sorted_unique(words))
        .expect("test word list must build");
    boggle
}
