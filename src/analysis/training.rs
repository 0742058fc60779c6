// Training feedback loop: promote user-selected words into a sentiment
// lexicon, then re-run the batch so results reflect the change. The lexicon
// sits behind a mutex under a single-writer discipline: mutations only
// happen between batch runs, and every run works on a snapshot.
use parking_lot::Mutex;
use std::collections::BTreeSet;

use super::batch::{analyze, AnalysisResult, Backend, BatchOptions};
use super::lexicon::{Lexicon, Polarity};

/// Process-wide owner of the mutable lexicon.
pub struct SharedLexicon {
    inner: Mutex<Lexicon>,
}

impl SharedLexicon {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            inner: Mutex::new(lexicon),
        }
    }

    /// Clone of the current state; classification runs against snapshots so
    /// a batch never observes a mid-run mutation.
    pub fn snapshot(&self) -> Lexicon {
        self.inner.lock().clone()
    }

    pub fn add_words(&self, words: &BTreeSet<String>, target: Polarity) -> usize {
        self.inner
            .lock()
            .add_words(words.iter().map(|w| w.as_str()), target)
    }
}

impl Default for SharedLexicon {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

#[derive(Debug)]
pub struct FeedbackOutcome {
    /// Words actually inserted (selection minus already-known words).
    pub added: usize,
    pub result: AnalysisResult,
}

/// Apply one round of user feedback: insert the selected words into the
/// chosen lexicon, clear the selection, and re-analyze the same texts.
/// There is no undo.
pub fn apply_feedback(
    store: &SharedLexicon,
    mut selection: BTreeSet<String>,
    target: Polarity,
    texts: &[String],
    backend: &Backend,
    options: &BatchOptions,
) -> FeedbackOutcome {
    let added = store.add_words(&selection, target);
    selection.clear();

    let lexicon = store.snapshot();
    let result = analyze(texts, &lexicon, backend, options);
    FeedbackOutcome { added, result }
}
