//! Intrinsic evaluation of word-embedding models: Top-k similarity accuracy
//! and Odd-One-Out accuracy.

pub mod oddoneout;
pub mod topk;

pub use oddoneout::{odd_one_out, OddOneOutOptions};
pub use topk::{topk, TopkOptions};

use crate::categories::CategorySet;
use crate::error::{EmbevalError, Result};
use crate::vectors::WordVectors;
use std::collections::{HashMap, HashSet};

/// Out-of-vocabulary bookkeeping shared by both metrics.
#[derive(Debug, Clone, Default)]
pub struct OovAudit {
    /// Words absent from the vocabulary; their comparisons are marked wrong.
    pub oov: HashSet<String>,
    /// Words absent from the vocabulary but synthesized from subword
    /// n-grams by the backend; these are still evaluated.
    pub subword_oov: HashSet<String>,
    /// Total number of member words across kept categories.
    pub words_in_test: usize,
}

impl OovAudit {
    /// Fraction of test words that are out of vocabulary.
    pub fn ratio(&self) -> f32 {
        if self.words_in_test == 0 {
            0.0
        } else {
            self.oov.len() as f32 / self.words_in_test as f32
        }
    }
}

/// Outcome of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Mean of per-category accuracies, in [0, 1].
    pub accuracy: f32,
    /// Accuracy per category label.
    pub category_accuracy: HashMap<String, f32>,
    /// Labels skipped for having too few words.
    pub skipped: Vec<String>,
    /// Total number of correct comparisons.
    pub raw_correct: usize,
    /// Correct-comparison count per category label.
    pub category_raw: HashMap<String, usize>,
    /// OOV bookkeeping for the run.
    pub audit: OovAudit,
}

/// Walk every word of every kept category, recording OOV words.
///
/// Strict backends either error (`allow_oov = false`) or collect missing
/// words into `oov`; subword-synthesizing backends collect them into
/// `subword_oov` instead and keep evaluating them.
pub(crate) fn audit_vocabulary(
    set: &CategorySet,
    model: &(impl WordVectors + ?Sized),
    allow_oov: bool,
) -> Result<OovAudit> {
    let mut audit = OovAudit::default();
    if model.synthesizes_oov() {
        log::info!("backend synthesizes OOV vectors from subword n-grams");
    }
    for cat in set {
        for word in &cat.words {
            audit.words_in_test += 1;
            if model.contains(word) {
                continue;
            }
            if model.synthesizes_oov() {
                audit.subword_oov.insert(word.clone());
            } else if allow_oov {
                audit.oov.insert(word.clone());
            } else {
                return Err(EmbevalError::Vocab(word.clone()));
            }
        }
    }
    Ok(audit)
}

/// Log the test-set summary both metrics report before scoring.
pub(crate) fn log_audit(set: &CategorySet, audit: &OovAudit) {
    log::info!(
        "{} categories do not have enough words and will be skipped",
        set.skipped().len()
    );
    log::info!("{} words are out of vocabulary", audit.oov.len());
    if !audit.subword_oov.is_empty() {
        log::info!(
            "{} words are OOV but will be constructed from subword n-grams",
            audit.subword_oov.len()
        );
    }
    log::info!("{} total words in test set", audit.words_in_test);
    log::info!("out-of-vocabulary ratio is {:.2}", audit.ratio());
}

/// Mean of per-category accuracies; 0.0 (with a warning) when no category
/// survived parsing.
pub(crate) fn overall_accuracy(category_accuracy: &HashMap<String, f32>) -> f32 {
    if category_accuracy.is_empty() {
        log::warn!("no categories were evaluated, reporting accuracy 0.0");
        return 0.0;
    }
    category_accuracy.values().sum::<f32>() / category_accuracy.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::{KeyedVectors, Neighbor};
    use std::io::Cursor;

    fn model() -> KeyedVectors {
        KeyedVectors::from_pairs([
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![0.0, 1.0]),
        ])
        .unwrap()
    }

    fn set(data: &str) -> CategorySet {
        CategorySet::from_reader(Cursor::new(data.to_string()), 2).unwrap()
    }

    #[test]
    fn audit_counts_words_and_flags_oov() {
        let set = set(":x\na b missing\n");
        let audit = audit_vocabulary(&set, &model(), true).unwrap();
        assert_eq!(audit.words_in_test, 3);
        assert!(audit.oov.contains("missing"));
        assert_eq!(audit.oov.len(), 1);
        assert!((audit.ratio() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn audit_errors_on_oov_when_disallowed() {
        let set = set(":x\na b missing\n");
        let err = audit_vocabulary(&set, &model(), false).unwrap_err();
        assert_eq!(err.to_string(), "word missing is not in vocabulary");
    }

    #[test]
    fn subword_backend_collects_oov_separately() {
        struct Subword(KeyedVectors);
        impl WordVectors for Subword {
            fn contains(&self, word: &str) -> bool {
                self.0.contains(word)
            }
            fn vocab(&self) -> &[String] {
                self.0.vocab()
            }
            fn most_similar(&self, word: &str, k: usize) -> crate::error::Result<Vec<Neighbor>> {
                self.0.most_similar(word, k)
            }
            fn doesnt_match(&self, words: &[&str]) -> crate::error::Result<String> {
                self.0.doesnt_match(words)
            }
            fn synthesizes_oov(&self) -> bool {
                true
            }
        }

        let set = set(":x\na b missing\n");
        // allow_oov is irrelevant for subword backends
        let audit = audit_vocabulary(&set, &Subword(model()), false).unwrap();
        assert!(audit.oov.is_empty());
        assert!(audit.subword_oov.contains("missing"));
    }

    #[test]
    fn overall_accuracy_is_mean_of_categories() {
        let mut acc = HashMap::new();
        acc.insert(":x".to_string(), 1.0);
        acc.insert(":y".to_string(), 0.5);
        assert!((overall_accuracy(&acc) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn overall_accuracy_empty_is_zero() {
        assert_eq!(overall_accuracy(&HashMap::new()), 0.0);
    }
}
