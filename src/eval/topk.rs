//! Top-k similarity accuracy.
//!
//! For every word of a category, ask the model for its k nearest neighbors
//! and count how many of them belong to the same category. A category of n
//! words can score at most n * k, which normalizes its accuracy to [0, 1].

use crate::categories::CategorySet;
use crate::error::{EmbevalError, Result};
use crate::eval::{audit_vocabulary, log_audit, overall_accuracy, EvalReport};
use crate::vectors::WordVectors;
use std::collections::HashMap;
use std::path::Path;

/// Minimum members for a category to support top-k comparisons.
const MIN_WORDS: usize = 2;

/// Options for [`topk`].
#[derive(Debug, Clone)]
pub struct TopkOptions {
    /// Number of neighbors to request per word.
    pub k: usize,
    /// Allow out-of-vocabulary test words. Their comparisons are marked
    /// wrong; when false, an OOV word is an error.
    pub allow_oov: bool,
}

impl Default for TopkOptions {
    fn default() -> Self {
        Self {
            k: 3,
            allow_oov: false,
        }
    }
}

/// Run the Top-k evaluation of `model` on the category file at `cat_file`.
pub fn topk(
    cat_file: impl AsRef<Path>,
    model: &(impl WordVectors + ?Sized),
    opts: &TopkOptions,
) -> Result<EvalReport> {
    if opts.k == 0 {
        return Err(EmbevalError::InvalidInput(
            "k must be greater than 0".to_string(),
        ));
    }

    let set = CategorySet::from_path(cat_file, MIN_WORDS)?;
    let audit = audit_vocabulary(&set, model, opts.allow_oov)?;

    log::info!("performing top-{} evaluation on {} categories", opts.k, set.len());
    log_audit(&set, &audit);

    let mut category_accuracy = HashMap::new();
    let mut category_raw = HashMap::new();
    let mut raw_correct = 0usize;

    for cat in &set {
        let n = cat.words.len();
        let mut score = 0usize;
        for word in &cat.words {
            // OOV comparisons count against the denominator but score 0.
            if audit.oov.contains(word) {
                continue;
            }
            let neighbors = model.most_similar(word, opts.k)?;
            score += neighbors
                .iter()
                .filter(|nb| cat.words.iter().any(|w| *w == nb.word))
                .count();
        }
        category_accuracy.insert(cat.label.clone(), score as f32 / (n * opts.k) as f32);
        category_raw.insert(cat.label.clone(), score);
        raw_correct += score;
    }

    let accuracy = overall_accuracy(&category_accuracy);
    Ok(EvalReport {
        accuracy,
        category_accuracy,
        skipped: set.skipped().to_vec(),
        raw_correct,
        category_raw,
        audit,
    })
}
