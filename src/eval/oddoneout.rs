//! Odd-One-Out accuracy.
//!
//! For each category, sample groups of `k_in` member words plus one planted
//! out-word from the model vocabulary, then ask the model which word of the
//! group does not belong. The score is the fraction of comparisons where the
//! model picks the planted word. Sampling is driven by a seeded RNG, so a
//! run is fully reproducible from its options.

use crate::categories::CategorySet;
use crate::error::{EmbevalError, Result};
use crate::eval::{audit_vocabulary, log_audit, overall_accuracy, EvalReport};
use crate::vectors::WordVectors;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::path::Path;

/// Options for [`odd_one_out`].
#[derive(Debug, Clone)]
pub struct OddOneOutOptions {
    /// Size of the in-group drawn from one category.
    pub k_in: usize,
    /// Number of comparisons evaluated per category.
    pub sample_size: usize,
    /// Draw out-words only from the first `restrict_vocab` vocabulary
    /// entries (a frequency cut for word2vec-ordered models).
    pub restrict_vocab: Option<usize>,
    /// Allow out-of-vocabulary test words. Comparisons touching one are
    /// ignored, which marks them wrong; when false, an OOV word is an error.
    pub allow_oov: bool,
    /// RNG seed; identical options replay identical samples.
    pub seed: u64,
}

impl Default for OddOneOutOptions {
    fn default() -> Self {
        Self {
            k_in: 3,
            sample_size: 1000,
            restrict_vocab: None,
            allow_oov: false,
            seed: 0,
        }
    }
}

/// Run the Odd-One-Out evaluation of `model` on the category file at
/// `cat_file`.
pub fn odd_one_out(
    cat_file: impl AsRef<Path>,
    model: &(impl WordVectors + ?Sized),
    opts: &OddOneOutOptions,
) -> Result<EvalReport> {
    if opts.k_in == 0 {
        return Err(EmbevalError::InvalidInput(
            "k_in must be greater than 0".to_string(),
        ));
    }
    if opts.sample_size == 0 {
        return Err(EmbevalError::InvalidInput(
            "sample_size must be greater than 0".to_string(),
        ));
    }

    let set = CategorySet::from_path(cat_file, opts.k_in)?;
    let audit = audit_vocabulary(&set, model, opts.allow_oov)?;

    log::info!(
        "computing the {}th-order odd-one-out score for {} categories",
        opts.k_in,
        set.len()
    );
    log_audit(&set, &audit);

    let vocab = model.vocab();
    let pool_len = opts
        .restrict_vocab
        .map(|r| r.min(vocab.len()))
        .unwrap_or(vocab.len());
    let pool = &vocab[..pool_len];
    if pool.is_empty() {
        return Err(EmbevalError::InvalidInput(
            "vocabulary restriction leaves no words to sample out-words from".to_string(),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);
    let mut category_accuracy = HashMap::new();
    let mut category_raw = HashMap::new();
    let mut raw_correct = 0usize;

    for cat in &set {
        let combos = combinations(&cat.words, opts.k_in);
        let sampled: Vec<&Vec<&str>> = (0..opts.sample_size)
            .map(|_| &combos[rng.gen_range(0..combos.len())])
            .collect();

        if pool.iter().all(|w| cat.words.contains(w)) {
            return Err(EmbevalError::InvalidInput(format!(
                "no out-of-category words to sample for {}",
                cat.label
            )));
        }
        let mut out_words: Vec<&str> = Vec::with_capacity(opts.sample_size);
        while out_words.len() < opts.sample_size {
            let word = &pool[rng.gen_range(0..pool.len())];
            if !cat.words.contains(word) {
                out_words.push(word.as_str());
            }
        }

        let mut score = 0usize;
        for (combo, out) in sampled.iter().zip(&out_words) {
            let comparison: Vec<&str> = combo
                .iter()
                .copied()
                .chain(std::iter::once(*out))
                .collect();
            // An ignored comparison still counts against sample_size.
            let ignore = opts.allow_oov && comparison.iter().any(|w| audit.oov.contains(*w));
            if ignore {
                continue;
            }
            let predicted = model.doesnt_match(&comparison)?;
            log::debug!(
                "comparison {:?}: predicted {:?}, planted {:?}",
                comparison,
                predicted,
                out
            );
            if predicted == *out {
                score += 1;
            }
        }

        category_accuracy.insert(cat.label.clone(), score as f32 / opts.sample_size as f32);
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

/// All `k`-element combinations of `words`, in lexicographic index order.
fn combinations<'a>(words: &'a [String], k: usize) -> Vec<Vec<&'a str>> {
    let n = words.len();
    if k == 0 || k > n {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..k).collect();
    let mut out = Vec::new();
    loop {
        out.push(indices.iter().map(|&i| words[i].as_str()).collect());
        // advance to the next combination, rightmost index first
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::KeyedVectors;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clustered_model() -> KeyedVectors {
        KeyedVectors::from_pairs([
            ("cat".to_string(), vec![1.0, 0.0]),
            ("dog".to_string(), vec![0.99, 0.1]),
            ("wolf".to_string(), vec![0.97, 0.2]),
            ("red".to_string(), vec![0.0, 1.0]),
        ])
        .unwrap()
    }

    fn cat_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn opts(sample_size: usize) -> OddOneOutOptions {
        OddOneOutOptions {
            k_in: 2,
            sample_size,
            ..OddOneOutOptions::default()
        }
    }

    #[test]
    fn planted_out_word_is_always_found_in_clean_clusters() {
        // Out-words are never category members, so every comparison pits two
        // animals against "red", which the model spots every time.
        let file = cat_file(":animals\ncat dog wolf\n");
        let report = odd_one_out(file.path(), &clustered_model(), &opts(200)).unwrap();
        assert_relative_eq!(report.accuracy, 1.0);
        assert_eq!(report.raw_correct, 200);
    }

    #[test]
    fn same_seed_replays_the_same_samples() {
        let file = cat_file(":animals\ncat dog wolf\n:pair\ncat red\n");
        let a = odd_one_out(file.path(), &clustered_model(), &opts(100)).unwrap();
        let b = odd_one_out(file.path(), &clustered_model(), &opts(100)).unwrap();
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.raw_correct, b.raw_correct);
        assert_eq!(a.category_accuracy, b.category_accuracy);
        assert_eq!(a.category_raw, b.category_raw);
    }

    #[test]
    fn short_categories_are_skipped() {
        let file = cat_file(":animals\ncat dog wolf\n:single\nred\n");
        let report = odd_one_out(file.path(), &clustered_model(), &opts(50)).unwrap();
        assert_eq!(report.skipped, vec![":single".to_string()]);
        assert!(!report.category_accuracy.contains_key(":single"));
    }

    #[test]
    fn oov_word_errors_by_default() {
        let file = cat_file(":animals\ncat dog zebra\n");
        let err = odd_one_out(file.path(), &clustered_model(), &opts(50)).unwrap_err();
        assert_eq!(err.to_string(), "word zebra is not in vocabulary");
    }

    #[test]
    fn comparisons_touching_oov_words_count_as_wrong() {
        let file = cat_file(":animals\ncat dog zebra\n");
        let options = OddOneOutOptions {
            allow_oov: true,
            ..opts(300)
        };
        let report = odd_one_out(file.path(), &clustered_model(), &options).unwrap();
        // Two of the three 2-combinations contain the OOV word and are
        // ignored; only (cat, dog) comparisons can score.
        assert!(report.accuracy > 0.2 && report.accuracy < 0.5);
        assert!(report.audit.oov.contains("zebra"));
    }

    #[test]
    fn restrict_vocab_with_no_out_words_is_an_error() {
        // The first two vocabulary entries are both category members.
        let file = cat_file(":animals\ncat dog\n");
        let options = OddOneOutOptions {
            restrict_vocab: Some(2),
            ..opts(50)
        };
        let err = odd_one_out(file.path(), &clustered_model(), &options).unwrap_err();
        assert!(matches!(err, EmbevalError::InvalidInput(_)));
    }

    #[test]
    fn zero_sample_size_is_invalid() {
        let file = cat_file(":animals\ncat dog\n");
        let err = odd_one_out(file.path(), &clustered_model(), &opts(0)).unwrap_err();
        assert!(matches!(err, EmbevalError::InvalidInput(_)));
    }

    #[test]
    fn accuracy_stays_in_unit_interval() {
        let file = cat_file(":animals\ncat dog wolf\n:pair\ncat red\n");
        let report = odd_one_out(file.path(), &clustered_model(), &opts(100)).unwrap();
        assert!(report.accuracy >= 0.0 && report.accuracy <= 1.0);
        for acc in report.category_accuracy.values() {
            assert!(*acc >= 0.0 && *acc <= 1.0);
        }
    }

    #[test]
    fn combinations_enumerates_all_k_subsets() {
        let words: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let combos = combinations(&words, 2);
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0], vec!["a", "b"]);
        assert_eq!(combos[5], vec!["c", "d"]);
    }

    #[test]
    fn combinations_edge_cases() {
        let words: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(combinations(&words, 2).len(), 1);
        assert!(combinations(&words, 3).is_empty());
        assert!(combinations(&words, 0).is_empty());
    }
}
