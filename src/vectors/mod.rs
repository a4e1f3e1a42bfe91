//! Word-vector backends and the query primitives the evaluators rely on.

pub mod keyed;

pub use keyed::KeyedVectors;

use crate::error::Result;

/// A scored neighbor returned by [`WordVectors::most_similar`].
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub word: String,
    /// Cosine similarity to the query word.
    pub score: f32,
}

/// Query primitives over a word-embedding model.
///
/// The evaluation metrics only need vocabulary membership, nearest-neighbor
/// ranking and odd-one-out selection, so any backend answering these can be
/// scored.
pub trait WordVectors {
    /// True if `word` has an index in the model vocabulary.
    fn contains(&self, word: &str) -> bool;

    /// Vocabulary in index order. word2vec files list words by descending
    /// corpus frequency, so a prefix of this slice is a frequency cut.
    fn vocab(&self) -> &[String];

    /// The `k` vocabulary entries most similar to `word` by cosine,
    /// excluding `word` itself, best first.
    fn most_similar(&self, word: &str, k: usize) -> Result<Vec<Neighbor>>;

    /// The entry of `words` least similar to the mean of their unit vectors.
    fn doesnt_match(&self, words: &[&str]) -> Result<String>;

    /// True if the backend can synthesize vectors for words outside its
    /// vocabulary (fastText-style character n-grams). Missing words are then
    /// audited separately and still evaluated.
    fn synthesizes_oov(&self) -> bool {
        false
    }
}
