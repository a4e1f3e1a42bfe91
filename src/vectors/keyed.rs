//! Dense in-memory word vectors loaded from word2vec text format.

use crate::error::{EmbevalError, Result};
use crate::vectors::{Neighbor, WordVectors};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A dense word-vector store keyed by word.
///
/// Rows are kept both raw and unit-normalized; similarity queries run on the
/// normalized rows so cosine reduces to a dot product.
#[derive(Debug)]
pub struct KeyedVectors {
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<f32>,
    unit: Vec<f32>,
    dim: usize,
}

impl KeyedVectors {
    /// Load vectors from word2vec text format: a `<count> <dim>` header line
    /// followed by one `word v1 .. vd` row per word.
    pub fn from_word2vec_text(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_word2vec_reader(BufReader::new(file))
    }

    /// Load word2vec text data from any reader. See
    /// [`KeyedVectors::from_word2vec_text`].
    pub fn from_word2vec_reader(reader: impl Read) -> Result<Self> {
        let mut lines = BufReader::new(reader).lines();

        let header = lines
            .next()
            .ok_or_else(|| EmbevalError::Vectors("empty vector file".to_string()))??;
        let mut parts = header.split_whitespace();
        let (count, dim) = match (parts.next(), parts.next(), parts.next()) {
            (Some(count), Some(dim), None) => {
                let count: usize = count.parse().map_err(|_| bad_header(&header))?;
                let dim: usize = dim.parse().map_err(|_| bad_header(&header))?;
                (count, dim)
            }
            _ => return Err(bad_header(&header)),
        };
        if dim == 0 {
            return Err(EmbevalError::Vectors("vector dimension is 0".to_string()));
        }

        let mut words = Vec::with_capacity(count);
        let mut index = HashMap::with_capacity(count);
        let mut vectors = Vec::with_capacity(count * dim);
        for (row, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let Some(word) = tokens.next().map(String::from) else {
                continue;
            };
            let mut values = Vec::with_capacity(dim);
            for token in tokens {
                let value: f32 = token.parse().map_err(|_| {
                    EmbevalError::Vectors(format!(
                        "row {}: non-numeric component {:?}",
                        row + 2,
                        token
                    ))
                })?;
                values.push(value);
            }
            if values.len() != dim {
                return Err(EmbevalError::Vectors(format!(
                    "row {}: expected {} components, got {}",
                    row + 2,
                    dim,
                    values.len()
                )));
            }
            if index.contains_key(&word) {
                log::warn!("duplicate word {:?} in vector file, keeping first", word);
                continue;
            }
            index.insert(word.clone(), words.len());
            words.push(word);
            vectors.extend_from_slice(&values);
        }

        if words.len() != count {
            log::warn!(
                "vector file header declares {} words but {} were read",
                count,
                words.len()
            );
        }
        if words.is_empty() {
            return Err(EmbevalError::Vectors("vector file has no rows".to_string()));
        }

        let unit = normalize_rows(&vectors, dim);
        Ok(Self {
            words,
            index,
            vectors,
            unit,
            dim,
        })
    }

    /// Build a store from `(word, vector)` pairs. All vectors must share one
    /// dimension; duplicate words keep the first occurrence.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Vec<f32>)>) -> Result<Self> {
        let mut words = Vec::new();
        let mut index = HashMap::new();
        let mut vectors = Vec::new();
        let mut dim = 0;

        for (word, values) in pairs {
            if dim == 0 {
                dim = values.len();
                if dim == 0 {
                    return Err(EmbevalError::Vectors("vector dimension is 0".to_string()));
                }
            }
            if values.len() != dim {
                return Err(EmbevalError::Vectors(format!(
                    "word {:?}: expected {} components, got {}",
                    word,
                    dim,
                    values.len()
                )));
            }
            if index.contains_key(&word) {
                log::warn!("duplicate word {:?}, keeping first", word);
                continue;
            }
            index.insert(word.clone(), words.len());
            words.push(word);
            vectors.extend_from_slice(&values);
        }

        if words.is_empty() {
            return Err(EmbevalError::Vectors("no vectors given".to_string()));
        }
        let unit = normalize_rows(&vectors, dim);
        Ok(Self {
            words,
            index,
            vectors,
            unit,
            dim,
        })
    }

    /// Vector dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the store holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Raw (un-normalized) vector for `word`.
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index
            .get(word)
            .map(|&i| &self.vectors[i * self.dim..(i + 1) * self.dim])
    }

    fn unit_row(&self, i: usize) -> &[f32] {
        &self.unit[i * self.dim..(i + 1) * self.dim]
    }

    fn unit_vector(&self, word: &str) -> Result<&[f32]> {
        self.index
            .get(word)
            .map(|&i| self.unit_row(i))
            .ok_or_else(|| EmbevalError::Vocab(word.to_string()))
    }
}

impl WordVectors for KeyedVectors {
    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    fn vocab(&self) -> &[String] {
        &self.words
    }

    fn most_similar(&self, word: &str, k: usize) -> Result<Vec<Neighbor>> {
        let query_idx = *self
            .index
            .get(word)
            .ok_or_else(|| EmbevalError::Vocab(word.to_string()))?;
        let query = self.unit_row(query_idx);

        let mut scored: Vec<(f32, usize)> = (0..self.words.len())
            .filter(|&i| i != query_idx)
            .map(|i| (dot(query, self.unit_row(i)), i))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, i)| Neighbor {
                word: self.words[i].clone(),
                score,
            })
            .collect())
    }

    fn doesnt_match(&self, words: &[&str]) -> Result<String> {
        if words.len() < 2 {
            return Err(EmbevalError::InvalidInput(
                "odd-one-out needs at least two words".to_string(),
            ));
        }
        let rows: Vec<&[f32]> = words
            .iter()
            .map(|w| self.unit_vector(w))
            .collect::<Result<_>>()?;

        let mut mean = vec![0.0f32; self.dim];
        for row in &rows {
            for (m, v) in mean.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        let norm = mean.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for m in mean.iter_mut() {
                *m /= norm;
            }
        }

        let mut odd = 0;
        let mut lowest = f32::INFINITY;
        for (i, row) in rows.iter().enumerate() {
            let score = dot(&mean, row);
            if score < lowest {
                lowest = score;
                odd = i;
            }
        }
        Ok(words[odd].to_string())
    }
}

fn bad_header(line: &str) -> EmbevalError {
    EmbevalError::Vectors(format!("malformed word2vec header line {:?}", line))
}

/// Unit-normalize each `dim`-wide row; zero rows are left as zeros.
fn normalize_rows(vectors: &[f32], dim: usize) -> Vec<f32> {
    let mut unit = Vec::with_capacity(vectors.len());
    for row in vectors.chunks(dim) {
        let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            unit.extend(row.iter().map(|x| x / norm));
        } else {
            unit.extend_from_slice(row);
        }
    }
    unit
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
