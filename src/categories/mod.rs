//! Category test-set files: parsing and in-memory representation.
//!
//! A test-set file is plain UTF-8 text. Lines starting with `:` are category
//! headers; each following line is a whitespace-separated list of member
//! words for the most recent header. A word line with fewer than `min_words`
//! tokens marks the current category as skipped instead of keeping it.

use crate::error::{EmbevalError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A labeled word category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Header line, including the leading `:`.
    pub label: String,
    /// Member words in file order.
    pub words: Vec<String>,
}

/// A parsed category file: kept categories in file order plus the labels
/// that were skipped for having too few words.
#[derive(Debug, Clone, Default)]
pub struct CategorySet {
    categories: Vec<Category>,
    skipped: Vec<String>,
}

impl CategorySet {
    /// Parse a category file. Categories whose word line has fewer than
    /// `min_words` tokens are recorded as skipped.
    pub fn from_path(path: impl AsRef<Path>, min_words: usize) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), min_words)
    }

    /// Parse category data from any reader. See [`CategorySet::from_path`].
    pub fn from_reader(reader: impl Read, min_words: usize) -> Result<Self> {
        let mut categories: Vec<Category> = Vec::new();
        let mut skipped = Vec::new();
        let mut current: Option<String> = None;

        for line in BufReader::new(reader).lines() {
            let line = line?;
            if line.starts_with(':') {
                current = Some(line.trim_end().to_string());
                continue;
            }
            let words: Vec<String> = line.split_whitespace().map(String::from).collect();
            let label = match &current {
                Some(label) => label.clone(),
                // Tolerate blank leading lines; anything else is malformed.
                None if words.is_empty() => continue,
                None => {
                    return Err(EmbevalError::CategoryFile(
                        "word list before any category header".to_string(),
                    ))
                }
            };
            if words.len() < min_words {
                skipped.push(label);
            } else if let Some(cat) = categories.iter_mut().find(|c| c.label == label) {
                // A later qualifying line under the same header replaces the
                // earlier word list.
                cat.words = words;
            } else {
                categories.push(Category { label, words });
            }
        }

        Ok(Self { categories, skipped })
    }

    /// Kept categories in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Number of kept categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True if no category was kept.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Labels skipped for having fewer than `min_words` members.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Total number of member words across kept categories.
    pub fn word_count(&self) -> usize {
        self.categories.iter().map(|c| c.words.len()).sum()
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
