//! Category-file generation: one file per language, one category per item.

use crate::error::Result;
use crate::wikidata::client::WikidataClient;
use crate::wikidata::query::instance_of_query;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pause between queries; the public query service asks clients to stay
/// polite.
const QUERY_PAUSE: Duration = Duration::from_millis(100);

/// Output path for one language: `<stem>_<lang>.txt`.
pub fn testset_path(stem: impl AsRef<Path>, language: &str) -> PathBuf {
    let stem = stem.as_ref();
    let mut name = stem
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push('_');
    name.push_str(language);
    name.push_str(".txt");
    stem.with_file_name(name)
}

/// One category block in the evaluator's file format.
fn write_category(
    out: &mut impl Write,
    label: &str,
    language: &str,
    words: &[String],
) -> std::io::Result<()> {
    writeln!(out, ":instance of {} ({})", label, language)?;
    writeln!(out, "{}", words.join(" "))
}

/// Generate a category file for every language, named `<stem>_<lang>.txt`.
///
/// Each Wikidata item contributes one `instance of <label> (<lang>)`
/// category whose members are the single-word labels of its instances.
/// Returns the written paths.
pub async fn generate_test_set(
    client: &WikidataClient,
    items: &[String],
    languages: &[String],
    stem: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for language in languages {
        let path = testset_path(stem.as_ref(), language);
        let mut out = BufWriter::new(File::create(&path)?);
        for (i, item) in items.iter().enumerate() {
            let query = instance_of_query(item, language)?;
            let label = client.entity_label(item, language).await?;
            let words = client.category_words(&query).await?;
            if words.is_empty() {
                // Kept in the file; the evaluators will report it skipped.
                log::warn!("category 'instance of {}' has no {} words", label, language);
            }
            write_category(&mut out, &label, language, &words)?;
            log::info!(
                "wrote {} words for 'instance of {}' ({})",
                words.len(),
                label,
                language
            );
            if i + 1 < items.len() {
                tokio::time::sleep(QUERY_PAUSE).await;
            }
        }
        out.flush()?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategorySet;
    use std::io::Cursor;

    #[test]
    fn path_appends_language_and_extension() {
        assert_eq!(
            testset_path("testset", "en"),
            PathBuf::from("testset_en.txt")
        );
        assert_eq!(
            testset_path("out/categories", "xh"),
            PathBuf::from("out/categories_xh.txt")
        );
    }

    #[test]
    fn written_categories_round_trip_through_the_parser() {
        let mut buf = Vec::new();
        let rivers: Vec<String> = ["danube", "rhine", "seine"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let colors: Vec<String> = ["red", "green"].iter().map(|s| s.to_string()).collect();
        write_category(&mut buf, "river", "en", &rivers).unwrap();
        write_category(&mut buf, "color", "en", &colors).unwrap();

        let set = CategorySet::from_reader(Cursor::new(buf), 2).unwrap();
        assert_eq!(set.len(), 2);
        let cats: Vec<_> = set.iter().collect();
        assert_eq!(cats[0].label, ":instance of river (en)");
        assert_eq!(cats[0].words, rivers);
        assert_eq!(cats[1].label, ":instance of color (en)");
        assert_eq!(cats[1].words, colors);
    }

    #[test]
    fn empty_category_is_skipped_by_the_parser() {
        let mut buf = Vec::new();
        write_category(&mut buf, "ghost", "en", &[]).unwrap();
        let set = CategorySet::from_reader(Cursor::new(buf), 2).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.skipped(), &[":instance of ghost (en)".to_string()]);
    }
}
