//! SPARQL query construction for category generation.

use crate::error::{EmbevalError, Result};

/// Wikidata property used to form categories.
const INSTANCE_OF: &str = "P31";

/// Build the SPARQL SELECT for every single-word label of entities that are
/// instances of `item`, labeled in the given wikimedia `language` code.
///
/// Multi-word labels are filtered out in the query itself so the result is
/// directly usable as category members.
pub fn instance_of_query(item: &str, language: &str) -> Result<String> {
    validate_item(item)?;
    validate_language(language)?;
    Ok(format!(
        "SELECT DISTINCT ?item ?label\n\
         WHERE\n\
         {{\n\
           ?item wdt:{INSTANCE_OF} wd:{item} .\n\
           ?item rdfs:label ?label .\n\
           FILTER(!CONTAINS(?label, \" \"))\n\
           FILTER(LANG(?label) = '{language}')\n\
         }}\n\
         ORDER BY ?label"
    ))
}

/// Items are Q-ids (`Q4022`); anything else would splice into the query.
fn validate_item(item: &str) -> Result<()> {
    let ok = item.len() > 1
        && item.starts_with('Q')
        && item[1..].chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(EmbevalError::InvalidInput(format!(
            "{:?} is not a Wikidata item id",
            item
        )))
    }
}

/// Wikimedia language codes are short lowercase ASCII, possibly hyphenated
/// (`en`, `pt-br`).
fn validate_language(language: &str) -> Result<()> {
    let ok = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(EmbevalError::InvalidInput(format!(
            "{:?} is not a wikimedia language code",
            language
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_targets_the_item_through_instance_of() {
        let q = instance_of_query("Q4022", "en").unwrap();
        assert!(q.contains("wdt:P31 wd:Q4022"));
        assert!(q.contains("LANG(?label) = 'en'"));
        assert!(q.contains("!CONTAINS(?label, \" \")"));
        assert!(q.contains("ORDER BY ?label"));
    }

    #[test]
    fn hyphenated_language_codes_are_accepted() {
        assert!(instance_of_query("Q4022", "pt-br").is_ok());
    }

    #[test]
    fn malformed_items_are_rejected() {
        for item in ["", "Q", "4022", "Q40 22", "Q4022. DELETE"] {
            assert!(
                matches!(instance_of_query(item, "en"), Err(EmbevalError::InvalidInput(_))),
                "{:?} should be rejected",
                item
            );
        }
    }

    #[test]
    fn malformed_language_codes_are_rejected() {
        for lang in ["", "EN", "e n", "en'"] {
            assert!(
                matches!(instance_of_query("Q4022", lang), Err(EmbevalError::InvalidInput(_))),
                "{:?} should be rejected",
                lang
            );
        }
    }
}
