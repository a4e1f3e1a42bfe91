//! Thin HTTP client for a SPARQL query service and the Wikidata entity API.

use crate::config::WikidataConfig;
use crate::error::{EmbevalError, Result};
use lru::LruCache;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

/// Wikibase API used for entity-label lookups.
const API_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";

/// Response structure for SPARQL SELECT results (sparql-results+json)
#[derive(Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Deserialize)]
struct SparqlValue {
    value: String,
}

/// Response structure for the `wbgetentities` API
#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, Entity>,
}

#[derive(Deserialize)]
struct Entity {
    #[serde(default)]
    labels: HashMap<String, LabelValue>,
}

#[derive(Deserialize)]
struct LabelValue {
    value: String,
}

/// SPARQL-over-HTTP client with bounded retry and an entity-label cache.
///
/// Query results come back as `application/sparql-results+json`; 429 and 5xx
/// responses are retried with exponential backoff up to the configured
/// limit.
pub struct WikidataClient {
    client: Client,
    endpoint: String,
    api_endpoint: String,
    max_retries: usize,
    label_cache: Mutex<LruCache<String, String>>,
}

impl WikidataClient {
    /// Create a client from the `[wikidata]` configuration section.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation).
    pub fn new(config: &WikidataConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        let capacity = NonZeroUsize::new(config.label_cache_capacity.max(1))
            .expect("Cache capacity must be at least 1");
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_endpoint: API_ENDPOINT.to_string(),
            max_retries: config.max_retries,
            label_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Point the client at different service URLs (mirrors, local test
    /// servers).
    pub fn with_endpoints(
        mut self,
        endpoint: impl Into<String>,
        api_endpoint: impl Into<String>,
    ) -> Self {
        self.endpoint = endpoint.into();
        self.api_endpoint = api_endpoint.into();
        self
    }

    /// Run a SPARQL SELECT and return each result row as a variable -> value
    /// map.
    pub async fn select(&self, query: &str) -> Result<Vec<HashMap<String, String>>> {
        let response: SparqlResponse = self
            .get_json(
                &self.endpoint,
                &[("query", query), ("format", "json")],
                "application/sparql-results+json",
            )
            .await?;
        Ok(response
            .results
            .bindings
            .into_iter()
            .map(|row| row.into_iter().map(|(var, v)| (var, v.value)).collect())
            .collect())
    }

    /// Label of `item` in `language`, falling back to English and finally to
    /// the raw item id. Lookups are cached.
    pub async fn entity_label(&self, item: &str, language: &str) -> Result<String> {
        let key = format!("{item}@{language}");
        if let Some(label) = self.label_cache.lock().unwrap().get(&key) {
            log::debug!("label cache hit for {}", key);
            return Ok(label.clone());
        }

        let languages = if language == "en" {
            language.to_string()
        } else {
            format!("{language}|en")
        };
        let response: EntitiesResponse = self
            .get_json(
                &self.api_endpoint,
                &[
                    ("action", "wbgetentities"),
                    ("ids", item),
                    ("props", "labels"),
                    ("languages", &languages),
                    ("format", "json"),
                ],
                "application/json",
            )
            .await?;

        let label = response
            .entities
            .get(item)
            .and_then(|e| e.labels.get(language).or_else(|| e.labels.get("en")))
            .map(|l| l.value.clone())
            .unwrap_or_else(|| {
                log::warn!("no label for {} in {:?}, using the item id", item, language);
                item.to_string()
            });

        self.label_cache.lock().unwrap().put(key, label.clone());
        Ok(label)
    }

    /// Member words of the category formed by `query`: lowercased labels,
    /// with `/`-separated synonyms contributing each part.
    pub async fn category_words(&self, query: &str) -> Result<Vec<String>> {
        let rows = self.select(query).await?;
        Ok(words_from_rows(&rows))
    }

    /// GET a JSON resource with bounded retry on 429 and 5xx responses.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        accept: &str,
    ) -> Result<T> {
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            let response = self
                .client
                .get(url)
                .query(params)
                .header(reqwest::header::ACCEPT, accept)
                .send()
                .await
                .map_err(|e| EmbevalError::Wikidata(format!("Network error: {}", e)))?;

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(|e| EmbevalError::Wikidata(format!("Failed to parse response: {}", e)));
            }

            let retryable = status.as_u16() == 429 || status.is_server_error();
            if retryable && attempt < self.max_retries {
                attempt += 1;
                log::warn!("Retry {}/{} after HTTP {}", attempt, self.max_retries, status);
                tokio::time::sleep(delay).await;
                delay *= 2; // Exponential backoff
                continue;
            }

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(EmbevalError::Wikidata(format!(
                "endpoint error {}: {}",
                status, body
            )));
        }
    }
}

/// Extract category words from SELECT rows: the `?label` binding,
/// lowercased; labels with `/`-separated synonyms contribute each part.
pub(crate) fn words_from_rows(rows: &[HashMap<String, String>]) -> Vec<String> {
    let mut words = Vec::new();
    for row in rows {
        let Some(label) = row.get("label") else {
            log::warn!("result row without ?label binding, skipping");
            continue;
        };
        let label = label.to_lowercase();
        if label.contains('/') {
            words.extend(
                label
                    .split('/')
                    .filter(|part| !part.is_empty())
                    .map(String::from),
            );
        } else {
            words.push(label);
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(var: &str, value: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(var.to_string(), value.to_string());
        map
    }

    #[test]
    fn labels_are_lowercased() {
        let rows = vec![row("label", "Danube"), row("label", "rhine")];
        assert_eq!(words_from_rows(&rows), vec!["danube", "rhine"]);
    }

    #[test]
    fn slash_synonyms_contribute_each_part() {
        let rows = vec![row("label", "Aubergine/Eggplant")];
        assert_eq!(words_from_rows(&rows), vec!["aubergine", "eggplant"]);
    }

    #[test]
    fn rows_without_label_are_skipped() {
        let rows = vec![row("item", "Q1"), row("label", "seine")];
        assert_eq!(words_from_rows(&rows), vec!["seine"]);
    }

    #[test]
    fn sparql_results_json_deserializes() {
        let data = r#"{
            "head": {"vars": ["item", "label"]},
            "results": {"bindings": [
                {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1"},
                 "label": {"xml:lang": "en", "type": "literal", "value": "Danube"}}
            ]}
        }"#;
        let response: SparqlResponse = serde_json::from_str(data).unwrap();
        assert_eq!(response.results.bindings.len(), 1);
        assert_eq!(response.results.bindings[0]["label"].value, "Danube");
    }

    #[test]
    fn entities_json_deserializes() {
        let data = r#"{
            "entities": {
                "Q4022": {"type": "item", "id": "Q4022",
                          "labels": {"en": {"language": "en", "value": "river"}}}
            },
            "success": 1
        }"#;
        let response: EntitiesResponse = serde_json::from_str(data).unwrap();
        assert_eq!(response.entities["Q4022"].labels["en"].value, "river");
    }
}
