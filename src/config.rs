use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub wikidata: WikidataConfig,
}

/// Default evaluation settings, overridable per run from the CLI
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Neighbors per word for top-k.
    #[serde(default = "default_k")]
    pub k: usize,
    /// In-group size for odd-one-out.
    #[serde(default = "default_k_in")]
    pub k_in: usize,
    /// Comparisons per category for odd-one-out.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Allow out-of-vocabulary test words (marked wrong instead of erroring).
    #[serde(default)]
    pub allow_oov: bool,
    /// Sample out-words only from this many top-frequency vocabulary entries.
    #[serde(default)]
    pub restrict_vocab: Option<usize>,
    /// Odd-one-out sampling seed.
    #[serde(default)]
    pub seed: u64,
}

/// SPARQL service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WikidataConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_label_cache_capacity")]
    pub label_cache_capacity: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            k_in: default_k_in(),
            sample_size: default_sample_size(),
            allow_oov: false,
            restrict_vocab: None,
            seed: 0,
        }
    }
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            label_cache_capacity: default_label_cache_capacity(),
        }
    }
}

fn default_k() -> usize {
    3
}

fn default_k_in() -> usize {
    3
}

fn default_sample_size() -> usize {
    1000
}

fn default_endpoint() -> String {
    "https://query.wikidata.org/sparql".to_string()
}

fn default_user_agent() -> String {
    // The public query service requires a descriptive User-Agent
    format!("embeval/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_label_cache_capacity() -> usize {
    1000
}

impl Config {
    /// Load configuration.
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in the EMBEVAL_CONFIG environment variable
    /// 2. ./embeval.toml in the current directory
    ///
    /// Every setting has a default, so a missing ./embeval.toml falls back
    /// to the built-in configuration. An explicitly named file must exist.
    pub fn load() -> Result<Self> {
        let (path, explicit) = match std::env::var("EMBEVAL_CONFIG") {
            Ok(p) => (PathBuf::from(p), true),
            Err(_) => (PathBuf::from("embeval.toml"), false),
        };

        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else if explicit {
            anyhow::bail!("config file not found: {}", path.display());
        } else {
            log::debug!("no embeval.toml found, using built-in defaults");
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.eval.k == 0 {
            anyhow::bail!("eval.k must be greater than 0");
        }
        if self.eval.k_in == 0 {
            anyhow::bail!("eval.k_in must be greater than 0");
        }
        if self.eval.sample_size == 0 {
            anyhow::bail!("eval.sample_size must be greater than 0");
        }
        if self.wikidata.timeout_secs == 0 {
            anyhow::bail!("wikidata.timeout_secs must be greater than 0");
        }
        if self.wikidata.user_agent.trim().is_empty() {
            anyhow::bail!("wikidata.user_agent must not be empty");
        }
        url::Url::parse(&self.wikidata.endpoint).with_context(|| {
            format!(
                "wikidata.endpoint is not a valid URL: {}",
                self.wikidata.endpoint
            )
        })?;
        Ok(())
    }
}
