//! Configuration loading for Lumen.
//! Reads lumen.toml from the current directory or the path in the LUMEN_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const CONFIG_ENV: &str = "LUMEN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "lumen.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Literature providers queried by the aggregator, by name.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Cap on the merged, ranked result list.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Rows requested from each provider.
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Append the static web fallback to relevance-ranked searches.
    #[serde(default = "bool_true")]
    pub web_fallback: bool,
    /// Contact address for the CrossRef polite pool.
    pub mailto: Option<String>,
    #[serde(default)]
    pub pubmed: SourceConfig,
    #[serde(default)]
    pub semanticscholar: SourceConfig,
}

fn default_sources() -> Vec<String> {
    ["pubmed", "crossref", "semanticscholar", "arxiv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_results()      -> usize { 10 }
fn default_per_source_limit() -> usize { 10 }
fn default_timeout_secs()     -> u64   { 30 }
fn bool_true()                -> bool  { true }

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            max_results: default_max_results(),
            per_source_limit: default_per_source_limit(),
            request_timeout_secs: default_timeout_secs(),
            web_fallback: bool_true(),
            mailto: None,
            pubmed: SourceConfig::default(),
            semanticscholar: SourceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_store_path()    -> String { "./lumen-data".to_string() }
fn default_history_limit() -> usize  { 20 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path(), history_limit: default_history_limit() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Artificial delay per simulated processing stage.
    #[serde(default = "default_stage_delay_ms")]
    pub stage_delay_ms: u64,
}

fn default_stage_delay_ms() -> u64 { 600 }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { stage_delay_ms: default_stage_delay_ms() }
    }
}

mod tests;

impl Config {
    /// Load configuration.
    /// A path named by LUMEN_CONFIG must exist; a missing ./lumen.toml falls back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load_from(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from(DEFAULT_CONFIG_FILE)?,
            Err(_) => {
                debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy lumen.example.toml to lumen.toml and edit it.",
                path
            );
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fill API keys missing from the file with NCBI_API_KEY / SEMANTIC_SCHOLAR_API_KEY.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.research.pubmed.api_key.is_none() {
            self.research.pubmed.api_key = lookup("NCBI_API_KEY").filter(|k| !k.is_empty());
        }
        if self.research.semanticscholar.api_key.is_none() {
            self.research.semanticscholar.api_key =
                lookup("SEMANTIC_SCHOLAR_API_KEY").filter(|k| !k.is_empty());
        }
    }
}
