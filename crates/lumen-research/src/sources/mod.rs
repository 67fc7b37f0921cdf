//! Research provider clients.

pub mod arxiv;
pub mod crossref;
pub mod pubmed;
pub mod semantic_scholar;
pub mod web;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lumen_common::sandbox::{SandboxClient, DEFAULT_USER_AGENT};
use lumen_config::ResearchConfig;
use tracing::warn;

use crate::models::{ResearchPaper, Source};

pub use arxiv::ArxivClient;
pub use crossref::CrossRefClient;
pub use pubmed::PubMedClient;
pub use semantic_scholar::SemanticScholarClient;
pub use web::WebSearchSource;

/// Common interface for all literature provider clients.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Which provider this client talks to.
    fn source(&self) -> Source;

    /// Search for papers matching a free-text query.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<ResearchPaper>>;
}

/// Shared HTTP client for every provider, honouring the configured timeout.
pub fn build_http_client(config: &ResearchConfig) -> anyhow::Result<SandboxClient> {
    let user_agent = match &config.mailto {
        Some(mailto) => format!("{DEFAULT_USER_AGENT} (mailto:{mailto})"),
        None => DEFAULT_USER_AGENT.to_string(),
    };
    let client = SandboxClient::with_settings(
        Duration::from_secs(config.request_timeout_secs),
        &user_agent,
    )?;
    Ok(client)
}

/// Instantiate the clients named in `config.sources`. Unknown names are skipped with a warning.
pub fn build_sources(config: &ResearchConfig) -> anyhow::Result<Vec<Arc<dyn LiteratureSource>>> {
    let client = build_http_client(config)?;
    let mut sources: Vec<Arc<dyn LiteratureSource>> = Vec::new();

    for name in &config.sources {
        match Source::from_name(name) {
            Some(Source::PubMed) => sources.push(Arc::new(PubMedClient::new(
                client.clone(),
                config.pubmed.api_key.clone(),
            ))),
            Some(Source::CrossRef) => sources.push(Arc::new(CrossRefClient::new(
                client.clone(),
                config.mailto.clone(),
            ))),
            Some(Source::SemanticScholar) => sources.push(Arc::new(SemanticScholarClient::new(
                client.clone(),
                config.semanticscholar.api_key.clone(),
            ))),
            Some(Source::Arxiv) => sources.push(Arc::new(ArxivClient::new(client.clone()))),
            Some(Source::Web) => warn!("'web' is the fallback, not a literature source; enable it with research.web_fallback"),
            None => warn!(source = %name, "Unknown research source in config, skipping"),
        }
    }

    Ok(sources)
}
