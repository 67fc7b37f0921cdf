//! Multi-provider search aggregation.
//!
//! Flow for one query:
//!   1. Query every configured provider concurrently
//!   2. Log and drop provider failures (the others are unaffected)
//!   3. Merge, deduplicate, rank, truncate

use std::sync::Arc;

use futures::future::join_all;
use lumen_config::ResearchConfig;
use tracing::{debug, info, instrument, warn};

use crate::dedup::{dedup_papers, dedup_results};
use crate::models::{ResearchPaper, SearchResult, Source};
use crate::ranking::{rank_papers_by_date, rank_results_by_relevance};
use crate::sources::{build_sources, LiteratureSource, WebSearchSource};

/// Ranked results plus the providers that failed to answer.
///
/// A failed provider contributes nothing to `items`, exactly as if it had no
/// matches; `failed_sources` is there for callers that want to tell the two apart.
#[derive(Debug, Clone)]
pub struct AggregateOutcome<T> {
    pub items: Vec<T>,
    pub failed_sources: Vec<Source>,
    /// Hits across all providers before dedup and truncation.
    pub total_found: usize,
}

impl<T> AggregateOutcome<T> {
    fn empty() -> Self {
        Self { items: vec![], failed_sources: vec![], total_found: 0 }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_sources.is_empty()
    }
}

pub struct ResearchAggregator {
    sources: Vec<Arc<dyn LiteratureSource>>,
    web: Option<WebSearchSource>,
    per_source_limit: usize,
    max_results: usize,
}

impl ResearchAggregator {
    pub fn new(
        sources: Vec<Arc<dyn LiteratureSource>>,
        per_source_limit: usize,
        max_results: usize,
    ) -> Self {
        Self { sources, web: None, per_source_limit, max_results }
    }

    /// Append static web results to relevance-ranked searches. They rank last,
    /// so they only survive truncation when the providers leave room.
    pub fn with_web_fallback(mut self, web: WebSearchSource) -> Self {
        self.web = Some(web);
        self
    }

    pub fn from_config(config: &ResearchConfig) -> anyhow::Result<Self> {
        let aggregator = Self::new(build_sources(config)?, config.per_source_limit, config.max_results);
        Ok(if config.web_fallback {
            aggregator.with_web_fallback(WebSearchSource::new())
        } else {
            aggregator
        })
    }

    pub fn source_names(&self) -> Vec<Source> {
        self.sources.iter().map(|s| s.source()).collect()
    }

    /// Papers from every provider, deduplicated, newest first, capped at `max_results`.
    #[instrument(skip(self))]
    pub async fn search_papers(&self, query: &str) -> AggregateOutcome<ResearchPaper> {
        if query.trim().is_empty() {
            return AggregateOutcome::empty();
        }

        let (papers, failed_sources) = self.fan_out(query).await;
        let total_found = papers.len();

        let mut papers = dedup_papers(papers);
        rank_papers_by_date(&mut papers);
        papers.truncate(self.max_results);

        info!(total_found, returned = papers.len(), failed = failed_sources.len(), "Paper search complete");
        AggregateOutcome { items: papers, failed_sources, total_found }
    }

    /// Search hits from every provider plus the web fallback, deduplicated,
    /// most relevant first, capped at `max_results`.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> AggregateOutcome<SearchResult> {
        if query.trim().is_empty() {
            return AggregateOutcome::empty();
        }

        let (papers, failed_sources) = self.fan_out(query).await;
        // Collapse papers on their dedup key first; providers link the same paper
        // under different urls.
        let mut total_found = papers.len();
        let papers = dedup_papers(papers);
        let mut results: Vec<SearchResult> = papers.iter().map(ResearchPaper::to_search_result).collect();
        if let Some(web) = &self.web {
            let fallback = web.search(query, self.per_source_limit);
            total_found += fallback.len();
            results.extend(fallback);
        }

        let mut results = dedup_results(results);
        rank_results_by_relevance(&mut results);
        results.truncate(self.max_results);

        info!(total_found, returned = results.len(), failed = failed_sources.len(), "Search complete");
        AggregateOutcome { items: results, failed_sources, total_found }
    }

    /// Query all providers concurrently. Output keeps provider order.
    async fn fan_out(&self, query: &str) -> (Vec<ResearchPaper>, Vec<Source>) {
        let limit = self.per_source_limit;
        let calls = self.sources.iter().map(|source| async move {
            (source.source(), source.search(query, limit).await)
        });

        let mut papers = Vec::new();
        let mut failed = Vec::new();
        for (source, result) in join_all(calls).await {
            match result {
                Ok(found) => {
                    debug!(source = %source, count = found.len(), "Provider answered");
                    papers.extend(found);
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "Provider search failed, treating as no results");
                    failed.push(source);
                }
            }
        }
        (papers, failed)
    }
}
