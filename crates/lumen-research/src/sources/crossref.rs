//! CrossRef Works API client.
//!
//! Used for two purposes:
//! 1. Free-text search over the works index
//! 2. Resolving a bare DOI to full metadata
//!
//! API: https://api.crossref.org/works
//! Polite pool: pass `mailto` (see CrossRef etiquette)

use async_trait::async_trait;
use chrono::NaiveDate;
use lumen_common::SandboxClient as Client;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

use crate::models::{ResearchPaper, Source};
use super::LiteratureSource;

const CR_API_BASE: &str = "https://api.crossref.org/works";
const CR_SELECT: &str =
    "DOI,URL,title,abstract,author,container-title,published,issued,subject,is-referenced-by-count";

pub struct CrossRefClient {
    client: Client,
    mailto: Option<String>,
}

impl CrossRefClient {
    pub fn new(client: Client, mailto: Option<String>) -> Self {
        Self { client, mailto }
    }

    /// Resolve a single DOI → ResearchPaper. `None` when CrossRef does not know it.
    #[instrument(skip(self))]
    pub async fn resolve_doi(&self, doi: &str) -> anyhow::Result<Option<ResearchPaper>> {
        let url = format!("{}/{}", CR_API_BASE, doi.trim());
        let resp = self.client.get(&url)?.send().await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body: serde_json::Value = resp.json().await?;
        Ok(Some(work_to_paper(&body["message"])))
    }

    #[instrument(skip(self))]
    async fn search_works(
        &self,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let rows = max_results.to_string();
        let mut params = vec![
            ("query", query.trim()),
            ("rows", rows.as_str()),
            ("select", CR_SELECT),
        ];
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.as_str()));
        }

        let resp = self.client
            .get(CR_API_BASE)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        Ok(resp["message"]["items"]
            .as_array()
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl LiteratureSource for CrossRefClient {
    fn source(&self) -> Source {
        Source::CrossRef
    }

    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<ResearchPaper>> {
        let works = self.search_works(query, max_results).await?;
        debug!(n = works.len(), "CrossRef search results");
        Ok(works.iter().map(work_to_paper).collect())
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────

pub fn work_to_paper(work: &serde_json::Value) -> ResearchPaper {
    let doi = work["DOI"].as_str().unwrap_or("").to_string();
    let title = first_str(&work["title"]).unwrap_or("").trim().to_string();

    let mut paper = ResearchPaper::new(Source::CrossRef, doi.clone(), title);
    if !doi.is_empty() {
        paper.doi = Some(doi);
    }

    // CrossRef returns JATS XML snippets in abstracts
    paper.abstract_text = work["abstract"]
        .as_str()
        .map(strip_jats)
        .unwrap_or_default();

    paper.authors = work["author"]
        .as_array()
        .map(|authors| {
            authors.iter()
                .map(|a| {
                    let given  = a["given"].as_str().unwrap_or("").trim();
                    let family = a["family"].as_str().unwrap_or("").trim();
                    if given.is_empty() { family.to_string() } else { format!("{given} {family}") }
                })
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default();

    paper.journal = first_str(&work["container-title"]).unwrap_or("").to_string();
    paper.published_date = date_parts(&work["published"]).or_else(|| date_parts(&work["issued"]));
    paper.url = work["URL"].as_str().unwrap_or("").to_string();
    paper.citation_count = work["is-referenced-by-count"].as_u64().unwrap_or(0);
    paper.keywords = work["subject"]
        .as_array()
        .map(|s| s.iter().filter_map(|k| k.as_str()).map(String::from).collect())
        .unwrap_or_default();

    paper
}

fn first_str(value: &serde_json::Value) -> Option<&str> {
    value.as_array().and_then(|a| a.first()).and_then(|v| v.as_str())
}

/// `{"date-parts": [[2024, 6, 1]]}`; month and day are optional.
fn date_parts(value: &serde_json::Value) -> Option<NaiveDate> {
    let parts = value["date-parts"].as_array()?.first()?.as_array()?;
    let year = i32::try_from(parts.first()?.as_i64()?).ok()?;
    let month = match parts.get(1) {
        Some(m) => u32::try_from(m.as_u64()?).ok()?,
        None => 1,
    };
    let day = match parts.get(2) {
        Some(d) => u32::try_from(d.as_u64()?).ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Block-level JATS elements become word breaks; inline markup is dropped.
fn strip_jats(raw: &str) -> String {
    static BLOCKS: OnceLock<Regex> = OnceLock::new();
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let blocks = BLOCKS.get_or_init(|| Regex::new(r"</?jats:(p|title|sec)\b[^>]*>").expect("static regex"));
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"));

    let spaced = blocks.replace_all(raw, " ");
    tags.replace_all(&spaced, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
