//! Semantic Scholar Graph API client.
//!
//! Endpoint: https://api.semanticscholar.org/graph/v1/paper/search
//! An API key (x-api-key header) is optional; unauthenticated calls share a public rate limit.

use async_trait::async_trait;
use lumen_common::SandboxClient as Client;
use tracing::{debug, instrument};

use crate::dates::parse_loose_date;
use crate::models::{ResearchPaper, Source};
use super::LiteratureSource;

const S2_SEARCH_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const S2_FIELDS: &str =
    "paperId,title,abstract,authors,venue,year,publicationDate,externalIds,url,citationCount,fieldsOfStudy";

pub struct SemanticScholarClient {
    client: Client,
    api_key: Option<String>,
}

impl SemanticScholarClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl LiteratureSource for SemanticScholarClient {
    fn source(&self) -> Source {
        Source::SemanticScholar
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<ResearchPaper>> {
        let limit = max_results.to_string();
        let mut request = self.client
            .get(S2_SEARCH_URL)?
            .query(&[("query", query), ("limit", limit.as_str()), ("fields", S2_FIELDS)]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let resp = request
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let data = resp["data"].as_array().cloned().unwrap_or_default();
        debug!(count = data.len(), "Semantic Scholar search returned results");

        Ok(data.iter().map(s2_paper_to_paper).collect())
    }
}

pub fn s2_paper_to_paper(item: &serde_json::Value) -> ResearchPaper {
    let mut paper = ResearchPaper::new(
        Source::SemanticScholar,
        item["paperId"].as_str().unwrap_or(""),
        item["title"].as_str().unwrap_or("").trim(),
    );

    let ids = &item["externalIds"];
    paper.doi = ids["DOI"].as_str().filter(|d| !d.is_empty()).map(String::from);
    // PubMed ids come back as strings, occasionally as numbers
    paper.pmid = ids["PubMed"]
        .as_str()
        .map(String::from)
        .or_else(|| ids["PubMed"].as_u64().map(|n| n.to_string()));

    paper.abstract_text = item["abstract"].as_str().unwrap_or("").to_string();
    paper.authors = item["authors"]
        .as_array()
        .map(|a| a.iter().filter_map(|x| x["name"].as_str()).map(String::from).collect())
        .unwrap_or_default();
    paper.journal = item["venue"].as_str().unwrap_or("").to_string();
    paper.published_date = item["publicationDate"]
        .as_str()
        .and_then(parse_loose_date)
        .or_else(|| {
            let year = i32::try_from(item["year"].as_i64()?).ok()?;
            chrono::NaiveDate::from_ymd_opt(year, 1, 1)
        });
    paper.url = item["url"].as_str().unwrap_or("").to_string();
    paper.citation_count = item["citationCount"].as_u64().unwrap_or(0);
    paper.keywords = item["fieldsOfStudy"]
        .as_array()
        .map(|f| f.iter().filter_map(|k| k.as_str()).map(String::from).collect())
        .unwrap_or_default();

    paper
}
