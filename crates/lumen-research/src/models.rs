//! Common result shapes every provider is normalised into.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snippet length used when a paper is shown as a search hit.
const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    PubMed,
    CrossRef,
    SemanticScholar,
    Arxiv,
    Web,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::PubMed          => "pubmed",
            Source::CrossRef        => "crossref",
            Source::SemanticScholar => "semanticscholar",
            Source::Arxiv           => "arxiv",
            Source::Web             => "web",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "pubmed"                             => Some(Source::PubMed),
            "crossref"                           => Some(Source::CrossRef),
            "semanticscholar" | "semantic_scholar" => Some(Source::SemanticScholar),
            "arxiv"                              => Some(Source::Arxiv),
            "web"                                => Some(Source::Web),
            _                                    => None,
        }
    }

    /// Fixed relevance assigned to every hit from this provider.
    /// Not computed from the text; peer-reviewed indexes rank above preprints and the web.
    pub fn relevance(&self) -> f64 {
        match self {
            Source::PubMed          => 0.95,
            Source::SemanticScholar => 0.90,
            Source::CrossRef        => 0.85,
            Source::Arxiv           => 0.80,
            Source::Web             => 0.70,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A research article as returned by one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPaper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub journal: String,
    pub published_date: Option<NaiveDate>,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    pub url: String,
    pub citation_count: u64,
    pub keywords: Vec<String>,
    pub source: Source,
}

impl ResearchPaper {
    /// Empty paper for `source`; adapters fill in what the provider returns.
    pub fn new(source: Source, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: vec![],
            abstract_text: String::new(),
            journal: String::new(),
            published_date: None,
            doi: None,
            pmid: None,
            url: String::new(),
            citation_count: 0,
            keywords: vec![],
            source,
        }
    }

    /// First non-empty of doi, pmid, id, title.
    ///
    /// Values are compared verbatim: two DOIs differing only in case are distinct,
    /// and two different papers with the same title and no ids collide.
    pub fn dedup_key(&self) -> &str {
        [self.doi.as_deref(), self.pmid.as_deref(), Some(self.id.as_str()), Some(self.title.as_str())]
            .into_iter()
            .flatten()
            .find(|k| !k.is_empty())
            .unwrap_or("")
    }

    /// Link to the paper, preferring the provider URL over the DOI resolver.
    pub fn link(&self) -> String {
        if !self.url.is_empty() {
            return self.url.clone();
        }
        match &self.doi {
            Some(doi) if !doi.is_empty() => format!("https://doi.org/{doi}"),
            _ => String::new(),
        }
    }

    pub fn to_search_result(&self) -> SearchResult {
        let snippet = if self.abstract_text.is_empty() {
            self.journal.clone()
        } else {
            truncate_chars(&self.abstract_text, SNIPPET_CHARS)
        };
        SearchResult {
            title: self.title.clone(),
            snippet,
            url: self.link(),
            source: self.source,
            relevance_score: self.source.relevance(),
            published_date: self.published_date,
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source: Source,
    pub relevance_score: f64,
    pub published_date: Option<NaiveDate>,
}

impl SearchResult {
    /// url, falling back to title.
    pub fn dedup_key(&self) -> &str {
        if self.url.is_empty() { &self.title } else { &self.url }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}
