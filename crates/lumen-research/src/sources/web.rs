//! Static "general web search" fallback.
//!
//! No network access: results point at the site search of well-known
//! vision-health references with the query filled in.

use url::form_urlencoded::byte_serialize;

use crate::models::{SearchResult, Source};

struct ReferenceSite {
    name: &'static str,
    search_url: &'static str,
    snippet: &'static str,
}

const REFERENCE_SITES: &[ReferenceSite] = &[
    ReferenceSite {
        name: "American Academy of Ophthalmology",
        search_url: "https://www.aao.org/search/results?q=",
        snippet: "Patient and clinician resources on eye conditions, treatments and eye health from ophthalmologists.",
    },
    ReferenceSite {
        name: "National Eye Institute",
        search_url: "https://www.nei.nih.gov/search?keys=",
        snippet: "Research-backed information on eye diseases, clinical trials and vision science from the NIH.",
    },
    ReferenceSite {
        name: "World Health Organization",
        search_url: "https://www.who.int/search?query=",
        snippet: "Global facts, reports and guidance on blindness, vision impairment and eye care services.",
    },
    ReferenceSite {
        name: "Prevent Blindness",
        search_url: "https://preventblindness.org/?s=",
        snippet: "Public education on eye safety, vision screening and common eye disorders.",
    },
    ReferenceSite {
        name: "MedlinePlus",
        search_url: "https://vsearch.nlm.nih.gov/vivisimo/cgi-bin/query-meta?v%3Aproject=medlineplus&query=",
        snippet: "Consumer health summaries of eye conditions, tests and treatments from the National Library of Medicine.",
    },
];

#[derive(Debug, Clone, Default)]
pub struct WebSearchSource;

impl WebSearchSource {
    pub fn new() -> Self {
        Self
    }

    /// Up to `limit` reference-site results for `query`, all at the web relevance tier.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return vec![];
        }
        let encoded: String = byte_serialize(query.as_bytes()).collect();

        REFERENCE_SITES
            .iter()
            .take(limit)
            .map(|site| SearchResult {
                title: format!("{query} - {}", site.name),
                snippet: site.snippet.to_string(),
                url: format!("{}{}", site.search_url, encoded),
                source: Source::Web,
                relevance_score: Source::Web.relevance(),
                published_date: None,
            })
            .collect()
    }
}
