//! Deduplication of merged provider results.
//!
//! Papers collapse on `ResearchPaper::dedup_key` (doi, pmid, id, title), search
//! hits on url then title. The first occurrence wins, so provider order decides
//! which copy survives.

use std::collections::HashSet;

use crate::models::{ResearchPaper, SearchResult};

pub fn dedup_papers(papers: Vec<ResearchPaper>) -> Vec<ResearchPaper> {
    let mut seen = HashSet::new();
    papers
        .into_iter()
        .filter(|p| seen.insert(p.dedup_key().to_string()))
        .collect()
}

pub fn dedup_results(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.dedup_key().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn paper(source: Source, id: &str, doi: Option<&str>) -> ResearchPaper {
        let mut p = ResearchPaper::new(source, id, format!("Paper {id}"));
        p.doi = doi.map(String::from);
        p
    }

    #[test]
    fn test_first_occurrence_wins() {
        let merged = vec![
            paper(Source::PubMed, "1", Some("10.1/a")),
            paper(Source::CrossRef, "10.1/a", Some("10.1/a")),
            paper(Source::PubMed, "2", None),
        ];
        let out = dedup_papers(merged);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source, Source::PubMed);
    }

    #[test]
    fn test_doi_compared_verbatim() {
        let out = dedup_papers(vec![
            paper(Source::PubMed, "1", Some("10.1/ABC")),
            paper(Source::CrossRef, "2", Some("10.1/abc")),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_same_title_without_ids_collides() {
        let a = ResearchPaper::new(Source::Arxiv, "", "Same title");
        let b = ResearchPaper::new(Source::CrossRef, "", "Same title");
        assert_eq!(dedup_papers(vec![a, b]).len(), 1);
    }

    #[test]
    fn test_results_dedup_by_url() {
        let a = paper(Source::PubMed, "1", None).to_search_result();
        let mut b = a.clone();
        b.title = "Different title, same link".into();
        let mut c = a.clone();
        c.url = String::new();
        assert_eq!(dedup_results(vec![a, b, c]).len(), 2);
    }
}
