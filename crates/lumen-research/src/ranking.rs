//! Result ordering.

use std::cmp::Ordering;

use crate::models::{ResearchPaper, SearchResult};

/// Most recent first; undated papers sink to the end. Stable for equal dates.
pub fn rank_papers_by_date(papers: &mut [ResearchPaper]) {
    papers.sort_by(|a, b| match (a.published_date, b.published_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None)    => Ordering::Less,
        (None, Some(_))    => Ordering::Greater,
        (None, None)       => Ordering::Equal,
    });
}

/// Highest relevance first. Stable, so equal-tier hits keep provider order.
pub fn rank_results_by_relevance(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
}
