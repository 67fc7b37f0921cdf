//! Fixtures and stub providers for Lumen tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use lumen_research::sources::LiteratureSource;
use lumen_research::{ResearchPaper, Source};

/// Paper fixture with a DOI and a publication year.
pub fn paper(source: Source, id: &str, doi: Option<&str>, year: i32) -> ResearchPaper {
    let mut p = ResearchPaper::new(source, id, format!("{} paper {id}", source.as_str()));
    p.doi = doi.map(String::from);
    p.published_date = NaiveDate::from_ymd_opt(year, 6, 1);
    p.url = format!("https://example.org/{}/{id}", source.as_str());
    p
}

/// A provider that answers from a canned list, fails on demand, and counts calls.
pub struct StubSource {
    source: Source,
    papers: Vec<ResearchPaper>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(source: Source, papers: Vec<ResearchPaper>) -> Self {
        Self { source, papers, fail: false, calls: AtomicUsize::new(0) }
    }

    pub fn failing(source: Source) -> Self {
        Self { fail: true, ..Self::new(source, vec![]) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiteratureSource for StubSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn search(&self, _query: &str, max_results: usize) -> anyhow::Result<Vec<ResearchPaper>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("{} unreachable", self.source);
        }
        Ok(self.papers.iter().take(max_results).cloned().collect())
    }
}
