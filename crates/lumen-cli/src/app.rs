//! Application state shared by every command.

use lumen_analysis::{DiagnosticResult, MockAnalyzer, TestType};
use lumen_config::Config;
use lumen_research::{AggregateOutcome, ResearchAggregator, ResearchPaper, SearchResult};
use lumen_store::{BookmarkStore, KvStore, SearchHistory};
use tracing::warn;

/// Most recent paper search, kept so bookmarks can be shown with their details.
pub const LAST_RESULTS_KEY: &str = "last_results";
pub const ANALYSES_KEY: &str = "analyses";
const ANALYSES_KEPT: usize = 50;

pub struct App {
    pub config: Config,
    pub kv: KvStore,
    aggregator: ResearchAggregator,
    analyzer: MockAnalyzer,
}

impl App {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let kv = KvStore::open(&config.store.path).await?;
        let aggregator = ResearchAggregator::from_config(&config.research)?;
        let analyzer = MockAnalyzer::from_config(&config.analysis);
        Ok(Self::with_parts(config, kv, aggregator, analyzer))
    }

    pub fn with_parts(
        config: Config,
        kv: KvStore,
        aggregator: ResearchAggregator,
        analyzer: MockAnalyzer,
    ) -> Self {
        Self { config, kv, aggregator, analyzer }
    }

    pub fn analyzer(&self) -> &MockAnalyzer {
        &self.analyzer
    }

    async fn record_query(&self, query: &str) {
        let mut history = SearchHistory::load(self.kv.clone(), self.config.store.history_limit).await;
        history.record(query).await;
    }

    pub async fn search(&self, query: &str) -> AggregateOutcome<SearchResult> {
        self.record_query(query).await;
        self.aggregator.search(query).await
    }

    pub async fn papers(&self, query: &str) -> AggregateOutcome<ResearchPaper> {
        self.record_query(query).await;
        let outcome = self.aggregator.search_papers(query).await;
        if let Err(e) = self.kv.set_json(LAST_RESULTS_KEY, &outcome.items).await {
            warn!(error = %e, "Could not cache last results");
        }
        outcome
    }

    pub async fn toggle_bookmark(&self, id: &str) -> bool {
        BookmarkStore::load(self.kv.clone()).await.toggle(id).await
    }

    /// Bookmarked ids, and the bookmarked papers found in the last cached result set.
    pub async fn bookmarks(&self) -> (Vec<String>, Vec<ResearchPaper>) {
        let store = BookmarkStore::load(self.kv.clone()).await;
        let last: Vec<ResearchPaper> = match self.kv.get_json(LAST_RESULTS_KEY).await {
            Ok(papers) => papers.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not read cached results");
                vec![]
            }
        };
        let known = store.bookmarked_articles(&last).into_iter().cloned().collect();
        (store.ids().to_vec(), known)
    }

    pub async fn history(&self) -> Vec<String> {
        SearchHistory::load(self.kv.clone(), self.config.store.history_limit)
            .await
            .entries()
            .to_vec()
    }

    pub async fn clear_history(&self) {
        SearchHistory::load(self.kv.clone(), self.config.store.history_limit)
            .await
            .clear()
            .await;
    }

    /// Run a simulated analysis and prepend it to the saved log.
    pub async fn analyze(&self, test_type: TestType) -> DiagnosticResult {
        let result = self.analyzer.analyze(test_type).await;

        let mut log: Vec<DiagnosticResult> = match self.kv.get_json(ANALYSES_KEY).await {
            Ok(log) => log.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not read saved analyses, starting a new log");
                vec![]
            }
        };
        log.insert(0, result.clone());
        log.truncate(ANALYSES_KEPT);
        if let Err(e) = self.kv.set_json(ANALYSES_KEY, &log).await {
            warn!(error = %e, "Could not save analysis");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use lumen_research::sources::LiteratureSource;
    use lumen_research::Source;
    use lumen_test_utils::{paper, StubSource};

    async fn app(dir: &tempfile::TempDir) -> App {
        let pubmed: Arc<dyn LiteratureSource> = Arc::new(StubSource::new(Source::PubMed, vec![
            paper(Source::PubMed, "111", Some("10.1000/a"), 2023),
            paper(Source::PubMed, "222", Some("10.1000/b"), 2021),
        ]));
        let config = Config::default();
        let kv = KvStore::open(dir.path()).await.unwrap();
        let aggregator = ResearchAggregator::new(vec![pubmed], 10, 10);
        App::with_parts(config, kv, aggregator, MockAnalyzer::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_searches_are_recorded_in_history() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir).await;
        app.search("glaucoma").await;
        app.papers("cataract").await;
        assert_eq!(app.history().await, vec!["cataract", "glaucoma"]);

        app.clear_history().await;
        assert!(app.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_bookmarks_resolved_against_last_results() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir).await;
        app.papers("glaucoma").await;

        assert!(app.toggle_bookmark("222").await);
        assert!(app.toggle_bookmark("not-in-results").await);

        let (ids, known) = app.bookmarks().await;
        assert_eq!(ids, vec!["222", "not-in-results"]);
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].id, "222");

        assert!(!app.toggle_bookmark("222").await);
        assert_eq!(app.bookmarks().await.0, vec!["not-in-results"]);
    }

    #[tokio::test]
    async fn test_analyses_are_logged_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir).await;
        let first = app.analyze(TestType::VisualAcuity).await;
        let second = app.analyze(TestType::RetinalScan).await;

        let log: Vec<DiagnosticResult> = app.kv.get_json(ANALYSES_KEY).await.unwrap().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].id, second.id);
        assert_eq!(log[1].id, first.id);
    }
}
