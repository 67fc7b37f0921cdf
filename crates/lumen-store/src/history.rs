//! Recent search queries, most recent first.

use tracing::warn;

use crate::kv::KvStore;

pub const HISTORY_KEY: &str = "search_history";

#[derive(Debug)]
pub struct SearchHistory {
    kv: KvStore,
    entries: Vec<String>,
    limit: usize,
}

impl SearchHistory {
    /// Load persisted history, keeping at most `limit` entries.
    pub async fn load(kv: KvStore, limit: usize) -> Self {
        let mut entries = match kv.get_json::<Vec<String>>(HISTORY_KEY).await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not read search history, starting empty");
                vec![]
            }
        };
        entries.truncate(limit);
        Self { kv, entries, limit }
    }

    /// Move `query` to the front. Blank queries are ignored; repeats
    /// (case-insensitive) are collapsed into the newest entry.
    pub async fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|q| !q.eq_ignore_ascii_case(query));
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
        self.persist().await;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub async fn clear(&mut self) {
        self.entries.clear();
        self.persist().await;
    }

    async fn persist(&self) {
        if let Err(e) = self.kv.set_json(HISTORY_KEY, &self.entries).await {
            warn!(error = %e, "Could not persist search history");
        }
    }
}
