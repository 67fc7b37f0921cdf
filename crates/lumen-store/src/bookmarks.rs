//! Bookmarked article ids.
//!
//! Persisted as a JSON array under one key. Membership is flipped by `toggle`;
//! there is no size bound and no server sync.

use lumen_research::ResearchPaper;
use tracing::warn;

use crate::kv::KvStore;

pub const BOOKMARKS_KEY: &str = "bookmarks";

#[derive(Debug)]
pub struct BookmarkStore {
    kv: KvStore,
    ids: Vec<String>,
}

impl BookmarkStore {
    /// Load persisted bookmarks. An unreadable blob is logged and treated as empty.
    pub async fn load(kv: KvStore) -> Self {
        let ids = match kv.get_json::<Vec<String>>(BOOKMARKS_KEY).await {
            Ok(ids) => ids.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not read bookmarks, starting empty");
                vec![]
            }
        };
        Self { kv, ids }
    }

    /// Flip membership of `id`; returns whether it is bookmarked afterwards.
    /// A failed write is logged and the in-memory state still changes.
    pub async fn toggle(&mut self, id: &str) -> bool {
        let now_bookmarked = match self.ids.iter().position(|existing| existing == id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        };
        if let Err(e) = self.kv.set_json(BOOKMARKS_KEY, &self.ids).await {
            warn!(error = %e, "Could not persist bookmarks");
        }
        now_bookmarked
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Ids in the order they were bookmarked.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The subset of an in-memory result set that is bookmarked.
    pub fn bookmarked_articles<'a>(&self, papers: &'a [ResearchPaper]) -> Vec<&'a ResearchPaper> {
        papers.iter().filter(|p| self.is_bookmarked(&p.id)).collect()
    }
}
