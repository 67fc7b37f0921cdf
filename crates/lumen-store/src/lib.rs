//! lumen-store: Local key-value persistence.
//! Bookmarked article ids, search history and other JSON blobs, one file per key.

pub mod bookmarks;
pub mod history;
pub mod kv;

pub use bookmarks::BookmarkStore;
pub use history::SearchHistory;
pub use kv::KvStore;
