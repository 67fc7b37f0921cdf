//! lumen-research: Literature search across public research APIs.
//! - Provider adapters (PubMed, CrossRef, Semantic Scholar, arXiv, static web fallback)
//! - Concurrent fan-out aggregation
//! - Deduplication and ranking

pub mod aggregator;
pub mod dates;
pub mod dedup;
pub mod models;
pub mod ranking;
pub mod sources;

pub use aggregator::{AggregateOutcome, ResearchAggregator};
pub use models::{ResearchPaper, SearchResult, Source};
