//! lumen-analysis: Simulated "AI" eye-test analysis.
//!
//! Nothing here runs a model. Results are assembled from random numbers inside
//! fixed ranges so that screens and flows have realistic-looking data; every
//! result carries `simulated = true`.

pub mod analyzer;
pub mod generator;
pub mod models;

pub use analyzer::{MockAnalyzer, ProgressEvent};
pub use generator::generate_with_rng;
pub use models::{DiagnosticResult, RiskLevel, TestType};
