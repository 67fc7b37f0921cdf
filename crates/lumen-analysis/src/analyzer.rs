//! Simulated processing pipeline around the generator.
//!
//! Walks a fixed list of stages with an artificial delay each, broadcasting
//! progress, then returns a generated result.

use std::time::Duration;

use lumen_config::AnalysisConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

use crate::generator::generate_with_rng;
use crate::models::{DiagnosticResult, TestType};

const PROGRESS_CAPACITY: usize = 32;

const COMMON_STAGES: &[&str] = &[
    "Preparing input",
    "Running quality checks",
    "Extracting features",
    "Scoring against reference ranges",
    "Compiling report",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub test_type: TestType,
    /// 1-based.
    pub stage: usize,
    pub total_stages: usize,
    pub label: String,
}

pub struct MockAnalyzer {
    stage_delay: Duration,
    progress: broadcast::Sender<ProgressEvent>,
}

impl MockAnalyzer {
    pub fn new(stage_delay: Duration) -> Self {
        let (progress, _) = broadcast::channel(PROGRESS_CAPACITY);
        Self { stage_delay, progress }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(Duration::from_millis(config.stage_delay_ms))
    }

    /// Receive progress events for analyses started after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.progress.subscribe()
    }

    pub fn stages(test_type: TestType) -> Vec<&'static str> {
        let first = match test_type {
            TestType::RetinalScan => "Enhancing fundus image",
            TestType::AmslerGrid  => "Mapping reported distortions",
            TestType::EyeStrain   => "Reviewing symptom questionnaire",
            _                     => "Collecting test responses",
        };
        std::iter::once(first).chain(COMMON_STAGES.iter().copied()).collect()
    }

    #[instrument(skip(self))]
    pub async fn analyze(&self, test_type: TestType) -> DiagnosticResult {
        let stages = Self::stages(test_type);
        let total_stages = stages.len();

        for (i, label) in stages.into_iter().enumerate() {
            debug!(stage = i + 1, total_stages, label, "Simulated analysis stage");
            // No subscribers is fine
            let _ = self.progress.send(ProgressEvent {
                test_type,
                stage: i + 1,
                total_stages,
                label: label.to_string(),
            });
            if !self.stage_delay.is_zero() {
                tokio::time::sleep(self.stage_delay).await;
            }
        }

        let result = generate_with_rng(test_type, &mut rand::thread_rng());
        info!(
            test = test_type.as_str(),
            confidence = result.confidence,
            risk = result.risk_level.as_str(),
            "Simulated analysis complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let analyzer = MockAnalyzer::new(Duration::ZERO);
        let mut rx = analyzer.subscribe();

        let result = analyzer.analyze(TestType::RetinalScan).await;
        assert!(result.simulated);
        assert_eq!(result.test_type, TestType::RetinalScan);

        let expected = MockAnalyzer::stages(TestType::RetinalScan);
        for (i, label) in expected.iter().enumerate() {
            let ev = rx.recv().await.unwrap();
            assert_eq!(ev.stage, i + 1);
            assert_eq!(ev.total_stages, expected.len());
            assert_eq!(ev.label, *label);
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_delay_applies_per_stage() {
        let analyzer = MockAnalyzer::new(Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        analyzer.analyze(TestType::ColorVision).await;
        let stages = MockAnalyzer::stages(TestType::ColorVision).len() as u32;
        assert!(start.elapsed() >= Duration::from_millis(500) * stages);
    }

    #[tokio::test]
    async fn test_analyze_without_subscribers() {
        let r = MockAnalyzer::from_config(&AnalysisConfig { stage_delay_ms: 0 })
            .analyze(TestType::EyeStrain)
            .await;
        assert!((85.0..=95.0).contains(&r.confidence));
        assert_eq!(r.risk_level, RiskLevel::from_overall_health(r.overall_health));
    }
}
