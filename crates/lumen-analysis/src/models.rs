use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    VisualAcuity,
    ColorVision,
    AmslerGrid,
    ContrastSensitivity,
    RetinalScan,
    EyeStrain,
}

impl TestType {
    pub const ALL: [TestType; 6] = [
        TestType::VisualAcuity,
        TestType::ColorVision,
        TestType::AmslerGrid,
        TestType::ContrastSensitivity,
        TestType::RetinalScan,
        TestType::EyeStrain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::VisualAcuity        => "visual_acuity",
            TestType::ColorVision         => "color_vision",
            TestType::AmslerGrid          => "amsler_grid",
            TestType::ContrastSensitivity => "contrast_sensitivity",
            TestType::RetinalScan         => "retinal_scan",
            TestType::EyeStrain           => "eye_strain",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TestType::VisualAcuity        => "Visual Acuity",
            TestType::ColorVision         => "Color Vision",
            TestType::AmslerGrid          => "Amsler Grid",
            TestType::ContrastSensitivity => "Contrast Sensitivity",
            TestType::RetinalScan         => "Retinal Image Scan",
            TestType::EyeStrain           => "Digital Eye Strain",
        }
    }

    /// Accepts snake_case, kebab-case or the bare word ("retinal", "color").
    pub fn from_name(name: &str) -> Option<Self> {
        let n = name.trim().to_lowercase().replace('-', "_");
        match n.as_str() {
            "visual_acuity" | "acuity"                  => Some(TestType::VisualAcuity),
            "color_vision" | "colour_vision" | "color"  => Some(TestType::ColorVision),
            "amsler_grid" | "amsler"                    => Some(TestType::AmslerGrid),
            "contrast_sensitivity" | "contrast"         => Some(TestType::ContrastSensitivity),
            "retinal_scan" | "retinal" | "fundus"       => Some(TestType::RetinalScan),
            "eye_strain" | "strain"                     => Some(TestType::EyeStrain),
            _                                           => None,
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// `> 85` → Low, `> 70` → Moderate, otherwise High.
    pub fn from_overall_health(overall_health: f64) -> Self {
        if overall_health > 85.0 {
            RiskLevel::Low
        } else if overall_health > 70.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low      => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High     => "high",
        }
    }
}

/// A fabricated diagnostic result. Shape-valid, not medically meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub id: Uuid,
    pub test_type: TestType,
    /// Percent, within [85, 95].
    pub confidence: f64,
    /// Percent; drives `risk_level`.
    pub overall_health: f64,
    pub risk_level: RiskLevel,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub detailed_analysis: BTreeMap<String, f64>,
    pub ai_insights: Vec<String>,
    pub follow_up_actions: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub simulated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskLevel::from_overall_health(95.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_overall_health(85.01), RiskLevel::Low);
        assert_eq!(RiskLevel::from_overall_health(85.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_overall_health(70.5), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_overall_health(70.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_overall_health(12.0), RiskLevel::High);
    }

    #[test]
    fn test_test_type_names() {
        for t in TestType::ALL {
            assert_eq!(TestType::from_name(t.as_str()), Some(t));
        }
        assert_eq!(TestType::from_name("Retinal-Scan"), Some(TestType::RetinalScan));
        assert_eq!(TestType::from_name("fundus"), Some(TestType::RetinalScan));
        assert_eq!(TestType::from_name("hearing"), None);
    }
}
