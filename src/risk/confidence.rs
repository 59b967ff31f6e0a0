//! Aggregate confidence score across the enabled metrics.

use serde::Serialize;

use super::weighting::RiskWeight;
use crate::core::{EnabledMetrics, RiskFactor, RiskFactors};

/// Average of the three weighting components on a 0..=100 scale.
pub fn metric_score(factor: &RiskFactor) -> f64 {
    let weight = RiskWeight::from(factor);
    (weight.evidence * 100.0 + weight.risk * 100.0 + f64::from(factor.probability)) / 3.0
}

/// Mean metric score over enabled metrics that have a risk factor, rounded.
///
/// Scenario-independent. Returns 0 when no enabled metric is rated.
pub fn confidence_score(enabled: &EnabledMetrics, risk_factors: &RiskFactors) -> u8 {
    let scores: Vec<f64> = enabled
        .iter()
        .filter_map(|metric| risk_factors.get(metric))
        .map(metric_score)
        .collect();

    if scores.is_empty() {
        return 0;
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Moderate,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::High,
            60..=79 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
        }
    }
}
