//! Qualitative read-out of the enabled metric set's risk profile.

use serde::Serialize;

use super::confidence::{confidence_score, ConfidenceBand};
use crate::core::{EnabledMetrics, Metric, RiskFactors, RiskLevel};

/// Confidence at or above this supports a full investment.
pub const PROCEED_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Proceed,
    PilotFirst,
}

impl Recommendation {
    pub fn from_confidence(score: u8) -> Self {
        if score >= PROCEED_THRESHOLD {
            Self::Proceed
        } else {
            Self::PilotFirst
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Proceed => "Strong business case with acceptable risk profile",
            Self::PilotFirst => {
                "Consider pilot program or additional data collection before full investment"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInsights {
    pub confidence_score: u8,
    pub band: ConfidenceBand,
    /// Enabled metrics rated high implementation risk.
    pub high_risk: Vec<Metric>,
    /// Enabled metrics backed by no or anecdotal evidence.
    pub limited_evidence: Vec<Metric>,
    pub recommendation: Recommendation,
}

pub fn generate_risk_insights(enabled: &EnabledMetrics, risk_factors: &RiskFactors) -> RiskInsights {
    let rated: Vec<_> = enabled
        .iter()
        .filter_map(|m| risk_factors.get(m).map(|f| (m, f)))
        .collect();

    let high_risk = rated
        .iter()
        .filter(|(_, f)| f.risk == RiskLevel::High)
        .map(|(m, _)| *m)
        .collect();

    let limited_evidence = rated
        .iter()
        .filter(|(_, f)| f.evidence.is_limited())
        .map(|(m, _)| *m)
        .collect();

    let score = confidence_score(enabled, risk_factors);

    RiskInsights {
        confidence_score: score,
        band: ConfidenceBand::from_score(score),
        high_risk,
        limited_evidence,
        recommendation: Recommendation::from_confidence(score),
    }
}

/// Comma-joined metric labels, or "None identified".
pub fn describe_metrics(metrics: &[Metric]) -> String {
    if metrics.is_empty() {
        return "None identified".to_string();
    }
    metrics
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(", ")
}
