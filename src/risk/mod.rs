//! Risk weighting and the confidence read-outs built on it.

pub mod confidence;
pub mod insights;
pub mod weighting;

pub use confidence::{confidence_score, metric_score, ConfidenceBand};
pub use insights::{describe_metrics, generate_risk_insights, Recommendation, RiskInsights};
pub use weighting::{evidence_score, probability_weight, risk_score, weight, RiskWeight};
