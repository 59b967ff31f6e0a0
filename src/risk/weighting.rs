//! Risk weighting: evidence × risk × probability.
//!
//! Turns a metric's [`RiskFactor`] into the single scalar that discounts its
//! raw uplift. Unknown evidence or risk strings never reach this module; they
//! are rejected when parsed into [`Evidence`] / [`RiskLevel`].

use crate::core::{Evidence, RiskFactor, RiskLevel};

pub fn evidence_score(evidence: Evidence) -> f64 {
    match evidence {
        Evidence::NoData => 0.30,
        Evidence::Anecdotal => 0.60,
        Evidence::SomeData => 0.80,
        Evidence::StrongData => 1.00,
    }
}

pub fn risk_score(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 1.00,
        RiskLevel::Medium => 0.85,
        RiskLevel::High => 0.70,
    }
}

pub fn probability_weight(probability: u8) -> f64 {
    f64::from(probability) / 100.0
}

/// Combined discount for a metric's uplift.
pub fn weight(probability: u8, evidence: Evidence, risk: RiskLevel) -> f64 {
    RiskWeight::new(probability, evidence, risk).combined()
}

/// The three weighting components, kept apart so the confidence scorer
/// can average them instead of multiplying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskWeight {
    pub evidence: f64,
    pub risk: f64,
    pub probability: f64,
}

impl RiskWeight {
    pub fn new(probability: u8, evidence: Evidence, risk: RiskLevel) -> Self {
        Self {
            evidence: evidence_score(evidence),
            risk: risk_score(risk),
            probability: probability_weight(probability),
        }
    }

    pub fn combined(&self) -> f64 {
        self.evidence * self.risk * self.probability
    }
}

impl From<&RiskFactor> for RiskWeight {
    fn from(factor: &RiskFactor) -> Self {
        Self::new(factor.probability, factor.evidence, factor.risk)
    }
}
