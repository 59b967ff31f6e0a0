//! Domain vocabulary: metrics, evidence and risk ratings, scenarios.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ConfigurationError;

/// How a metric's value is displayed. Has no effect on computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Currency,
    Percentage,
    Number,
}

/// The fixed set of business metrics the model projects.
///
/// Declaration order is the engine's iteration order; the derived `Ord`
/// follows it so ordered maps keyed by `Metric` iterate the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Pipeline,
    DealSize,
    WinRate,
    SalesCycle,
    Retention,
    TeamSize,
    GrossMargin,
    Expansion,
    Arr,
    Nps,
    Churn,
    Cltv,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Pipeline,
        Metric::DealSize,
        Metric::WinRate,
        Metric::SalesCycle,
        Metric::Retention,
        Metric::TeamSize,
        Metric::GrossMargin,
        Metric::Expansion,
        Metric::Arr,
        Metric::Nps,
        Metric::Churn,
        Metric::Cltv,
    ];

    /// Identifier used in configuration files and JSON output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pipeline => "pipeline",
            Self::DealSize => "dealSize",
            Self::WinRate => "winRate",
            Self::SalesCycle => "salesCycle",
            Self::Retention => "retention",
            Self::TeamSize => "teamSize",
            Self::GrossMargin => "grossMargin",
            Self::Expansion => "expansion",
            Self::Arr => "arr",
            Self::Nps => "nps",
            Self::Churn => "churn",
            Self::Cltv => "cltv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pipeline => "Annual Pipeline Value ($)",
            Self::DealSize => "Average Deal Size ($)",
            Self::WinRate => "Current Win Rate (%)",
            Self::SalesCycle => "Sales Cycle (months)",
            Self::Retention => "Customer Retention (%)",
            Self::TeamSize => "Sales Team Size",
            Self::GrossMargin => "Gross Margin (%)",
            Self::Expansion => "Expansion Rate (%)",
            Self::Arr => "Annual Recurring Revenue ($)",
            Self::Nps => "Net Promoter Score",
            Self::Churn => "Churn Rate (%)",
            Self::Cltv => "Customer Lifetime Value ($)",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Pipeline | Self::DealSize | Self::Arr | Self::Cltv => ValueKind::Currency,
            Self::WinRate
            | Self::Retention
            | Self::GrossMargin
            | Self::Expansion
            | Self::Churn => ValueKind::Percentage,
            Self::SalesCycle | Self::TeamSize | Self::Nps => ValueKind::Number,
        }
    }

    /// Chart color, as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Pipeline => "#3B82F6",
            Self::DealSize => "#10B981",
            Self::WinRate => "#F59E0B",
            Self::SalesCycle => "#EF4444",
            Self::Retention => "#06B6D4",
            Self::TeamSize => "#8B5CF6",
            Self::GrossMargin => "#84CC16",
            Self::Expansion => "#F97316",
            Self::Arr => "#EC4899",
            Self::Nps => "#6366F1",
            Self::Churn => "#DC2626",
            Self::Cltv => "#059669",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigurationError::UnknownField(s.to_string()))
    }
}

/// Strength of the evidence backing a metric's uplift assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Evidence {
    #[serde(rename = "none")]
    NoData,
    #[serde(rename = "anecdotal")]
    Anecdotal,
    #[serde(rename = "some")]
    SomeData,
    #[serde(rename = "strong")]
    StrongData,
}

impl Evidence {
    pub fn key(&self) -> &'static str {
        match self {
            Self::NoData => "none",
            Self::Anecdotal => "anecdotal",
            Self::SomeData => "some",
            Self::StrongData => "strong",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoData => "None",
            Self::Anecdotal => "Anecdotal",
            Self::SomeData => "Some Data",
            Self::StrongData => "Strong Data",
        }
    }

    /// Evidence too thin to rely on without further data collection.
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::NoData | Self::Anecdotal)
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Evidence {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::NoData),
            "anecdotal" => Ok(Self::Anecdotal),
            "some" => Ok(Self::SomeData),
            "strong" => Ok(Self::StrongData),
            _ => Err(ConfigurationError::UnknownEvidence(s.to_string())),
        }
    }
}

/// Implementation risk of achieving a metric's uplift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RiskLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ConfigurationError::UnknownRiskLevel(s.to_string())),
        }
    }
}

/// Per-metric credibility rating of the uplift assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Success likelihood, 0..=100.
    pub probability: u8,
    pub evidence: Evidence,
    pub risk: RiskLevel,
}

impl RiskFactor {
    pub fn new(probability: u8, evidence: Evidence, risk: RiskLevel) -> Self {
        Self {
            probability,
            evidence,
            risk,
        }
    }

    /// Copy of this factor with the probability raised by `delta`, capped at 100.
    pub fn with_probability_raised(&self, delta: u8) -> Self {
        Self {
            probability: self.probability.saturating_add(delta).min(100),
            ..*self
        }
    }
}

impl Default for RiskFactor {
    fn default() -> Self {
        Self::new(70, Evidence::SomeData, RiskLevel::Medium)
    }
}

/// Named global uplift multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Conservative,
    Realistic,
    Optimistic,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Conservative,
        Scenario::Realistic,
        Scenario::Optimistic,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Conservative => 0.5,
            Self::Realistic => 1.0,
            Self::Optimistic => 1.5,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Realistic => "realistic",
            Self::Optimistic => "optimistic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Realistic => "Realistic",
            Self::Optimistic => "Optimistic",
        }
    }

    /// Position on the risk axis of the risk/return map.
    pub fn risk_rank(&self) -> u8 {
        match self {
            Self::Conservative => 3,
            Self::Realistic => 5,
            Self::Optimistic => 7,
        }
    }

    /// Marker size on the risk/return map.
    pub fn marker_size(&self) -> u32 {
        match self {
            Self::Conservative => 100,
            Self::Realistic => 150,
            Self::Optimistic => 200,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Scenario {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "realistic" => Ok(Self::Realistic),
            "optimistic" => Ok(Self::Optimistic),
            _ => Err(ConfigurationError::UnknownScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_order_matches_declaration() {
        let mut sorted = Metric::ALL;
        sorted.sort();
        assert_eq!(sorted, Metric::ALL);
        assert_eq!(Metric::ALL.first(), Some(&Metric::Pipeline));
        assert_eq!(Metric::ALL.last(), Some(&Metric::Cltv));
    }

    #[test]
    fn metric_keys_round_trip_through_from_str() {
        for metric in Metric::ALL {
            assert_eq!(metric.key().parse::<Metric>(), Ok(metric));
        }
        assert_eq!("DEALSIZE".parse::<Metric>(), Ok(Metric::DealSize));
        assert!("revenue".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_serde_uses_camel_case_keys() {
        let json = serde_json::to_string(&Metric::GrossMargin).unwrap();
        assert_eq!(json, "\"grossMargin\"");
        let back: Metric = serde_json::from_str("\"cltv\"").unwrap();
        assert_eq!(back, Metric::Cltv);
    }

    #[test]
    fn unknown_evidence_fails_fast() {
        assert_eq!(
            "rumour".parse::<Evidence>(),
            Err(ConfigurationError::UnknownEvidence("rumour".into()))
        );
        assert_eq!("Strong".parse::<Evidence>(), Ok(Evidence::StrongData));
    }

    #[test]
    fn unknown_risk_level_fails_fast() {
        assert!(matches!(
            "extreme".parse::<RiskLevel>(),
            Err(ConfigurationError::UnknownRiskLevel(_))
        ));
    }

    #[test]
    fn scenario_multipliers() {
        assert_eq!(Scenario::Conservative.multiplier(), 0.5);
        assert_eq!(Scenario::Realistic.multiplier(), 1.0);
        assert_eq!(Scenario::Optimistic.multiplier(), 1.5);
        assert!(matches!(
            "pessimistic".parse::<Scenario>(),
            Err(ConfigurationError::UnknownScenario(_))
        ));
    }

    #[test]
    fn raised_probability_is_capped() {
        let factor = RiskFactor::new(90, Evidence::StrongData, RiskLevel::Low);
        assert_eq!(factor.with_probability_raised(20).probability, 100);
        assert_eq!(factor.with_probability_raised(5).probability, 95);
        assert_eq!(factor.with_probability_raised(20).evidence, Evidence::StrongData);
    }
}
