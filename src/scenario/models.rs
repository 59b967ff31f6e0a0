use serde::Serialize;
use std::collections::BTreeMap;

use super::uplift::BenefitTarget;
use crate::core::{Metric, Scenario};

/// Baseline values as entered, plus derived revenue.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSnapshot {
    #[serde(flatten)]
    pub metrics: BTreeMap<Metric, f64>,
    pub revenue: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Post-uplift value of every metric; disabled metrics keep their baseline.
    #[serde(flatten)]
    pub metrics: BTreeMap<Metric, f64>,
    pub revenue: f64,
    pub roi: f64,
    pub payback_months: f64,
    pub net_present_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvements {
    #[serde(flatten)]
    pub metrics: BTreeMap<Metric, f64>,
    /// Revenue gained from revenue-booked metrics.
    pub revenue: f64,
}

/// How one enabled metric contributed to the scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricContribution {
    pub metric: Metric,
    pub adjusted_uplift: f64,
    pub benefit: f64,
    pub target: BenefitTarget,
}

/// Output of one engine run. Built fresh on every call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub current: CurrentSnapshot,
    pub projected: Projection,
    pub improvements: Improvements,
    pub total_annual_benefit: f64,
    pub breakdown: Vec<MetricContribution>,
}

impl ScenarioResult {
    pub fn roi(&self) -> f64 {
        self.projected.roi
    }

    pub fn payback_months(&self) -> f64 {
        self.projected.payback_months
    }

    pub fn projected(&self, metric: Metric) -> f64 {
        self.projected.metrics.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn current(&self, metric: Metric) -> f64 {
        self.current.metrics.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn improvement(&self, metric: Metric) -> f64 {
        self.improvements.metrics.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: ROI {:.1}% | Benefit {:.0} | Payback {:.1} mo | NPV {:.0}",
            self.scenario.label(),
            self.projected.roi,
            self.total_annual_benefit,
            self.projected.payback_months,
            self.projected.net_present_value
        )
    }
}

/// The three named scenarios computed from one state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioSet {
    pub conservative: ScenarioResult,
    pub realistic: ScenarioResult,
    pub optimistic: ScenarioResult,
}

impl ScenarioSet {
    pub fn get(&self, scenario: Scenario) -> &ScenarioResult {
        match scenario {
            Scenario::Conservative => &self.conservative,
            Scenario::Realistic => &self.realistic,
            Scenario::Optimistic => &self.optimistic,
        }
    }

    /// Results in conservative, realistic, optimistic order.
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioResult> {
        [&self.conservative, &self.realistic, &self.optimistic].into_iter()
    }
}
