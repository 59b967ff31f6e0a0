//! Scenario projection engine.
//!
//! Maps (inputs, enabled metrics, risk factors, scenario) to projected
//! metric values, annual benefit, ROI, payback and a three-year NPV.
//! A run is a pure function of its arguments.

pub mod models;
pub mod uplift;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

pub use models::{
    CurrentSnapshot, Improvements, MetricContribution, Projection, ScenarioResult, ScenarioSet,
};
pub use uplift::{
    base_uplift, standard_rules, BenefitContext, BenefitTarget, Contribution, Direction,
    UpliftRule, UPLIFT_TABLE,
};

use crate::core::{EnabledMetrics, Error, Inputs, Metric, ModelState, Result, RiskFactors, Scenario};
use crate::risk::RiskWeight;

/// Fixed horizon for the undiscounted net value.
pub const NPV_HORIZON_YEARS: f64 = 3.0;
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Clone, Debug)]
pub struct ScenarioEngine {
    rules: Vec<UpliftRule>,
}

impl Default for ScenarioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioEngine {
    pub fn new() -> Self {
        Self::with_rules(standard_rules())
    }

    /// Engine over a custom rule set. Metrics without a rule never move.
    pub fn with_rules(rules: Vec<UpliftRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[UpliftRule] {
        &self.rules
    }

    fn rule_for(&self, metric: Metric) -> Option<&UpliftRule> {
        self.rules.iter().find(|r| r.metric == metric)
    }

    pub fn run_state(&self, state: &ModelState, scenario: Scenario) -> Result<ScenarioResult> {
        self.run(&state.inputs, &state.enabled, &state.risk_factors, scenario)
    }

    /// Run a scenario given by name; unknown names are a configuration error.
    pub fn run_named(&self, state: &ModelState, scenario: &str) -> Result<ScenarioResult> {
        let scenario: Scenario = scenario.parse()?;
        self.run_state(state, scenario)
    }

    pub fn run_all(&self, state: &ModelState) -> Result<ScenarioSet> {
        Ok(ScenarioSet {
            conservative: self.run_state(state, Scenario::Conservative)?,
            realistic: self.run_state(state, Scenario::Realistic)?,
            optimistic: self.run_state(state, Scenario::Optimistic)?,
        })
    }

    pub fn run(
        &self,
        inputs: &Inputs,
        enabled: &EnabledMetrics,
        risk_factors: &RiskFactors,
        scenario: Scenario,
    ) -> Result<ScenarioResult> {
        inputs.validate()?;
        risk_factors.validate()?;

        let multiplier = scenario.multiplier();
        let current_revenue = inputs.pipeline * (inputs.win_rate / 100.0);

        let current: BTreeMap<Metric, f64> =
            Metric::ALL.into_iter().map(|m| (m, inputs.metric(m))).collect();
        let mut projected = current.clone();
        let mut improvements: BTreeMap<Metric, f64> =
            Metric::ALL.into_iter().map(|m| (m, 0.0)).collect();
        let mut breakdown = Vec::new();

        let mut revenue_gains = 0.0;
        let mut annual_benefit = 0.0;

        for metric in Metric::ALL {
            let rule = match self.rule_for(metric) {
                Some(rule) if enabled.is_enabled(metric) => rule,
                _ => continue,
            };

            let factor = risk_factors.require(metric)?;
            let adjusted_uplift =
                rule.base_uplift * multiplier * RiskWeight::from(factor).combined();

            let baseline = inputs.metric(metric);
            let value = rule.project(baseline, adjusted_uplift);
            projected.insert(metric, value);
            improvements.insert(metric, rule.improvement(baseline, value));

            let context = BenefitContext {
                inputs,
                current_revenue,
                revenue_gains,
            };
            let benefit = match rule.contribution {
                Contribution::None => 0.0,
                Contribution::Revenue(f) => {
                    let gain = f(&context, value, adjusted_uplift);
                    revenue_gains += gain;
                    gain
                }
                Contribution::AnnualBenefit(f) => {
                    let gain = f(&context, value, adjusted_uplift);
                    annual_benefit += gain;
                    gain
                }
            };

            breakdown.push(MetricContribution {
                metric,
                adjusted_uplift,
                benefit,
                target: rule.contribution.target(),
            });
        }

        let total_annual_benefit = annual_benefit + revenue_gains;
        let ea_cost = inputs.ea_cost;

        let roi = if ea_cost > 0.0 {
            (total_annual_benefit - ea_cost) / ea_cost * 100.0
        } else {
            0.0
        };
        let payback_months = if total_annual_benefit > 0.0 {
            ea_cost / total_annual_benefit * MONTHS_PER_YEAR
        } else {
            0.0
        };
        let net_present_value = total_annual_benefit * NPV_HORIZON_YEARS - ea_cost;

        let result = ScenarioResult {
            scenario,
            current: CurrentSnapshot {
                metrics: current,
                revenue: current_revenue,
            },
            projected: Projection {
                metrics: projected,
                revenue: current_revenue + revenue_gains,
                roi,
                payback_months,
                net_present_value,
            },
            improvements: Improvements {
                metrics: improvements,
                revenue: revenue_gains,
            },
            total_annual_benefit,
            breakdown,
        };

        ensure_finite(&result)?;
        log::debug!("{}", result.summary());
        Ok(result)
    }
}

fn ensure_finite(result: &ScenarioResult) -> Result<()> {
    let headline = [
        ("total annual benefit", result.total_annual_benefit),
        ("projected revenue", result.projected.revenue),
        ("roi", result.projected.roi),
        ("payback", result.projected.payback_months),
        ("net present value", result.projected.net_present_value),
    ];
    let bad_headline = headline.into_iter().find(|(_, v)| !v.is_finite());
    let bad_metric = result
        .projected
        .metrics
        .iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(m, v)| (m.key(), *v));

    match bad_headline.or(bad_metric) {
        Some((name, value)) => Err(Error::Calculation(format!(
            "{} scenario produced a non-finite {name} ({value})",
            result.scenario
        ))),
        None => Ok(()),
    }
}
