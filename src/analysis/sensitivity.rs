//! How strongly ROI responds to each enabled metric's probability.
//!
//! For every enabled metric the probability is raised on a copy of the risk
//! factors, the realistic scenario is rerun, and the ROI shift is recorded.
//! The caller's risk factors are never touched.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{EnabledMetrics, Inputs, Metric, ModelState, Result, RiskFactors, Scenario};
use crate::scenario::ScenarioEngine;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// Percentage points added to a metric's probability (capped at 100).
    pub probability_delta: u8,
    /// Smallest impact reported, so zero-impact metrics stay visible.
    pub min_impact: f64,
    pub max_entries: usize,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            probability_delta: 20,
            min_impact: 0.1,
            max_entries: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityEntry {
    pub metric: Metric,
    /// Absolute ROI change in percentage points, floored at `min_impact`.
    pub impact: f64,
    pub perturbed_roi: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SensitivityAnalyzer {
    engine: ScenarioEngine,
    config: SensitivityConfig,
}

impl SensitivityAnalyzer {
    pub fn new(engine: ScenarioEngine, config: SensitivityConfig) -> Self {
        Self { engine, config }
    }

    pub fn analyze_state(&self, state: &ModelState) -> Result<Vec<SensitivityEntry>> {
        self.analyze(&state.inputs, &state.enabled, &state.risk_factors)
    }

    /// Entries sorted by descending impact, at most `max_entries` long.
    ///
    /// Runs the engine once for the baseline and once per enabled metric.
    pub fn analyze(
        &self,
        inputs: &Inputs,
        enabled: &EnabledMetrics,
        risk_factors: &RiskFactors,
    ) -> Result<Vec<SensitivityEntry>> {
        let baseline_roi = self
            .engine
            .run(inputs, enabled, risk_factors, Scenario::Realistic)?
            .roi();

        let candidates: Vec<Metric> = enabled
            .iter()
            .filter(|m| self.engine.rules().iter().any(|r| r.metric == *m))
            .collect();

        let mut entries = candidates
            .par_iter()
            .map(|&metric| self.perturb(inputs, enabled, risk_factors, metric, baseline_roi))
            .collect::<Result<Vec<_>>>()?;

        // stable: ties keep metric order
        entries.sort_by(|a, b| b.impact.total_cmp(&a.impact));
        entries.truncate(self.config.max_entries);

        log::debug!(
            "sensitivity: {} of {} metrics reported, baseline ROI {:.1}%",
            entries.len(),
            candidates.len(),
            baseline_roi
        );
        Ok(entries)
    }

    fn perturb(
        &self,
        inputs: &Inputs,
        enabled: &EnabledMetrics,
        risk_factors: &RiskFactors,
        metric: Metric,
        baseline_roi: f64,
    ) -> Result<SensitivityEntry> {
        let raised = risk_factors
            .require(metric)?
            .with_probability_raised(self.config.probability_delta);
        let perturbed = risk_factors.with(metric, raised);

        let perturbed_roi = self
            .engine
            .run(inputs, enabled, &perturbed, Scenario::Realistic)?
            .roi();

        Ok(SensitivityEntry {
            metric,
            impact: (perturbed_roi - baseline_roi).abs().max(self.config.min_impact),
            perturbed_roi,
        })
    }
}
