//! Editable model plus the last successful analysis.
//!
//! Mirrors how the form behaves: edits change the state immediately, and a
//! failed recalculation leaves the previously displayed report in place.

use crate::analysis::{AnalysisReport, Analyzer};
use crate::core::{
    coerce_number, coerce_probability, Evidence, InputField, Metric, ModelState, Result,
    RiskFactor, RiskLevel,
};

#[derive(Debug, Clone, Default)]
pub struct ModelSession {
    state: ModelState,
    analyzer: Analyzer,
    report: Option<AnalysisReport>,
}

impl ModelSession {
    pub fn new(state: ModelState, analyzer: Analyzer) -> Self {
        Self {
            state,
            analyzer,
            report: None,
        }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// Last successful report, if any.
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn toggle_metric(&mut self, metric: Metric) {
        self.state.enabled.toggle(metric);
    }

    pub fn set_enabled(&mut self, metric: Metric, enabled: bool) {
        self.state.enabled.set(metric, enabled);
    }

    /// Set a numeric input from raw text; unparseable text stores zero.
    pub fn set_input(&mut self, field: InputField, raw: &str) {
        self.state.inputs.set(field, coerce_number(raw));
    }

    /// Slider semantics: out-of-range text is clamped into 0..=100, never
    /// rejected. Config files are validated strictly instead.
    pub fn set_probability(&mut self, metric: Metric, raw: &str) {
        let factor = self.factor_or_default(metric);
        self.state.risk_factors.insert(
            metric,
            RiskFactor {
                probability: coerce_probability(raw),
                ..factor
            },
        );
    }

    /// Unknown evidence levels are rejected and leave the state unchanged.
    pub fn set_evidence(&mut self, metric: Metric, raw: &str) -> Result<()> {
        let evidence = raw.parse::<Evidence>()?;
        let factor = self.factor_or_default(metric);
        self.state
            .risk_factors
            .insert(metric, RiskFactor { evidence, ..factor });
        Ok(())
    }

    /// Unknown risk levels are rejected and leave the state unchanged.
    pub fn set_risk(&mut self, metric: Metric, raw: &str) -> Result<()> {
        let risk = raw.parse::<RiskLevel>()?;
        let factor = self.factor_or_default(metric);
        self.state
            .risk_factors
            .insert(metric, RiskFactor { risk, ..factor });
        Ok(())
    }

    fn factor_or_default(&self, metric: Metric) -> RiskFactor {
        self.state
            .risk_factors
            .get(metric)
            .copied()
            .unwrap_or_default()
    }

    /// Run a full analysis. On failure the previous report is kept.
    pub fn recalculate(&mut self) -> Result<&AnalysisReport> {
        match self.analyzer.analyze(&self.state) {
            Ok(report) => {
                let stored = self.report.insert(report);
                Ok(&*stored)
            }
            Err(e) => {
                log::warn!("recalculation failed, keeping previous results: {e}");
                Err(e)
            }
        }
    }
}
