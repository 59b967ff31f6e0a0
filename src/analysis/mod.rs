//! Full analysis pass: scenarios, alternatives, confidence, sensitivity.
//!
//! [`analyze`] either returns a complete [`AnalysisReport`] or an error;
//! there are no partial reports.

pub mod alternatives;
pub mod sensitivity;
pub mod views;

use serde::Serialize;

pub use alternatives::{compare_alternatives, evaluate, Alternative, AlternativeOutcome};
pub use sensitivity::{SensitivityAnalyzer, SensitivityConfig, SensitivityEntry};
pub use views::{
    investment_comparison, risk_return_map, scenario_comparison, sensitivity_rows,
    InvestmentComparisonRow, RiskReturnPoint, ScenarioComparisonRow, SensitivityRow,
};

use crate::core::{ModelState, Result};
use crate::risk::{generate_risk_insights, RiskInsights};
use crate::scenario::{ScenarioEngine, ScenarioSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub scenarios: ScenarioSet,
    pub alternatives: Vec<AlternativeOutcome>,
    pub confidence_score: u8,
    pub sensitivity: Vec<SensitivityEntry>,
    pub insights: RiskInsights,
}

impl AnalysisReport {
    pub fn scenario_comparison(&self) -> Vec<ScenarioComparisonRow> {
        scenario_comparison(&self.scenarios)
    }

    pub fn investment_comparison(&self, state: &ModelState) -> Vec<InvestmentComparisonRow> {
        investment_comparison(&state.inputs, &self.scenarios, &self.alternatives)
    }

    pub fn sensitivity_rows(&self) -> Vec<SensitivityRow> {
        sensitivity_rows(&self.sensitivity)
    }

    pub fn risk_return_map(&self) -> Vec<RiskReturnPoint> {
        risk_return_map(&self.scenarios)
    }
}

/// Runs every component of an analysis against one state snapshot.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    engine: ScenarioEngine,
    sensitivity: SensitivityConfig,
}

impl Analyzer {
    pub fn new(engine: ScenarioEngine, sensitivity: SensitivityConfig) -> Self {
        Self {
            engine,
            sensitivity,
        }
    }

    pub fn with_sensitivity(sensitivity: SensitivityConfig) -> Self {
        Self::new(ScenarioEngine::new(), sensitivity)
    }

    pub fn analyze(&self, state: &ModelState) -> Result<AnalysisReport> {
        state.validate()?;

        let scenarios = self.engine.run_all(state)?;
        let sensitivity = SensitivityAnalyzer::new(self.engine.clone(), self.sensitivity)
            .analyze_state(state)?;
        let insights = generate_risk_insights(&state.enabled, &state.risk_factors);

        log::info!(
            "analysis complete: {} metrics enabled, ROI {:.1}% .. {:.1}%, confidence {}",
            state.enabled.count(),
            scenarios.conservative.roi(),
            scenarios.optimistic.roi(),
            insights.confidence_score
        );

        Ok(AnalysisReport {
            scenarios,
            alternatives: compare_alternatives(&state.inputs),
            confidence_score: insights.confidence_score,
            sensitivity,
            insights,
        })
    }
}

/// Analyze with default engine and sensitivity settings.
pub fn analyze(state: &ModelState) -> Result<AnalysisReport> {
    Analyzer::default().analyze(state)
}
