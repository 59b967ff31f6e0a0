//! Chart-ready projections of a finished analysis. Field selection only.

use serde::Serialize;

use super::alternatives::AlternativeOutcome;
use super::sensitivity::SensitivityEntry;
use crate::core::{Inputs, RiskLevel, Scenario};
use crate::scenario::ScenarioSet;

pub const EA_INVESTMENT_LABEL: &str = "Enterprise Architect";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparisonRow {
    pub scenario: &'static str,
    pub roi: f64,
    pub benefit: f64,
    pub payback: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentComparisonRow {
    pub investment: &'static str,
    pub cost: f64,
    pub roi: f64,
    pub risk: RiskLevel,
    pub payback: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityRow {
    pub metric: &'static str,
    pub impact: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReturnPoint {
    pub name: &'static str,
    pub risk: u8,
    #[serde(rename = "return")]
    pub expected_return: f64,
    pub size: u32,
}

pub fn scenario_comparison(scenarios: &ScenarioSet) -> Vec<ScenarioComparisonRow> {
    scenarios
        .iter()
        .map(|result| ScenarioComparisonRow {
            scenario: result.scenario.label(),
            roi: result.projected.roi,
            benefit: result.total_annual_benefit,
            payback: result.projected.payback_months,
        })
        .collect()
}

/// The EA investment (realistic case) followed by each alternative.
pub fn investment_comparison(
    inputs: &Inputs,
    scenarios: &ScenarioSet,
    alternatives: &[AlternativeOutcome],
) -> Vec<InvestmentComparisonRow> {
    let realistic = scenarios.get(Scenario::Realistic);
    let ea = InvestmentComparisonRow {
        investment: EA_INVESTMENT_LABEL,
        cost: inputs.ea_cost,
        roi: realistic.projected.roi,
        risk: RiskLevel::Medium,
        payback: realistic.projected.payback_months,
    };

    std::iter::once(ea)
        .chain(alternatives.iter().map(|outcome| InvestmentComparisonRow {
            investment: outcome.alternative.label(),
            cost: outcome.cost,
            roi: outcome.roi,
            risk: outcome.alternative.risk(),
            payback: outcome.alternative.payback_months(),
        }))
        .collect()
}

pub fn sensitivity_rows(entries: &[SensitivityEntry]) -> Vec<SensitivityRow> {
    entries
        .iter()
        .map(|entry| SensitivityRow {
            metric: entry.metric.label(),
            impact: entry.impact,
            color: entry.metric.color(),
        })
        .collect()
}

pub fn risk_return_map(scenarios: &ScenarioSet) -> Vec<RiskReturnPoint> {
    scenarios
        .iter()
        .map(|result| RiskReturnPoint {
            name: result.scenario.label(),
            risk: result.scenario.risk_rank(),
            expected_return: result.projected.roi,
            size: result.scenario.marker_size(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::alternatives::compare_alternatives;
    use crate::core::{Metric, ModelState};
    use crate::scenario::ScenarioEngine;

    fn scenarios() -> (ModelState, ScenarioSet) {
        let state = ModelState::default();
        let set = ScenarioEngine::new().run_all(&state).unwrap();
        (state, set)
    }

    #[test]
    fn scenario_rows_in_fixed_order() {
        let (_, set) = scenarios();
        let rows = scenario_comparison(&set);
        let names: Vec<_> = rows.iter().map(|r| r.scenario).collect();
        assert_eq!(names, vec!["Conservative", "Realistic", "Optimistic"]);
        assert_eq!(rows[1].roi, set.realistic.projected.roi);
        assert_eq!(rows[2].benefit, set.optimistic.total_annual_benefit);
    }

    #[test]
    fn investment_rows_lead_with_ea() {
        let (state, set) = scenarios();
        let rows = investment_comparison(
            &state.inputs,
            &set,
            &compare_alternatives(&state.inputs),
        );

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].investment, EA_INVESTMENT_LABEL);
        assert_eq!(rows[0].cost, 200_000.0);
        assert_eq!(rows[0].risk, RiskLevel::Medium);
        assert_eq!(rows[0].payback, set.realistic.projected.payback_months);
        assert_eq!(rows[2].investment, "Marketing Campaign");
        assert_eq!(rows[2].risk, RiskLevel::High);
        assert_eq!(rows[2].payback, 6.0);
    }

    #[test]
    fn sensitivity_rows_carry_label_and_color() {
        let rows = sensitivity_rows(&[SensitivityEntry {
            metric: Metric::WinRate,
            impact: 87.5,
            perturbed_roi: 441.1,
        }]);
        assert_eq!(rows[0].metric, "Current Win Rate (%)");
        assert_eq!(rows[0].color, "#F59E0B");
    }

    #[test]
    fn risk_return_points() {
        let (_, set) = scenarios();
        let points = risk_return_map(&set);
        let axes: Vec<_> = points.iter().map(|p| (p.risk, p.size)).collect();
        assert_eq!(axes, vec![(3, 100), (5, 150), (7, 200)]);
        assert_eq!(points[0].expected_return, set.conservative.projected.roi);

        let json = serde_json::to_value(&points[0]).unwrap();
        assert!(json.get("return").is_some());
    }
}
