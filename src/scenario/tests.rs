use super::*;
use crate::core::{ConfigurationError, Evidence, InputField, RiskFactor, RiskLevel};

const EPS: f64 = 1e-6;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < EPS * expected.abs().max(1.0)
}

fn base_inputs() -> Inputs {
    Inputs::default()
}

fn state_with(enabled: &[Metric]) -> ModelState {
    ModelState::new(
        base_inputs(),
        EnabledMetrics::only(enabled),
        RiskFactors::default(),
    )
}

#[test]
fn current_revenue_is_pipeline_times_win_rate() {
    let engine = ScenarioEngine::new();
    let result = engine
        .run_state(&state_with(&[]), Scenario::Realistic)
        .unwrap();
    assert_eq!(result.current.revenue, 2_500_000.0);
    assert_eq!(result.projected.revenue, 2_500_000.0);
}

#[test]
fn pipeline_only_contributes_no_benefit() {
    let engine = ScenarioEngine::new();
    let inputs = Inputs::zeroed()
        .with(InputField::Metric(Metric::Pipeline), 10_000_000.0)
        .with(InputField::Metric(Metric::DealSize), 100_000.0)
        .with(InputField::Metric(Metric::WinRate), 25.0)
        .with(InputField::EaCost, 200_000.0);
    let factors = RiskFactors::empty().with(
        Metric::Pipeline,
        RiskFactor::new(70, Evidence::SomeData, RiskLevel::Medium),
    );

    let result = engine
        .run(
            &inputs,
            &EnabledMetrics::only(&[Metric::Pipeline]),
            &factors,
            Scenario::Realistic,
        )
        .unwrap();

    assert!(close(result.breakdown[0].adjusted_uplift, 0.0952));
    assert!(close(result.projected(Metric::Pipeline), 10_952_000.0));
    assert!(close(result.improvement(Metric::Pipeline), 952_000.0));
    assert_eq!(result.total_annual_benefit, 0.0);
    assert_eq!(result.roi(), -100.0);
    assert_eq!(result.payback_months(), 0.0);
    assert_eq!(result.projected.net_present_value, -200_000.0);
}

#[test]
fn default_form_realistic_scenario() {
    let engine = ScenarioEngine::new();
    let result = engine
        .run_state(
            &state_with(&[Metric::Pipeline, Metric::DealSize, Metric::WinRate]),
            Scenario::Realistic,
        )
        .unwrap();

    // dealSize: 0.25 × (0.6 × 0.85 × 0.65) → 100 deals × 8,287.5 × 25%
    // winRate: 0.35 × 0.8 → 32% of 10M minus 2.5M
    let expected_benefit = 207_187.5 + 700_000.0;
    assert!(close(result.total_annual_benefit, expected_benefit));
    assert!(close(result.improvements.revenue, expected_benefit));
    assert!(close(result.projected.revenue, 2_500_000.0 + expected_benefit));
    assert!(close(result.roi(), (expected_benefit - 200_000.0) / 200_000.0 * 100.0));
    assert!(close(result.payback_months(), 200_000.0 / expected_benefit * 12.0));
    assert!(close(
        result.projected.net_present_value,
        expected_benefit * 3.0 - 200_000.0
    ));
    assert!(close(result.projected(Metric::WinRate), 32.0));
}

#[test]
fn disabling_everything_gives_minus_100_roi() {
    let engine = ScenarioEngine::new();
    for scenario in Scenario::ALL {
        let result = engine.run_state(&state_with(&[]), scenario).unwrap();
        assert_eq!(result.total_annual_benefit, 0.0);
        assert_eq!(result.roi(), -100.0);
        assert!(result.breakdown.is_empty());
    }
}

#[test]
fn disabled_metrics_keep_baseline() {
    let engine = ScenarioEngine::new();
    let result = engine
        .run_state(&state_with(&[Metric::WinRate]), Scenario::Optimistic)
        .unwrap();
    for metric in Metric::ALL {
        if metric == Metric::WinRate {
            continue;
        }
        assert_eq!(result.projected(metric), result.current(metric), "{metric}");
        assert_eq!(result.improvement(metric), 0.0, "{metric}");
    }
}

#[test]
fn margin_benefit_compounds_on_win_rate_gain() {
    let engine = ScenarioEngine::new();
    let result = engine
        .run_state(
            &state_with(&[Metric::WinRate, Metric::GrossMargin]),
            Scenario::Realistic,
        )
        .unwrap();

    // grossMargin: 0.10 × (0.6 × 0.7 × 0.55) on (2.5M + 700k) at 65%
    let margin = 3_200_000.0 * (0.0231 * 0.65);
    assert!(close(result.total_annual_benefit, 700_000.0 + margin));
    // margin is booked as benefit, not revenue
    assert!(close(result.improvements.revenue, 700_000.0));
}

#[test]
fn reduction_metrics_report_positive_improvement() {
    let engine = ScenarioEngine::new();
    let result = engine
        .run_state(
            &state_with(&[Metric::SalesCycle, Metric::Churn]),
            Scenario::Realistic,
        )
        .unwrap();

    assert!(result.projected(Metric::SalesCycle) < 9.0);
    assert!(result.improvement(Metric::SalesCycle) > 0.0);
    assert!(result.projected(Metric::Churn) < 18.0);
    assert!(result.improvement(Metric::Churn) > 0.0);
    assert!(result.total_annual_benefit > 0.0);
}

#[test]
fn team_size_and_cltv_do_not_feed_benefit() {
    let engine = ScenarioEngine::new();
    let result = engine
        .run_state(
            &state_with(&[Metric::TeamSize, Metric::Cltv]),
            Scenario::Optimistic,
        )
        .unwrap();

    assert_eq!(result.total_annual_benefit, 0.0);
    assert_eq!(result.projected(Metric::TeamSize), 10.0);
    assert!(result.improvement(Metric::Cltv) > 0.0);
}

#[test]
fn zero_deal_size_is_guarded() {
    let engine = ScenarioEngine::new();
    let mut state = state_with(&[Metric::DealSize]);
    state.inputs.deal_size = 0.0;

    let result = engine.run_state(&state, Scenario::Optimistic).unwrap();
    assert_eq!(result.total_annual_benefit, 0.0);
    assert_eq!(result.projected(Metric::DealSize), 0.0);
}

#[test]
fn zero_ea_cost_gives_zero_roi() {
    let engine = ScenarioEngine::new();
    let mut state = state_with(&[Metric::WinRate]);
    state.inputs.ea_cost = 0.0;

    let result = engine.run_state(&state, Scenario::Realistic).unwrap();
    assert_eq!(result.roi(), 0.0);
    assert_eq!(result.payback_months(), 0.0);
    assert!(result.projected.net_present_value > 0.0);
}

#[test]
fn negative_ea_cost_is_configuration_error() {
    let engine = ScenarioEngine::new();
    let mut state = state_with(&[Metric::WinRate]);
    state.inputs.ea_cost = -5.0;

    let err = engine.run_state(&state, Scenario::Realistic).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn missing_risk_factor_is_configuration_error() {
    let engine = ScenarioEngine::new();
    let state = ModelState::new(
        base_inputs(),
        EnabledMetrics::only(&[Metric::Nps]),
        RiskFactors::empty(),
    );

    match engine.run_state(&state, Scenario::Realistic) {
        Err(Error::Configuration(ConfigurationError::MissingRiskFactor(Metric::Nps))) => {}
        other => panic!("expected missing risk factor, got {other:?}"),
    }
}

#[test]
fn unknown_scenario_name_is_rejected() {
    let engine = ScenarioEngine::new();
    let err = engine
        .run_named(&state_with(&[Metric::WinRate]), "heroic")
        .unwrap_err();
    assert!(err.is_configuration());

    let ok = engine
        .run_named(&state_with(&[Metric::WinRate]), "optimistic")
        .unwrap();
    assert_eq!(ok.scenario, Scenario::Optimistic);
}

#[test]
fn overflow_is_a_calculation_error() {
    let engine = ScenarioEngine::new();
    let mut state = state_with(&[Metric::Arr]);
    state.inputs.arr = f64::MAX;
    state.risk_factors.insert(
        Metric::Arr,
        RiskFactor::new(100, Evidence::StrongData, RiskLevel::Low),
    );

    let err = engine.run_state(&state, Scenario::Optimistic).unwrap_err();
    assert!(matches!(err, Error::Calculation(_)));
}

#[test]
fn repeated_runs_are_identical() {
    let engine = ScenarioEngine::new();
    let state = ModelState::new(base_inputs(), EnabledMetrics::all(), RiskFactors::default());
    let first = engine.run_state(&state, Scenario::Realistic).unwrap();
    let second = engine.run_state(&state, Scenario::Realistic).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scenarios_are_ordered_by_roi() {
    let engine = ScenarioEngine::new();
    let state = ModelState::new(base_inputs(), EnabledMetrics::all(), RiskFactors::default());
    let set = engine.run_all(&state).unwrap();
    assert!(set.conservative.roi() <= set.realistic.roi());
    assert!(set.realistic.roi() <= set.optimistic.roi());
}

#[test]
fn custom_rules_leave_unlisted_metrics_alone() {
    let rules = vec![UPLIFT_TABLE[Metric::WinRate as usize]];
    let engine = ScenarioEngine::with_rules(rules);
    let result = engine
        .run_state(&state_with(&[Metric::WinRate, Metric::Pipeline]), Scenario::Realistic)
        .unwrap();

    assert_eq!(result.projected(Metric::Pipeline), 10_000_000.0);
    assert_eq!(result.breakdown.len(), 1);
}
