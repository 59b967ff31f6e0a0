//! Per-metric uplift rules.
//!
//! Each row says how far a metric can move (`base_uplift`), how the moved
//! value is bounded, and how the move turns into money. The engine walks the
//! rows without knowing anything metric-specific.

use serde::Serialize;
use std::fmt;

use crate::core::{Inputs, Metric};

/// What the engine knows when a metric's benefit is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct BenefitContext<'a> {
    pub inputs: &'a Inputs,
    /// `pipeline × winRate / 100` at baseline.
    pub current_revenue: f64,
    /// Revenue gains accumulated by metrics earlier in the pass.
    pub revenue_gains: f64,
}

/// `(context, projected value, adjusted uplift) -> dollars`
pub type BenefitFn = fn(&BenefitContext<'_>, f64, f64) -> f64;

/// Where a metric's dollar benefit is booked.
#[derive(Clone, Copy)]
pub enum Contribution {
    /// Moves the displayed projection only.
    None,
    /// Top-line revenue; visible to later metrics through `revenue_gains`.
    Revenue(BenefitFn),
    /// Booked straight into total annual benefit.
    AnnualBenefit(BenefitFn),
}

impl fmt::Debug for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Revenue(_) => f.write_str("Revenue"),
            Self::AnnualBenefit(_) => f.write_str("AnnualBenefit"),
        }
    }
}

impl Contribution {
    pub fn target(&self) -> BenefitTarget {
        match self {
            Self::None => BenefitTarget::ProjectionOnly,
            Self::Revenue(_) => BenefitTarget::Revenue,
            Self::AnnualBenefit(_) => BenefitTarget::AnnualBenefit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitTarget {
    ProjectionOnly,
    Revenue,
    AnnualBenefit,
}

/// Sign convention of a metric's reported improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bigger is better: `projected − current`.
    Increase,
    /// Smaller is better: `current − projected`.
    Reduction,
}

#[derive(Debug, Clone, Copy)]
pub struct UpliftRule {
    pub metric: Metric,
    /// Fractional move at full confidence in the realistic scenario.
    /// Negative for metrics where a reduction is the goal.
    pub base_uplift: f64,
    pub ceiling: Option<f64>,
    pub floor: Option<f64>,
    /// Round the projection up to a whole unit (headcount).
    pub whole_units: bool,
    pub direction: Direction,
    pub contribution: Contribution,
}

impl UpliftRule {
    const fn scaled(metric: Metric, base_uplift: f64, contribution: Contribution) -> Self {
        Self {
            metric,
            base_uplift,
            ceiling: None,
            floor: None,
            whole_units: false,
            direction: if base_uplift < 0.0 {
                Direction::Reduction
            } else {
                Direction::Increase
            },
            contribution,
        }
    }

    const fn capped_at(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    const fn floored_at(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    const fn in_whole_units(mut self) -> Self {
        self.whole_units = true;
        self
    }

    /// Same rule with a different base uplift.
    pub fn with_base_uplift(mut self, base_uplift: f64) -> Self {
        self.base_uplift = base_uplift;
        self
    }

    pub fn project(&self, baseline: f64, adjusted_uplift: f64) -> f64 {
        let mut projected = baseline * (1.0 + adjusted_uplift);
        if self.whole_units {
            projected = projected.ceil();
        }
        if let Some(ceiling) = self.ceiling {
            projected = projected.min(ceiling);
        }
        if let Some(floor) = self.floor {
            projected = projected.max(floor);
        }
        projected
    }

    pub fn improvement(&self, current: f64, projected: f64) -> f64 {
        match self.direction {
            Direction::Increase => projected - current,
            Direction::Reduction => current - projected,
        }
    }
}

fn win_rate_revenue(ctx: &BenefitContext<'_>, projected: f64, _u: f64) -> f64 {
    ctx.inputs.pipeline * (projected / 100.0) - ctx.current_revenue
}

fn deal_size_revenue(ctx: &BenefitContext<'_>, projected: f64, _u: f64) -> f64 {
    let deal_size = ctx.inputs.deal_size;
    if deal_size == 0.0 {
        return 0.0;
    }
    let deal_count = ctx.inputs.pipeline / deal_size;
    deal_count * (projected - deal_size) * (ctx.inputs.win_rate / 100.0)
}

fn cycle_acceleration(ctx: &BenefitContext<'_>, _projected: f64, u: f64) -> f64 {
    ctx.current_revenue * u.abs()
}

fn retention_benefit(ctx: &BenefitContext<'_>, _projected: f64, u: f64) -> f64 {
    ctx.current_revenue * (u * 0.8)
}

// Uses revenue gained earlier in the same pass, so row order matters.
fn margin_benefit(ctx: &BenefitContext<'_>, _projected: f64, u: f64) -> f64 {
    (ctx.current_revenue + ctx.revenue_gains) * (u * (ctx.inputs.gross_margin / 100.0))
}

fn expansion_benefit(ctx: &BenefitContext<'_>, _projected: f64, u: f64) -> f64 {
    ctx.current_revenue * (u * (ctx.inputs.expansion / 100.0))
}

fn arr_benefit(ctx: &BenefitContext<'_>, projected: f64, _u: f64) -> f64 {
    (projected - ctx.inputs.arr) * 0.3
}

fn nps_benefit(ctx: &BenefitContext<'_>, _projected: f64, u: f64) -> f64 {
    ctx.current_revenue * (u * 0.1)
}

fn churn_benefit(ctx: &BenefitContext<'_>, _projected: f64, u: f64) -> f64 {
    ctx.current_revenue * (u.abs() * (ctx.inputs.churn / 100.0))
}

/// The standard rule set, one row per metric in engine order.
pub static UPLIFT_TABLE: [UpliftRule; 12] = [
    UpliftRule::scaled(Metric::Pipeline, 0.20, Contribution::None),
    UpliftRule::scaled(Metric::DealSize, 0.25, Contribution::Revenue(deal_size_revenue)),
    UpliftRule::scaled(Metric::WinRate, 0.35, Contribution::Revenue(win_rate_revenue)),
    UpliftRule::scaled(Metric::SalesCycle, -0.30, Contribution::Revenue(cycle_acceleration)),
    UpliftRule::scaled(Metric::Retention, 0.15, Contribution::AnnualBenefit(retention_benefit))
        .capped_at(95.0),
    UpliftRule::scaled(Metric::TeamSize, 0.15, Contribution::None).in_whole_units(),
    UpliftRule::scaled(Metric::GrossMargin, 0.10, Contribution::AnnualBenefit(margin_benefit))
        .capped_at(90.0),
    UpliftRule::scaled(Metric::Expansion, 0.25, Contribution::AnnualBenefit(expansion_benefit)),
    UpliftRule::scaled(Metric::Arr, 0.20, Contribution::AnnualBenefit(arr_benefit)),
    UpliftRule::scaled(Metric::Nps, 0.30, Contribution::AnnualBenefit(nps_benefit))
        .capped_at(80.0),
    UpliftRule::scaled(Metric::Churn, -0.25, Contribution::AnnualBenefit(churn_benefit))
        .floored_at(2.0),
    UpliftRule::scaled(Metric::Cltv, 0.18, Contribution::None),
];

pub fn standard_rules() -> Vec<UpliftRule> {
    UPLIFT_TABLE.to_vec()
}

pub fn base_uplift(metric: Metric) -> f64 {
    UPLIFT_TABLE[metric as usize].base_uplift
}
