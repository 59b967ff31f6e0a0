//! User-editable model state.
//!
//! Everything a calculation pass reads lives in [`ModelState`], which is
//! passed explicitly into the engine. Risk factors and the enabled set are
//! persistent maps (`im::OrdMap`) so a perturbed copy shares structure with
//! the original and never aliases it mutably.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ConfigurationError;
use super::types::{Evidence, Metric, RiskFactor, RiskLevel};

/// Anything a user can type a number into: a metric baseline, the EA
/// investment, or one of the alternative investment costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Metric(Metric),
    EaCost,
    AdditionalSalesRep,
    MarketingSpend,
    SalesTraining,
}

impl InputField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Metric(m) => m.key(),
            Self::EaCost => "eaCost",
            Self::AdditionalSalesRep => "additionalSalesRep",
            Self::MarketingSpend => "marketingSpend",
            Self::SalesTraining => "salesTraining",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InputField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(metric) = s.parse::<Metric>() {
            return Ok(Self::Metric(metric));
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "eacost" => Ok(Self::EaCost),
            "additionalsalesrep" => Ok(Self::AdditionalSalesRep),
            "marketingspend" => Ok(Self::MarketingSpend),
            "salestraining" => Ok(Self::SalesTraining),
            _ => Err(ConfigurationError::UnknownField(s.to_string())),
        }
    }
}

/// Baseline values entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Inputs {
    pub pipeline: f64,
    pub deal_size: f64,
    pub win_rate: f64,
    pub sales_cycle: f64,
    pub retention: f64,
    pub team_size: f64,
    pub gross_margin: f64,
    pub expansion: f64,
    pub arr: f64,
    pub nps: f64,
    pub churn: f64,
    pub cltv: f64,
    pub ea_cost: f64,
    pub additional_sales_rep: f64,
    pub marketing_spend: f64,
    pub sales_training: f64,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            pipeline: 10_000_000.0,
            deal_size: 100_000.0,
            win_rate: 25.0,
            sales_cycle: 9.0,
            retention: 85.0,
            team_size: 8.0,
            gross_margin: 65.0,
            expansion: 12.0,
            arr: 5_000_000.0,
            nps: 35.0,
            churn: 18.0,
            cltv: 250_000.0,
            ea_cost: 200_000.0,
            additional_sales_rep: 150_000.0,
            marketing_spend: 300_000.0,
            sales_training: 100_000.0,
        }
    }
}

impl Inputs {
    /// All-zero inputs; useful as a starting point in tests and fixtures.
    pub fn zeroed() -> Self {
        Self {
            pipeline: 0.0,
            deal_size: 0.0,
            win_rate: 0.0,
            sales_cycle: 0.0,
            retention: 0.0,
            team_size: 0.0,
            gross_margin: 0.0,
            expansion: 0.0,
            arr: 0.0,
            nps: 0.0,
            churn: 0.0,
            cltv: 0.0,
            ea_cost: 0.0,
            additional_sales_rep: 0.0,
            marketing_spend: 0.0,
            sales_training: 0.0,
        }
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        self.get(InputField::Metric(metric))
    }

    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::Metric(m) => match m {
                Metric::Pipeline => self.pipeline,
                Metric::DealSize => self.deal_size,
                Metric::WinRate => self.win_rate,
                Metric::SalesCycle => self.sales_cycle,
                Metric::Retention => self.retention,
                Metric::TeamSize => self.team_size,
                Metric::GrossMargin => self.gross_margin,
                Metric::Expansion => self.expansion,
                Metric::Arr => self.arr,
                Metric::Nps => self.nps,
                Metric::Churn => self.churn,
                Metric::Cltv => self.cltv,
            },
            InputField::EaCost => self.ea_cost,
            InputField::AdditionalSalesRep => self.additional_sales_rep,
            InputField::MarketingSpend => self.marketing_spend,
            InputField::SalesTraining => self.sales_training,
        }
    }

    pub fn set(&mut self, field: InputField, value: f64) {
        let slot = match field {
            InputField::Metric(m) => match m {
                Metric::Pipeline => &mut self.pipeline,
                Metric::DealSize => &mut self.deal_size,
                Metric::WinRate => &mut self.win_rate,
                Metric::SalesCycle => &mut self.sales_cycle,
                Metric::Retention => &mut self.retention,
                Metric::TeamSize => &mut self.team_size,
                Metric::GrossMargin => &mut self.gross_margin,
                Metric::Expansion => &mut self.expansion,
                Metric::Arr => &mut self.arr,
                Metric::Nps => &mut self.nps,
                Metric::Churn => &mut self.churn,
                Metric::Cltv => &mut self.cltv,
            },
            InputField::EaCost => &mut self.ea_cost,
            InputField::AdditionalSalesRep => &mut self.additional_sales_rep,
            InputField::MarketingSpend => &mut self.marketing_spend,
            InputField::SalesTraining => &mut self.sales_training,
        };
        *slot = value;
    }

    /// Builder-style variant of [`Inputs::set`].
    pub fn with(mut self, field: InputField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn fields() -> impl Iterator<Item = InputField> {
        Metric::ALL.into_iter().map(InputField::Metric).chain([
            InputField::EaCost,
            InputField::AdditionalSalesRep,
            InputField::MarketingSpend,
            InputField::SalesTraining,
        ])
    }

    /// Every baseline must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        Self::fields()
            .map(|field| (field, self.get(field)))
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
            .map_or(Ok(()), |(field, value)| {
                Err(ConfigurationError::InvalidInput {
                    field: field.key().to_string(),
                    value,
                })
            })
    }
}

/// Which metrics participate in the uplift computation.
///
/// A metric missing from the map counts as disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnabledMetrics(OrdMap<Metric, bool>);

impl Default for EnabledMetrics {
    fn default() -> Self {
        Self::only(&[Metric::Pipeline, Metric::DealSize, Metric::WinRate])
    }
}

impl EnabledMetrics {
    pub fn none() -> Self {
        Self(Metric::ALL.into_iter().map(|m| (m, false)).collect())
    }

    pub fn all() -> Self {
        Self(Metric::ALL.into_iter().map(|m| (m, true)).collect())
    }

    pub fn only(metrics: &[Metric]) -> Self {
        Self(
            Metric::ALL
                .into_iter()
                .map(|m| (m, metrics.contains(&m)))
                .collect(),
        )
    }

    pub fn is_enabled(&self, metric: Metric) -> bool {
        self.0.get(&metric).copied().unwrap_or(false)
    }

    pub fn set(&mut self, metric: Metric, enabled: bool) {
        self.0.insert(metric, enabled);
    }

    pub fn toggle(&mut self, metric: Metric) {
        let next = !self.is_enabled(metric);
        self.set(metric, next);
    }

    /// Enabled metrics in engine order.
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL.into_iter().filter(|m| self.is_enabled(*m))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

/// Per-metric risk ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskFactors(OrdMap<Metric, RiskFactor>);

impl Default for RiskFactors {
    fn default() -> Self {
        use Evidence::{Anecdotal, SomeData, StrongData};
        use RiskLevel::{High, Low, Medium};

        Self(
            vec![
                (Metric::Pipeline, RiskFactor::new(70, SomeData, Medium)),
                (Metric::DealSize, RiskFactor::new(65, Anecdotal, Medium)),
                (Metric::WinRate, RiskFactor::new(80, StrongData, Low)),
                (Metric::SalesCycle, RiskFactor::new(60, SomeData, High)),
                (Metric::Retention, RiskFactor::new(75, StrongData, Low)),
                (Metric::TeamSize, RiskFactor::new(85, StrongData, Low)),
                (Metric::GrossMargin, RiskFactor::new(55, Anecdotal, High)),
                (Metric::Expansion, RiskFactor::new(70, SomeData, Medium)),
                (Metric::Arr, RiskFactor::new(65, SomeData, Medium)),
                (Metric::Nps, RiskFactor::new(80, StrongData, Low)),
                (Metric::Churn, RiskFactor::new(75, StrongData, Low)),
                (Metric::Cltv, RiskFactor::new(60, SomeData, Medium)),
            ]
            .into_iter()
            .collect(),
        )
    }
}

impl RiskFactors {
    pub fn empty() -> Self {
        Self(OrdMap::new())
    }

    pub fn get(&self, metric: Metric) -> Option<&RiskFactor> {
        self.0.get(&metric)
    }

    /// Risk factor for a metric that takes part in weighting.
    pub fn require(&self, metric: Metric) -> Result<&RiskFactor, ConfigurationError> {
        self.get(metric)
            .ok_or(ConfigurationError::MissingRiskFactor(metric))
    }

    pub fn insert(&mut self, metric: Metric, factor: RiskFactor) {
        self.0.insert(metric, factor);
    }

    /// New map with one factor replaced. `self` is left untouched.
    pub fn with(&self, metric: Metric, factor: RiskFactor) -> Self {
        Self(self.0.update(metric, factor))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &RiskFactor)> + '_ {
        self.0.iter().map(|(m, f)| (*m, f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.iter().find(|(_, f)| f.probability > 100) {
            Some((metric, factor)) => Err(ConfigurationError::InvalidProbability {
                metric,
                value: u32::from(factor.probability),
            }),
            None => Ok(()),
        }
    }
}

impl FromIterator<(Metric, RiskFactor)> for RiskFactors {
    fn from_iter<I: IntoIterator<Item = (Metric, RiskFactor)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything a calculation pass reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelState {
    pub inputs: Inputs,
    pub enabled: EnabledMetrics,
    pub risk_factors: RiskFactors,
}

impl ModelState {
    pub fn new(inputs: Inputs, enabled: EnabledMetrics, risk_factors: RiskFactors) -> Self {
        Self {
            inputs,
            enabled,
            risk_factors,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.inputs.validate()?;
        self.risk_factors.validate()?;
        match self
            .enabled
            .iter()
            .find(|m| self.risk_factors.get(*m).is_none())
        {
            Some(metric) => Err(ConfigurationError::MissingRiskFactor(metric)),
            None => Ok(()),
        }
    }
}
