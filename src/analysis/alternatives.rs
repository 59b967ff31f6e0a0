//! Fixed-return alternative investments the EA spend is compared against.

use serde::Serialize;

use crate::core::{InputField, Inputs, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Alternative {
    SalesRep,
    Marketing,
    Training,
}

impl Alternative {
    pub const ALL: [Alternative; 3] = [
        Alternative::SalesRep,
        Alternative::Marketing,
        Alternative::Training,
    ];

    /// Benefit returned per dollar spent.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::SalesRep => 4.0,
            Self::Marketing => 2.5,
            Self::Training => 3.0,
        }
    }

    pub fn cost_field(&self) -> InputField {
        match self {
            Self::SalesRep => InputField::AdditionalSalesRep,
            Self::Marketing => InputField::MarketingSpend,
            Self::Training => InputField::SalesTraining,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SalesRep => "Additional Sales Rep",
            Self::Marketing => "Marketing Campaign",
            Self::Training => "Sales Training",
        }
    }

    pub fn risk(&self) -> RiskLevel {
        match self {
            Self::SalesRep | Self::Training => RiskLevel::Low,
            Self::Marketing => RiskLevel::High,
        }
    }

    /// Typical payback period, in months.
    pub fn payback_months(&self) -> f64 {
        match self {
            Self::SalesRep => 3.0,
            Self::Marketing => 6.0,
            Self::Training => 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeOutcome {
    pub alternative: Alternative,
    pub cost: f64,
    pub benefit: f64,
    pub roi: f64,
}

pub fn evaluate(alternative: Alternative, cost: f64) -> AlternativeOutcome {
    let benefit = cost * alternative.multiplier();
    let roi = if cost != 0.0 {
        (benefit - cost) / cost * 100.0
    } else {
        0.0
    };
    AlternativeOutcome {
        alternative,
        cost,
        benefit,
        roi,
    }
}

pub fn compare_alternatives(inputs: &Inputs) -> Vec<AlternativeOutcome> {
    Alternative::ALL
        .into_iter()
        .map(|alt| evaluate(alt, inputs.get(alt.cost_field())))
        .collect()
}
