//! Risk-adjusted ROI scenarios for an Enterprise Architect hire.
//!
//! The model takes baseline business metrics, a set of metrics the hire is
//! expected to improve, and a risk rating per metric. It produces
//! conservative, realistic and optimistic projections, a confidence score,
//! a ranking of which risk ratings matter most, and a comparison against
//! simpler alternative investments.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod risk;
pub mod scenario;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ConfigurationError, EnabledMetrics, Error, Evidence, InputField, Inputs, Metric, ModelState,
    Result, RiskFactor, RiskFactors, RiskLevel, Scenario, CALCULATION_FAILED,
};

pub use crate::analysis::{
    analyze, compare_alternatives, AnalysisReport, Analyzer, SensitivityAnalyzer,
    SensitivityConfig, SensitivityEntry,
};

pub use crate::config::{load_config, RoimapConfig};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::risk::{confidence_score, generate_risk_insights, RiskInsights};

pub use crate::scenario::{ScenarioEngine, ScenarioResult, ScenarioSet};

pub use crate::session::ModelSession;
