pub mod coerce;
pub mod errors;
pub mod state;
pub mod types;

pub use coerce::{coerce_number, coerce_probability};
pub use errors::{ConfigurationError, Error, Result, CALCULATION_FAILED};
pub use state::{EnabledMetrics, InputField, Inputs, ModelState, RiskFactors};
pub use types::{Evidence, Metric, RiskFactor, RiskLevel, Scenario, ValueKind};
