//! Shared error types for the scenario model

use thiserror::Error;

use super::types::Metric;

/// Problems with how the model was configured.
///
/// These abort a calculation pass and are reported to the user with their
/// specific message, distinct from numeric failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown scenario '{0}' (expected conservative, realistic or optimistic)")]
    UnknownScenario(String),

    #[error("unknown evidence level '{0}' (expected none, anecdotal, some or strong)")]
    UnknownEvidence(String),

    #[error("unknown risk level '{0}' (expected low, medium or high)")]
    UnknownRiskLevel(String),

    #[error("unknown metric or input field '{0}'")]
    UnknownField(String),

    #[error("enabled metric '{0}' has no risk factor")]
    MissingRiskFactor(Metric),

    #[error("probability for '{metric}' must be between 0 and 100, got {value}")]
    InvalidProbability { metric: Metric, value: u32 },

    #[error("input '{field}' must be a finite, non-negative number, got {value}")]
    InvalidInput { field: String, value: f64 },

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },
}

/// Main error type for roimap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Engine produced a value that cannot be displayed (overflow, NaN)
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the user can fix the problem by correcting the model setup.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Message suitable for end users.
    ///
    /// Configuration problems keep their detail; everything else collapses
    /// into the generic calculation failure notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(e) => e.to_string(),
            _ => CALCULATION_FAILED.to_string(),
        }
    }
}

/// Generic notice shown when a calculation pass fails for a non-configuration reason.
pub const CALCULATION_FAILED: &str = "Calculation failed. Please check your inputs.";

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
