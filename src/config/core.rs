use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::SensitivityConfig;
use crate::core::{
    ConfigurationError, EnabledMetrics, Evidence, Inputs, Metric, ModelState, RiskFactor,
    RiskFactors, RiskLevel,
};

/// Root configuration structure for roimap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoimapConfig {
    /// Baseline business inputs; missing keys keep their defaults
    #[serde(default)]
    pub inputs: Option<Inputs>,

    /// Which metrics the EA hire is expected to move
    #[serde(default)]
    pub metrics: Option<MetricsConfig>,

    /// Per-metric risk overrides, keyed by metric name
    #[serde(default)]
    pub risk: BTreeMap<String, RiskFactorConfig>,

    #[serde(default)]
    pub sensitivity: Option<SensitivityConfig>,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Partial risk factor. Unset fields fall back to the metric's default rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskFactorConfig {
    pub probability: Option<u32>,
    pub evidence: Option<Evidence>,
    pub risk: Option<RiskLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub default_format: Option<String>,
}

impl RiskFactorConfig {
    fn apply(&self, metric: Metric, base: RiskFactor) -> Result<RiskFactor, ConfigurationError> {
        let probability = match self.probability {
            Some(value) if value > 100 => {
                return Err(ConfigurationError::InvalidProbability { metric, value });
            }
            Some(value) => value as u8,
            None => base.probability,
        };

        Ok(RiskFactor {
            probability,
            evidence: self.evidence.unwrap_or(base.evidence),
            risk: self.risk.unwrap_or(base.risk),
        })
    }
}

impl RoimapConfig {
    /// Build the model state this configuration describes.
    ///
    /// Starts from the default model and overlays each section present in
    /// the file. Every metric keeps a risk factor, so enabling a metric
    /// through configuration can never leave it unrated.
    pub fn to_state(&self) -> Result<ModelState, ConfigurationError> {
        let inputs = self.inputs.unwrap_or_default();

        let enabled = match &self.metrics {
            Some(metrics) => {
                let parsed = metrics
                    .enabled
                    .iter()
                    .map(|name| name.parse::<Metric>())
                    .collect::<Result<Vec<_>, _>>()?;
                EnabledMetrics::only(&parsed)
            }
            None => EnabledMetrics::default(),
        };

        let mut risk_factors = RiskFactors::default();
        for (name, overrides) in &self.risk {
            let metric: Metric = name.parse()?;
            let base = risk_factors.get(metric).copied().unwrap_or_default();
            risk_factors.insert(metric, overrides.apply(metric, base)?);
        }

        let state = ModelState::new(inputs, enabled, risk_factors);
        state.validate()?;
        Ok(state)
    }

    pub fn sensitivity(&self) -> SensitivityConfig {
        self.sensitivity.unwrap_or_default()
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.as_ref()?.default_format.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_is_default_model() {
        let state = RoimapConfig::default().to_state().unwrap();
        assert_eq!(state, ModelState::default());
    }

    #[test]
    fn risk_override_keeps_unset_fields() {
        let mut config = RoimapConfig::default();
        config.risk.insert(
            "winRate".to_string(),
            RiskFactorConfig {
                probability: Some(90),
                ..Default::default()
            },
        );

        let state = config.to_state().unwrap();
        let default = *RiskFactors::default().get(Metric::WinRate).unwrap();
        let factor = state.risk_factors.get(Metric::WinRate).unwrap();
        assert_eq!(factor.probability, 90);
        assert_eq!(factor.evidence, default.evidence);
        assert_eq!(factor.risk, default.risk);
    }

    #[test]
    fn probability_over_100_is_rejected() {
        let mut config = RoimapConfig::default();
        config.risk.insert(
            "churn".to_string(),
            RiskFactorConfig {
                probability: Some(150),
                ..Default::default()
            },
        );

        assert_eq!(
            config.to_state(),
            Err(ConfigurationError::InvalidProbability {
                metric: Metric::Churn,
                value: 150
            })
        );
    }

    #[test]
    fn unknown_metric_names_are_rejected() {
        let config = RoimapConfig {
            metrics: Some(MetricsConfig {
                enabled: vec!["pipeline".into(), "velocity".into()],
            }),
            ..Default::default()
        };

        assert_eq!(
            config.to_state(),
            Err(ConfigurationError::UnknownField("velocity".into()))
        );
    }

    #[test]
    fn enabled_list_replaces_defaults() {
        let config = RoimapConfig {
            metrics: Some(MetricsConfig {
                enabled: vec!["nps".into(), "churn".into()],
            }),
            ..Default::default()
        };

        let state = config.to_state().unwrap();
        let enabled: Vec<_> = state.enabled.iter().collect();
        assert_eq!(enabled, vec![Metric::Nps, Metric::Churn]);
    }
}
