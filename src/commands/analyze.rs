use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::analysis::Analyzer;
use crate::config::{load_config, load_config_from, RoimapConfig};
use crate::core::{ConfigurationError, Error, InputField, Metric, Scenario};
use crate::formatting::FormattingConfig;
use crate::io::{create_writer, OutputFormat, RenderOptions, ReportView};
use crate::session::ModelSession;

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub config_path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub view: ReportView,
    pub scenario: String,
    pub enable: Vec<String>,
    pub disable: Vec<String>,
    pub assignments: Vec<String>,
    pub formatting: FormattingConfig,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            format: None,
            output: None,
            view: ReportView::All,
            scenario: Scenario::Realistic.key().to_string(),
            enable: Vec::new(),
            disable: Vec::new(),
            assignments: Vec::new(),
            formatting: FormattingConfig::from_env(),
        }
    }
}

/// A single `--set` override.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Input(InputField, String),
    Probability(Metric, String),
    Evidence(Metric, String),
    Risk(Metric, String),
}

impl Assignment {
    pub fn parse(raw: &str) -> std::result::Result<Self, ConfigurationError> {
        let (key, value) = raw.split_once('=').ok_or_else(|| ConfigurationError::Parse {
            origin: "--set".to_string(),
            message: format!("expected KEY=VALUE, got '{raw}'"),
        })?;
        let value = value.trim().to_string();

        match key.trim().split('.').collect::<Vec<_>>().as_slice() {
            ["risk", metric, attribute] => {
                let metric: Metric = metric.parse()?;
                match *attribute {
                    "probability" => Ok(Self::Probability(metric, value)),
                    "evidence" => Ok(Self::Evidence(metric, value)),
                    "risk" => Ok(Self::Risk(metric, value)),
                    other => Err(ConfigurationError::UnknownField(format!(
                        "risk.{}.{other}",
                        metric.key()
                    ))),
                }
            }
            [field] => Ok(Self::Input(field.parse()?, value)),
            _ => Err(ConfigurationError::UnknownField(key.to_string())),
        }
    }

    fn apply(&self, session: &mut ModelSession) -> crate::core::Result<()> {
        match self {
            Self::Input(field, value) => session.set_input(*field, value),
            Self::Probability(metric, value) => session.set_probability(*metric, value),
            Self::Evidence(metric, value) => session.set_evidence(*metric, value)?,
            Self::Risk(metric, value) => session.set_risk(*metric, value)?,
        }
        Ok(())
    }
}

fn load(config: &AnalyzeConfig) -> Result<RoimapConfig> {
    match &config.config_path {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()),
    }
}

/// Build the session described by the config file plus command-line overrides.
pub fn build_session(config: &AnalyzeConfig, file: &RoimapConfig) -> Result<ModelSession> {
    let state = file.to_state().map_err(Error::from)?;
    let mut session = ModelSession::new(state, Analyzer::with_sensitivity(file.sensitivity()));

    for name in &config.enable {
        session.set_enabled(name.parse::<Metric>().map_err(Error::from)?, true);
    }
    for name in &config.disable {
        session.set_enabled(name.parse::<Metric>().map_err(Error::from)?, false);
    }
    for raw in &config.assignments {
        let assignment = Assignment::parse(raw).map_err(Error::from)?;
        assignment.apply(&mut session)?;
    }

    Ok(session)
}

fn resolve_format(config: &AnalyzeConfig, file: &RoimapConfig) -> OutputFormat {
    if let Some(format) = config.format {
        return format;
    }
    match file.default_format() {
        Some(name) => OutputFormat::parse(name).unwrap_or_else(|| {
            log::warn!("Unknown output format '{name}' in config. Using terminal.");
            OutputFormat::Terminal
        }),
        None => OutputFormat::Terminal,
    }
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let file = load(&config)?;
    let selected: Scenario = config.scenario.parse().map_err(Error::from)?;
    let mut session = build_session(&config, &file)?;
    let format = resolve_format(&config, &file);

    log::info!(
        "running analysis for {} enabled metrics",
        session.state().enabled.count()
    );
    session.recalculate()?;
    let Some(report) = session.report() else {
        return Err(Error::Calculation("no report produced".to_string()).into());
    };

    let (destination, formatting): (Box<dyn Write>, _) = match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            (Box::new(BufWriter::new(file)), FormattingConfig::plain())
        }
        None => (Box::new(std::io::stdout().lock()), config.formatting),
    };

    let options = RenderOptions {
        view: config.view,
        selected,
    };
    let mut writer = create_writer(format, formatting, destination);
    writer.write_report(report, session.state(), &options)?;

    if let Some(path) = &config.output {
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Evidence, RiskLevel};

    #[test]
    fn parses_input_assignment() {
        assert_eq!(
            Assignment::parse("eaCost = 250000").unwrap(),
            Assignment::Input(InputField::EaCost, "250000".into())
        );
        assert_eq!(
            Assignment::parse("winRate=30").unwrap(),
            Assignment::Input(InputField::Metric(Metric::WinRate), "30".into())
        );
    }

    #[test]
    fn parses_risk_assignment() {
        assert_eq!(
            Assignment::parse("risk.churn.evidence=strong").unwrap(),
            Assignment::Evidence(Metric::Churn, "strong".into())
        );
    }

    #[test]
    fn rejects_malformed_assignments() {
        assert!(matches!(
            Assignment::parse("winRate"),
            Err(ConfigurationError::Parse { .. })
        ));
        assert_eq!(
            Assignment::parse("risk.churn.color=red"),
            Err(ConfigurationError::UnknownField("risk.churn.color".into()))
        );
        assert_eq!(
            Assignment::parse("velocity=3"),
            Err(ConfigurationError::UnknownField("velocity".into()))
        );
    }

    #[test]
    fn overrides_apply_on_top_of_file_config() {
        let config = AnalyzeConfig {
            enable: vec!["churn".into()],
            disable: vec!["pipeline".into()],
            assignments: vec![
                "churn=abc".into(),
                "risk.churn.risk=high".into(),
                "risk.churn.evidence=none".into(),
                "risk.churn.probability=140".into(),
            ],
            ..Default::default()
        };

        let session = build_session(&config, &RoimapConfig::default()).unwrap();
        let state = session.state();
        assert!(state.enabled.is_enabled(Metric::Churn));
        assert!(!state.enabled.is_enabled(Metric::Pipeline));
        assert_eq!(state.inputs.churn, 0.0);

        let factor = state.risk_factors.get(Metric::Churn).unwrap();
        assert_eq!(factor.risk, RiskLevel::High);
        assert_eq!(factor.evidence, Evidence::NoData);
        assert_eq!(factor.probability, 100);
    }

    #[test]
    fn unknown_evidence_is_a_configuration_error() {
        let config = AnalyzeConfig {
            assignments: vec!["risk.nps.evidence=rumor".into()],
            ..Default::default()
        };
        let err = build_session(&config, &RoimapConfig::default()).unwrap_err();
        let err = err.downcast_ref::<Error>().unwrap();
        assert!(err.is_configuration());
    }
}
