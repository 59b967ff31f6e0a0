use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# roimap configuration

# Baseline business metrics. Omitted keys keep these defaults.
[inputs]
pipeline = 10000000
dealSize = 100000
winRate = 25
salesCycle = 9
retention = 85
teamSize = 8
grossMargin = 65
expansion = 12
arr = 5000000
nps = 35
churn = 18
cltv = 250000
eaCost = 200000
additionalSalesRep = 150000
marketingSpend = 300000
salesTraining = 100000

# Metrics the EA hire is expected to move. Available:
# pipeline, dealSize, winRate, salesCycle, retention, teamSize,
# grossMargin, expansion, arr, nps, churn, cltv
[metrics]
enabled = ["pipeline", "dealSize", "winRate"]

# Per-metric risk ratings. Unlisted metrics keep their built-in rating.
# evidence: none | anecdotal | some | strong
# risk: low | medium | high
[risk.pipeline]
probability = 70
evidence = "some"
risk = "medium"

[risk.dealSize]
probability = 65
evidence = "anecdotal"
risk = "medium"

[risk.winRate]
probability = 80
evidence = "strong"
risk = "low"

[sensitivity]
probability_delta = 20
min_impact = 0.1
max_entries = 8

[output]
default_format = "terminal"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_at(&PathBuf::from(CONFIG_FILE_NAME), force)
}

pub fn init_config_at(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use crate::core::ModelState;
    use tempfile::TempDir;

    #[test]
    fn default_config_describes_default_model() {
        let config = parse_and_validate_config(DEFAULT_CONFIG, "default").unwrap();
        assert_eq!(config.to_state().unwrap(), ModelState::default());
        assert_eq!(config.default_format(), Some("terminal"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(init_config_at(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init_config_at(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
