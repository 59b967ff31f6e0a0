//! `.roimap.toml` configuration.

pub mod core;
pub mod loader;

pub use self::core::{MetricsConfig, OutputConfig, RiskFactorConfig, RoimapConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
