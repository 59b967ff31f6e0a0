//! CLI command implementations.
//!
//! - **analyze**: load the model, apply command-line overrides and print the report
//! - **init**: write a starter `.roimap.toml`

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::{init_config, init_config_at, DEFAULT_CONFIG};
