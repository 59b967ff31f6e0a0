use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::{OutputFormat as WriterFormat, ReportView};

#[derive(Parser, Debug)]
#[command(name = "roimap")]
#[command(about = "Risk-adjusted ROI scenarios for an Enterprise Architect hire", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario model and print the report
    Analyze {
        /// Configuration file (skips .roimap.toml discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (defaults to the config file's choice, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report sections to show
        #[arg(long, value_enum, default_value = "all")]
        view: View,

        /// Scenario shown in detail: conservative, realistic or optimistic
        #[arg(long, default_value = "realistic")]
        scenario: String,

        /// Metrics to enable, comma separated
        #[arg(long, value_delimiter = ',')]
        enable: Vec<String>,

        /// Metrics to disable, comma separated
        #[arg(long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Override an input (`winRate=30`) or risk rating (`risk.winRate.evidence=strong`)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Write a default .roimap.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for WriterFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => WriterFormat::Json,
            OutputFormat::Markdown => WriterFormat::Markdown,
            OutputFormat::Terminal => WriterFormat::Terminal,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum View {
    All,
    Scenarios,
    Alternatives,
    Sensitivity,
    Risk,
}

impl From<View> for ReportView {
    fn from(view: View) -> Self {
        match view {
            View::All => ReportView::All,
            View::Scenarios => ReportView::Scenarios,
            View::Alternatives => ReportView::Alternatives,
            View::Sensitivity => ReportView::Sensitivity,
            View::Risk => ReportView::Risk,
        }
    }
}
