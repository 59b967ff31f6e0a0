use anyhow::Result;
use clap::Parser;
use roimap::cli::{Cli, Commands};
use roimap::commands::{handle_analyze, init_config, AnalyzeConfig};
use roimap::formatting::{ColorMode, FormattingConfig};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {}", user_facing_message(&err));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            config,
            format,
            output,
            view,
            scenario,
            enable,
            disable,
            assignments,
            plain,
        } => handle_analyze(AnalyzeConfig {
            config_path: config,
            format: format.map(Into::into),
            output,
            view: view.into(),
            scenario,
            enable,
            disable,
            assignments,
            formatting: create_formatting_config(plain),
        }),
        Commands::Init { force } => init_config(force),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn create_formatting_config(plain: bool) -> FormattingConfig {
    let config = if plain {
        FormattingConfig::new(ColorMode::Never)
    } else {
        FormattingConfig::from_env()
    };
    colored::control::set_override(config.color.should_use_color());
    config
}

// Configuration problems keep their detail; numeric failures get the generic notice.
fn user_facing_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<roimap::Error>() {
        Some(e @ (roimap::Error::Configuration(_) | roimap::Error::Calculation(_))) => {
            e.user_message()
        }
        _ => format!("{err:#}"),
    }
}
