mod cli;

use anyhow::Result;
use clap::Parser;
use lode_core::{LodeConfig, ParseMode};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = LodeConfig::from_env();
    if cli.allow_local {
        config.allow_local_definitions = true;
    }
    tracing::debug!(
        definition_category = %config.definition_category(),
        max_redirects = config.max_redirects,
        "Loaded configuration"
    );

    match cli.command {
        Commands::Source { location } => cli::source::run(config, &location).await,
        Commands::Parse {
            location,
            imports,
            imported,
            closure,
            reasoner,
        } => {
            let mode = ParseMode {
                imported,
                closure,
                reasoner,
            };
            cli::parse::run(config, &location, imports.as_deref(), mode).await
        }
        Commands::Locate { location, category } => cli::locate::run(&location, category),
    }
}
