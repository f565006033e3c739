pub mod cli;
pub mod clients;
pub mod config;
pub mod models;
pub mod services;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, cmd_character, cmd_planets, cmd_roster};
pub use config::Config;
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Roster {
            all,
            explicit_readiness,
        } => cmd_roster(&config, all, explicit_readiness).await,

        Commands::Planets { all } => cmd_planets(&config, all).await,

        Commands::Character { id } => cmd_character(&config, id).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so rendered
/// output on stdout stays clean.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
