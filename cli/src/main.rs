mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{propagate, zones};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Commands::Zones(args) => zones::run(&cli, args),
        Commands::Propagate(args) => propagate::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
