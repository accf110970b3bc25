mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trackwatch_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(
    name = "trackwatch",
    about = "Shipment tracking poller — watch codes, poll the provider, notify on change",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "TRACKWATCH_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter configuration file
    Init,

    /// Start tracking a shipment code
    Add {
        code: String,
        /// Display name used in lists and notifications
        #[arg(long)]
        label: Option<String>,
    },

    /// Stop tracking a shipment code
    Remove { code: String },

    /// List tracked items
    List,

    /// Run one poll cycle
    Tick,

    /// Run poll cycles forever on a fixed cadence
    Watch {
        /// Seconds between cycles
        #[arg(long, default_value = "60")]
        every: u64,
    },

    /// Verify provider and Telegram connectivity
    Check,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Tick | Commands::Watch { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&cli.config),
        Commands::Add { code, label } => cmd::item::add(&cli.config, &code, label, cli.json),
        Commands::Remove { code } => cmd::item::remove(&cli.config, &code),
        Commands::List => cmd::item::list(&cli.config, cli.json),
        Commands::Tick => cmd::tick::run_once(&cli.config, cli.json),
        Commands::Watch { every } => cmd::tick::watch(&cli.config, every),
        Commands::Check => cmd::check::run(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
