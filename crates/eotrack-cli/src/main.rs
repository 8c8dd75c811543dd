mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "eotrack",
    about = "Track executive actions and the court challenges filed against them",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from eotrack.yaml or .git/)
    #[arg(long, global = true, env = "EOTRACK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull newly published actions from the Federal Register into the dataset
    Sync,

    /// Refresh challenge lastUpdated dates from CourtListener
    Refresh {
        /// Only refresh the challenge with this docket id
        docket_id: Option<String>,

        /// CourtListener API token
        #[arg(long, env = "CL_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Derive docket ids from challenge URLs
    Backfill {
        /// Skip challenges that already have a docket id
        #[arg(long)]
        keep_existing: bool,
    },

    /// List tracked actions
    List,

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Sync | Commands::Refresh { .. } | Commands::Backfill { .. } => {
            tracing::Level::INFO
        }
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Sync => cmd::sync::run(&root, cli.json),
        Commands::Refresh { docket_id, api_key } => {
            cmd::refresh::run(&root, docket_id.as_deref(), api_key, cli.json)
        }
        Commands::Backfill { keep_existing } => cmd::backfill::run(&root, keep_existing, cli.json),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
