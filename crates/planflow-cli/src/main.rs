mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "planflow",
    about = "Decide which workflow actions a plan, issue or rollout offers the current user",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: search upward for .planflow/config.yaml)
    #[arg(long, global = true, env = "PLANFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the primary and secondary actions for a snapshot
    Evaluate {
        /// Snapshot file (.yaml, .yml or .json)
        snapshot: PathBuf,

        /// Treat the snapshot as having unsaved edits
        #[arg(long)]
        editing: bool,

        /// Treat the plan as still being created
        #[arg(long)]
        creating: bool,
    },

    /// Show the derived action context for a snapshot
    Context {
        /// Snapshot file (.yaml, .yml or .json)
        snapshot: PathBuf,
    },

    /// Evaluate every catalog rule, including hidden ones
    Explain {
        /// Snapshot file (.yaml, .yml or .json)
        snapshot: PathBuf,
    },

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = root::resolve_config(cli.config.as_deref());
    tracing::debug!(config = ?config_path, "resolved config path");

    let result = match cli.command {
        Commands::Evaluate {
            snapshot,
            editing,
            creating,
        } => cmd::evaluate::run(
            config_path.as_deref(),
            &snapshot,
            cmd::evaluate::Overrides { editing, creating },
            cli.json,
        ),
        Commands::Context { snapshot } => cmd::context::run(&snapshot, cli.json),
        Commands::Explain { snapshot } => {
            cmd::explain::run(config_path.as_deref(), &snapshot, cli.json)
        }
        Commands::Config { subcommand } => {
            cmd::config::run(config_path.as_deref(), subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
