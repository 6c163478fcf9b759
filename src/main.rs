//! Librarian CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "librarian")]
#[command(about = "Code-intelligence engine: fact extraction, a durable knowledge store, and a grounded query pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Workspace root (defaults to walking upward from the current directory)
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Emit machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Write output to this path instead of stdout (requires --json)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Skip the automatic bootstrap-on-drift step
    #[arg(long, global = true)]
    no_bootstrap: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Strategy {
    Heuristic,
    Semantic,
    Auto,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or rebuild the knowledge store from scratch
    Bootstrap {
        #[arg(long)]
        force: bool,
    },
    /// Run the query pipeline for an intent
    Query {
        intent: String,
        #[arg(long, value_enum, default_value = "auto")]
        strategy: Strategy,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        drill_down: Option<String>,
        /// Comma-separated list of files the caller is currently working on
        #[arg(long)]
        files: Option<String>,
    },
    /// Run self-diagnosis over this workspace's knowledge store
    Diagnose {
        #[arg(long)]
        config: bool,
        #[arg(long)]
        heal: bool,
        #[arg(long)]
        pretty: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Provider capability operations
    Providers {
        #[command(subcommand)]
        action: ProvidersAction,
    },
    /// External fixture-repo operations
    ExternalRepos {
        #[command(subcommand)]
        action: ExternalReposAction,
    },
}

#[derive(Subcommand)]
enum ProvidersAction {
    /// Probe configured providers and report the readiness verdict
    Check,
}

#[derive(Subcommand)]
enum ExternalReposAction {
    /// Clone/check out fixture repos from `external-repos.json`
    Sync {
        #[arg(long)]
        repos_root: Option<PathBuf>,
        #[arg(long)]
        verify: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("librarian={log_level}")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let workspace = librarian_core::resolve_workspace_root(Some(&cli.workspace))?;

    if cli.out.is_some() && !cli.json {
        eprintln!("{}", librarian_core::LibrarianError::InvalidArgument("--out requires --json".to_string()));
        std::process::exit(librarian_core::LibrarianError::InvalidArgument(String::new()).exit_code());
    }

    let outcome = match cli.command {
        Commands::Bootstrap { force } => commands::bootstrap(&workspace, force).await,
        Commands::Query { intent, strategy, limit, session, drill_down, files } => {
            commands::query(
                &workspace,
                intent,
                strategy,
                limit,
                session,
                drill_down,
                files,
                cli.no_bootstrap,
                cli.json,
                cli.out.clone(),
            )
            .await
        }
        Commands::Diagnose { config, heal, pretty, format } => commands::diagnose(&workspace, config, heal, pretty, &format).await,
        Commands::Providers { action: ProvidersAction::Check } => commands::providers_check(cli.json, cli.out.clone()).await,
        Commands::ExternalRepos { action: ExternalReposAction::Sync { repos_root, verify } } => {
            commands::external_repos_sync(&workspace, repos_root, verify, cli.json)
        }
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        let code = e.downcast_ref::<librarian_core::LibrarianError>().map(|e| e.exit_code()).unwrap_or(1);
        std::process::exit(code);
    }
    Ok(())
}
