use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use deadline_reminder::services::{serve, sweep, ServerState};
use deadline_reminder::utils::resolve_issue_ref;
use deadline_reminder::{Config, GithubApp, Runner};

/// Keeps deadline labels and reminder comments up to date on GitHub issues
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the /hook and /cron endpoints (default)
    Serve,

    /// Update every issue of every installation once and exit
    Sweep,

    /// Update a single issue or pull request
    Issue {
        /// `owner/repo#12`, an issue URL, or `12` for the current repository
        reference: String,

        /// Installation the repository belongs to
        #[arg(long)]
        installation: u64,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;
    init_tracing(config.verbose);

    let app = GithubApp::new(config.app_id, config.private_key()?)?;
    let bot = config.bot();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let state = ServerState {
                app,
                secret: config.secret(),
                bot,
                dry_run: config.dry_run,
            };
            serve(&config.address, Arc::new(state)).await?;
        }
        Commands::Sweep => {
            let summary = sweep(&app, &bot, config.dry_run).await?;
            if summary.failures > 0 {
                anyhow::bail!("{} failures during the sweep", summary.failures);
            }
        }
        Commands::Issue {
            reference,
            installation,
        } => {
            let (repo, number) = resolve_issue_ref(&reference)
                .ok_or_else(|| anyhow::anyhow!("could not understand issue {reference:?}"))?;
            let client = app.installation(installation).await?;
            let runner = Runner::new(client, bot).dry_run(config.dry_run);
            let applied = runner.update_issue(&repo, number).await?;
            info!("{repo}#{number}: {applied} actions");
        }
    }

    Ok(())
}
