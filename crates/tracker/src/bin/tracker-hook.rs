//! CLI for pushing host events to the configured JIRA instance.
//!
//! Run `tracker-hook --help` for usage information.

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tracker::{
    ClosingEntity, Commit, ExternalIssue, HostConfig, HttpSettings, IssueTrackerService,
    JiraProperties, JiraService, Noteable, Project, PushEvent, User,
};

#[derive(Parser)]
#[command(name = "tracker-hook")]
#[command(about = "Send commit and mention events to JIRA")]
#[command(version)]
struct Cli {
    /// JSON file with service properties (env vars override it)
    #[arg(short, long, env = "JIRA_PROPERTIES_FILE")]
    config: Option<PathBuf>,

    /// Host project in namespace/path format
    #[arg(short, long, env = "TRACKER_PROJECT")]
    project: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum NoteableKind {
    Commit,
    Issue,
    MergeRequest,
    Snippet,
}

#[derive(Subcommand)]
enum Commands {
    /// Close a JIRA issue with a commit
    Close {
        /// JIRA issue key, e.g. PROJ-42
        #[arg(short, long)]
        issue: String,

        /// Sha of the closing commit
        #[arg(short, long)]
        commit: String,
    },

    /// Comment on a JIRA issue that a host entity mentioned it
    Mention {
        /// JIRA issue key, e.g. PROJ-42
        #[arg(short, long)]
        issue: String,

        /// Type of the mentioning entity
        #[arg(short, long, value_enum)]
        kind: NoteableKind,

        /// Commit sha, or iid/id of the entity
        #[arg(long)]
        id: String,

        /// Username of the author
        #[arg(long)]
        author: String,

        /// Display name of the author (defaults to the username)
        #[arg(long)]
        author_name: Option<String>,
    },

    /// Check connectivity and credentials
    Test,

    /// Print the resolved endpoints for an issue
    Urls {
        /// JIRA issue key, e.g. PROJ-42
        #[arg(short, long)]
        issue: String,
    },
}

fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let level = if verbose { "tracker=debug" } else { "tracker=info" };
    let filter = EnvFilter::from_default_env().add_directive(level.parse()?);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
    Ok(())
}

fn load_properties(path: Option<&PathBuf>) -> Result<JiraProperties> {
    let mut props = match path {
        Some(path) => JiraProperties::from_file(path)
            .with_context(|| format!("Failed to load properties from {}", path.display()))?,
        None => JiraProperties::default(),
    };
    props.merge_env();
    props.set_defaults();
    props.validate(true).context("Invalid JIRA properties")?;
    Ok(props)
}

fn noteable(kind: NoteableKind, id: &str) -> Result<Noteable> {
    let numeric = || {
        id.parse::<u64>()
            .with_context(|| format!("Expected a numeric id, got {id}"))
    };
    Ok(match kind {
        NoteableKind::Commit => Noteable::Commit { id: id.to_string() },
        NoteableKind::Issue => Noteable::Issue { iid: numeric()? },
        NoteableKind::MergeRequest => Noteable::MergeRequest { iid: numeric()? },
        NoteableKind::Snippet => Noteable::Snippet { id: numeric()? },
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs)?;

    let props = load_properties(cli.config.as_ref())?;
    let project = Project::from_full_path(&cli.project);
    let service = JiraService::new(props, project, &HostConfig::from_env(), HttpSettings::default())
        .context("Failed to configure JIRA service")?;

    debug!(tracker = service.title(), "Service ready");

    match cli.command {
        Commands::Close { issue, commit } => {
            let event = PushEvent {
                entity: ClosingEntity::Commit(Commit::new(commit)),
                issue: Some(ExternalIssue::new(issue)),
            };
            if let Some(outcome) = service.execute(&event).await {
                println!("{}", outcome.message("JiraService"));
                if !outcome.is_success() {
                    bail!("JIRA did not accept the transition");
                }
            }
        }
        Commands::Mention {
            issue,
            kind,
            id,
            author,
            author_name,
        } => {
            let noteable = noteable(kind, &id)?;
            let author = User {
                name: author_name.unwrap_or_else(|| author.clone()),
                username: author,
            };
            let outcome = service
                .create_cross_reference_note(&ExternalIssue::new(issue), &noteable, &author)
                .await;
            println!("{}", outcome.message("JiraService"));
            if !outcome.is_success() {
                bail!("JIRA did not accept the comment");
            }
        }
        Commands::Test => {
            if service.test_settings().await {
                info!("JIRA settings are valid");
                println!("OK");
            } else {
                bail!("JIRA settings test failed");
            }
        }
        Commands::Urls { issue } => {
            let urls = service.urls();
            println!("server:     {}", urls.server());
            println!("transition: {}", urls.close_issue_url(&issue));
            println!("comment:    {}", urls.add_comment_url(&issue));
            println!("browse:     {}", service.issue_url(&issue));
        }
    }

    Ok(())
}
