//! discourse-gatekeeper CLI
//!
//! Two subcommands mirroring the two data flows of §2: `reconcile` pushes
//! the local docs tree to Discourse, `migrate` reconstructs one from an
//! existing Discourse index topic and opens a pull request. Configuration
//! (§6) is read from flags with environment-variable fallback.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use discourse_gatekeeper::client::discourse::HttpDiscourseClient;
use discourse_gatekeeper::client::repository::GitRepositoryClient;
use discourse_gatekeeper::config::{Config, DEFAULT_BASE_TAG, DEFAULT_CONTENT_TAG};
use discourse_gatekeeper::orchestrator::{self, RunOutputs};

#[derive(Parser)]
#[command(name = "gatekeeper")]
#[command(about = "Reconciles a Markdown docs tree with a Discourse server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ConfigArgs {
    /// Base URL of Discourse; protocol must be absent, port optional.
    #[arg(long, env = "DISCOURSE_HOST")]
    discourse_host: String,

    #[arg(long, env = "DISCOURSE_API_USERNAME")]
    discourse_api_username: String,

    #[arg(long, env = "DISCOURSE_API_KEY")]
    discourse_api_key: String,

    /// Discourse category new topics are created under.
    #[arg(long, env = "DISCOURSE_CATEGORY_ID")]
    discourse_category_id: u64,

    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: String,

    /// `owner/repo` slug, used to address the GitHub REST API for pull requests.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    github_repo: String,

    #[arg(long, env = "BASE_BRANCH", default_value = "main")]
    base_branch: String,

    /// Commit under reconciliation; determines whether the content tag may move.
    #[arg(long, env = "COMMIT_SHA")]
    commit_sha: String,

    /// Directory containing `metadata.yaml`/`charmcraft.yaml` and `docs/`.
    #[arg(long, env = "CHARM_DIR", default_value = ".")]
    charm_dir: PathBuf,

    /// Suppress mutations against Discourse and Git.
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,

    /// Permit page deletes (otherwise orphaned pages are SKIPped).
    #[arg(long, env = "DELETE_TOPICS")]
    delete_topics: bool,

    /// Honor the legacy ahead-ok tag and suppress server-ahead Problems
    /// (deprecated, scheduled for removal).
    #[arg(long, env = "IGNORE_SERVER_AHEAD")]
    ignore_server_ahead: bool,

    #[arg(long, env = "BASE_TAG_NAME")]
    base_tag_name: Option<String>,

    #[arg(long, env = "CONTENT_TAG_NAME")]
    content_tag_name: Option<String>,
}

impl ConfigArgs {
    fn into_config(self) -> Config {
        Config {
            discourse_host: self.discourse_host,
            discourse_api_username: self.discourse_api_username,
            discourse_api_key: self.discourse_api_key,
            discourse_category_id: self.discourse_category_id,
            github_token: self.github_token,
            base_branch: self.base_branch,
            commit_sha: self.commit_sha,
            charm_dir: self.charm_dir,
            dry_run: self.dry_run,
            delete_topics: self.delete_topics,
            ignore_server_ahead: self.ignore_server_ahead,
            base_tag_name: self.base_tag_name.unwrap_or_else(|| DEFAULT_BASE_TAG.to_string()),
            content_tag_name: self.content_tag_name.unwrap_or_else(|| DEFAULT_CONTENT_TAG.to_string()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Push the local docs tree's state to Discourse.
    Reconcile,
    /// Rebuild a local docs tree from Discourse and open a pull request.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt::init();
    }

    let cli = Cli::parse();
    let config = cli.config.clone().into_config();

    let discourse = HttpDiscourseClient::new(
        cli.config.discourse_host.clone(),
        cli.config.discourse_api_username.clone(),
        cli.config.discourse_api_key.clone(),
    )?;
    let repo = GitRepositoryClient::open(cli.config.charm_dir.clone(), cli.config.github_token.clone(), cli.config.github_repo.clone())?;

    let (outputs, result) = match cli.command {
        Commands::Reconcile => orchestrator::reconcile(&config, &discourse, &repo).await,
        Commands::Migrate => orchestrator::migrate(&config, &discourse, &repo).await,
    };

    print_json(&outputs);
    print_summary(&outputs);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(suggestion) = e.suggestion() {
            eprintln!("Hint: {suggestion}");
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Machine-readable §6 output, printed to stdout.
fn print_json(outputs: &RunOutputs) {
    let json = serde_json::json!({
        "index_url": outputs.index_url,
        "topics": outputs.topics,
        "pr_link": outputs.pr_link,
        "pr_action": outputs.pr_action.to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}

/// One-paragraph-per-action markdown summary, printed to stderr.
fn print_summary(outputs: &RunOutputs) {
    eprintln!("## Run summary\n");
    if outputs.index_url.is_empty() {
        eprintln!("- index topic: none\n");
    } else {
        eprintln!("- index topic: {}\n", outputs.index_url);
    }

    if outputs.topics.is_empty() {
        eprintln!("No page actions were taken.\n");
    } else {
        for (url, action) in &outputs.topics {
            eprintln!("- `{url}` — {action}");
        }
        eprintln!();
    }

    if !outputs.pr_link.is_empty() {
        eprintln!("- pull request: {} ({})\n", outputs.pr_link, outputs.pr_action);
    }
}
