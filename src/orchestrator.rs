//! Orchestrator (§2, §4.9, §6)
//!
//! The top-level workflow. Selects reconcile vs migrate based on
//! [`Config::docs_present`], drives reader → contents-index → sorter →
//! planner → checker → executor, reconciles the index page (the one piece
//! of Discourse bookkeeping the executor deliberately leaves to its
//! caller, see `executor::execute_one`'s `CreateIndex`/`UpdateIndex` arms),
//! moves the content tag, and returns `(RunOutputs, Result<())` so the
//! JSON surface of §6 stays observable even when the run ultimately fails.

use std::collections::BTreeMap;

use crate::client::{DiscourseClient, RepositoryClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Action, ActionReport, ActionResult, IndexFile, PrAction};
use crate::planner::PlannerContext;
use crate::{checker, contents_index, executor, metadata, migration, navigation, planner, reader, sorter};

/// Machine-readable summary of a run (§6 outputs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    pub index_url: String,
    /// `url -> action taken`, one entry per page action.
    pub topics: BTreeMap<String, String>,
    pub pr_link: String,
    pub pr_action: PrAction,
}

impl RunOutputs {
    fn empty() -> Self {
        Self {
            index_url: String::new(),
            topics: BTreeMap::new(),
            pr_link: String::new(),
            pr_action: PrAction::None,
        }
    }
}

/// Run a full reconcile-or-migrate pass, chosen by [`Config::docs_present`].
/// Outputs are always returned, even when the accompanying `Result` is an
/// error — §7's propagation policy is "emit outputs, then raise".
pub async fn run(config: &Config, discourse: &dyn DiscourseClient, repo: &dyn RepositoryClient) -> (RunOutputs, Result<()>) {
    if config.docs_present() {
        reconcile(config, discourse, repo).await
    } else {
        migrate(config, discourse, repo).await
    }
}

/// Run the forward (Git -> Discourse) flow directly, bypassing the
/// `docs_present` dispatch in [`run`] — used by the `reconcile` CLI
/// subcommand, which already knows which flow the user asked for.
pub async fn reconcile(config: &Config, discourse: &dyn DiscourseClient, repo: &dyn RepositoryClient) -> (RunOutputs, Result<()>) {
    match reconcile_inner(config, discourse, repo).await {
        Ok((outputs, failed, problems)) => {
            if failed > 0 || problems > 0 {
                (outputs, Err(Error::ReconcilliationError { failed, problems }))
            } else {
                (outputs, Ok(()))
            }
        }
        Err(e) => (RunOutputs::empty(), Err(e)),
    }
}

async fn reconcile_inner(
    config: &Config,
    discourse: &dyn DiscourseClient,
    repo: &dyn RepositoryClient,
) -> Result<(RunOutputs, usize, usize)> {
    let docs_dir = config.docs_dir();
    let infos = reader::read(&docs_dir)?;

    let index_path = config.index_path();
    let index_content = std::fs::read_to_string(&index_path).map_err(|e| Error::FileReadError { path: index_path, source: e })?;
    let contents = contents_index::parse(&index_content)?;
    let sorted_items = sorter::sort(&infos, &contents)?;

    let existing_index_url = metadata::read_docs_url(&config.charm_dir)?;
    let server_index_page = match &existing_index_url {
        Some(url) => Some(discourse.retrieve_topic(url).await?),
        None => None,
    };
    let server_rows = match &server_index_page {
        Some(page) => navigation::parse(&page.content, &config.discourse_host)?,
        None => Vec::new(),
    };

    let ctx = PlannerContext::from_config(config, &docs_dir);
    let actions = planner::plan(&ctx, &sorted_items, &server_rows, discourse, repo).await?;

    let problems = checker::check(config, &actions, discourse).await?;

    let realized = executor::execute(config, actions, discourse).await?;
    let failed = realized.iter().filter(|(_, r)| r.result == ActionResult::Fail).count();
    let any_mutating = realized.iter().any(|(a, _)| a.is_mutating());

    let rendered_navigation = planner::render_navigation_from_actions(&server_rows, &realized);

    let charm_name = metadata::read_charm_name(&config.charm_dir).unwrap_or_default();
    let local_index = IndexFile { title: charm_name.clone(), content: index_content };
    let index_action = planner::plan_index(&local_index, server_index_page.as_ref(), &rendered_navigation);
    let index_mutating = !matches!(index_action, Action::NoopIndex { .. });

    let (index_url, index_result) =
        reconcile_index(config, &charm_name, &index_action, existing_index_url.as_deref(), discourse).await;

    let topics = topics_map(&realized);

    let total_failed = failed + usize::from(index_result == ActionResult::Fail);
    let mutated = any_mutating || index_mutating;
    let same_content = if !config.dry_run && total_failed == 0 && problems.is_empty() && mutated {
        is_same_content(config, &index_action, index_url.as_deref(), discourse).await
    } else {
        false
    };
    move_content_tag(config, repo, mutated, total_failed, problems.len(), same_content);

    let outputs = RunOutputs {
        index_url: index_url.unwrap_or_default(),
        topics,
        pr_link: String::new(),
        pr_action: PrAction::None,
    };

    Ok((outputs, total_failed, problems.len()))
}

/// Upload the index page. The executor never touches Discourse for
/// `Create/UpdateIndex` since it doesn't hold the one well-known index
/// URL; that bookkeeping lives here instead.
async fn reconcile_index(
    config: &Config,
    charm_name: &str,
    action: &Action,
    existing_url: Option<&str>,
    discourse: &dyn DiscourseClient,
) -> (Option<String>, ActionResult) {
    match action {
        Action::NoopIndex { .. } => (existing_url.map(str::to_string), ActionResult::Success),

        Action::CreateIndex { content } => {
            if config.dry_run {
                return (existing_url.map(str::to_string), ActionResult::Skip);
            }
            match discourse.create_topic(charm_name, content, config.discourse_category_id).await {
                Ok(page) => (Some(page.url), ActionResult::Success),
                Err(e) => {
                    tracing::info!("index topic creation failed: {e}");
                    (None, ActionResult::Fail)
                }
            }
        }

        Action::UpdateIndex { content_change } => {
            if config.dry_run {
                return (existing_url.map(str::to_string), ActionResult::Skip);
            }
            let Some(url) = existing_url else {
                return (None, ActionResult::Fail);
            };
            let Some(content) = &content_change.local else {
                return (Some(url.to_string()), ActionResult::Fail);
            };
            match discourse.update_topic(url, content).await {
                Ok(()) => (Some(url.to_string()), ActionResult::Success),
                Err(e) => {
                    tracing::info!("index topic update failed: {e}");
                    (Some(url.to_string()), ActionResult::Fail)
                }
            }
        }
    }
}

/// Build the §6 `topics` output: one entry per page action, keyed by
/// whatever location the executor settled on.
fn topics_map(realized: &[(Action, ActionReport)]) -> BTreeMap<String, String> {
    let mut topics = BTreeMap::new();
    for (action, report) in realized {
        if !matches!(
            action,
            Action::CreatePage { .. } | Action::NoopPage { .. } | Action::UpdatePage { .. } | Action::DeletePage { .. }
        ) {
            continue;
        }
        let key = report
            .location
            .clone()
            .unwrap_or_else(|| action.path().unwrap_or_default().to_string());
        topics.insert(key, format!("{} ({:?})", action_kind(action), report.result));
    }
    topics
}

fn action_kind(action: &Action) -> &'static str {
    match action {
        Action::CreatePage { .. } | Action::CreateGroup { .. } | Action::CreateExternalRef { .. } | Action::CreateIndex { .. } => "CREATE",
        Action::NoopPage { .. } | Action::NoopGroup { .. } | Action::NoopExternalRef { .. } | Action::NoopIndex { .. } => "NOOP",
        Action::UpdatePage { .. } | Action::UpdateGroup { .. } | Action::UpdateExternalRef { .. } | Action::UpdateIndex { .. } => "UPDATE",
        Action::DeletePage { .. } | Action::DeleteGroup { .. } | Action::DeleteExternalRef { .. } => "DELETE",
    }
}

/// Whether the index content this run intended to publish (`index_action`)
/// matches what the index topic now actually holds on Discourse. Part (iii)
/// of §4.9's tag-move gate: a mismatch means the tag would pin a commit
/// whose Discourse state diverges from what this run believes it
/// synchronized, even though nothing reported FAIL.
async fn is_same_content(config: &Config, index_action: &Action, index_url: Option<&str>, discourse: &dyn DiscourseClient) -> bool {
    let planned = match index_action {
        Action::NoopIndex { content } | Action::CreateIndex { content } => content.clone(),
        Action::UpdateIndex { content_change } => match &content_change.local {
            Some(local) => local.clone(),
            None => return false,
        },
    };

    let Some(url) = index_url else {
        return false;
    };

    match discourse.retrieve_topic(url).await {
        Ok(page) => page.content == planned,
        Err(e) => {
            tracing::warn!("could not confirm now-server index content for '{}': {e}", config.content_tag_name);
            false
        }
    }
}

/// Move the content tag to the current commit, per §4.9: only when no
/// action failed, no `Problem` was reported, at least one action actually
/// mutated something, the planned content matches the now-server content,
/// and the commit is reachable from the configured base branch. A refusal
/// is logged, not surfaced as an error — the reconcile run itself already
/// succeeded.
fn move_content_tag(
    config: &Config,
    repo: &dyn RepositoryClient,
    any_mutating: bool,
    total_failed: usize,
    problems: usize,
    same_content: bool,
) {
    if config.dry_run {
        return;
    }
    if total_failed > 0 {
        tracing::info!("skipping content tag move: {total_failed} action(s) failed this run");
        return;
    }
    if problems > 0 {
        tracing::info!("skipping content tag move: {problems} problem(s) reported this run");
        return;
    }
    if !any_mutating {
        tracing::info!("no changes this run; '{}' left untouched", config.content_tag_name);
        return;
    }
    if !same_content {
        tracing::warn!(
            "skipping content tag move: planned index content does not match the now-server content"
        );
        return;
    }
    match repo.move_tag(&config.content_tag_name, &config.commit_sha, &config.base_branch) {
        Ok(()) => tracing::info!("moved '{}' to {}", config.content_tag_name, config.commit_sha),
        Err(Error::TaggingNotAllowedError { .. }) => tracing::warn!(
            "commit {} is not on base branch '{}'; '{}' left untouched",
            config.commit_sha,
            config.base_branch,
            config.content_tag_name
        ),
        Err(e) => tracing::warn!("failed to move '{}': {e}", config.content_tag_name),
    }
}

/// Run the reverse (Discourse -> Git pull request) flow directly — used
/// by the `migrate` CLI subcommand.
pub async fn migrate(config: &Config, discourse: &dyn DiscourseClient, repo: &dyn RepositoryClient) -> (RunOutputs, Result<()>) {
    match migrate_inner(config, discourse, repo).await {
        Ok((outputs, failed, total)) => {
            if failed > 0 {
                (outputs, Err(Error::MigrationError { failed, total }))
            } else {
                (outputs, Ok(()))
            }
        }
        Err(e) => (RunOutputs::empty(), Err(e)),
    }
}

async fn migrate_inner(
    config: &Config,
    discourse: &dyn DiscourseClient,
    repo: &dyn RepositoryClient,
) -> Result<(RunOutputs, usize, usize)> {
    let charm_name = metadata::read_charm_name(&config.charm_dir)?;
    let index_url = metadata::read_docs_url(&config.charm_dir)?.ok_or_else(|| Error::InputError {
        path: config.charm_dir.display().to_string(),
        reason: "migrate requires an existing 'docs' URL in metadata.yaml/charmcraft.yaml".to_string(),
    })?;

    let outcome = migration::migrate(&charm_name, &index_url, &config.discourse_host, &config.base_branch, discourse, repo).await?;

    let failed = outcome.pages.iter().filter(|p| p.result == ActionResult::Fail).count();
    let total = outcome.pages.len();
    let topics = outcome
        .pages
        .iter()
        .map(|p| (p.table_path.clone(), format!("{:?}", p.result)))
        .collect();

    let outputs = RunOutputs {
        index_url,
        topics,
        pr_link: outcome.pr_link,
        pr_action: outcome.pr_action,
    };

    Ok((outputs, failed, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeDiscourseClient, FakeRepositoryClient};
    use std::collections::HashMap;

    fn config(charm_dir: std::path::PathBuf) -> Config {
        Config {
            discourse_host: "discourse.example.com".into(),
            discourse_api_username: "bot".into(),
            discourse_api_key: "key".into(),
            discourse_category_id: 7,
            github_token: "tok".into(),
            base_branch: "main".into(),
            commit_sha: "deadbeef".into(),
            charm_dir,
            dry_run: false,
            delete_topics: true,
            ignore_server_ahead: false,
            base_tag_name: crate::config::DEFAULT_BASE_TAG.into(),
            content_tag_name: crate::config::DEFAULT_CONTENT_TAG.into(),
        }
    }

    #[tokio::test]
    async fn test_reconcile_clean_add_creates_index_and_moves_tag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "name: mycharm\n").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::create_dir(dir.path().join("docs/tutorials")).unwrap();
        std::fs::write(dir.path().join("docs/tutorials/getting-started.md"), "# Getting Started\nBody").unwrap();
        std::fs::write(dir.path().join("docs/index.md"), "# Index\n\nSome docs.\n").unwrap();

        let cfg = config(dir.path().to_path_buf());
        let discourse = FakeDiscourseClient::new();
        let repo = FakeRepositoryClient::new();
        repo.allow_commit_on_base("deadbeef");

        let (outputs, result) = run(&cfg, &discourse, &repo).await;
        assert!(result.is_ok(), "expected clean reconcile, got {result:?}");
        assert!(!outputs.index_url.is_empty());
        assert_eq!(outputs.topics.len(), 1);
        assert_eq!(repo.tags.lock().unwrap().get(&cfg.content_tag_name).cloned(), Some("deadbeef".to_string()));
    }

    #[tokio::test]
    async fn test_reconcile_conflict_surfaces_reconciliation_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "name: mycharm\ndocs: https://discourse.example.com/t/index/1\n").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/page.md"), "C\n").unwrap();
        std::fs::write(dir.path().join("docs/index.md"), "# Index\n").unwrap();

        let cfg = config(dir.path().to_path_buf());
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic(
            "https://discourse.example.com/t/index/1",
            "# Index\n\n# Navigation\n| level | path | navlink |\n| --- | --- | --- |\n| 1 | page | [Page](https://discourse.example.com/t/page/1) |\n",
        );
        discourse.seed_topic("https://discourse.example.com/t/page/1", "B\n");

        let repo = FakeRepositoryClient::new();
        let mut files = HashMap::new();
        files.insert("page.md".to_string(), "A\n".to_string());
        repo.seed_tag(&cfg.base_tag_name, "deadbeef", files);
        repo.allow_commit_on_base("deadbeef");

        let (outputs, result) = run(&cfg, &discourse, &repo).await;
        assert!(matches!(result, Err(Error::ReconcilliationError { .. })));
        assert!(outputs.topics.values().any(|v| v.contains("FAIL") || v.contains("Fail")));
        assert!(repo.tags.lock().unwrap().get(&cfg.content_tag_name).is_none());
    }

    #[tokio::test]
    async fn test_server_ahead_problem_withholds_tag_move_despite_no_failures() {
        // A ServerAhead page alongside another non-noop page action is a
        // reportable Problem (checker §4.7), even though nothing FAILs:
        // the update is skipped, not executed, so `total_failed` stays 0.
        // The content tag must still not move — condition (iii) of §4.9.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "name: mycharm\ndocs: https://discourse.example.com/t/index/1\n").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/page.md"), "A\n").unwrap();
        std::fs::write(dir.path().join("docs/new.md"), "# New\n\nBrand new.\n").unwrap();
        std::fs::write(dir.path().join("docs/index.md"), "# Index\n").unwrap();

        let cfg = config(dir.path().to_path_buf());
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic(
            "https://discourse.example.com/t/index/1",
            "# Index\n\n# Navigation\n| level | path | navlink |\n| --- | --- | --- |\n| 1 | page | [Page](https://discourse.example.com/t/page/1) |\n",
        );
        discourse.seed_topic("https://discourse.example.com/t/page/1", "B\n");

        let repo = FakeRepositoryClient::new();
        let mut files = HashMap::new();
        files.insert("page.md".to_string(), "A\n".to_string());
        repo.seed_tag(&cfg.base_tag_name, "deadbeef", files);
        repo.allow_commit_on_base("deadbeef");

        let (_outputs, result) = run(&cfg, &discourse, &repo).await;
        assert!(matches!(result, Err(Error::ReconcilliationError { failed: 0, problems: 1 })), "expected a problem-only failure, got {result:?}");
        assert!(repo.tags.lock().unwrap().get(&cfg.content_tag_name).is_none(), "tag must not move while a Problem is outstanding");
    }

    #[tokio::test]
    async fn test_migrate_requires_docs_url() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "name: mycharm\n").unwrap();

        let cfg = config(dir.path().to_path_buf());
        let discourse = FakeDiscourseClient::new();
        let repo = FakeRepositoryClient::new();

        let (_, result) = run(&cfg, &discourse, &repo).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_migrate_opens_pr_when_docs_absent_locally() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.yaml"), "name: mycharm\ndocs: https://discourse.example.com/t/index/1\n").unwrap();

        let cfg = config(dir.path().to_path_buf());
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic(
            "https://discourse.example.com/t/index/1",
            "# Contents\n\n# Navigation\n| level | path | navlink |\n| --- | --- | --- |\n| 1 | page | [Page](https://discourse.example.com/t/page/1) |\n",
        );
        discourse.seed_topic("https://discourse.example.com/t/page/1", "# Page\n\nBody.");
        let repo = FakeRepositoryClient::new();

        let (outputs, result) = run(&cfg, &discourse, &repo).await;
        assert!(result.is_ok(), "expected clean migration, got {result:?}");
        assert_eq!(outputs.pr_action, PrAction::Opened);
        assert!(!outputs.pr_link.is_empty());
    }
}
