//! Migration Planner (§4.10)
//!
//! Runs in the opposite direction from reconcile: when a charm has no local
//! `docs/` directory, rebuild one from the Discourse index topic's
//! navigation table, open a branch, commit the reconstructed tree, and put
//! up a pull request for review.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::client::{DiscourseClient, RepositoryClient};
use crate::config::{BRANCH_PREFIX, INDEX_FILENAME};
use crate::error::Result;
use crate::model::{ActionReport, ActionResult, PrAction};
use crate::{navigation, slug};

/// One file the migration plan will write, relative to `charm_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Outcome of retrieving and writing a single migrated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedPage {
    pub table_path: String,
    pub result: ActionResult,
    pub reason: Option<String>,
}

/// Result of a full migration run, ready for the orchestrator's §6 output.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub branch: String,
    pub pages: Vec<MigratedPage>,
    pub pr_link: String,
    pub pr_action: PrAction,
}

/// Build the local file tree (directories + page content) described by the
/// index topic's navigation table, fetching each page's content from
/// Discourse. A group with no page descendants gets a `.gitkeep` so Git
/// tracks the otherwise-empty directory.
pub async fn plan_files(
    index_url: &str,
    discourse_host: &str,
    discourse: &dyn DiscourseClient,
) -> Result<(Vec<PlannedFile>, Vec<MigratedPage>)> {
    let index = discourse.retrieve_topic(index_url).await?;
    let rows = navigation::parse(&index.content, discourse_host)?;

    let mut files = vec![PlannedFile {
        path: PathBuf::from(INDEX_FILENAME),
        content: render_index_file(&rows),
    }];
    let mut pages = Vec::new();
    let mut occupied_dirs: HashMap<PathBuf, bool> = HashMap::new();

    for row in &rows {
        if navigation::is_external(&row.navlink, discourse_host) {
            continue;
        }

        if row.is_group() {
            let Some(dir) = slug::path_from_table_path(&row.path, false) else {
                pages.push(MigratedPage {
                    table_path: row.path.clone(),
                    result: ActionResult::Fail,
                    reason: Some("table_path could not be reversed into a directory path".to_string()),
                });
                continue;
            };
            occupied_dirs.entry(dir).or_insert(false);
            continue;
        }

        let Some(file_path) = slug::path_from_table_path(&row.path, true) else {
            pages.push(MigratedPage {
                table_path: row.path.clone(),
                result: ActionResult::Fail,
                reason: Some("table_path could not be reversed into a file path".to_string()),
            });
            continue;
        };
        // Mark every ancestor directory occupied, not just the immediate
        // parent: a page nested two or more levels deep (e.g.
        // `tutorials/advanced/page.md`) must not leave `tutorials` looking
        // empty just because no page sits directly under it.
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            for ancestor in parent.ancestors().filter(|p| !p.as_os_str().is_empty()) {
                occupied_dirs.insert(ancestor.to_path_buf(), true);
            }
        }

        let Some(url) = &row.navlink.link else {
            pages.push(MigratedPage {
                table_path: row.path.clone(),
                result: ActionResult::Fail,
                reason: Some("page row carries no topic link".to_string()),
            });
            continue;
        };

        match discourse.retrieve_topic(url).await {
            Ok(page) => {
                files.push(PlannedFile { path: file_path, content: page.content });
                pages.push(MigratedPage { table_path: row.path.clone(), result: ActionResult::Success, reason: None });
            }
            Err(e) => {
                pages.push(MigratedPage {
                    table_path: row.path.clone(),
                    result: ActionResult::Fail,
                    reason: Some(e.to_string()),
                });
            }
        }
    }

    for (dir, has_page) in occupied_dirs {
        if !has_page {
            files.push(PlannedFile { path: dir.join(".gitkeep"), content: String::new() });
        }
    }

    Ok((files, pages))
}

/// Render `index.md`'s body from the navigation table alone: the reverse
/// migration has no user-authored `# Contents` section to recover, so the
/// navigation table is carried forward verbatim as the only generated
/// section.
fn render_index_file(rows: &[crate::model::TableRow]) -> String {
    let mut out = String::new();
    out.push_str("# Contents\n\n");
    out.push_str(&navigation::render(rows));
    out
}

/// Run a full migration: build the file plan, commit it to a fresh branch
/// prefixed with [`BRANCH_PREFIX`], and open (or update) its pull request.
pub async fn migrate(
    charm_name: &str,
    index_url: &str,
    discourse_host: &str,
    base_branch: &str,
    discourse: &dyn DiscourseClient,
    repo: &dyn RepositoryClient,
) -> Result<MigrationOutcome> {
    let (files, pages) = plan_files(index_url, discourse_host, discourse).await?;

    // A page-retrieval failure does not abort the migration: the branch and
    // pull request are still produced with whatever pages did resolve, so a
    // reviewer has something to act on. The caller (orchestrator) surfaces
    // `MigrationError` once it has the full outcome, mirroring the way the
    // executor lets the orchestrator raise `ReconcilliationError` only after
    // outputs are assembled (§7).
    let branch = format!("{BRANCH_PREFIX}/migrate-{charm_name}");
    let docs_files: Vec<(String, String)> = files
        .into_iter()
        .map(|f| (PathBuf::from("docs").join(f.path).to_string_lossy().to_string(), f.content))
        .collect();

    repo.commit_files_to_branch(
        &branch,
        base_branch,
        &format!("Migrate Discourse docs for {charm_name} into the repository"),
        &docs_files,
    )
    .await?;

    let (pr_link, pr_action) = repo
        .open_or_update_pull_request(
            &branch,
            base_branch,
            &format!("Migrate {charm_name} docs from Discourse"),
            "Reconstructed from the current Discourse index topic's navigation table. Review before merging.",
        )
        .await?;

    Ok(MigrationOutcome { branch, pages, pr_link, pr_action })
}

/// Convert migrated-page results into [`ActionReport`]s for a uniform §6
/// summary alongside a reconcile run's reports.
pub fn reports_for(pages: &[MigratedPage]) -> Vec<ActionReport> {
    pages
        .iter()
        .map(|p| match p.result {
            ActionResult::Success => ActionReport {
                table_row: None,
                location: Some(p.table_path.clone()),
                result: ActionResult::Success,
                reason: None,
            },
            ActionResult::Fail => ActionReport::fail(p.reason.clone().unwrap_or_default()),
            ActionResult::Skip => ActionReport::skip(p.reason.clone().unwrap_or_default(), None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeDiscourseClient, FakeRepositoryClient};

    fn seeded_index() -> (FakeDiscourseClient, String) {
        let discourse = FakeDiscourseClient::new();
        let nav = "\
# Navigation
| level | path | navlink |
| --- | --- | --- |
| 1 | tutorials | [Tutorials]() |
| 2 | tutorials-getting-started | [Getting Started](https://discourse.example.com/t/getting-started/12) |
| 1 | spec | [Spec](https://example.com/spec) |
";
        let index_content = format!("# Contents\n\n{nav}");
        discourse.seed_topic("https://discourse.example.com/t/index/1", index_content);
        discourse.seed_topic("https://discourse.example.com/t/getting-started/12", "# Getting Started\n\nBody.");
        (discourse, "https://discourse.example.com/t/index/1".to_string())
    }

    #[tokio::test]
    async fn test_plan_files_reconstructs_tree_with_gitkeep_for_page_groups() {
        let (discourse, index_url) = seeded_index();
        let (files, pages) = plan_files(&index_url, "discourse.example.com", &discourse).await.unwrap();

        assert!(files.iter().any(|f| f.path == PathBuf::from("index.md")));
        assert!(files.iter().any(|f| f.path == PathBuf::from("tutorials/getting-started.md")));
        // tutorials has a page descendant, so no .gitkeep is needed for it.
        assert!(!files.iter().any(|f| f.path == PathBuf::from("tutorials/.gitkeep")));

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].result, ActionResult::Success);
    }

    #[tokio::test]
    async fn test_plan_files_gitkeeps_empty_group() {
        let discourse = FakeDiscourseClient::new();
        let nav = "\
# Navigation
| level | path | navlink |
| --- | --- | --- |
| 1 | empty-group | [Empty Group]() |
";
        discourse.seed_topic("https://discourse.example.com/t/index/1", format!("# Contents\n\n{nav}"));

        let (files, _) = plan_files("https://discourse.example.com/t/index/1", "discourse.example.com", &discourse)
            .await
            .unwrap();
        assert!(files.iter().any(|f| f.path == PathBuf::from("empty-group/.gitkeep")));
    }

    #[tokio::test]
    async fn test_plan_files_does_not_gitkeep_ancestor_of_nested_page() {
        // A page nested two levels deep (`tutorials/advanced/page.md`)
        // leaves nothing directly under `tutorials` itself, but `tutorials`
        // is not empty — it transitively contains a page, so it must not
        // get a spurious `.gitkeep`.
        let discourse = FakeDiscourseClient::new();
        let nav = "\
# Navigation
| level | path | navlink |
| --- | --- | --- |
| 1 | tutorials | [Tutorials]() |
| 2 | tutorials-advanced | [Advanced]() |
| 3 | tutorials-advanced-page | [Page](https://discourse.example.com/t/page/3) |
";
        discourse.seed_topic("https://discourse.example.com/t/index/1", format!("# Contents\n\n{nav}"));
        discourse.seed_topic("https://discourse.example.com/t/page/3", "# Page\n\nBody.");

        let (files, _) = plan_files("https://discourse.example.com/t/index/1", "discourse.example.com", &discourse)
            .await
            .unwrap();

        assert!(files.iter().any(|f| f.path == PathBuf::from("tutorials/advanced/page.md")));
        assert!(!files.iter().any(|f| f.path == PathBuf::from("tutorials/.gitkeep")));
        assert!(!files.iter().any(|f| f.path == PathBuf::from("tutorials/advanced/.gitkeep")));
    }

    #[tokio::test]
    async fn test_migrate_opens_pull_request() {
        let (discourse, index_url) = seeded_index();
        let repo = FakeRepositoryClient::new();

        let outcome = migrate("mycharm", &index_url, "discourse.example.com", "main", &discourse, &repo)
            .await
            .unwrap();

        assert_eq!(outcome.branch, "discourse-gatekeeper/migrate-mycharm");
        assert_eq!(outcome.pr_action, PrAction::Opened);
        assert!(repo.committed_branches.lock().unwrap().contains_key(&outcome.branch));
    }
}
