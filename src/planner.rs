//! Action Planner / Reconciler (§4.6) and Index Reconciler (§4.9, the
//! index half).
//!
//! Pairs local items (the sorter's fused stream), current server rows,
//! and base-tag content to emit a typed [`Action`] stream. The page/group
//! pairing logic here is pure given its three content sides; the async
//! boundary exists only to fetch base content (from the repository
//! client, keyed by the `base-content` tag) and server content (from the
//! Discourse client, keyed by the navigation row's link).

use std::collections::HashMap;
use std::path::Path;

use crate::client::{DiscourseClient, RepositoryClient};
use crate::config::Config;
use crate::error::Result;
use crate::merge::{self, BaseMissing};
use crate::model::{Action, ActionReport, ContentChange, IndexFile, MergeOutcome, Navlink, NavlinkChange, Page, TableRow};
use crate::navigation;
use crate::sorter::SortedItem;

/// Everything the planner needs beyond the sorted item / server row
/// streams: where to read local file content from, and which tag/host
/// names key the three-way merge.
pub struct PlannerContext<'a> {
    pub docs_dir: &'a Path,
    pub base_tag: &'a str,
    pub discourse_host: &'a str,
}

impl<'a> PlannerContext<'a> {
    pub fn from_config(config: &'a Config, docs_dir: &'a Path) -> Self {
        Self {
            docs_dir,
            base_tag: &config.base_tag_name,
            discourse_host: &config.discourse_host,
        }
    }
}

/// Build the typed action stream for every page, group, and external
/// reference (everything except the index page itself, handled by
/// [`plan_index`]).
pub async fn plan(
    ctx: &PlannerContext<'_>,
    sorted_items: &[SortedItem],
    server_rows: &[TableRow],
    discourse: &dyn DiscourseClient,
    repo: &dyn RepositoryClient,
) -> Result<Vec<Action>> {
    let mut server_by_path: HashMap<&str, &TableRow> =
        server_rows.iter().map(|r| (r.path.as_str(), r)).collect();

    let mut actions = Vec::with_capacity(sorted_items.len());
    let mut create_page_indices: Vec<usize> = Vec::new();

    for item in sorted_items {
        let table_path = item.table_path().to_string();
        let server_row = server_by_path.remove(table_path.as_str());

        let action = match item {
            SortedItem::Local(info) if info.is_group => {
                plan_group(info.level, &table_path, &info.navlink_title, info.navlink_hidden, server_row)
            }
            SortedItem::Local(info) => {
                plan_page(ctx, info.level, &table_path, &info.local_path, &info.navlink_title, info.navlink_hidden, server_row, discourse, repo).await?
            }
            SortedItem::ExternalRef { level, navlink_title, hidden, url, .. } => {
                plan_external_ref(*level, &table_path, navlink_title, *hidden, url, server_row)
            }
        };
        let base_idx = actions.len();
        let is_single_create = matches!(action.as_slice(), [Action::CreatePage { .. }]);
        actions.extend(action);
        if is_single_create {
            create_page_indices.push(base_idx);
        }
    }

    // Tie-break 2 (§4.6): a server row with no table_path match may still be
    // the *same* page under a new path (a directory/file rename). Before
    // treating it as an orphan, check whether its content matches a pending
    // `CreatePage` byte-for-byte; if so, fold the create+delete pair into a
    // single `UpdatePage` carrying only a `NavlinkChange`, reusing the
    // existing topic instead of minting a new one.
    let rename_candidates: Vec<&TableRow> = server_by_path
        .values()
        .filter(|row| !row.is_group() && !navigation::is_external(&row.navlink, ctx.discourse_host))
        .copied()
        .collect();

    if !rename_candidates.is_empty() && !create_page_indices.is_empty() {
        let mut matched_rows: Vec<String> = Vec::new();

        for idx in create_page_indices {
            let (level, path, navlink, content) = match &actions[idx] {
                Action::CreatePage { level, path, navlink, content } => {
                    (*level, path.clone(), navlink.clone(), content.clone())
                }
                _ => continue,
            };
            let mut found: Option<(String, Navlink)> = None;
            for row in &rename_candidates {
                if matched_rows.iter().any(|p| p == &row.path) {
                    continue;
                }
                let link = row.navlink.link.clone().unwrap_or_default();
                if link.is_empty() {
                    continue;
                }
                let server_page = discourse.retrieve_topic(&link).await?;
                if server_page.content == content {
                    found = Some((link, row.navlink.clone()));
                    matched_rows.push(row.path.clone());
                    break;
                }
            }
            if let Some((link, old_navlink)) = found {
                let new_navlink = Navlink { link: Some(link), ..navlink };
                actions[idx] = Action::UpdatePage {
                    level,
                    path,
                    content_change: ContentChange {
                        base: None,
                        server: Some(content.clone()),
                        local: Some(content),
                    },
                    navlink_change: Some(NavlinkChange { old: old_navlink, new: new_navlink }),
                    outcome: MergeOutcome::Noop,
                };
            }
        }

        for path in &matched_rows {
            server_by_path.remove(path.as_str());
        }
    }

    // Anything left in `server_by_path` has no local counterpart: delete.
    // Tie-break 1 (§4.6): deletes are emitted after everything else, with
    // deeper levels first so Discourse never orphans a group mid-run.
    let mut deletes: Vec<&TableRow> = server_by_path.into_values().collect();
    deletes.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.path.cmp(&b.path)));

    for row in deletes {
        actions.push(plan_delete(row));
    }

    Ok(actions)
}

fn plan_group(level: u32, path: &str, title: &str, hidden: bool, server_row: Option<&TableRow>) -> Vec<Action> {
    let new_navlink = Navlink { title: title.to_string(), link: None, hidden };

    match server_row {
        None => vec![Action::CreateGroup { level, path: path.to_string(), navlink: new_navlink }],
        Some(row) if row.is_group() => {
            if row.navlink == new_navlink {
                vec![Action::NoopGroup { level, path: path.to_string(), navlink: new_navlink }]
            } else {
                vec![Action::UpdateGroup {
                    level,
                    path: path.to_string(),
                    navlink_change: NavlinkChange { old: row.navlink.clone(), new: new_navlink },
                }]
            }
        }
        // Tie-break 3: the server row is a page where the local item is a
        // group. Delete the stale page row, then create the group fresh.
        Some(row) => vec![plan_delete(row), Action::CreateGroup { level, path: path.to_string(), navlink: new_navlink }],
    }
}

#[allow(clippy::too_many_arguments)]
async fn plan_page(
    ctx: &PlannerContext<'_>,
    level: u32,
    path: &str,
    local_path: &Path,
    title: &str,
    hidden: bool,
    server_row: Option<&TableRow>,
    discourse: &dyn DiscourseClient,
    repo: &dyn RepositoryClient,
) -> Result<Vec<Action>> {
    let local_content = std::fs::read_to_string(ctx.docs_dir.join(local_path)).map_err(|e| {
        crate::error::Error::FileReadError { path: ctx.docs_dir.join(local_path), source: e }
    })?;
    let new_navlink = Navlink { title: title.to_string(), link: None, hidden };

    let Some(row) = server_row else {
        return Ok(vec![Action::CreatePage { level, path: path.to_string(), navlink: new_navlink, content: local_content }]);
    };

    if row.is_group() {
        // Tie-break 3: server row is a group, local item is a page.
        return Ok(vec![
            plan_delete(row),
            Action::CreatePage { level, path: path.to_string(), navlink: new_navlink, content: local_content },
        ]);
    }

    let link = row.navlink.link.clone().unwrap_or_default();
    let server_page = discourse.retrieve_topic(&link).await?;
    let base_path_str = local_path.to_string_lossy().replace('\\', "/");
    let base_content = match repo.read_file_at_tag(ctx.base_tag, &base_path_str) {
        Ok(content) => Some(content),
        Err(crate::error::Error::RepositoryTagNotFoundError { .. })
        | Err(crate::error::Error::RepositoryFileNotFoundError { .. }) => None,
        Err(e) => return Err(e),
    };

    let content_change = ContentChange {
        base: base_content.clone(),
        server: Some(server_page.content.clone()),
        local: Some(local_content.clone()),
    };

    let outcome = classify_page_outcome(&content_change, path)?;

    let old_navlink = Navlink { title: row.navlink.title.clone(), link: row.navlink.link.clone(), hidden: row.navlink.hidden };
    let navlink_changed = old_navlink.title != new_navlink.title || old_navlink.hidden != new_navlink.hidden;

    if matches!(outcome, MergeOutcome::Noop) && !navlink_changed {
        return Ok(vec![Action::NoopPage {
            level,
            path: path.to_string(),
            navlink: old_navlink,
            content: local_content,
        }]);
    }

    // Carried even when unchanged (`old == new` but for the link) so the
    // executor always has the existing topic URL to update against; only
    // `navlink_changed` signals an actual rename worth recording.
    let navlink_change = Some(NavlinkChange { old: old_navlink, new: Navlink { link: row.navlink.link.clone(), ..new_navlink } });

    Ok(vec![Action::UpdatePage { level, path: path.to_string(), content_change, navlink_change, outcome }])
}

/// Classify the three-way outcome per the §4.6 decision table. Never
/// fails for `ContentError`: a merge conflict is represented as
/// `MergeOutcome::Conflict` so the checker, not the planner, raises it.
fn classify_page_outcome(change: &ContentChange, path: &str) -> Result<MergeOutcome> {
    let (base, server, local) = match (&change.base, &change.server, &change.local) {
        (base, Some(server), Some(local)) => (base.clone(), server, local),
        _ => return Ok(MergeOutcome::Noop),
    };

    let Some(base) = base else {
        return Ok(match merge::classify_base_missing(server, local) {
            // Base tag absent, server == local: treated as equal to ours
            // (§4.1), so this is a plain no-op, not a reportable condition.
            BaseMissing::Equal => MergeOutcome::Noop,
            BaseMissing::Ambiguous => MergeOutcome::BaseMissing,
        });
    };

    if base == *server && base == *local {
        return Ok(MergeOutcome::Noop);
    }
    if base == *server {
        return Ok(MergeOutcome::Default { merged: local.clone() });
    }
    if base == *local {
        return Ok(MergeOutcome::ServerAhead);
    }

    match merge::merge(&base, server, local, path) {
        Ok(merged) => Ok(MergeOutcome::ContentChange { merged }),
        Err(crate::error::Error::ContentError { description, .. }) => Ok(MergeOutcome::Conflict { description }),
        Err(e) => Err(e),
    }
}

fn plan_external_ref(level: u32, path: &str, title: &str, hidden: bool, url: &str, server_row: Option<&TableRow>) -> Vec<Action> {
    let new_navlink = Navlink { title: title.to_string(), link: Some(url.to_string()), hidden };

    match server_row {
        None => vec![Action::CreateExternalRef { level, path: path.to_string(), navlink: new_navlink, url: url.to_string() }],
        Some(row) => {
            if row.navlink == new_navlink {
                vec![Action::NoopExternalRef { level, path: path.to_string(), navlink: new_navlink, url: url.to_string() }]
            } else {
                vec![Action::UpdateExternalRef {
                    level,
                    path: path.to_string(),
                    navlink_change: NavlinkChange { old: row.navlink.clone(), new: new_navlink },
                    url: url.to_string(),
                }]
            }
        }
    }
}

fn plan_delete(row: &TableRow) -> Action {
    if row.is_group() {
        Action::DeleteGroup { level: row.level, path: row.path.clone(), navlink: row.navlink.clone() }
    } else if row.navlink.link.as_deref().is_some_and(|l| !l.is_empty()) {
        Action::DeletePage { level: row.level, path: row.path.clone(), navlink: row.navlink.clone() }
    } else {
        Action::DeleteExternalRef { level: row.level, path: row.path.clone(), navlink: row.navlink.clone() }
    }
}

/// The index-page special case (§4.9): compares `IndexFile.content`
/// (minus the navigation table and any `# contents` section whose server
/// counterpart *is* the navigation table) against server content.
pub fn plan_index(local: &IndexFile, server: Option<&Page>, rendered_navigation: &str) -> Action {
    let local_body = strip_generated_sections(&local.content);
    let full_local = format!("{local_body}\n{rendered_navigation}");

    match server {
        None => Action::CreateIndex { content: full_local },
        Some(page) => {
            if page.content.trim_end() == full_local.trim_end() {
                Action::NoopIndex { content: full_local }
            } else {
                Action::UpdateIndex {
                    content_change: ContentChange {
                        base: None,
                        server: Some(page.content.clone()),
                        local: Some(full_local),
                    },
                }
            }
        }
    }
}

/// Strip the `# Navigation` heading/table (the auto-generated section) so
/// the index body compared is the user-authored prose plus the `#
/// Contents` list only.
fn strip_generated_sections(content: &str) -> String {
    let heading_re = regex::Regex::new(r"(?im)^#+\s*navigation\s*$").expect("static regex");
    match heading_re.find(content) {
        Some(m) => content[..m.start()].trim_end().to_string(),
        None => content.trim_end().to_string(),
    }
}

/// Render the navigation table implied by applying the just-executed
/// `(action, report)` pairs on top of `server_rows` (the table as it
/// stood before this run), used by the orchestrator to build the index
/// page (§4.9).
///
/// Starting from the prior table rather than purely from the planned
/// actions keeps a FAILed `UpdatePage` (a merge conflict, per the
/// atomicity resolution of Open Question 2 in DESIGN.md) from having its
/// rename half silently applied: the row for that path is simply left as
/// it was.
pub fn render_navigation_from_actions(
    server_rows: &[TableRow],
    realized: &[(Action, ActionReport)],
) -> String {
    use crate::model::ActionResult;

    let mut by_path: HashMap<String, TableRow> =
        server_rows.iter().map(|r| (r.path.clone(), r.clone())).collect();

    for (action, report) in realized {
        let Some(path) = action.path() else { continue };
        let succeeded = report.result == ActionResult::Success;

        if action.is_delete() {
            if succeeded {
                by_path.remove(path);
            }
            continue;
        }
        if !succeeded {
            continue;
        }

        let Some(level) = action.level() else { continue };
        let navlink = match action {
            Action::CreatePage { navlink, .. } | Action::NoopPage { navlink, .. } => {
                Navlink { link: report.location.clone().or_else(|| navlink.link.clone()), ..navlink.clone() }
            }
            Action::UpdatePage { navlink_change: Some(change), .. } => {
                Navlink { link: report.location.clone().or_else(|| change.new.link.clone()), ..change.new.clone() }
            }
            Action::UpdatePage { .. } => {
                let mut row = by_path.get(path).cloned().map(|r| r.navlink).unwrap_or_default();
                if let Some(location) = &report.location {
                    row.link = Some(location.clone());
                }
                row
            }
            Action::CreateGroup { navlink, .. } | Action::NoopGroup { navlink, .. } => navlink.clone(),
            Action::UpdateGroup { navlink_change, .. } => navlink_change.new.clone(),
            Action::CreateExternalRef { navlink, .. } | Action::NoopExternalRef { navlink, .. } => navlink.clone(),
            Action::UpdateExternalRef { navlink_change, .. } => navlink_change.new.clone(),
            _ => continue,
        };
        by_path.insert(path.to_string(), TableRow { level, path: path.to_string(), navlink });
    }

    let mut rows: Vec<TableRow> = by_path.into_values().collect();
    rows.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.path.cmp(&b.path)));
    navigation::render(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeDiscourseClient, FakeRepositoryClient};
    use crate::model::PathInfo;
    use std::collections::HashMap as Map;
    use std::path::PathBuf;

    fn ctx(docs_dir: &Path) -> PlannerContext<'_> {
        PlannerContext { docs_dir, base_tag: "discourse-gatekeeper/base-content", discourse_host: "discourse.example.com" }
    }

    #[tokio::test]
    async fn test_create_group_and_page_clean_add() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tutorials")).unwrap();
        std::fs::write(dir.path().join("tutorials/getting-started.md"), "# Getting Started\nBody").unwrap();

        let infos = vec![
            PathInfo { local_path: PathBuf::from("tutorials"), level: 1, table_path: "tutorials".into(), navlink_title: "Tutorials".into(), alphabetical_rank: 1, navlink_hidden: false, is_group: true },
            PathInfo { local_path: PathBuf::from("tutorials/getting-started.md"), level: 2, table_path: "tutorials-getting-started".into(), navlink_title: "Getting Started".into(), alphabetical_rank: 1, navlink_hidden: false, is_group: false },
        ];
        let sorted: Vec<SortedItem> = infos.into_iter().map(SortedItem::Local).collect();

        let discourse = FakeDiscourseClient::new();
        let repo = FakeRepositoryClient::new();

        let actions = plan(&ctx(dir.path()), &sorted, &[], &discourse, &repo).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::CreateGroup { .. }));
        assert!(matches!(actions[1], Action::CreatePage { .. }));
    }

    #[tokio::test]
    async fn test_clean_three_way_merge() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.md"), "A\nB\nC2\n").unwrap();

        let info = PathInfo { local_path: PathBuf::from("page.md"), level: 1, table_path: "page".into(), navlink_title: "Page".into(), alphabetical_rank: 1, navlink_hidden: false, is_group: false };
        let sorted = vec![SortedItem::Local(info)];

        let server_rows = vec![TableRow {
            level: 1,
            path: "page".into(),
            navlink: Navlink { title: "Page".into(), link: Some("https://discourse.example.com/t/page/1".into()), hidden: false },
        }];

        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/page/1", "A\nB2\nC\n");

        let repo = FakeRepositoryClient::new();
        let mut files = Map::new();
        files.insert("page.md".to_string(), "A\nB\nC\n".to_string());
        repo.seed_tag("discourse-gatekeeper/base-content", "deadbeef", files);

        let actions = plan(&ctx(dir.path()), &sorted, &server_rows, &discourse, &repo).await.unwrap();
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::UpdatePage { outcome, .. } => match outcome {
                MergeOutcome::ContentChange { merged } => assert_eq!(merged, "A\nB2\nC2\n"),
                other => panic!("expected ContentChange, got {other:?}"),
            },
            other => panic!("expected UpdatePage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_base_with_server_matching_local_is_noop() {
        // S4: base-content tag absent, server and local identical content.
        // Must fold into NoopPage, not UpdatePage (base-missing-but-equal is
        // treated as equal to ours per §4.1).
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.md"), "same content\n").unwrap();

        let info = PathInfo { local_path: PathBuf::from("page.md"), level: 1, table_path: "page".into(), navlink_title: "Page".into(), alphabetical_rank: 1, navlink_hidden: false, is_group: false };
        let sorted = vec![SortedItem::Local(info)];

        let server_rows = vec![TableRow {
            level: 1,
            path: "page".into(),
            navlink: Navlink { title: "Page".into(), link: Some("https://discourse.example.com/t/page/1".into()), hidden: false },
        }];

        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/page/1", "same content\n");

        // No `seed_tag` call: the base-content tag does not exist yet.
        let repo = FakeRepositoryClient::new();

        let actions = plan(&ctx(dir.path()), &sorted, &server_rows, &discourse, &repo).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::NoopPage { .. }), "expected NoopPage, got {:?}", actions[0]);
    }

    #[tokio::test]
    async fn test_orphan_row_emits_delete_after_others() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kept.md"), "# Kept").unwrap();

        let info = PathInfo { local_path: PathBuf::from("kept.md"), level: 1, table_path: "kept".into(), navlink_title: "Kept".into(), alphabetical_rank: 1, navlink_hidden: false, is_group: false };
        let sorted = vec![SortedItem::Local(info)];

        let server_rows = vec![TableRow {
            level: 1,
            path: "orphan".into(),
            navlink: Navlink { title: "Orphan".into(), link: Some("https://discourse.example.com/t/orphan/9".into()), hidden: false },
        }];

        let discourse = FakeDiscourseClient::new();
        let repo = FakeRepositoryClient::new();

        let actions = plan(&ctx(dir.path()), &sorted, &server_rows, &discourse, &repo).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::CreatePage { .. }));
        assert!(matches!(actions[1], Action::DeletePage { .. }));
    }

    #[test]
    fn test_index_noop_when_content_matches_after_stripping_navigation() {
        let local = IndexFile { title: "Index".into(), content: "# Index\n\nSome prose.\n\n# Navigation\nstale".into() };
        let rendered_nav = navigation::render(&[]);
        let full = format!("# Index\n\nSome prose.\n{rendered_nav}");
        let server = Page { url: "https://discourse.example.com/t/index/1".into(), content: full };

        let action = plan_index(&local, Some(&server), &rendered_nav);
        assert!(matches!(action, Action::NoopIndex { .. }));
    }

    #[tokio::test]
    async fn test_renamed_page_folds_into_update_instead_of_create_and_delete() {
        // The file moved from `old-home.md` to `new-home.md`, so its
        // `table_path` no longer matches the server row, but its content
        // is unchanged: tie-break 2 should fold this into a single
        // `UpdatePage` carrying a `NavlinkChange`, not a create+delete.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("new-home.md"), "# New Home\nUnchanged body").unwrap();

        let info = PathInfo {
            local_path: PathBuf::from("new-home.md"),
            level: 1,
            table_path: "new-home".into(),
            navlink_title: "New Home".into(),
            alphabetical_rank: 1,
            navlink_hidden: false,
            is_group: false,
        };
        let sorted = vec![SortedItem::Local(info)];

        let server_rows = vec![TableRow {
            level: 1,
            path: "old-home".into(),
            navlink: Navlink { title: "Old Home".into(), link: Some("https://discourse.example.com/t/old-home/3".into()), hidden: false },
        }];

        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/old-home/3", "# New Home\nUnchanged body");

        let repo = FakeRepositoryClient::new();

        let actions = plan(&ctx(dir.path()), &sorted, &server_rows, &discourse, &repo).await.unwrap();
        assert_eq!(actions.len(), 1, "rename must fold into one action, not create+delete: {actions:?}");
        match &actions[0] {
            Action::UpdatePage { path, navlink_change: Some(change), outcome, .. } => {
                assert_eq!(path, "new-home");
                assert_eq!(change.old.link.as_deref(), Some("https://discourse.example.com/t/old-home/3"));
                assert_eq!(change.new.title, "New Home");
                assert!(matches!(outcome, MergeOutcome::Noop));
            }
            other => panic!("expected UpdatePage with a rename, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unmatched_orphan_with_different_content_still_deletes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fresh.md"), "# Fresh\nBrand new content").unwrap();

        let info = PathInfo {
            local_path: PathBuf::from("fresh.md"),
            level: 1,
            table_path: "fresh".into(),
            navlink_title: "Fresh".into(),
            alphabetical_rank: 1,
            navlink_hidden: false,
            is_group: false,
        };
        let sorted = vec![SortedItem::Local(info)];

        let server_rows = vec![TableRow {
            level: 1,
            path: "stale".into(),
            navlink: Navlink { title: "Stale".into(), link: Some("https://discourse.example.com/t/stale/4".into()), hidden: false },
        }];

        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/stale/4", "Totally different content");

        let repo = FakeRepositoryClient::new();

        let actions = plan(&ctx(dir.path()), &sorted, &server_rows, &discourse, &repo).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::CreatePage { .. }));
        assert!(matches!(actions[1], Action::DeletePage { .. }));
    }
}
