//! Action Executor (§4.8)
//!
//! Consumes the action stream in order, drives the Discourse client,
//! emits one [`ActionReport`] per action, and enforces dry-run and
//! delete-topic policy. A FAILed action never aborts the run: remaining
//! actions continue, and the orchestrator surfaces the aggregated
//! failure afterward.

use crate::client::DiscourseClient;
use crate::config::{
    Config, BASE_MISSING_REASON, DRY_RUN_NAVLINK_LINK, DRY_RUN_REASON, NOT_DELETE_REASON, SERVER_AHEAD_REASON,
};
use crate::error::Result;
use crate::model::{Action, ActionReport, MergeOutcome, TableRow};

/// Execute `actions` in order, returning one report per action alongside
/// the action it was produced from (the orchestrator needs both to
/// re-render the navigation table, per §4.9).
pub async fn execute(
    config: &Config,
    actions: Vec<Action>,
    discourse: &dyn DiscourseClient,
) -> Result<Vec<(Action, ActionReport)>> {
    let mut out = Vec::with_capacity(actions.len());
    for action in actions {
        let report = execute_one(config, &action, discourse).await;
        out.push((action, report));
    }
    Ok(out)
}

async fn execute_one(config: &Config, action: &Action, discourse: &dyn DiscourseClient) -> ActionReport {
    match action {
        Action::NoopPage { navlink, .. } | Action::NoopExternalRef { navlink, .. } => {
            ActionReport::success(row_for(action, navlink.clone()), navlink.link.clone().unwrap_or_default())
        }
        Action::NoopGroup { navlink, .. } => ActionReport::success_group(row_for(action, navlink.clone())),
        Action::NoopIndex { .. } => ActionReport { table_row: None, location: None, result: crate::model::ActionResult::Success, reason: None },

        Action::CreatePage { navlink, content, .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, Some(DRY_RUN_NAVLINK_LINK.to_string()));
            }
            match discourse.create_topic(&navlink.title, content, config.discourse_category_id).await {
                Ok(page) => ActionReport::success(row_for(action, Navlink_with_link(navlink, &page.url)), page.url),
                Err(e) => ActionReport::fail(e.to_string()),
            }
        }
        Action::CreateGroup { navlink, .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, None);
            }
            ActionReport::success_group(row_for(action, navlink.clone()))
        }
        Action::CreateExternalRef { navlink, .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, Some(DRY_RUN_NAVLINK_LINK.to_string()));
            }
            ActionReport::success(row_for(action, navlink.clone()), navlink.link.clone().unwrap_or_default())
        }
        Action::CreateIndex { .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, Some(DRY_RUN_NAVLINK_LINK.to_string()));
            }
            ActionReport { table_row: None, location: None, result: crate::model::ActionResult::Success, reason: None }
        }

        Action::UpdatePage { content_change, navlink_change, outcome, .. } => {
            execute_update_page(config, action, content_change, navlink_change, outcome, discourse).await
        }
        Action::UpdateGroup { navlink_change, .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, None);
            }
            ActionReport::success_group(row_for(action, navlink_change.new.clone()))
        }
        Action::UpdateExternalRef { navlink_change, .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, Some(DRY_RUN_NAVLINK_LINK.to_string()));
            }
            ActionReport::success(row_for(action, navlink_change.new.clone()), navlink_change.new.link.clone().unwrap_or_default())
        }
        Action::UpdateIndex { content_change } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, Some(DRY_RUN_NAVLINK_LINK.to_string()));
            }
            // The index topic's upload and URL bookkeeping happen in the
            // orchestrator, which holds the one well-known index URL;
            // this just confirms the action plan calls for an upload.
            let _ = content_change;
            ActionReport { table_row: None, location: None, result: crate::model::ActionResult::Success, reason: None }
        }

        Action::DeletePage { navlink, .. } | Action::DeleteExternalRef { navlink, .. } => {
            execute_delete(config, action, navlink, discourse).await
        }
        Action::DeleteGroup { navlink, .. } => {
            if config.dry_run {
                return ActionReport::skip(DRY_RUN_REASON, None);
            }
            if !config.delete_topics {
                return ActionReport::skip(NOT_DELETE_REASON, None);
            }
            ActionReport::success_group(row_for(action, navlink.clone()))
        }
    }
}

async fn execute_update_page(
    config: &Config,
    action: &Action,
    content_change: &crate::model::ContentChange,
    navlink_change: &Option<crate::model::NavlinkChange>,
    outcome: &MergeOutcome,
    discourse: &dyn DiscourseClient,
) -> ActionReport {
    if let MergeOutcome::Conflict { description } = outcome {
        // Open Question 2 resolution (DESIGN.md): atomic, both or
        // neither. A conflicting update never uploads content and never
        // applies its navlink rename.
        return ActionReport::fail(format!("merge conflict, not applied: {description}"));
    }

    if config.dry_run {
        return ActionReport::skip(DRY_RUN_REASON, Some(DRY_RUN_NAVLINK_LINK.to_string()));
    }

    let Some(url) = find_update_url(action) else {
        return ActionReport::fail("update action carries no existing topic link".to_string());
    };

    let needs_upload = matches!(outcome, MergeOutcome::Default { .. } | MergeOutcome::ContentChange { .. });

    if needs_upload {
        let merged = match outcome {
            MergeOutcome::Default { merged } | MergeOutcome::ContentChange { merged } => merged,
            _ => unreachable!(),
        };
        if let Err(e) = discourse.update_topic(&url, merged).await {
            return ActionReport::fail(e.to_string());
        }
    } else if matches!(outcome, MergeOutcome::ServerAhead) {
        // Nothing uploaded: server already carries content ahead of base.
        // Reporting SUCCESS here would claim a sync that never happened.
        return ActionReport::skip(SERVER_AHEAD_REASON, Some(url));
    } else if matches!(outcome, MergeOutcome::BaseMissing) {
        // Nothing uploaded: base tag absent and server/local could not be
        // shown equal, so no content was ever resolved and pushed.
        return ActionReport::skip(BASE_MISSING_REASON, Some(url));
    }

    let _ = content_change;
    let navlink = navlink_change
        .as_ref()
        .map(|c| c.new.clone())
        .unwrap_or_else(|| crate::model::Navlink { title: String::new(), link: Some(url.clone()), hidden: false });

    ActionReport::success(row_for(action, navlink), url)
}

async fn execute_delete(config: &Config, action: &Action, navlink: &crate::model::Navlink, discourse: &dyn DiscourseClient) -> ActionReport {
    if config.dry_run {
        return ActionReport::skip(DRY_RUN_REASON, None);
    }
    if !config.delete_topics {
        return ActionReport::skip(NOT_DELETE_REASON, None);
    }

    let Some(url) = navlink.link.clone() else {
        return ActionReport::fail("delete action carries no topic link".to_string());
    };

    match discourse.delete_topic(&url).await {
        Ok(()) => ActionReport::success(row_for(action, navlink.clone()), url),
        Err(e) => ActionReport::fail(e.to_string()),
    }
}

fn row_for(action: &Action, navlink: crate::model::Navlink) -> TableRow {
    TableRow {
        level: action.level().unwrap_or(0),
        path: action.path().unwrap_or_default().to_string(),
        navlink,
    }
}

#[allow(non_snake_case)]
fn Navlink_with_link(navlink: &crate::model::Navlink, url: &str) -> crate::model::Navlink {
    crate::model::Navlink { link: Some(url.to_string()), ..navlink.clone() }
}

/// The topic URL an `UpdatePage` action targets: the navlink rename's old
/// link when present, otherwise `None` (the caller treats that as a bug,
/// since an update implies a matched server row).
fn find_update_url(action: &Action) -> Option<String> {
    if let Action::UpdatePage { navlink_change: Some(change), .. } = action {
        return change.old.link.clone();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeDiscourseClient;
    use crate::model::{ContentChange, Navlink, NavlinkChange};

    fn config(dry_run: bool, delete_topics: bool) -> Config {
        Config {
            discourse_host: "discourse.example.com".into(),
            discourse_api_username: "bot".into(),
            discourse_api_key: "key".into(),
            discourse_category_id: 7,
            github_token: "tok".into(),
            base_branch: "main".into(),
            commit_sha: "abc".into(),
            charm_dir: "/tmp/charm".into(),
            dry_run,
            delete_topics,
            ignore_server_ahead: false,
            base_tag_name: crate::config::DEFAULT_BASE_TAG.into(),
            content_tag_name: crate::config::DEFAULT_CONTENT_TAG.into(),
        }
    }

    #[tokio::test]
    async fn test_create_page_success() {
        let action = Action::CreatePage {
            level: 1,
            path: "p".into(),
            navlink: Navlink { title: "P".into(), link: None, hidden: false },
            content: "Body".into(),
        };
        let discourse = FakeDiscourseClient::new();
        let results = execute(&config(false, false), vec![action], &discourse).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.result, crate::model::ActionResult::Success);
        assert!(results[0].1.location.is_some());
    }

    #[tokio::test]
    async fn test_dry_run_skips_every_mutation() {
        let actions = vec![
            Action::CreatePage { level: 1, path: "p".into(), navlink: Navlink { title: "P".into(), link: None, hidden: false }, content: "x".into() },
            Action::DeletePage { level: 1, path: "q".into(), navlink: Navlink { title: "Q".into(), link: Some("https://discourse.example.com/t/q/1".into()), hidden: false } },
        ];
        let discourse = FakeDiscourseClient::new();
        let results = execute(&config(true, true), actions, &discourse).await.unwrap();
        assert!(results.iter().all(|(_, r)| r.result == crate::model::ActionResult::Skip));
        assert!(discourse.no_mutating_calls());
    }

    #[tokio::test]
    async fn test_delete_disabled_is_skip_not_delete() {
        let action = Action::DeletePage {
            level: 1,
            path: "orphan".into(),
            navlink: Navlink { title: "Orphan".into(), link: Some("https://discourse.example.com/t/orphan/9".into()), hidden: false },
        };
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/orphan/9", "content");

        let results = execute(&config(false, false), vec![action], &discourse).await.unwrap();
        assert_eq!(results[0].1.result, crate::model::ActionResult::Skip);
        assert_eq!(results[0].1.reason.as_deref(), Some(NOT_DELETE_REASON));
        assert!(discourse.topic_content("https://discourse.example.com/t/orphan/9").is_some());
    }

    #[tokio::test]
    async fn test_conflict_fails_without_uploading() {
        let action = Action::UpdatePage {
            level: 1,
            path: "p".into(),
            content_change: ContentChange { base: Some("A".into()), server: Some("B".into()), local: Some("C".into()) },
            navlink_change: Some(NavlinkChange {
                old: Navlink { title: "Old".into(), link: Some("https://discourse.example.com/t/p/1".into()), hidden: false },
                new: Navlink { title: "New".into(), link: Some("https://discourse.example.com/t/p/1".into()), hidden: false },
            }),
            outcome: MergeOutcome::Conflict { description: "overlap".into() },
        };
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/p/1", "B");

        let results = execute(&config(false, false), vec![action], &discourse).await.unwrap();
        assert_eq!(results[0].1.result, crate::model::ActionResult::Fail);
        assert_eq!(discourse.topic_content("https://discourse.example.com/t/p/1").as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_server_ahead_is_skip_not_success() {
        let action = Action::UpdatePage {
            level: 1,
            path: "p".into(),
            content_change: ContentChange { base: Some("A".into()), server: Some("B".into()), local: Some("A".into()) },
            navlink_change: Some(NavlinkChange {
                old: Navlink { title: "P".into(), link: Some("https://discourse.example.com/t/p/1".into()), hidden: false },
                new: Navlink { title: "P".into(), link: Some("https://discourse.example.com/t/p/1".into()), hidden: false },
            }),
            outcome: MergeOutcome::ServerAhead,
        };
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/p/1", "B");

        let results = execute(&config(false, false), vec![action], &discourse).await.unwrap();
        assert_eq!(results[0].1.result, crate::model::ActionResult::Skip);
        assert_eq!(results[0].1.reason.as_deref(), Some(SERVER_AHEAD_REASON));
        // Nothing was uploaded: the server's content is untouched.
        assert_eq!(discourse.topic_content("https://discourse.example.com/t/p/1").as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_base_missing_ambiguous_is_skip_not_success() {
        let action = Action::UpdatePage {
            level: 1,
            path: "p".into(),
            content_change: ContentChange { base: None, server: Some("B".into()), local: Some("C".into()) },
            navlink_change: Some(NavlinkChange {
                old: Navlink { title: "P".into(), link: Some("https://discourse.example.com/t/p/1".into()), hidden: false },
                new: Navlink { title: "P".into(), link: Some("https://discourse.example.com/t/p/1".into()), hidden: false },
            }),
            outcome: MergeOutcome::BaseMissing,
        };
        let discourse = FakeDiscourseClient::new();
        discourse.seed_topic("https://discourse.example.com/t/p/1", "B");

        let results = execute(&config(false, false), vec![action], &discourse).await.unwrap();
        assert_eq!(results[0].1.result, crate::model::ActionResult::Skip);
        assert_eq!(results[0].1.reason.as_deref(), Some(BASE_MISSING_REASON));
        assert_eq!(discourse.topic_content("https://discourse.example.com/t/p/1").as_deref(), Some("B"));
    }
}
