//! Checker (§4.7)
//!
//! Runs pre-execution validation over a realized action stream: page-level
//! three-way conflicts, logical "server-ahead" conflicts, and external-
//! reference liveness. Pure over its inputs plus one network side effect
//! (the external-reference `HEAD` request, issued through the
//! `DiscourseClient`'s HTTP facility so the whole network boundary stays
//! mockable in tests).

use crate::client::DiscourseClient;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Action, MergeOutcome, Problem};

/// Check a realized action stream, returning every [`Problem`] found.
/// Never fails outright: a HEAD request error is itself reported as a
/// `Problem` rather than propagated, since the checker's job is to
/// collect everything wrong with a run, not to abort on the first issue.
pub async fn check(config: &Config, actions: &[Action], discourse: &dyn DiscourseClient) -> Result<Vec<Problem>> {
    let mut problems = Vec::new();

    let non_noop_page_actions = actions
        .iter()
        .filter(|a| matches!(a, Action::CreatePage { .. } | Action::UpdatePage { .. } | Action::DeletePage { .. }))
        .count();

    for action in actions {
        if let Action::UpdatePage { path, outcome, .. } = action {
            match outcome {
                MergeOutcome::Conflict { description } => {
                    problems.push(Problem {
                        path: path.clone(),
                        description: format!("three-way merge conflict: {description}"),
                    });
                }
                MergeOutcome::ServerAhead => {
                    if should_report_server_ahead(config, non_noop_page_actions) {
                        problems.push(Problem {
                            path: path.clone(),
                            description: "server content is ahead of the last synchronized base; review before re-running".to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    for action in actions {
        if let Action::CreateExternalRef { path, url, .. }
        | Action::UpdateExternalRef { path, url, .. }
        | Action::NoopExternalRef { path, url, .. } = action
        {
            match discourse.head(url).await {
                Ok(status) if (200..300).contains(&status) => {}
                Ok(status) => problems.push(Problem {
                    path: path.clone(),
                    description: format!("external reference '{url}' returned status {status}"),
                }),
                Err(e) => problems.push(Problem {
                    path: path.clone(),
                    description: format!("external reference '{url}' could not be checked: {e}"),
                }),
            }
        }
    }

    Ok(problems)
}

/// Resolution of Open Question 1 (§9, DESIGN.md): server-ahead is a
/// logical conflict only when at least one *other* non-noop page action
/// is also in flight this run, and is suppressed only when
/// `ignore_server_ahead` is explicitly set.
fn should_report_server_ahead(config: &Config, non_noop_page_actions: usize) -> bool {
    if config.ignore_server_ahead {
        tracing::warn!(
            "ignore_server_ahead is set: honoring the legacy '{}' tag behavior, which is scheduled for removal",
            crate::config::LEGACY_AHEAD_OK_TAG
        );
        return false;
    }
    non_noop_page_actions > 1
}
