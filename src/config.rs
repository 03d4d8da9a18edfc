//! Run configuration for discourse-gatekeeper
//!
//! Per the "Global state" design note, there is no module-level mutable
//! global: every legacy constant (tag names, branch prefix, filename
//! conventions) lives in one immutable [`Config`] value built once at
//! startup and threaded explicitly through the orchestrator, planner,
//! checker, and executor.

use std::path::PathBuf;

/// Branch prefix under which migration branches are created.
pub const BRANCH_PREFIX: &str = "discourse-gatekeeper";

/// Default name of the tag marking the last synchronized content snapshot.
pub const DEFAULT_BASE_TAG: &str = "discourse-gatekeeper/base-content";

/// Name of the tag moved once a reconcile run finishes cleanly.
pub const DEFAULT_CONTENT_TAG: &str = "discourse-gatekeeper/content";

/// Legacy tag honored only when `ignore_server_ahead` is set.
pub const LEGACY_AHEAD_OK_TAG: &str = "upload-charm-docs/discourse-ahead-ok";

/// Reason string recorded on a `SKIP` report produced by a dry run.
pub const DRY_RUN_REASON: &str = "dry run: action not executed";

/// Placeholder location recorded on a dry-run `SKIP` for a create action.
pub const DRY_RUN_NAVLINK_LINK: &str = "<dry-run>";

/// Reason string recorded on a `SKIP` report for a disabled page delete.
pub const NOT_DELETE_REASON: &str = "delete_topics is disabled";

/// Reason string recorded on a `SKIP` report when the server is ahead of
/// the last synchronized base: nothing was uploaded.
pub const SERVER_AHEAD_REASON: &str = "server content is ahead of base; nothing uploaded";

/// Reason string recorded on a `SKIP` report when the base tag is absent
/// and server/local content could not be shown equal: nothing was uploaded.
pub const BASE_MISSING_REASON: &str = "base-content tag missing; nothing uploaded";

/// Name of the directory, relative to `charm_dir`, holding the docs tree.
pub const DOCS_DIRECTORY: &str = "docs";

/// Name of the top-level index file.
pub const INDEX_FILENAME: &str = "index.md";

/// Heading under which the navigation table is rendered on the index topic.
pub const NAVIGATION_HEADING: &str = "Navigation";

/// Heading under which the user-authored contents index lives in `index.md`.
pub const CONTENTS_HEADING: &str = "Contents";

/// Immutable run configuration, built once from CLI flags / environment
/// variables and passed by reference into every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of Discourse (protocol-less, port optional).
    pub discourse_host: String,
    pub discourse_api_username: String,
    pub discourse_api_key: String,
    pub discourse_category_id: u64,

    pub github_token: String,

    pub base_branch: String,
    pub commit_sha: String,

    pub charm_dir: PathBuf,

    pub dry_run: bool,
    pub delete_topics: bool,

    /// Resolution of Open Question 1 (§9): honor the legacy ahead-ok tag
    /// only when this is explicitly set, with a deprecation warning logged.
    pub ignore_server_ahead: bool,

    /// Name of the base-content tag (override of [`DEFAULT_BASE_TAG`]).
    pub base_tag_name: String,
    /// Name of the content tag (override of [`DEFAULT_CONTENT_TAG`]).
    pub content_tag_name: String,
}

impl Config {
    /// Directory containing the local docs tree (`{charm_dir}/docs`).
    pub fn docs_dir(&self) -> PathBuf {
        self.charm_dir.join(DOCS_DIRECTORY)
    }

    /// Path to the top-level `index.md`.
    pub fn index_path(&self) -> PathBuf {
        self.docs_dir().join(INDEX_FILENAME)
    }

    /// Whether the docs directory is present (reconcile) or absent (migrate).
    pub fn docs_present(&self) -> bool {
        self.docs_dir().is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            discourse_host: "discourse.example.com".into(),
            discourse_api_username: "bot".into(),
            discourse_api_key: "secret".into(),
            discourse_category_id: 42,
            github_token: "ghp_x".into(),
            base_branch: "main".into(),
            commit_sha: "abc123".into(),
            charm_dir: PathBuf::from("/tmp/charm"),
            dry_run: false,
            delete_topics: false,
            ignore_server_ahead: false,
            base_tag_name: DEFAULT_BASE_TAG.into(),
            content_tag_name: DEFAULT_CONTENT_TAG.into(),
        }
    }

    #[test]
    fn test_docs_dir_derivation() {
        let cfg = sample_config();
        assert_eq!(cfg.docs_dir(), PathBuf::from("/tmp/charm/docs"));
        assert_eq!(cfg.index_path(), PathBuf::from("/tmp/charm/docs/index.md"));
    }
}
