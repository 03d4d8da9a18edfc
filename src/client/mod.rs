//! External collaborators (§6, §9): `DiscourseClient` and `RepositoryClient`.
//!
//! These are specified in the distilled spec only as interfaces the core
//! drives; this module supplies the trait boundary plus (in `discourse`
//! and `repository`) thin production implementations, so the crate
//! compiles and runs end to end. Both traits are `async_trait` and object
//! safe, so the orchestrator holds `Box<dyn DiscourseClient>` /
//! `Box<dyn RepositoryClient>` and can be handed either the production
//! client or, in tests, an in-memory fake.

pub mod discourse;
pub mod repository;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{DiffSummary, Page, PrAction};

/// The Discourse REST surface the core drives (§6 "Discourse surface used").
#[async_trait]
pub trait DiscourseClient: Send + Sync {
    /// Create a topic in `category_id`, returning the resulting page.
    async fn create_topic(&self, title: &str, content: &str, category_id: u64) -> Result<Page>;

    /// Overwrite a topic's first post with `content`.
    async fn update_topic(&self, url: &str, content: &str) -> Result<()>;

    /// Fetch a topic's current content.
    async fn retrieve_topic(&self, url: &str) -> Result<Page>;

    /// Delete a topic.
    async fn delete_topic(&self, url: &str) -> Result<()>;

    /// Probe whether the configured credentials can write to an existing
    /// topic, by attempting a privileged retrieval (§6).
    async fn check_topic_permissions(&self, url: &str) -> Result<bool>;

    /// Issue a `HEAD` request against an arbitrary URL (used by the
    /// checker for external-reference liveness), returning the final
    /// status code after redirects.
    async fn head(&self, url: &str) -> Result<u16>;
}

/// A scoped branch switch: captures the branch on entry and restores it
/// on every exit path, per the §9 "Scoped repository operations" design
/// note. Implementations hand this out from [`RepositoryClient::with_branch`].
pub trait BranchScope {
    /// The branch this scope switched to.
    fn branch(&self) -> &str;
}

/// The Git/host surface the core drives (§6 "Host / Git surface used").
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Name of the branch currently checked out.
    fn current_branch(&self) -> Result<String>;

    /// Switch to `branch`, returning a guard that restores the original
    /// branch when dropped.
    fn with_branch<'a>(&'a self, branch: &str) -> Result<Box<dyn BranchScope + 'a>>;

    /// Read a file's content as it existed at `tag`.
    fn read_file_at_tag(&self, tag: &str, path: &str) -> Result<String>;

    /// Whether `tag` exists in the repository.
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// The commit SHA `tag` currently points at, if it exists.
    fn tag_commit(&self, tag: &str) -> Result<Option<String>>;

    /// Move (creating if necessary) `tag` to point at `commit_sha`. Fails
    /// with `TaggingNotAllowedError` if `commit_sha` is not reachable from
    /// `base_branch` (the only branch tags are permitted to move on).
    fn move_tag(&self, tag: &str, commit_sha: &str, base_branch: &str) -> Result<()>;

    /// Whether `commit_sha` is on `branch`.
    fn is_commit_on_branch(&self, commit_sha: &str, branch: &str) -> Result<bool>;

    /// Summarize the diff of `branch` against `base_branch`.
    fn diff_summary(&self, base_branch: &str, branch: &str) -> Result<DiffSummary>;

    /// Create (or reset) `branch` from `base_branch`'s head, write `files`
    /// (path relative to repo root -> content) into it, and commit.
    async fn commit_files_to_branch(
        &self,
        branch: &str,
        base_branch: &str,
        message: &str,
        files: &[(String, String)],
    ) -> Result<()>;

    /// Open a new pull request for `branch` against `base_branch`, or
    /// update the existing one if already open. Returns its URL and the
    /// action taken.
    async fn open_or_update_pull_request(
        &self,
        branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<(String, PrAction)>;
}
