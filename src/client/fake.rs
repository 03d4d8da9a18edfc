//! In-memory fakes for [`DiscourseClient`] and [`RepositoryClient`], used
//! throughout the unit and integration test suites (§4.11) in place of a
//! mocking framework — grounded in the teacher's preference for direct,
//! dependency-light test doubles over mock objects.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::{DiffSummary, Page, PrAction};

use super::{BranchScope, DiscourseClient, RepositoryClient};

/// Every call a fake client received, in order, for dry-run-purity and
/// ordering assertions (§8 property 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CreateTopic { title: String },
    UpdateTopic { url: String },
    RetrieveTopic { url: String },
    DeleteTopic { url: String },
    CheckPermissions { url: String },
    Head { url: String },
}

#[derive(Default)]
pub struct FakeDiscourseClient {
    topics: Mutex<HashMap<String, String>>,
    next_id: Mutex<u64>,
    /// URLs on which `retrieve_topic`/`update_topic`/`delete_topic` should
    /// fail, simulating a missing or permission-denied topic.
    pub forbidden: Mutex<Vec<String>>,
    /// URLs on which `head` should return a non-2xx status.
    pub dead_links: Mutex<HashMap<String, u16>>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl FakeDiscourseClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_topic(&self, url: impl Into<String>, content: impl Into<String>) {
        self.topics.lock().unwrap().insert(url.into(), content.into());
    }

    pub fn topic_content(&self, url: &str) -> Option<String> {
        self.topics.lock().unwrap().get(url).cloned()
    }

    /// True if no method in this trait that mutates Discourse state was
    /// ever invoked (§8 property 6, dry-run purity).
    pub fn no_mutating_calls(&self) -> bool {
        self.calls.lock().unwrap().iter().all(|c| {
            matches!(
                c,
                RecordedCall::RetrieveTopic { .. } | RecordedCall::CheckPermissions { .. } | RecordedCall::Head { .. }
            )
        })
    }
}

#[async_trait]
impl DiscourseClient for FakeDiscourseClient {
    async fn create_topic(&self, title: &str, content: &str, _category_id: u64) -> Result<Page> {
        self.calls.lock().unwrap().push(RecordedCall::CreateTopic { title: title.to_string() });
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let url = format!("https://discourse.example.com/t/{title}/{next_id}", title = crate::slug::table_path(std::path::Path::new(title)));
        self.topics.lock().unwrap().insert(url.clone(), content.to_string());
        Ok(Page { url, content: content.to_string() })
    }

    async fn update_topic(&self, url: &str, content: &str) -> Result<()> {
        self.calls.lock().unwrap().push(RecordedCall::UpdateTopic { url: url.to_string() });
        if self.forbidden.lock().unwrap().contains(&url.to_string()) {
            return Err(Error::PagePermissionError { url: url.to_string() });
        }
        self.topics.lock().unwrap().insert(url.to_string(), content.to_string());
        Ok(())
    }

    async fn retrieve_topic(&self, url: &str) -> Result<Page> {
        self.calls.lock().unwrap().push(RecordedCall::RetrieveTopic { url: url.to_string() });
        if self.forbidden.lock().unwrap().contains(&url.to_string()) {
            return Err(Error::PagePermissionError { url: url.to_string() });
        }
        match self.topics.lock().unwrap().get(url) {
            Some(content) => Ok(Page { url: url.to_string(), content: content.clone() }),
            None => Err(Error::ServerError { path: url.to_string(), message: "topic not found".to_string() }),
        }
    }

    async fn delete_topic(&self, url: &str) -> Result<()> {
        self.calls.lock().unwrap().push(RecordedCall::DeleteTopic { url: url.to_string() });
        self.topics.lock().unwrap().remove(url);
        Ok(())
    }

    async fn check_topic_permissions(&self, url: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(RecordedCall::CheckPermissions { url: url.to_string() });
        Ok(!self.forbidden.lock().unwrap().contains(&url.to_string()))
    }

    async fn head(&self, url: &str) -> Result<u16> {
        self.calls.lock().unwrap().push(RecordedCall::Head { url: url.to_string() });
        Ok(*self.dead_links.lock().unwrap().get(url).unwrap_or(&200))
    }
}

pub struct FakeBranchScope {
    branch: String,
}

impl BranchScope for FakeBranchScope {
    fn branch(&self) -> &str {
        &self.branch
    }
}

pub struct FakeRepositoryClient {
    pub current_branch: Mutex<String>,
    /// `tag -> commit sha`.
    pub tags: Mutex<HashMap<String, String>>,
    /// `tag -> (path -> content)`, the tree as it existed when the tag
    /// was created.
    pub tagged_files: Mutex<HashMap<String, HashMap<String, String>>>,
    pub commits_on_base: Mutex<Vec<String>>,
    pub diff: Mutex<DiffSummary>,
    pub pr: Mutex<Option<(String, PrAction)>>,
    pub committed_branches: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl Default for FakeRepositoryClient {
    fn default() -> Self {
        Self {
            current_branch: Mutex::new("main".to_string()),
            tags: Mutex::new(HashMap::new()),
            tagged_files: Mutex::new(HashMap::new()),
            commits_on_base: Mutex::new(Vec::new()),
            diff: Mutex::new(DiffSummary::default()),
            pr: Mutex::new(None),
            committed_branches: Mutex::new(HashMap::new()),
        }
    }
}

impl FakeRepositoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_tag(&self, tag: &str, commit_sha: &str, files: HashMap<String, String>) {
        self.tags.lock().unwrap().insert(tag.to_string(), commit_sha.to_string());
        self.tagged_files.lock().unwrap().insert(tag.to_string(), files);
    }

    pub fn allow_commit_on_base(&self, commit_sha: &str) {
        self.commits_on_base.lock().unwrap().push(commit_sha.to_string());
    }
}

#[async_trait]
impl RepositoryClient for FakeRepositoryClient {
    fn current_branch(&self) -> Result<String> {
        Ok(self.current_branch.lock().unwrap().clone())
    }

    fn with_branch<'a>(&'a self, branch: &str) -> Result<Box<dyn BranchScope + 'a>> {
        *self.current_branch.lock().unwrap() = branch.to_string();
        Ok(Box::new(FakeBranchScope { branch: branch.to_string() }))
    }

    fn read_file_at_tag(&self, tag: &str, path: &str) -> Result<String> {
        let by_tag = self.tagged_files.lock().unwrap();
        let files = by_tag.get(tag).ok_or_else(|| Error::RepositoryTagNotFoundError { tag: tag.to_string() })?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::RepositoryFileNotFoundError { path: path.to_string(), tag: tag.to_string() })
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.tags.lock().unwrap().contains_key(tag))
    }

    fn tag_commit(&self, tag: &str) -> Result<Option<String>> {
        Ok(self.tags.lock().unwrap().get(tag).cloned())
    }

    fn move_tag(&self, tag: &str, commit_sha: &str, base_branch: &str) -> Result<()> {
        if !self.is_commit_on_branch(commit_sha, base_branch)? {
            return Err(Error::TaggingNotAllowedError {
                commit: commit_sha.to_string(),
                base_branch: base_branch.to_string(),
            });
        }
        self.tags.lock().unwrap().insert(tag.to_string(), commit_sha.to_string());
        Ok(())
    }

    fn is_commit_on_branch(&self, commit_sha: &str, _branch: &str) -> Result<bool> {
        Ok(self.commits_on_base.lock().unwrap().contains(&commit_sha.to_string()))
    }

    fn diff_summary(&self, _base_branch: &str, _branch: &str) -> Result<DiffSummary> {
        Ok(self.diff.lock().unwrap().clone())
    }

    async fn commit_files_to_branch(
        &self,
        branch: &str,
        _base_branch: &str,
        _message: &str,
        files: &[(String, String)],
    ) -> Result<()> {
        let map = files.iter().cloned().collect();
        self.committed_branches.lock().unwrap().insert(branch.to_string(), map);
        Ok(())
    }

    async fn open_or_update_pull_request(
        &self,
        branch: &str,
        _base_branch: &str,
        _title: &str,
        _body: &str,
    ) -> Result<(String, PrAction)> {
        let mut pr = self.pr.lock().unwrap();
        let action = if pr.is_some() { PrAction::Updated } else { PrAction::Opened };
        let url = format!("https://github.com/example/repo/pull/{branch}");
        *pr = Some((url.clone(), action));
        Ok((url, action))
    }
}
