//! `git2`-backed [`RepositoryClient`] implementation.
//!
//! Git operations occur against a scratch clone (§5); branch switches are
//! modeled as an explicit scope that captures the current ref on entry
//! and restores it on every exit path (§9 "Scoped repository operations"),
//! implemented here as a drop guard.

use std::path::PathBuf;

use async_trait::async_trait;
use git2::{BranchType, ObjectType, Repository as Git2Repo, ResetType, Signature};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{DiffSummary, PrAction};

use super::{BranchScope, RepositoryClient};

pub struct GitRepositoryClient {
    repo: Git2Repo,
    github_token: String,
    /// `owner/repo` slug, used to address the GitHub REST API.
    github_repo_slug: String,
}

impl GitRepositoryClient {
    pub fn open(path: impl Into<PathBuf>, github_token: impl Into<String>, github_repo_slug: impl Into<String>) -> Result<Self> {
        let repo = Git2Repo::open(path.into())?;
        Ok(Self {
            repo,
            github_token: github_token.into(),
            github_repo_slug: github_repo_slug.into(),
        })
    }

    fn signature(&self) -> Result<Signature<'_>> {
        self.repo
            .signature()
            .or_else(|_| Signature::now("discourse-gatekeeper", "discourse-gatekeeper@localhost"))
            .map_err(Error::from)
    }

    fn head_branch_name(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    fn checkout_branch(&self, branch: &str) -> Result<()> {
        let (object, reference) = self.repo.revparse_ext(branch)?;
        self.repo.checkout_tree(&object, None)?;
        match reference {
            Some(r) => self.repo.set_head(r.name().ok_or_else(|| Error::RepositoryClientError {
                message: format!("branch '{branch}' has no name"),
                source: None,
            })?)?,
            None => self.repo.set_head_detached(object.id())?,
        }
        Ok(())
    }
}

/// Restores the original branch when dropped, per the §9 scoped-operation
/// design note.
pub struct GitBranchScope<'a> {
    repo: &'a GitRepositoryClient,
    branch: String,
    original: String,
}

impl BranchScope for GitBranchScope<'_> {
    fn branch(&self) -> &str {
        &self.branch
    }
}

impl Drop for GitBranchScope<'_> {
    fn drop(&mut self) {
        let _ = self.repo.checkout_branch(&self.original);
    }
}

#[async_trait]
impl RepositoryClient for GitRepositoryClient {
    fn current_branch(&self) -> Result<String> {
        self.head_branch_name()
    }

    fn with_branch<'a>(&'a self, branch: &str) -> Result<Box<dyn BranchScope + 'a>> {
        let original = self.head_branch_name()?;
        self.checkout_branch(branch)?;
        Ok(Box::new(GitBranchScope {
            repo: self,
            branch: branch.to_string(),
            original,
        }))
    }

    fn read_file_at_tag(&self, tag: &str, path: &str) -> Result<String> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{tag}"))
            .map_err(|_| Error::RepositoryTagNotFoundError { tag: tag.to_string() })?;
        let commit = reference.peel_to_commit()?;
        let tree = commit.tree()?;
        let entry = tree.get_path(std::path::Path::new(path)).map_err(|_| {
            Error::RepositoryFileNotFoundError {
                path: path.to_string(),
                tag: tag.to_string(),
            }
        })?;
        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        String::from_utf8(blob.content().to_vec()).map_err(|e| Error::RepositoryClientError {
            message: format!("file '{path}' at tag '{tag}' is not valid UTF-8: {e}"),
            source: None,
        })
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.repo.find_reference(&format!("refs/tags/{tag}")).is_ok())
    }

    fn tag_commit(&self, tag: &str) -> Result<Option<String>> {
        match self.repo.find_reference(&format!("refs/tags/{tag}")) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id().to_string())),
            Err(_) => Ok(None),
        }
    }

    fn move_tag(&self, tag: &str, commit_sha: &str, base_branch: &str) -> Result<()> {
        if !self.is_commit_on_branch(commit_sha, base_branch)? {
            return Err(Error::TaggingNotAllowedError {
                commit: commit_sha.to_string(),
                base_branch: base_branch.to_string(),
            });
        }

        let oid = git2::Oid::from_str(commit_sha).map_err(|e| Error::RepositoryClientError {
            message: format!("invalid commit sha '{commit_sha}': {e}"),
            source: None,
        })?;
        let object = self.repo.find_object(oid, Some(ObjectType::Commit))?;
        self.repo.tag_lightweight(tag, &object, true)?;
        Ok(())
    }

    fn is_commit_on_branch(&self, commit_sha: &str, branch: &str) -> Result<bool> {
        let oid = git2::Oid::from_str(commit_sha).map_err(|e| Error::RepositoryClientError {
            message: format!("invalid commit sha '{commit_sha}': {e}"),
            source: None,
        })?;
        let branch_ref = self.repo.find_branch(branch, BranchType::Local)?;
        let branch_oid = branch_ref.get().peel_to_commit()?.id();

        let mut walk = self.repo.revwalk()?;
        walk.push(branch_oid)?;
        for step in walk {
            if step? == oid {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn diff_summary(&self, base_branch: &str, branch: &str) -> Result<DiffSummary> {
        let base_tree = self
            .repo
            .find_branch(base_branch, BranchType::Local)?
            .get()
            .peel_to_tree()?;
        let branch_tree = self
            .repo
            .find_branch(branch, BranchType::Local)?
            .get()
            .peel_to_tree()?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&branch_tree), None)?;
        let stats = diff.stats()?;
        Ok(DiffSummary {
            files_changed: stats.files_changed(),
            insertions: stats.insertions(),
            deletions: stats.deletions(),
        })
    }

    async fn commit_files_to_branch(
        &self,
        branch: &str,
        base_branch: &str,
        message: &str,
        files: &[(String, String)],
    ) -> Result<()> {
        let base_commit = self
            .repo
            .find_branch(base_branch, BranchType::Local)?
            .get()
            .peel_to_commit()?;

        match self.repo.find_branch(branch, BranchType::Local) {
            Ok(mut existing) => {
                existing.delete()?;
            }
            Err(_) => {}
        }
        self.repo.branch(branch, &base_commit, true)?;

        let _scope = self.with_branch(branch)?;
        self.repo.reset(base_commit.as_object(), ResetType::Hard, None)?;

        let workdir = self.repo.workdir().ok_or_else(|| Error::RepositoryClientError {
            message: "repository has no working directory".to_string(),
            source: None,
        })?;
        for (path, content) in files {
            let full = workdir.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full, content)?;
        }

        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let sig = self.signature()?;

        self.repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&base_commit])?;
        Ok(())
    }

    async fn open_or_update_pull_request(
        &self,
        branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<(String, PrAction)> {
        let client = reqwest::Client::new();
        let list_url = format!(
            "https://api.github.com/repos/{}/pulls?head={}:{}&base={}&state=open",
            self.github_repo_slug,
            self.github_repo_slug.split('/').next().unwrap_or_default(),
            branch,
            base_branch
        );

        #[derive(Debug, Deserialize)]
        struct PullRequest {
            html_url: String,
            number: u64,
        }

        let existing: Vec<PullRequest> = client
            .get(&list_url)
            .bearer_auth(&self.github_token)
            .header("User-Agent", "discourse-gatekeeper")
            .send()
            .await
            .map_err(Error::from)?
            .json()
            .await
            .map_err(Error::from)?;

        if let Some(pr) = existing.into_iter().next() {
            let patch_url = format!(
                "https://api.github.com/repos/{}/pulls/{}",
                self.github_repo_slug, pr.number
            );
            client
                .patch(&patch_url)
                .bearer_auth(&self.github_token)
                .header("User-Agent", "discourse-gatekeeper")
                .json(&serde_json::json!({ "title": title, "body": body }))
                .send()
                .await
                .map_err(Error::from)?;
            return Ok((pr.html_url, PrAction::Updated));
        }

        let create_url = format!("https://api.github.com/repos/{}/pulls", self.github_repo_slug);
        let created: PullRequest = client
            .post(&create_url)
            .bearer_auth(&self.github_token)
            .header("User-Agent", "discourse-gatekeeper")
            .json(&serde_json::json!({
                "title": title,
                "body": body,
                "head": branch,
                "base": base_branch,
            }))
            .send()
            .await
            .map_err(Error::from)?
            .json()
            .await
            .map_err(Error::from)?;

        Ok((created.html_url, PrAction::Opened))
    }
}
