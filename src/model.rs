//! Core data model (§3)
//!
//! All entities are immutable value types unless noted. Nothing here
//! persists in-process across runs; the only persistent state lives in
//! Git (the `base-content` tag) and on Discourse (topics).

use std::path::PathBuf;

/// One local node discovered by the docs-tree reader (§4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// Path on disk, relative to the repository root.
    pub local_path: PathBuf,
    /// 1-based depth from the docs root, inclusive.
    pub level: u32,
    /// Stable identifier derived from the relative path (the join key
    /// between local items and server rows).
    pub table_path: String,
    pub navlink_title: String,
    /// Lexicographic rank of `table_path` among siblings at the same level.
    pub alphabetical_rank: usize,
    pub navlink_hidden: bool,
    /// True for a directory (group), false for a `.md` file (page).
    pub is_group: bool,
}

/// A navlink: the `[title](link)` cell of a navigation table row, plus the
/// `hidden` flag encoded by an optional `[details=...]` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navlink {
    pub title: String,
    /// `None` for groups; `Some(url)` for pages and external references.
    pub link: Option<String>,
    pub hidden: bool,
}

/// One parsed Discourse navigation row (§4.3).
///
/// Invariant: `navlink.link` is `Some` iff the row is a page or external
/// reference; `None` iff the row is a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub level: u32,
    pub path: String,
    pub navlink: Navlink,
}

impl TableRow {
    pub fn is_group(&self) -> bool {
        self.navlink.link.is_none()
    }
}

/// One entry from the user's contents index (§4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexContentsListItem {
    /// Depth in the bullet list, 1-based.
    pub hierarchy: u32,
    pub reference_title: String,
    pub reference_value: String,
    /// Sequence number in the flattened list.
    pub rank: usize,
    pub hidden: bool,
    /// Derived: the table path if `reference_value` resolves to a local path.
    pub table_path: Option<String>,
    pub is_external: bool,
}

/// Drives the three-way merge: `{base?, server?, local?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentChange {
    pub base: Option<String>,
    pub server: Option<String>,
    pub local: Option<String>,
}

/// A navlink change carried by an `UpdatePage`/`UpdateGroup` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavlinkChange {
    pub old: Navlink,
    pub new: Navlink,
}

/// The kind-specific payload of a realized (matched local+server) page/group
/// pairing, used by the planner to classify the three-way outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `base == server == local`.
    Noop,
    /// `base == server`, `local` differs: straightforward upload.
    Default { merged: String },
    /// `base == local`, `server` differs: no upload, but the server is
    /// ahead of what we last saw — surfaced to the checker.
    ServerAhead,
    /// `base` missing; allowed only when `server == local`.
    BaseMissing,
    /// `base` differs from both sides but no conflicting hunks: upload the
    /// merged content.
    ContentChange { merged: String },
    /// `base` differs from both sides with overlapping hunks.
    Conflict { description: String },
}

/// A tagged-union action (§4.6, §9 design note): one sum type so the
/// executor and checker are exhaustive switches. Groups carry no content;
/// external references carry only a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreatePage {
        level: u32,
        path: String,
        navlink: Navlink,
        content: String,
    },
    NoopPage {
        level: u32,
        path: String,
        navlink: Navlink,
        content: String,
    },
    UpdatePage {
        level: u32,
        path: String,
        content_change: ContentChange,
        navlink_change: Option<NavlinkChange>,
        outcome: MergeOutcome,
    },
    DeletePage {
        level: u32,
        path: String,
        navlink: Navlink,
    },

    CreateGroup {
        level: u32,
        path: String,
        navlink: Navlink,
    },
    NoopGroup {
        level: u32,
        path: String,
        navlink: Navlink,
    },
    UpdateGroup {
        level: u32,
        path: String,
        navlink_change: NavlinkChange,
    },
    DeleteGroup {
        level: u32,
        path: String,
        navlink: Navlink,
    },

    CreateExternalRef {
        level: u32,
        path: String,
        navlink: Navlink,
        url: String,
    },
    NoopExternalRef {
        level: u32,
        path: String,
        navlink: Navlink,
        url: String,
    },
    UpdateExternalRef {
        level: u32,
        path: String,
        navlink_change: NavlinkChange,
        url: String,
    },
    DeleteExternalRef {
        level: u32,
        path: String,
        navlink: Navlink,
    },

    CreateIndex {
        content: String,
    },
    NoopIndex {
        content: String,
    },
    UpdateIndex {
        content_change: ContentChange,
    },
}

impl Action {
    /// `table_path` this action is keyed by, or `None` for the index.
    pub fn path(&self) -> Option<&str> {
        match self {
            Action::CreatePage { path, .. }
            | Action::NoopPage { path, .. }
            | Action::UpdatePage { path, .. }
            | Action::DeletePage { path, .. }
            | Action::CreateGroup { path, .. }
            | Action::NoopGroup { path, .. }
            | Action::UpdateGroup { path, .. }
            | Action::DeleteGroup { path, .. }
            | Action::CreateExternalRef { path, .. }
            | Action::NoopExternalRef { path, .. }
            | Action::UpdateExternalRef { path, .. }
            | Action::DeleteExternalRef { path, .. } => Some(path),
            Action::CreateIndex { .. } | Action::NoopIndex { .. } | Action::UpdateIndex { .. } => {
                None
            }
        }
    }

    pub fn level(&self) -> Option<u32> {
        match self {
            Action::CreatePage { level, .. }
            | Action::NoopPage { level, .. }
            | Action::UpdatePage { level, .. }
            | Action::DeletePage { level, .. }
            | Action::CreateGroup { level, .. }
            | Action::NoopGroup { level, .. }
            | Action::UpdateGroup { level, .. }
            | Action::DeleteGroup { level, .. }
            | Action::CreateExternalRef { level, .. }
            | Action::NoopExternalRef { level, .. }
            | Action::UpdateExternalRef { level, .. }
            | Action::DeleteExternalRef { level, .. } => Some(*level),
            Action::CreateIndex { .. } | Action::NoopIndex { .. } | Action::UpdateIndex { .. } => {
                None
            }
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(
            self,
            Action::DeletePage { .. } | Action::DeleteGroup { .. } | Action::DeleteExternalRef { .. }
        )
    }

    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Action::NoopPage { .. }
                | Action::NoopGroup { .. }
                | Action::NoopExternalRef { .. }
                | Action::NoopIndex { .. }
        )
    }

    /// True for any action that would mutate Discourse or the repository
    /// if executed (used to check dry-run purity in tests).
    pub fn is_mutating(&self) -> bool {
        !self.is_noop()
    }
}

/// Outcome of executing one [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Success,
    Skip,
    Fail,
}

/// A per-action report emitted by the executor (§4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub table_row: Option<TableRow>,
    pub location: Option<String>,
    pub result: ActionResult,
    pub reason: Option<String>,
}

impl ActionReport {
    pub fn success(table_row: TableRow, location: impl Into<String>) -> Self {
        Self {
            table_row: Some(table_row),
            location: Some(location.into()),
            result: ActionResult::Success,
            reason: None,
        }
    }

    pub fn success_group(table_row: TableRow) -> Self {
        Self {
            table_row: Some(table_row),
            location: None,
            result: ActionResult::Success,
            reason: None,
        }
    }

    pub fn skip(reason: impl Into<String>, location: Option<String>) -> Self {
        Self {
            table_row: None,
            location,
            result: ActionResult::Skip,
            reason: Some(reason.into()),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            table_row: None,
            location: None,
            result: ActionResult::Fail,
            reason: Some(reason.into()),
        }
    }
}

/// A remote Discourse page: `{url, content}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub content: String,
}

/// A local index file: `{title, content}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFile {
    pub title: String,
    pub content: String,
}

/// The index page special case (§4.9): `{server?, local?, name}`.
#[derive(Debug, Clone, Default)]
pub struct Index {
    pub server: Option<Page>,
    pub local: Option<IndexFile>,
    pub name: String,
}

/// A problem surfaced by the checker (§4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub path: String,
    pub description: String,
}

/// Summary of a migration branch's diff against the default branch,
/// used when opening the migration pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// Outcome of opening/updating a migration pull request (§6 outputs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrAction {
    Opened,
    Closed,
    Updated,
    None,
}

impl std::fmt::Display for PrAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PrAction::Opened => "OPENED",
            PrAction::Closed => "CLOSED",
            PrAction::Updated => "UPDATED",
            PrAction::None => "NONE",
        };
        write!(f, "{s}")
    }
}
