//! Error types for discourse-gatekeeper
//!
//! Provides structured error types with context for better debugging
//! and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gatekeeper operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Input errors
    // ==========================================================================
    #[error("malformed contents index at {path}: {reason}")]
    InputError { path: String, reason: String },

    #[error("malformed metadata file '{path}': {reason}")]
    MetadataParseError { path: PathBuf, reason: String },

    // ==========================================================================
    // Content merge errors
    // ==========================================================================
    #[error("content conflict on '{path}': {description}")]
    ContentError { path: String, description: String },

    // ==========================================================================
    // Discourse server errors
    // ==========================================================================
    #[error("discourse server rejected request for '{path}': {message}")]
    ServerError { path: String, message: String },

    #[error("topic not found: {url}")]
    TopicNotFound { url: String },

    #[error("credentials lack write permission on topic '{url}'")]
    PagePermissionError { url: String },

    // ==========================================================================
    // Repository / host errors
    // ==========================================================================
    #[error("repository client error: {message}")]
    RepositoryClientError {
        message: String,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("tag '{tag}' not found in repository")]
    RepositoryTagNotFoundError { tag: String },

    #[error("file '{path}' not found at tag '{tag}'")]
    RepositoryFileNotFoundError { path: String, tag: String },

    #[error("tag move refused: commit {commit} is not on base branch '{base_branch}'")]
    TaggingNotAllowedError { commit: String, base_branch: String },

    // ==========================================================================
    // Migration errors
    // ==========================================================================
    #[error("migration produced {failed} failed action(s) out of {total}")]
    MigrationError { failed: usize, total: usize },

    // ==========================================================================
    // Navigation table errors
    // ==========================================================================
    #[error("navigation table at '{path}' violates the grammar: {reason}")]
    NavigationTableParseError { path: String, reason: String },

    // ==========================================================================
    // Reconciliation errors (raised by the orchestrator after reports are emitted)
    // ==========================================================================
    #[error("reconciliation completed with {failed} failed action(s) and {problems} problem(s)")]
    ReconcilliationError { failed: usize, problems: usize },

    // ==========================================================================
    // IO errors
    // ==========================================================================
    #[error("failed to read file '{path}': {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file '{path}': {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==========================================================================
    // Catch-all
    // ==========================================================================
    #[error("{0}")]
    Other(String),
}

/// Result type alias for gatekeeper operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::RepositoryClientError {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::MetadataParseError {
            path: PathBuf::new(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ServerError {
            path: err.url().map(|u| u.to_string()).unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Error display helpers
// =============================================================================

impl Error {
    /// Returns a user-friendly suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::InputError { .. } => {
                Some("check the `# Contents` list in index.md for malformed indentation or links")
            }
            Error::ContentError { .. } => Some("resolve the conflicting hunks locally and re-run"),
            Error::TaggingNotAllowedError { .. } => {
                Some("only commits on the configured base branch move the content tag")
            }
            Error::RepositoryTagNotFoundError { .. } => {
                Some("the base-content tag is created automatically after the first clean run")
            }
            _ => None,
        }
    }

    /// Returns true if this error is recoverable by re-running after local changes
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InputError { .. }
                | Error::ContentError { .. }
                | Error::NavigationTableParseError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputError {
            path: "index.md".into(),
            reason: "duplicate path".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed contents index at index.md: duplicate path"
        );
    }

    #[test]
    fn test_error_suggestion() {
        let err = Error::ContentError {
            path: "tutorials-getting-started".into(),
            description: "overlapping hunks".into(),
        };
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::InputError {
            path: "index.md".into(),
            reason: "x".into()
        }
        .is_recoverable());
        assert!(!Error::MigrationError { failed: 1, total: 2 }.is_recoverable());
    }
}
