//! Content Merger (§4.1)
//!
//! Pure function library over strings: three-way merge, conflict
//! detection, diff rendering. Line-based three-way merge and unified-diff
//! rendering are built on `diffy`, a Myers-diff/patch crate with no
//! counterpart in use elsewhere in the corpus (see DESIGN.md).

use crate::error::{Error, Result};

/// Distinguished outcome when `base` is absent (not yet tagged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseMissing {
    /// `theirs == ours`: treated as equal, no special handling needed.
    Equal,
    /// `theirs != ours`: ambiguous, surfaced to the planner as-is.
    Ambiguous,
}

/// Three-way merge of `base`, `theirs` (server), `ours` (local).
///
/// Two changes to disjoint line hunks merge cleanly; overlapping hunks are
/// conflicts, reported as a [`Error::ContentError`] whose description names
/// both hunks.
pub fn merge(base: &str, theirs: &str, ours: &str, path: &str) -> Result<String> {
    if base == theirs && base == ours {
        return Ok(base.to_string());
    }
    if theirs == ours {
        return Ok(theirs.to_string());
    }
    if base == theirs {
        return Ok(ours.to_string());
    }
    if base == ours {
        return Ok(theirs.to_string());
    }

    match diffy::merge(base, ours, theirs) {
        Ok(merged) => Ok(merged),
        Err(merged_with_markers) => Err(Error::ContentError {
            path: path.to_string(),
            description: describe_conflict(&merged_with_markers),
        }),
    }
}

/// Returns a human description of the conflicting hunks, or `None` if the
/// three sides would merge cleanly. Never fails.
pub fn conflicts(base: &str, theirs: &str, ours: &str) -> Option<String> {
    if theirs == ours || base == theirs || base == ours {
        return None;
    }

    match diffy::merge(base, ours, theirs) {
        Ok(_) => None,
        Err(merged_with_markers) => Some(describe_conflict(&merged_with_markers)),
    }
}

/// Classify the `base`-missing condition (§4.1): `BASE_MISSING` is allowed
/// only when `theirs == ours`; any other combination is ambiguous and must
/// be surfaced to the planner rather than guessed at here.
pub fn classify_base_missing(theirs: &str, ours: &str) -> BaseMissing {
    if theirs == ours {
        BaseMissing::Equal
    } else {
        BaseMissing::Ambiguous
    }
}

/// Render a human-readable unified diff description of `a` vs `b`.
pub fn diff(a: &str, b: &str) -> String {
    diffy::create_patch(a, b).to_string()
}

/// Extract a short, human-readable description of the conflicting hunks
/// from diffy's conflict-marked merge output, naming each side.
fn describe_conflict(merged_with_markers: &str) -> String {
    let mut hunks = Vec::new();
    let mut current_ours: Vec<&str> = Vec::new();
    let mut current_theirs: Vec<&str> = Vec::new();
    let mut in_ours = false;
    let mut in_theirs = false;

    for line in merged_with_markers.lines() {
        if line.starts_with("<<<<<<<") {
            in_ours = true;
            current_ours.clear();
            current_theirs.clear();
        } else if line.starts_with("=======") && in_ours {
            in_ours = false;
            in_theirs = true;
        } else if line.starts_with(">>>>>>>") && in_theirs {
            in_theirs = false;
            hunks.push(format!(
                "ours: {:?} vs theirs: {:?}",
                current_ours.join("\\n"),
                current_theirs.join("\\n")
            ));
        } else if in_ours {
            current_ours.push(line);
        } else if in_theirs {
            current_theirs.push(line);
        }
    }

    if hunks.is_empty() {
        "conflicting content, no textual hunk boundary found".to_string()
    } else {
        format!("{} conflicting hunk(s): {}", hunks.len(), hunks.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_identity() {
        let x = "A\nB\nC\n";
        assert_eq!(merge(x, x, x, "p").unwrap(), x);
    }

    #[test]
    fn test_merge_theirs_equal_base() {
        let base = "A\nB\nC\n";
        let local = "A\nZ\nC\n";
        assert_eq!(merge(base, base, local, "p").unwrap(), local);
    }

    #[test]
    fn test_merge_ours_equal_base() {
        let base = "A\nB\nC\n";
        let server = "A\nZ\nC\n";
        assert_eq!(merge(base, server, base, "p").unwrap(), server);
    }

    #[test]
    fn test_clean_disjoint_merge() {
        let base = "A\nB\nC\n";
        let server = "A\nB2\nC\n";
        let local = "A\nB\nC2\n";
        let merged = merge(base, server, local, "p").unwrap();
        assert_eq!(merged, "A\nB2\nC2\n");
    }

    #[test]
    fn test_overlapping_conflict() {
        let base = "A\n";
        let server = "B\n";
        let local = "C\n";
        let err = merge(base, server, local, "topic-path").unwrap_err();
        match err {
            Error::ContentError { path, description } => {
                assert_eq!(path, "topic-path");
                assert!(description.contains("conflicting hunk"));
            }
            other => panic!("expected ContentError, got {other:?}"),
        }
    }

    #[test]
    fn test_conflicts_none_for_clean_merge() {
        let base = "A\nB\nC\n";
        let server = "A\nB2\nC\n";
        let local = "A\nB\nC2\n";
        assert!(conflicts(base, server, local).is_none());
    }

    #[test]
    fn test_conflicts_some_for_overlap() {
        assert!(conflicts("A\n", "B\n", "C\n").is_some());
    }

    #[test]
    fn test_base_missing_classification() {
        assert_eq!(classify_base_missing("same", "same"), BaseMissing::Equal);
        assert_eq!(
            classify_base_missing("server", "local"),
            BaseMissing::Ambiguous
        );
    }

    #[test]
    fn test_diff_contains_markers() {
        let d = diff("A\nB\n", "A\nC\n");
        assert!(d.contains('-') && d.contains('+'));
    }
}
