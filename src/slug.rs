//! Table-path computation and its inverse (§4.2, §4.10)
//!
//! `table_path` is the stable slug derived from a local path; it is the
//! join key between local items and server rows. Computation here mirrors
//! the path-traversal-safe identifier validation the corpus applies to
//! user-controlled filesystem identifiers: a character whitelist plus an
//! explicit rejection of `.`/`..` segments.

use std::path::{Component, Path, PathBuf};

use regex::Regex;

/// Characters permitted in a table path component, matching the
/// navigation-table grammar's `[a-z0-9-]` slug rule (§6).
fn is_permitted(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Compute the stable `table_path` for a path relative to the docs root.
///
/// Segments are joined with `-`, the `.md` suffix is stripped, the result
/// is lower-cased, and any non-permitted character is replaced with the
/// same `-` delimiter. Collapses repeated delimiters so `table_path` stays
/// collision-resistant under casing/punctuation variance.
pub fn table_path(relative: &Path) -> String {
    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(os) = component {
            segments.push(os.to_string_lossy().to_string());
        }
    }

    if let Some(last) = segments.last_mut() {
        if let Some(stem) = last.strip_suffix(".md") {
            *last = stem.to_string();
        }
    }

    let joined = segments.join("-").to_lowercase();

    let mut out = String::with_capacity(joined.len());
    let mut last_was_delim = false;
    for c in joined.chars() {
        if is_permitted(c) {
            out.push(c);
            last_was_delim = c == '-';
        } else if !last_was_delim {
            out.push('-');
            last_was_delim = true;
        }
    }

    out.trim_matches('-').to_string()
}

/// Level (segment count) of a relative path, docs root inclusive, so a
/// direct child of the docs root is level 1.
pub fn level(relative: &Path) -> u32 {
    relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count() as u32
}

/// Reverse a flat `table_path` back into a relative filesystem path, for
/// the migration planner (§4.10). Segments are joined with the directory
/// separator in place of `-`; this is lossy (hyphens inside an original
/// segment name cannot be distinguished from path separators) but matches
/// the corpus's accepted asymmetry: migration reconstructs a *navigable*
/// tree, not a byte-identical one.
///
/// Rejects any path that would escape the destination root.
pub fn path_from_table_path(table_path: &str, is_page: bool) -> Option<PathBuf> {
    if table_path.is_empty() || table_path.contains("..") {
        return None;
    }

    let valid = Regex::new(r"^[a-z0-9-]+$").expect("static regex is valid");
    let mut out = PathBuf::new();
    for segment in table_path.split('-').filter(|s| !s.is_empty()) {
        if !valid.is_match(segment) || segment == "." || segment == ".." {
            return None;
        }
        out.push(segment);
    }

    if out.as_os_str().is_empty() {
        return None;
    }

    if is_page {
        let mut with_ext = out.into_os_string();
        with_ext.push(".md");
        Some(PathBuf::from(with_ext))
    } else {
        Some(out)
    }
}
