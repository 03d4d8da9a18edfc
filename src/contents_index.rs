//! Contents-Index Parser (§4.4)
//!
//! Parses the optional `# Contents` section of `index.md` into a typed
//! list of items (internal page, internal group, external reference,
//! hidden). The section ends at the next `#` heading or EOF.
//!
//! Layering note (see DESIGN.md): §4.4 attributes "unknown reference"
//! failures to the parser, while §9 Open Question 3 attributes the same
//! check to the sorter. This implementation resolves the ambiguity by
//! keeping unknown-reference detection in the sorter (§4.5), since only
//! the sorter has both the contents-index stream and the docs-tree stream
//! in hand simultaneously; this parser validates everything that is a
//! pure function of the index text alone: indentation, marker syntax,
//! duplicate paths, and external-URL scheme presence.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::IndexContentsListItem;
use crate::slug;

const INDENT_WIDTH: usize = 2;

/// Parse the `# Contents` section, or return an empty list if absent.
pub fn parse(content: &str) -> Result<Vec<IndexContentsListItem>> {
    let heading_re = Regex::new(r"(?i)^#+\s*contents\s*$").expect("static regex");
    let any_heading_re = Regex::new(r"^#+\s").expect("static regex");

    let lines: Vec<&str> = content.lines().collect();
    let Some(start) = lines.iter().position(|l| heading_re.is_match(l.trim())) else {
        return Ok(Vec::new());
    };

    let mut end = lines.len();
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        if any_heading_re.is_match(line.trim_start()) {
            end = start + 1 + offset;
            break;
        }
    }

    let marker_re = Regex::new(r"^(?:\d+\.|[a-zA-Z]\.|[*-])\s+(.*)$").expect("static regex");
    let link_re = Regex::new(r"^\[(.*)\]\((.*)\)$").expect("static regex");
    let scheme_re = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("static regex");

    let mut items = Vec::new();
    let mut seen_internal: HashSet<String> = HashSet::new();
    let mut seen_external: HashSet<String> = HashSet::new();
    let mut rank = 0usize;

    for raw_line in &lines[start + 1..end] {
        if raw_line.trim().is_empty() {
            continue;
        }

        let indent = raw_line.len() - raw_line.trim_start().len();
        if indent % INDENT_WIDTH != 0 {
            return Err(Error::InputError {
                path: "index.md#contents".into(),
                reason: format!("item indented by {indent} spaces, expected a multiple of {INDENT_WIDTH}"),
            });
        }
        let hierarchy = (indent / INDENT_WIDTH) as u32 + 1;

        let trimmed = raw_line.trim_start();
        let caps = marker_re
            .captures(trimmed)
            .ok_or_else(|| Error::InputError {
                path: "index.md#contents".into(),
                reason: format!("line is not a recognized list item: {trimmed:?}"),
            })?;
        let rest = caps[1].trim();

        let (hidden, rest) = strip_hidden_comment(rest);

        let link_caps = link_re.captures(rest).ok_or_else(|| Error::InputError {
            path: "index.md#contents".into(),
            reason: format!("expected '[Title](target)', found {rest:?}"),
        })?;
        let reference_title = link_caps[1].to_string();
        let reference_value = link_caps[2].to_string();

        let is_external = looks_like_url(&reference_value);
        if is_external && !scheme_re.is_match(&reference_value) {
            return Err(Error::InputError {
                path: "index.md#contents".into(),
                reason: format!("external reference '{reference_value}' is missing a URL scheme"),
            });
        }

        let table_path = if is_external {
            if !seen_external.insert(reference_value.clone()) {
                return Err(Error::InputError {
                    path: "index.md#contents".into(),
                    reason: format!("duplicate external reference '{reference_value}'"),
                });
            }
            None
        } else {
            let tp = slug::table_path(std::path::Path::new(&reference_value));
            if !seen_internal.insert(tp.clone()) {
                return Err(Error::InputError {
                    path: "index.md#contents".into(),
                    reason: format!("duplicate path '{tp}'"),
                });
            }
            Some(tp)
        };

        rank += 1;
        items.push(IndexContentsListItem {
            hierarchy,
            reference_title,
            reference_value,
            rank,
            hidden,
            table_path,
            is_external,
        });
    }

    Ok(items)
}

/// An HTML comment immediately preceding the reference marks it hidden,
/// e.g. `<!-- hidden -->[Title](target)`.
fn strip_hidden_comment(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix("<!--") {
        if let Some(end) = rest.find("-->") {
            return (true, rest[end + 3..].trim_start());
        }
    }
    (false, text)
}

/// A reference "looks like" an absolute URL if it contains a `://`
/// separator anywhere (malformed scheme is reported separately so the
/// user sees *why* it was rejected, rather than silently treating it as
/// an internal path).
fn looks_like_url(value: &str) -> bool {
    value.contains("://")
}
