//! Navigation Table Codec (§4.3)
//!
//! Parses a Discourse index page into a list of [`TableRow`]s; renders
//! rows back to markdown. Rendering is the exact inverse of parsing and is
//! bit-stable for round-trip (whitespace normalized, single trailing
//! newline), per the grammar in §6:
//!
//! ```text
//! # Navigation
//! | level | path | navlink |
//! | --- | --- | --- |
//! | <int> | <slug> | [<title>](<link-or-empty>) |
//! ```

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Navlink, TableRow};

const HEADER_CELLS: [&str; 3] = ["level", "path", "navlink"];

/// Parse the navigation table out of a Discourse index page's content.
///
/// Locates the *last* markdown heading named "Navigation" (case
/// insensitive), requires the very next non-blank table to carry the
/// `level | path | navlink` header, and reads every subsequent `|`-led
/// line as a row until a non-table line or EOF.
pub fn parse(content: &str, discourse_host: &str) -> Result<Vec<TableRow>> {
    let heading_re = Regex::new(r"(?i)^#+\s*navigation\s*$").expect("static regex");
    let lines: Vec<&str> = content.lines().collect();

    let heading_idx = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| heading_re.is_match(l.trim()))
        .map(|(i, _)| i)
        .last()
        .ok_or_else(|| Error::NavigationTableParseError {
            path: "index".into(),
            reason: "no '# Navigation' heading found".into(),
        })?;

    let mut idx = heading_idx + 1;
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }

    let header_row = lines.get(idx).ok_or_else(|| Error::NavigationTableParseError {
        path: "index".into(),
        reason: "navigation heading not followed by a table".into(),
    })?;
    let header_cells = split_row(header_row);
    if header_cells.len() != 3
        || !header_cells
            .iter()
            .zip(HEADER_CELLS.iter())
            .all(|(got, want)| got.eq_ignore_ascii_case(want))
    {
        return Err(Error::NavigationTableParseError {
            path: "index".into(),
            reason: format!("expected 'level | path | navlink' header, found {header_row:?}"),
        });
    }
    idx += 1;

    let separator = lines.get(idx).ok_or_else(|| Error::NavigationTableParseError {
        path: "index".into(),
        reason: "missing table separator row".into(),
    })?;
    if !is_separator_row(separator) {
        return Err(Error::NavigationTableParseError {
            path: "index".into(),
            reason: format!("expected a '---' separator row, found {separator:?}"),
        });
    }
    idx += 1;

    let mut rows = Vec::new();
    while idx < lines.len() {
        let line = lines[idx];
        if line.trim().is_empty() || !line.trim_start().starts_with('|') {
            break;
        }
        rows.push(parse_row(line, discourse_host)?);
        idx += 1;
    }

    Ok(rows)
}

/// Render rows back to the exact markdown grammar, inverse of [`parse`].
pub fn render(rows: &[TableRow]) -> String {
    let mut out = String::new();
    out.push_str("# Navigation\n");
    out.push_str("| level | path | navlink |\n");
    out.push_str("| --- | --- | --- |\n");
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            row.level,
            row.path,
            render_navlink_cell(&row.navlink)
        ));
    }
    out
}

fn render_navlink_cell(navlink: &Navlink) -> String {
    let link_part = navlink.link.as_deref().unwrap_or("");
    let base = format!("[{}]({})", navlink.title, link_part);
    if navlink.hidden {
        format!("[details=Hidden]{base}[/details]")
    } else {
        base
    }
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(|c| c.trim().to_string()).collect()
}

fn is_separator_row(line: &str) -> bool {
    let cells = split_row(line);
    cells.len() == 3 && cells.iter().all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-'))
}

fn parse_row(line: &str, discourse_host: &str) -> Result<TableRow> {
    let cells = split_row(line);
    if cells.len() != 3 {
        return Err(Error::NavigationTableParseError {
            path: "index".into(),
            reason: format!("expected exactly 3 columns, found {}: {line:?}", cells.len()),
        });
    }

    let level: u32 = cells[0].parse().map_err(|_| Error::NavigationTableParseError {
        path: "index".into(),
        reason: format!("level '{}' is not a positive integer", cells[0]),
    })?;
    if level == 0 {
        return Err(Error::NavigationTableParseError {
            path: "index".into(),
            reason: "level must be a positive integer".into(),
        });
    }

    let path = cells[1].clone();
    let slug_re = Regex::new(r"^[a-z0-9-]+$").expect("static regex");
    if !slug_re.is_match(&path) {
        return Err(Error::NavigationTableParseError {
            path: path.clone(),
            reason: "path must use only [a-z0-9-]".into(),
        });
    }

    let navlink = parse_navlink_cell(&cells[2], &path)?;

    Ok(TableRow { level, path, navlink })
}

fn parse_navlink_cell(cell: &str, path: &str) -> Result<Navlink> {
    let (hidden, inner) = if let Some(rest) = cell.strip_prefix("[details=") {
        let close_bracket = rest.find(']').ok_or_else(|| Error::NavigationTableParseError {
            path: path.to_string(),
            reason: "unterminated [details=...] wrapper".into(),
        })?;
        let after_open = &rest[close_bracket + 1..];
        let stripped = after_open
            .strip_suffix("[/details]")
            .ok_or_else(|| Error::NavigationTableParseError {
                path: path.to_string(),
                reason: "missing matching [/details] close tag".into(),
            })?;
        (true, stripped)
    } else {
        (false, cell)
    };

    let link_re = Regex::new(r"^\[(.*)\]\((.*)\)$").expect("static regex");
    let caps = link_re
        .captures(inner)
        .ok_or_else(|| Error::NavigationTableParseError {
            path: path.to_string(),
            reason: format!("navlink cell is not '[title](link)': {inner:?}"),
        })?;

    let title = caps[1].to_string();
    let link_raw = caps[2].to_string();
    let link = if link_raw.is_empty() { None } else { Some(link_raw) };

    Ok(Navlink { title, link, hidden })
}

/// True if a navlink's URL is external (does not begin with the configured
/// Discourse host prefix).
pub fn is_external(navlink: &Navlink, discourse_host: &str) -> bool {
    match &navlink.link {
        None => false,
        Some(link) => {
            !link.contains(discourse_host)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rows = vec![
            TableRow {
                level: 1,
                path: "tutorials".to_string(),
                navlink: Navlink {
                    title: "Tutorials".to_string(),
                    link: None,
                    hidden: false,
                },
            },
            TableRow {
                level: 2,
                path: "tutorials-getting-started".to_string(),
                navlink: Navlink {
                    title: "Getting Started".to_string(),
                    link: Some("https://discourse.example.com/t/getting-started/12".to_string()),
                    hidden: false,
                },
            },
        ];

        let rendered = render(&rows);
        let parsed = parse(&rendered, "discourse.example.com").unwrap();
        assert_eq!(parsed, rows);

        let rerendered = render(&parsed);
        assert_eq!(rendered, rerendered);
    }

    #[test]
    fn test_hidden_marker_roundtrip() {
        let rows = vec![TableRow {
            level: 1,
            path: "secret".to_string(),
            navlink: Navlink {
                title: "Secret".to_string(),
                link: Some("https://discourse.example.com/t/secret/5".to_string()),
                hidden: true,
            },
        }];
        let rendered = render(&rows);
        assert!(rendered.contains("[details=Hidden]"));
        let parsed = parse(&rendered, "discourse.example.com").unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_external_reference_detected() {
        let navlink = Navlink {
            title: "Spec".to_string(),
            link: Some("https://example.com/spec".to_string()),
            hidden: false,
        };
        assert!(is_external(&navlink, "discourse.example.com"));

        let internal = Navlink {
            title: "Page".to_string(),
            link: Some("https://discourse.example.com/t/page/1".to_string()),
            hidden: false,
        };
        assert!(!is_external(&internal, "discourse.example.com"));
    }

    #[test]
    fn test_last_navigation_heading_wins() {
        let content = "\
# Navigation
stray text, not a table

# Something else

# Navigation
| level | path | navlink |
| --- | --- | --- |
| 1 | a | [A](https://discourse.example.com/t/a/1) |
";
        let rows = parse(content, "discourse.example.com").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, "a");
    }

    #[test]
    fn test_rejects_bad_header() {
        let content = "\
# Navigation
| foo | bar | baz |
| --- | --- | --- |
| 1 | a | [A]() |
";
        assert!(parse(content, "discourse.example.com").is_err());
    }

    #[test]
    fn test_rejects_non_positive_level() {
        let content = "\
# Navigation
| level | path | navlink |
| --- | --- | --- |
| 0 | a | [A]() |
";
        assert!(parse(content, "discourse.example.com").is_err());
    }
}
