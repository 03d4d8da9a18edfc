//! Docs-Tree Reader (§4.2)
//!
//! Walks the local docs directory and emits one [`PathInfo`] per directory
//! (group) and per `*.md` file (page), skipping the root's own `index.md`
//! (handled separately as the navigation/contents source, see §4.4, §4.9).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use walkdir::WalkDir;

use crate::config::INDEX_FILENAME;
use crate::error::{Error, Result};
use crate::model::PathInfo;
use crate::slug;

/// Walk `docs_dir`, returning one [`PathInfo`] per group and page, with
/// `alphabetical_rank` assigned within each directory by `table_path`.
pub fn read(docs_dir: &Path) -> Result<Vec<PathInfo>> {
    let mut infos = Vec::new();

    for entry in WalkDir::new(docs_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::InputError {
            path: docs_dir.display().to_string(),
            reason: format!("failed to walk docs directory: {e}"),
        })?;

        let is_dir = entry.file_type().is_dir();
        if !is_dir {
            let is_md = entry.path().extension().is_some_and(|ext| ext == "md");
            if !is_md {
                continue;
            }
            if entry.path().parent() == Some(docs_dir) && entry.file_name() == INDEX_FILENAME {
                continue;
            }
        }

        let relative = entry
            .path()
            .strip_prefix(docs_dir)
            .expect("walkdir entries are rooted at docs_dir")
            .to_path_buf();

        let table_path = slug::table_path(&relative);
        let level = slug::level(&relative);
        let navlink_title = title_for(entry.path(), &relative, is_dir)?;

        infos.push(PathInfo {
            local_path: relative,
            level,
            table_path,
            navlink_title,
            alphabetical_rank: 0,
            navlink_hidden: false,
            is_group: is_dir,
        });
    }

    assign_alphabetical_ranks(&mut infos);
    Ok(infos)
}

/// Rank siblings (same parent directory) by `table_path`, 1-based.
fn assign_alphabetical_ranks(infos: &mut [PathInfo]) {
    let mut by_parent: HashMap<Option<PathBuf>, Vec<usize>> = HashMap::new();
    for (idx, info) in infos.iter().enumerate() {
        let parent = info.local_path.parent().map(|p| p.to_path_buf()).filter(|p| !p.as_os_str().is_empty());
        by_parent.entry(parent).or_default().push(idx);
    }

    for indices in by_parent.values() {
        let mut sorted = indices.clone();
        sorted.sort_by(|&a, &b| infos[a].table_path.cmp(&infos[b].table_path));
        for (rank, idx) in sorted.into_iter().enumerate() {
            infos[idx].alphabetical_rank = rank + 1;
        }
    }
}

/// Title priority: (a) first `#` heading, (b) first non-empty line, (c)
/// the file/dir name with `-`/`_` replaced by spaces and each word
/// capitalized.
fn title_for(path: &Path, relative: &Path, is_dir: bool) -> Result<String> {
    if is_dir {
        return Ok(title_from_name(relative));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(heading) = first_heading(&content) {
        return Ok(heading);
    }
    if let Some(line) = content.lines().find(|l| !l.trim().is_empty()) {
        return Ok(line.trim().to_string());
    }
    Ok(title_from_name(relative))
}

/// Scan markdown events for the first heading's inline text.
fn first_heading(content: &str) -> Option<String> {
    let parser = Parser::new(content);
    let mut in_heading = false;
    let mut text = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level: HeadingLevel::H1, .. }) => {
                in_heading = true;
            }
            Event::Start(Tag::Heading { .. }) if !in_heading && text.is_empty() => {
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) if in_heading => {
                break;
            }
            Event::Text(t) | Event::Code(t) if in_heading => {
                text.push_str(&t);
            }
            _ => {}
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn title_from_name(relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    stem.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
