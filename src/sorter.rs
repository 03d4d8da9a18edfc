//! Sorter (§4.5)
//!
//! Fuses the docs-tree reader's [`PathInfo`] sequence with the contents
//! index's [`IndexContentsListItem`] sequence into one ordered stream that
//! preserves user intent (contents-index order, title overrides) and
//! appends anything left over alphabetically.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{IndexContentsListItem, PathInfo};
use crate::slug;

/// One item in the fused, totally-ordered stream handed to the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortedItem {
    /// A local page or group, with title/hidden possibly overridden by a
    /// matching contents-index entry.
    Local(PathInfo),
    /// A contents-index entry pointing at an external URL; it has no
    /// counterpart on disk.
    ExternalRef {
        level: u32,
        table_path: String,
        navlink_title: String,
        hidden: bool,
        url: String,
    },
}

impl SortedItem {
    pub fn table_path(&self) -> &str {
        match self {
            SortedItem::Local(info) => &info.table_path,
            SortedItem::ExternalRef { table_path, .. } => table_path,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            SortedItem::Local(info) => info.level,
            SortedItem::ExternalRef { level, .. } => *level,
        }
    }
}

/// Fuse `infos` (docs-tree reader output) with `contents` (contents-index
/// parser output) per §4.5's three-step algorithm.
///
/// Fails with `InputError` if a contents-index entry references an
/// internal path that does not match any `PathInfo` (see the module
/// layering note in `contents_index`).
pub fn sort(infos: &[PathInfo], contents: &[IndexContentsListItem]) -> Result<Vec<SortedItem>> {
    let mut by_table_path: std::collections::HashMap<&str, &PathInfo> =
        infos.iter().map(|i| (i.table_path.as_str(), i)).collect();
    let mut referenced: HashSet<String> = HashSet::new();

    let mut out = Vec::with_capacity(infos.len() + contents.len());

    let mut ordered_contents = contents.to_vec();
    ordered_contents.sort_by_key(|c| c.rank);

    for item in &ordered_contents {
        if item.is_external {
            let table_path = slug::table_path(std::path::Path::new(&item.reference_title));
            out.push(SortedItem::ExternalRef {
                level: item.hierarchy,
                table_path,
                navlink_title: item.reference_title.clone(),
                hidden: item.hidden,
                url: item.reference_value.clone(),
            });
            continue;
        }

        let table_path = item.table_path.as_deref().unwrap_or_default();
        let Some(info) = by_table_path.get(table_path) else {
            return Err(Error::InputError {
                path: "index.md#contents".into(),
                reason: format!(
                    "contents index references '{}', which matches no local file or directory",
                    item.reference_value
                ),
            });
        };

        let mut overridden = (**info).clone();
        overridden.navlink_title = item.reference_title.clone();
        overridden.navlink_hidden = item.hidden;
        referenced.insert(table_path.to_string());
        out.push(SortedItem::Local(overridden));
    }

    by_table_path.retain(|tp, _| !referenced.contains(*tp));
    let mut leftovers: Vec<&PathInfo> = by_table_path.into_values().collect();
    leftovers.sort_by(|a, b| a.table_path.cmp(&b.table_path));
    out.extend(leftovers.into_iter().cloned().map(SortedItem::Local));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn info(table_path: &str, level: u32, title: &str, is_group: bool) -> PathInfo {
        PathInfo {
            local_path: PathBuf::from(table_path.replace('-', "/")),
            level,
            table_path: table_path.to_string(),
            navlink_title: title.to_string(),
            alphabetical_rank: 1,
            navlink_hidden: false,
            is_group,
        }
    }

    fn contents_item(rank: usize, table_path: &str, title: &str) -> IndexContentsListItem {
        IndexContentsListItem {
            hierarchy: 1,
            reference_title: title.to_string(),
            reference_value: table_path.to_string(),
            rank,
            hidden: false,
            table_path: Some(table_path.to_string()),
            is_external: false,
        }
    }

    #[test]
    fn test_contents_order_with_title_override() {
        let infos = vec![info("tutorials", 1, "tutorials", true)];
        let contents = vec![contents_item(1, "tutorials", "Tutorials (Custom Title)")];

        let sorted = sort(&infos, &contents).unwrap();
        assert_eq!(sorted.len(), 1);
        match &sorted[0] {
            SortedItem::Local(info) => assert_eq!(info.navlink_title, "Tutorials (Custom Title)"),
            other => panic!("expected Local, got {other:?}"),
        }
    }

    #[test]
    fn test_unreferenced_items_appended_alphabetically() {
        let infos = vec![
            info("zeta", 1, "zeta", false),
            info("alpha", 1, "alpha", false),
        ];
        let sorted = sort(&infos, &[]).unwrap();
        assert_eq!(sorted[0].table_path(), "alpha");
        assert_eq!(sorted[1].table_path(), "zeta");
    }

    #[test]
    fn test_unknown_reference_errors() {
        let infos = vec![info("alpha", 1, "alpha", false)];
        let contents = vec![contents_item(1, "does-not-exist", "Ghost")];
        let err = sort(&infos, &contents).unwrap_err();
        assert!(matches!(err, Error::InputError { .. }));
    }

    #[test]
    fn test_external_reference_has_no_local_counterpart() {
        let contents = vec![IndexContentsListItem {
            hierarchy: 1,
            reference_title: "Spec".into(),
            reference_value: "https://example.com/spec".into(),
            rank: 1,
            hidden: false,
            table_path: None,
            is_external: true,
        }];
        let sorted = sort(&[], &contents).unwrap();
        match &sorted[0] {
            SortedItem::ExternalRef { url, .. } => assert_eq!(url, "https://example.com/spec"),
            other => panic!("expected ExternalRef, got {other:?}"),
        }
    }
}
