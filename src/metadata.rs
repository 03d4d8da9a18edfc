//! Charm metadata (`metadata.yaml` / `charmcraft.yaml`)
//!
//! The only on-disk input outside the docs tree itself (§6): the charm's
//! name, read from whichever of the two recognized files is present in
//! `charm_dir`. Used to name migration branches and pull requests.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const METADATA_FILENAME: &str = "metadata.yaml";
const CHARMCRAFT_FILENAME: &str = "charmcraft.yaml";

#[derive(Debug, Deserialize)]
struct RawMetadata {
    name: String,
    #[serde(default)]
    docs: Option<String>,
}

/// Locate whichever of `metadata.yaml` / `charmcraft.yaml` is present in
/// `charm_dir`, preferring the former.
fn locate(charm_dir: &Path) -> Result<PathBuf> {
    let metadata_path = charm_dir.join(METADATA_FILENAME);
    let charmcraft_path = charm_dir.join(CHARMCRAFT_FILENAME);

    if metadata_path.is_file() {
        Ok(metadata_path)
    } else if charmcraft_path.is_file() {
        Ok(charmcraft_path)
    } else {
        Err(Error::InputError {
            path: charm_dir.display().to_string(),
            reason: format!(
                "neither '{METADATA_FILENAME}' nor '{CHARMCRAFT_FILENAME}' found in charm_dir"
            ),
        })
    }
}

fn read_raw(charm_dir: &Path) -> Result<RawMetadata> {
    let path = locate(charm_dir)?;
    let content = std::fs::read_to_string(&path).map_err(|e| Error::FileReadError {
        path: path.clone(),
        source: e,
    })?;
    serde_yaml::from_str(&content).map_err(|e| Error::MetadataParseError {
        path,
        reason: e.to_string(),
    })
}

/// Read the charm name from `{charm_dir}/metadata.yaml`, falling back to
/// `{charm_dir}/charmcraft.yaml` when the former is absent.
pub fn read_charm_name(charm_dir: &Path) -> Result<String> {
    let raw = read_raw(charm_dir)?;

    if raw.name.trim().is_empty() {
        return Err(Error::MetadataParseError {
            path: locate(charm_dir)?,
            reason: "'name' field is empty".into(),
        });
    }

    Ok(raw.name)
}

/// Read the charm's existing Discourse index topic URL from the optional
/// `docs` field, used by the orchestrator to tell a first run (no `docs`
/// field, index created fresh) from a subsequent one (existing index
/// topic to reconcile against).
pub fn read_docs_url(charm_dir: &Path) -> Result<Option<String>> {
    let raw = read_raw(charm_dir)?;
    Ok(raw.docs.filter(|d| !d.trim().is_empty()))
}
