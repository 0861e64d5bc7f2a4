//! Discovery of image files in a BIDS-like directory tree.
//!
//! Every discovered file is described by its path and the entities (attribute key/value pairs)
//! encoded in its path, e.g. 'sub-01/anat/sub-01_desc-T1_mask.nii.gz' has the entities
//! {subject: 01, datatype: anat, desc: T1, suffix: mask, extension: .nii.gz}.
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

mod entity_config;
pub use self::entity_config::*;
mod errors;
pub use self::errors::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub entities: BTreeMap<String, String>,
}

impl FileRecord {
    pub fn new<P: Into<PathBuf>>(path: P, entities: BTreeMap<String, String>) -> Self {
        Self {
            path: path.into(),
            entities,
        }
    }

    pub fn has_entities(&self, keys: &[String]) -> bool {
        keys.iter().all(|key| self.entities.contains_key(key))
    }

    /// True if every key of the pattern is present in this record with the same value.
    pub fn matches(&self, pattern: &BTreeMap<String, String>) -> bool {
        pattern
            .iter()
            .all(|(key, value)| self.entities.get(key) == Some(value))
    }
}

/// Finds all files below root_dir with one of the given extensions
/// (given with or without leading dot, e.g. '.nii.gz' or 'svg').
///
/// Results are sorted by path and each file is reported once,
/// even if it matches multiple extensions.
pub fn discover<P: AsRef<Path>>(
    root_dir: P,
    extensions: &[String],
    config: &EntityConfig,
) -> Result<Vec<FileRecord>> {
    let root_dir = root_dir.as_ref();
    let root_string = root_dir
        .to_str()
        .ok_or_else(|| DiscoveryError::NonUnicodePath {
            path: root_dir.to_path_buf(),
        })?;
    let extractor = config.compile()?;

    let mut paths = BTreeSet::new();
    for extension in extensions {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(root_string.trim_end_matches('/')),
            glob::Pattern::escape(extension.trim_start_matches('.'))
        );
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if path.is_file() {
                paths.insert(path);
            }
        }
    }

    let mut result = Vec::with_capacity(paths.len());
    for path in paths {
        let relative = relative_entity_path(root_dir, &path)?;
        let entities = extractor.extract(&relative);
        result.push(FileRecord::new(path, entities));
    }

    debug!("Discovered {} files below {}", result.len(), root_dir.display());
    Ok(result)
}

// Entity patterns expect '/' separated paths starting at the data set root with a leading '/'.
fn relative_entity_path(root_dir: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root_dir).unwrap_or(path);

    let mut result = String::new();
    for component in relative.components() {
        let component = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| DiscoveryError::NonUnicodePath {
                path: path.to_path_buf(),
            })?;
        result.push('/');
        result.push_str(component);
    }

    Ok(result)
}

#[cfg(test)]
mod tests;
