use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::DeployError;

/// Content type used when the extension is unknown or missing.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One file of a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the deployed directory, `/`-separated
    pub path: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, content: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content,
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Multipart field name for this file: its path rooted at `/`.
    pub fn field_name(&self) -> String {
        format!("/{}", self.path)
    }
}

/// Per-file metadata sent alongside the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryMetadata<'a> {
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: &'a str,
}

/// Every file of a directory, sorted by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileManifest {
    entries: Vec<ManifestEntry>,
}

impl FileManifest {
    pub fn from_entries(mut entries: Vec<ManifestEntry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ManifestEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size() as u64).sum()
    }

    /// Metadata keyed by `/`-rooted path, as sent in the `manifest` part.
    pub fn metadata(&self) -> BTreeMap<String, EntryMetadata<'_>> {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.field_name(),
                    EntryMetadata {
                        size: entry.size(),
                        content_type: &entry.content_type,
                    },
                )
            })
            .collect()
    }
}

/// Infer a content type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Recursively collect every regular file under `directory`.
///
/// Symlinks are followed; a directory reached twice through links is only
/// walked once.
pub fn build_manifest(directory: &Path) -> Result<FileManifest, DeployError> {
    match fs::metadata(directory) {
        Ok(metadata) if metadata.is_dir() => {}
        _ => return Err(DeployError::DirectoryNotFound(directory.to_path_buf())),
    }

    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    let mut pending = vec![directory.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let canonical = fs::canonicalize(&dir).map_err(|e| DeployError::io(&dir, e))?;
        if !visited.insert(canonical) {
            tracing::debug!("MANIFEST: skipping already visited {}", dir.display());
            continue;
        }

        for dir_entry in fs::read_dir(&dir).map_err(|e| DeployError::io(&dir, e))? {
            let path = dir_entry.map_err(|e| DeployError::io(&dir, e))?.path();
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound && is_symlink(&path) => {
                    tracing::debug!("MANIFEST: skipping dangling link {}", path.display());
                    continue;
                }
                Err(e) => return Err(DeployError::io(&path, e)),
            };

            if metadata.is_dir() {
                pending.push(path);
            } else if metadata.is_file() {
                let content = fs::read(&path).map_err(|e| DeployError::io(&path, e))?;
                let relative = relative_path(directory, &path);
                tracing::debug!("MANIFEST: added {} ({} bytes)", relative, content.len());
                entries.push(ManifestEntry::new(
                    relative,
                    content,
                    content_type_for(&path),
                ));
            }
        }
    }

    Ok(FileManifest::from_entries(entries))
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
