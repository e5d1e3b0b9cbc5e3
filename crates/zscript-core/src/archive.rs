//! Archive namespace: where include paths are turned into byte streams.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::ArchiveError;
use crate::path::path_key;

/// Where a source file lives, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Name of the archive the file was read from.
    pub archive: String,
    /// Path of the file inside the archive.
    pub path: String,
}

impl SourceLocation {
    pub fn new(archive: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            path: path.into(),
        }
    }
}

/// A byte stream together with its name and location.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Human-readable name used in error messages.
    pub name: String,
    /// Archive metadata.
    pub location: SourceLocation,
    /// Raw contents. Shared, so snapshots of a parse context stay cheap.
    pub data: Arc<[u8]>,
}

impl SourceFile {
    /// Create a source file with an empty location.
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            location: SourceLocation::default(),
            data: data.into(),
        }
    }

    /// Create a source file from text.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.as_bytes())
    }

    /// Set the archive location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Length of the stream in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A case-insensitive namespace of resources.
pub trait ResourceArchive {
    /// Display name of the archive.
    fn name(&self) -> &str;

    /// Open the resource at `path`.
    fn open(&self, path: &str) -> Result<SourceFile, ArchiveError>;

    /// Whether a resource exists at `path`.
    fn contains(&self, path: &str) -> bool {
        self.open(path).is_ok()
    }
}

// ============================================================================
// In-memory archive
// ============================================================================

/// An archive held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    name: String,
    /// Keyed by folded path; the value keeps the path as inserted.
    entries: FxHashMap<String, (String, Arc<[u8]>)>,
}

impl MemoryArchive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: FxHashMap::default(),
        }
    }

    /// Insert or replace a resource.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        let path = path.into();
        self.entries.insert(path_key(&path), (path, data.into()));
    }

    /// Builder-style [`insert`](Self::insert) for text resources.
    pub fn with_text(mut self, path: impl Into<String>, text: &str) -> Self {
        self.insert(path, text.as_bytes());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceArchive for MemoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, path: &str) -> Result<SourceFile, ArchiveError> {
        let (stored, data) = self
            .entries
            .get(&path_key(path))
            .ok_or_else(|| ArchiveError::NotFound(path.to_string()))?;

        Ok(SourceFile {
            name: stored.clone(),
            location: SourceLocation::new(&self.name, stored),
            data: Arc::clone(data),
        })
    }

    fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&path_key(path))
    }
}

// ============================================================================
// Directory archive
// ============================================================================

/// An unpacked archive on disk. Lookups ignore case on every platform.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    name: String,
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        Self { name, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk `path` segment by segment, matching each one case-insensitively.
    fn resolve(&self, path: &str) -> Result<PathBuf, ArchiveError> {
        let mut current = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let exact = current.join(segment);
            if exact.exists() {
                current = exact;
                continue;
            }

            let entries = fs::read_dir(&current).map_err(|source| ArchiveError::Io {
                path: path.to_string(),
                source,
            })?;
            let found = entries
                .filter_map(Result::ok)
                .find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(segment))
                .ok_or_else(|| ArchiveError::NotFound(path.to_string()))?;
            current = found.path();
        }
        Ok(current)
    }
}

impl ResourceArchive for DirectoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, path: &str) -> Result<SourceFile, ArchiveError> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(ArchiveError::NotFound(path.to_string()));
        }
        let data = fs::read(&full).map_err(|source| ArchiveError::Io {
            path: path.to_string(),
            source,
        })?;

        Ok(SourceFile::new(path, data).with_location(SourceLocation::new(&self.name, path)))
    }
}
