//! Content-addressed artifact storage.
//!
//! Rendered artifacts are immutable and addressed by their fingerprint, so a store only needs
//! `get` and `put`. Delivery (HTTP headers, expiry) is left to the host.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Png,
    Jpeg,
    Sgf,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Png => "png",
            ArtifactKind::Jpeg => "jpg",
            ArtifactKind::Sgf => "sgf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Png => "image/png",
            ArtifactKind::Jpeg => "image/jpeg",
            ArtifactKind::Sgf => "application/x-go-sgf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactKey {
    pub kind: ArtifactKind,
    pub hash: String,
}

impl ArtifactKey {
    pub fn new(kind: ArtifactKind, hash: impl Into<String>) -> Self {
        Self {
            kind,
            hash: hash.into(),
        }
    }

    /// `<hash>.godiag.<ext>`
    pub fn file_name(&self) -> String {
        format!("{}.godiag.{}", self.hash, self.kind.extension())
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

pub trait ArtifactStore {
    fn get(&self, key: &ArtifactKey) -> io::Result<Option<Vec<u8>>>;

    fn put(&self, key: &ArtifactKey, bytes: &[u8]) -> io::Result<()>;

    fn contains(&self, key: &ArtifactKey) -> io::Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-process store, mostly for tests and short-lived hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<ArtifactKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryStore {
    fn get(&self, key: &ArtifactKey) -> io::Result<Option<Vec<u8>>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &ArtifactKey, bytes: &[u8]) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    fn contains(&self, key: &ArtifactKey) -> io::Result<bool> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.contains_key(key))
    }
}

/// One file per artifact in a flat directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

impl ArtifactStore for DirStore {
    fn get(&self, key: &ArtifactKey) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes a temp file and renames it into place, so readers never see a partial artifact.
    fn put(&self, key: &ArtifactKey, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let tmp = self.root.join(format!(".{}.tmp", key.file_name()));
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn contains(&self, key: &ArtifactKey) -> io::Result<bool> {
        Ok(self.path_for(key).is_file())
    }
}
