//! In-process debug filesystem
//!
//! A flat namespace of directories and files addressed by `dir/file` paths.
//! Files are backed by [`DebugFile`] implementations; the filesystem only
//! routes reads and writes to them. Creating an entry that already exists,
//! or going past the optional entry limit, fails the same way a real debug
//! filesystem fails to allocate a node.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use extcon_core::InputError;
use tracing::debug;

use crate::device::lock;
use crate::error::DebugFsError;

/// Contents behind a debug file
pub trait DebugFile: Send + Sync {
    /// Render the file contents
    fn read(&self) -> String;

    /// Accept written text, returning the number of bytes consumed
    fn write(&self, text: &str) -> Result<usize, InputError>;
}

enum Entry {
    Dir,
    File(Arc<dyn DebugFile>),
}

/// Registry of debug directories and files
#[derive(Default)]
pub struct DebugFs {
    entries: Mutex<BTreeMap<String, Entry>>,
    limit: Option<usize>,
}

impl std::fmt::Debug for DebugFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<String> = lock(&self.entries).keys().cloned().collect();
        f.debug_struct("DebugFs")
            .field("paths", &paths)
            .field("limit", &self.limit)
            .finish()
    }
}

impl DebugFs {
    /// Create an empty filesystem without an entry limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty filesystem holding at most `limit` entries
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            limit: Some(limit),
        }
    }

    fn insert(&self, path: String, entry: Entry) -> Result<String, DebugFsError> {
        let mut entries = lock(&self.entries);
        if let Some(existing) = entries.get(&path) {
            return Err(match existing {
                Entry::Dir => DebugFsError::DirectoryExists(path),
                Entry::File(_) => DebugFsError::FileExists(path),
            });
        }
        if self.limit.is_some_and(|limit| entries.len() >= limit) {
            return Err(DebugFsError::NoSpace(path));
        }
        debug!("debugfs: created {}", path);
        entries.insert(path.clone(), entry);
        Ok(path)
    }

    /// Create a top-level directory, returning its path
    pub fn create_dir(&self, name: &str) -> Result<String, DebugFsError> {
        self.insert(name.to_string(), Entry::Dir)
    }

    /// Create a file inside an existing directory, returning its path
    pub fn create_file(
        &self,
        dir: &str,
        name: &str,
        file: Arc<dyn DebugFile>,
    ) -> Result<String, DebugFsError> {
        if !matches!(lock(&self.entries).get(dir), Some(Entry::Dir)) {
            return Err(DebugFsError::NotFound(dir.to_string()));
        }
        self.insert(format!("{}/{}", dir, name), Entry::File(file))
    }

    /// Remove an entry; removing a directory also removes its files
    pub fn remove(&self, path: &str) -> Result<(), DebugFsError> {
        let mut entries = lock(&self.entries);
        if entries.remove(path).is_none() {
            return Err(DebugFsError::NotFound(path.to_string()));
        }
        let prefix = format!("{}/", path);
        entries.retain(|p, _| !p.starts_with(&prefix));
        debug!("debugfs: removed {}", path);
        Ok(())
    }

    fn file(&self, path: &str) -> Result<Arc<dyn DebugFile>, DebugFsError> {
        match lock(&self.entries).get(path) {
            Some(Entry::File(file)) => Ok(file.clone()),
            Some(Entry::Dir) => Err(DebugFsError::IsDirectory(path.to_string())),
            None => Err(DebugFsError::NotFound(path.to_string())),
        }
    }

    /// Read a file's contents
    pub fn read(&self, path: &str) -> Result<String, DebugFsError> {
        Ok(self.file(path)?.read())
    }

    /// Write text to a file
    pub fn write(&self, path: &str, text: &str) -> Result<usize, DebugFsError> {
        Ok(self.file(path)?.write(text)?)
    }

    /// Check whether a path exists
    pub fn exists(&self, path: &str) -> bool {
        lock(&self.entries).contains_key(path)
    }

    /// Names of the files directly inside a directory
    pub fn list(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", dir);
        lock(&self.entries)
            .keys()
            .filter_map(|p| p.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
