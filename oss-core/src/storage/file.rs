use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::StorageFacility;
use crate::errors::StoreResult;

/// Storage facility persisted as a single JSON object on disk.
///
/// The whole map is kept in memory and written through on every change, via
/// a temp file in the same directory followed by a rename, so a crash never
/// leaves a half-written file behind. This gives the "survives a reload"
/// property of browser local storage to native builds.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or create on first write) the storage file at `path`.
    ///
    /// A file that exists but cannot be parsed is treated as empty and will
    /// be replaced by the next write.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(raw) => match serde_json::from_slice::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "storage file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file storage");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file named after the full file name, so `a.json` and
    /// `a.db` in one directory never share it.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let raw = serde_json::to_vec_pretty(entries)?;
        let tmp = self.tmp_path();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&raw)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StorageFacility for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let mut entries = self.entries.write();
        let previous = entries.insert(key.to_string(), value);
        if let Err(err) = self.flush(&entries) {
            // Keep memory and disk in agreement when the flush fails.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write();
        let Some(previous) = entries.remove(key) else {
            return Ok(false);
        };
        if let Err(err) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(true)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}
