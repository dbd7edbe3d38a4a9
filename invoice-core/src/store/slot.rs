use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{InvoiceError, Result};

/// A named text slot in durable local storage (one value per key).
pub trait SlotStorage: Send + Sync {
    /// `None` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the whole value; readers never observe a partial write.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Move a value to another key, replacing whatever was there.
    fn rename(&self, from: &str, to: &str) -> Result<()>;
}

fn unavailable(key: &str, source: std::io::Error) -> InvoiceError {
    InvoiceError::StorageUnavailable {
        key: key.to_string(),
        source,
    }
}

/// One `<key>.json` file per slot under a data directory.
pub struct FsSlotStorage {
    dir: PathBuf,
}

impl FsSlotStorage {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| unavailable(&dir.display().to_string(), e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(InvoiceError::Format(format!("invalid slot key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStorage for FsSlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => {
                debug!(key, bytes = s.len(), "slot read");
                Ok(Some(s))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(InvoiceError::CorruptedStore {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(unavailable(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // temp file in the same dir so persist() is a same-filesystem rename
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| unavailable(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| unavailable(key, e))?;
        tmp.as_file().sync_all().map_err(|e| unavailable(key, e))?;
        tmp.persist(&path).map_err(|e| unavailable(key, e.error))?;
        debug!(key, bytes = value.len(), path = %path.display(), "slot written");
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let src = self.path_for(from)?;
        let dst = self.path_for(to)?;
        std::fs::rename(&src, &dst).map_err(|e| unavailable(from, e))
    }
}

/// In-process slots, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemSlotStorage {
    slots: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemSlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StorageUnavailable`.
    pub fn set_unavailable(&self, on: bool) {
        self.unavailable.store(on, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable(
                key,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "storage disabled"),
            ));
        }
        Ok(())
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        Ok(self
            .slots
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?)
    }
}

impl SlotStorage for MemSlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.check(key)?;
        Ok(self.slots()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.check(from)?;
        let mut slots = self.slots()?;
        let value = slots.remove(from).ok_or_else(|| {
            unavailable(
                from,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such slot"),
            )
        })?;
        slots.insert(to.to_string(), value);
        Ok(())
    }
}
