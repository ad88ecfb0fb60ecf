use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a store operation failed. Callers treat every variant as "persistence lost
/// for this write", never as fatal.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("storage quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
  QuotaExceeded { key: String, needed: usize, quota: usize },
  #[error("storage I/O failed: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to encode stored value: {0}")]
  Encode(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Local key/value storage shared by every section.
///
/// Each call is atomic for its single key; nothing spans keys.
pub trait KeyValueStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>>;
  fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
  fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// Bytes the map would occupy after `key` is set to a value of `new_len` bytes.
fn usage_after_set(map: &BTreeMap<String, String>, key: &str, new_len: usize) -> usize {
  let current: usize = map.iter().map(|(k, v)| k.len() + v.len()).sum();
  let replaced = map.get(key).map_or(0, |old| key.len() + old.len());
  current - replaced + key.len() + new_len
}

fn check_quota(map: &BTreeMap<String, String>, quota: Option<usize>, key: &str, value: &str) -> StoreResult<()> {
  if let Some(quota) = quota {
    let needed = usage_after_set(map, key, value.len());
    if needed > quota {
      return Err(StoreError::QuotaExceeded { key: key.to_string(), needed, quota });
    }
  }
  Ok(())
}

// --- In-memory backend ---

/// Map-backed store, optionally capped like a browser's localStorage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>,
  quota: Option<usize>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cap the store at `quota` bytes. The cap is literal: `0` rejects every write.
  /// Use [`MemoryStore::new`] for no cap (`Config::quota` maps a configured `0` to that).
  pub fn with_quota(quota: usize) -> Self {
    Self { entries: BTreeMap::new(), quota: Some(quota) }
  }

  /// Change the cap after the fact; existing entries are kept even if they exceed it.
  pub fn set_quota(&mut self, quota: Option<usize>) {
    self.quota = quota;
  }

  pub fn contains(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
    check_quota(&self.entries, self.quota, key, value)?;
    self.entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&mut self, key: &str) -> StoreResult<()> {
    self.entries.remove(key);
    Ok(())
  }
}

// --- File backend ---

/// Store persisted as one JSON object on disk, rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  entries: BTreeMap<String, String>,
  quota: Option<usize>,
}

impl FileStore {
  /// Default location: `<data dir>/storage.json`.
  pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.data_dir().join("storage.json"))
  }

  /// Open the store at `path`. A missing file is an empty store; so is one that
  /// fails to parse, which is logged and overwritten on the next write.
  /// `quota` is taken literally like [`MemoryStore::with_quota`]; pass `None` for no cap.
  pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> StoreResult<Self> {
    let path = path.into();
    let entries = match std::fs::read_to_string(&path) {
      Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
        Ok(entries) => {
          debug!(path = %path.display(), keys = entries.len(), "store: loaded");
          entries
        }
        Err(e) => {
          warn!(path = %path.display(), err = %e, "store: unreadable storage file, starting empty");
          BTreeMap::new()
        }
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        info!(path = %path.display(), "store: no storage file yet");
        BTreeMap::new()
      }
      Err(e) => return Err(e.into()),
    };
    Ok(Self { path, entries, quota })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn flush(&self) -> StoreResult<()> {
    if let Some(dir) = self.path.parent()
      && !dir.as_os_str().is_empty()
    {
      std::fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(&self.entries)?;
    let tmp = self.path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, &self.path)?;
    Ok(())
  }

  /// Flush, or put `key` back to `previous` so memory never runs ahead of disk.
  fn flush_or_restore(&mut self, key: &str, previous: Option<String>) -> StoreResult<()> {
    if let Err(e) = self.flush() {
      match previous {
        Some(old) => self.entries.insert(key.to_string(), old),
        None => self.entries.remove(key),
      };
      warn!(key = %key, err = %e, "store: write failed, change rolled back");
      return Err(e);
    }
    Ok(())
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
    check_quota(&self.entries, self.quota, key, value)?;
    let previous = self.entries.insert(key.to_string(), value.to_string());
    self.flush_or_restore(key, previous)
  }

  fn remove(&mut self, key: &str) -> StoreResult<()> {
    let Some(previous) = self.entries.remove(key) else { return Ok(()) };
    self.flush_or_restore(key, Some(previous))
  }
}
