//! Key-value persistence for license state.
//!
//! The licensing core never reaches for ambient storage. Every component is
//! handed a [`Store`] and only touches the keys it owns (see [`keys`]).
//!
//! Two implementations ship:
//! - [`MemoryStore`]: process-local map, used by tests and embedders.
//! - [`JsonFileStore`]: a flat JSON object on disk, rewritten on every
//!   mutation through a temp file and rename.

use crate::error::{LicenseError, LicenseResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Logical key names for the persisted license entries.
pub mod keys {
    /// Per-installation device identifier, written once.
    pub const DEVICE_ID: &str = "medicab_device_id";
    /// Normalised activation code, written on successful activation.
    pub const LICENSE_KEY: &str = "medicab_license_key";
    /// First-run timestamp in epoch milliseconds, written once.
    pub const FIRST_RUN: &str = "medicab_first_run_date";
}

/// String key-value store capability.
pub trait Store: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> LicenseResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> LicenseResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> LicenseResult<()>;

    /// Returns true if `key` holds a value.
    fn has(&self, key: &str) -> LicenseResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &str) -> LicenseResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        (**self).remove(key)
    }

    fn has(&self, key: &str) -> LicenseResult<bool> {
        (**self).has(key)
    }
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn get(&self, key: &str) -> LicenseResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        (**self).remove(key)
    }

    fn has(&self, key: &str) -> LicenseResult<bool> {
        (**self).has(key)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> LicenseResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| LicenseError::Storage("store lock poisoned".to_string()))
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if the lock is poisoned.
    pub fn len(&self) -> LicenseResult<usize> {
        Ok(lock(&self.entries)?.len())
    }

    /// Returns true if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if the lock is poisoned.
    pub fn is_empty(&self) -> LicenseResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> LicenseResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

/// File-backed store holding a single flat JSON object.
///
/// The whole map is kept in memory and flushed after each `set`/`remove`.
/// A missing file is an empty store; the file is created on first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// File name used under the data directory.
    pub const FILE_NAME: &'static str = "license.json";

    /// Opens (or prepares to create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> LicenseResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened license store at {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Opens the store in the platform's local data directory
    /// (`<data_local_dir>/medicab/license.json`).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if no data directory is known for
    /// this platform, or any error from [`JsonFileStore::open`].
    pub fn open_default() -> LicenseResult<Self> {
        Self::open(Self::default_path()?)
    }

    /// Default on-device location of the store file.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if the platform has no local data
    /// directory.
    pub fn default_path() -> LicenseResult<PathBuf> {
        dirs::data_local_dir()
            .map(|dir| dir.join("medicab").join(Self::FILE_NAME))
            .ok_or_else(|| LicenseError::Storage("no local data directory".to_string()))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> LicenseResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        let mut entries = lock(&self.entries)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        let mut entries = lock(&self.entries)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
