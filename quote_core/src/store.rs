//! # Inventory Store
//!
//! Durable storage for the [`Inventory`] as a single JSON document:
//! - **First run**: a missing file is not an error; an empty inventory is
//!   written out and returned
//! - **Atomic saves**: write a uniquely named temp file in the same
//!   directory, fsync, then rename it over the document
//! - **Whole-file overwrite**: `save` replaces the document, nothing is merged
//!
//! ## Concurrency
//!
//! [`InventoryStore::add_material`] is a load-modify-save with no version
//! check. Two writers racing on the same file lose one update (last save
//! wins). Overlapping saves never corrupt the document since each writes its
//! own temp file. Callers sharing a file across processes may hold an
//! [`InventoryLock`] (see [`InventoryStore::lock`]) around the whole
//! sequence; the store never takes it on its own.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::store::InventoryStore;
//!
//! let store = InventoryStore::new("inventory.json");
//! store.add_material("handle types", "Steel Bar", 250.0)?;
//!
//! let inventory = store.load()?;
//! assert_eq!(inventory.price_of("handle types", "Steel Bar"), Some(250.0));
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{QuoteError, QuoteResult};
use crate::inventory::Inventory;

/// File-backed inventory store.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    /// Create a store for the given JSON file. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InventoryStore { path: path.into() }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted inventory.
    ///
    /// # Returns
    ///
    /// * `Ok(Inventory)` - The stored inventory, or a freshly persisted empty
    ///   one when the file does not exist yet
    /// * `Err(QuoteError::StorageUnavailable)` - Unreadable for any other reason
    /// * `Err(QuoteError::CorruptInventory)` - Not a valid inventory document
    pub fn load(&self) -> QuoteResult<Inventory> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "inventory missing, initialising empty store");
                let inventory = Inventory::new();
                self.save(&inventory)?;
                return Ok(inventory);
            }
            Err(e) => {
                return Err(QuoteError::storage(
                    "read",
                    self.path.display().to_string(),
                    e.to_string(),
                ))
            }
        };

        let inventory: Inventory = serde_json::from_str(&contents)
            .map_err(|e| QuoteError::corrupt(self.path.display().to_string(), e.to_string()))?;

        debug!(
            path = %self.path.display(),
            materials = inventory.material_count(),
            "inventory loaded"
        );
        Ok(inventory)
    }

    /// Overwrite the persisted inventory with `inventory`.
    ///
    /// The save process:
    /// 1. Serialize to pretty JSON
    /// 2. Write to a fresh temp file next to the document and sync to disk
    /// 3. Rename over the document (atomic on most filesystems)
    ///
    /// The temp file is removed if any step fails.
    pub fn save(&self, inventory: &Inventory) -> QuoteResult<()> {
        let json = serde_json::to_string_pretty(inventory)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp_file = NamedTempFile::new_in(dir).map_err(|e| {
            QuoteError::storage("create temp file", dir.display().to_string(), e.to_string())
        })?;

        tmp_file.write_all(json.as_bytes()).map_err(|e| {
            QuoteError::storage("write temp file", tmp_file.path().display().to_string(), e.to_string())
        })?;

        tmp_file.as_file().sync_all().map_err(|e| {
            QuoteError::storage("sync temp file", tmp_file.path().display().to_string(), e.to_string())
        })?;

        tmp_file.persist(&self.path).map_err(|e| {
            QuoteError::storage("rename to final", self.path.display().to_string(), e.error.to_string())
        })?;

        debug!(path = %self.path.display(), "inventory saved");
        Ok(())
    }

    /// Add a material, or update its price if the name already exists.
    ///
    /// Validation happens before any I/O: a blank name or negative price
    /// fails with `InvalidInput` and leaves the file untouched.
    pub fn add_material(&self, category: &str, name: &str, price: f64) -> QuoteResult<()> {
        // Validate against a scratch inventory so bad input never reaches disk
        Inventory::new().upsert(category, name, price)?;

        let mut inventory = self.load()?;
        inventory.upsert(category, name, price)?;
        self.save(&inventory)?;

        info!(category, name = name.trim(), price, "material saved to inventory");
        Ok(())
    }

    /// Take the advisory lock for this document.
    ///
    /// Hold the returned guard around a load-modify-save to keep other
    /// lock-aware writers out.
    pub fn lock(&self, holder: impl Into<String>) -> QuoteResult<InventoryLock> {
        InventoryLock::acquire(&self.path, holder)
    }

    /// Category names currently in the store.
    pub fn categories(&self) -> QuoteResult<Vec<String>> {
        Ok(self.load()?.categories().map(str::to_string).collect())
    }
}

/// Metadata written to the `.lock` file next to the inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (operator name, hostname, etc.)
    pub holder: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

/// Advisory exclusive lock over an inventory file, released on drop.
///
/// Combines an OS-level lock (fs2) with a `.lock` file describing the holder.
#[derive(Debug)]
pub struct InventoryLock {
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl InventoryLock {
    /// Acquire the lock without blocking.
    ///
    /// # Returns
    ///
    /// * `Ok(InventoryLock)` - Lock acquired
    /// * `Err(QuoteError::FileLocked)` - Another process holds it
    pub fn acquire(inventory_path: &Path, holder: impl Into<String>) -> QuoteResult<Self> {
        let lock_path = lock_path(inventory_path);
        let info = LockInfo {
            holder: holder.into(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        };

        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                QuoteError::storage("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        if lock_file.try_lock_exclusive().is_err() {
            let (locked_by, locked_at) = match read_lock_info(&lock_path) {
                Some(existing) => (
                    format!("{} (pid {})", existing.holder, existing.pid),
                    existing.locked_at.to_rfc3339(),
                ),
                None => ("another process".to_string(), "unknown".to_string()),
            };
            return Err(QuoteError::file_locked(
                inventory_path.display().to_string(),
                locked_by,
                locked_at,
            ));
        }

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .set_len(0)
            .and_then(|_| lock_file.write_all(lock_json.as_bytes()))
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| {
                QuoteError::storage("write lock", lock_path.display().to_string(), e.to_string())
            })?;

        debug!(path = %lock_path.display(), holder = %info.holder, "inventory lock acquired");
        Ok(InventoryLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }
}

impl Drop for InventoryLock {
    fn drop(&mut self) {
        // OS lock is released when _lock_file is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `inventory.json` → `inventory.json.lock`
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_store(name: &str) -> InventoryStore {
        let path = temp_dir().join(format!(
            "interior_quote_test_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        InventoryStore::new(path)
    }

    fn cleanup(store: &InventoryStore) {
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_lock_path() {
        let path = Path::new("/data/inventory.json");
        assert_eq!(lock_path(path), Path::new("/data/inventory.json.lock"));
    }

    #[test]
    fn test_load_missing_file_initialises_empty() {
        let store = temp_store("missing");
        assert!(!store.path().exists());

        let inventory = store.load().unwrap();
        assert!(inventory.is_empty());
        assert!(store.path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "{}");

        cleanup(&store);
    }

    #[test]
    fn test_add_material_to_empty_store() {
        let store = temp_store("add_empty");
        store.add_material("handle types", "Steel Bar", 250.0).unwrap();

        let inventory = store.load().unwrap();
        assert_eq!(inventory.price_of("handle types", "Steel Bar"), Some(250.0));

        cleanup(&store);
    }

    #[test]
    fn test_add_material_overwrites_price() {
        let store = temp_store("overwrite");
        store.add_material("wood types", "Oak", 100.0).unwrap();
        store.add_material("wood types", "Oak", 120.0).unwrap();

        let inventory = store.load().unwrap();
        assert_eq!(inventory.price_of("wood types", "Oak"), Some(120.0));
        assert_eq!(inventory.material_count(), 1);

        cleanup(&store);
    }

    #[test]
    fn test_add_material_is_idempotent() {
        let store = temp_store("idempotent");
        store.add_material("knob types", "Brass Round", 45.0).unwrap();
        let first = store.load().unwrap();
        store.add_material("knob types", "Brass Round", 45.0).unwrap();
        let second = store.load().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.materials("knob types").count(), 1);

        cleanup(&store);
    }

    #[test]
    fn test_invalid_material_leaves_file_untouched() {
        let store = temp_store("invalid");
        store.add_material("wood types", "Oak", 100.0).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.add_material("wood types", "  ", 10.0).unwrap_err();
        assert!(err.is_input_error());
        let err = store.add_material("wood types", "Pine", -3.0).unwrap_err();
        assert!(err.is_input_error());

        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        cleanup(&store);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = temp_store("roundtrip");
        fs::write(
            store.path(),
            r#"{"knob types":{"Brass Round":{"price":45}},"wood types":{"Oak":{"price":99.5}}}"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(loaded, reloaded);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["knob types"]["Brass Round"]["price"], 45.0);

        cleanup(&store);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let dir = temp_dir().join(format!("interior_quote_atomic_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let store = InventoryStore::new(dir.join("inventory.json"));
        store.save(&Inventory::new()).unwrap();
        store.add_material("wood types", "Oak", 100.0).unwrap();

        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["inventory.json"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_overlapping_saves_keep_document_valid() {
        let store = temp_store("overlap");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut inventory = Inventory::new();
                    for n in 0..50 {
                        inventory
                            .upsert("wood types", &format!("Board {i}-{n}"), n as f64)
                            .unwrap();
                    }
                    for _ in 0..10 {
                        store.save(&inventory).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Last writer wins, but the document is always one complete inventory
        let inventory = store.load().unwrap();
        assert_eq!(inventory.material_count(), 50);

        cleanup(&store);
    }

    #[test]
    fn test_extra_entry_fields_survive_save() {
        let store = temp_store("extra_fields");
        fs::write(store.path(), r#"{"wood types":{"Oak":{"price":100,"unit":"sheet"}}}"#).unwrap();

        store.save(&store.load().unwrap()).unwrap();
        store.add_material("knob types", "Brass Round", 45.0).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["wood types"]["Oak"]["unit"], "sheet");
        assert_eq!(raw["wood types"]["Oak"]["price"], 100.0);

        cleanup(&store);
    }

    #[test]
    fn test_corrupt_file_is_reported_not_repaired() {
        let store = temp_store("corrupt");
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert_eq!(err.error_code(), "CORRUPT_INVENTORY");
        assert!(err.is_storage_error());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");

        cleanup(&store);
    }

    #[test]
    fn test_unreadable_path_is_storage_error() {
        let dir = temp_dir().join(format!("interior_quote_dir_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        // A directory is not a readable document
        let err = InventoryStore::new(&dir).load().unwrap_err();
        assert!(err.is_storage_error());

        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_categories() {
        let store = temp_store("categories");
        store.add_material("wood types", "Oak", 100.0).unwrap();
        store.add_material("knob types", "Brass", 45.0).unwrap();
        assert_eq!(store.categories().unwrap(), vec!["knob types", "wood types"]);
        cleanup(&store);
    }

    #[test]
    fn test_lock_acquire_and_release() {
        let store = temp_store("lock");
        let path = lock_path(store.path());

        let lock = store.lock("front desk").unwrap();
        assert_eq!(lock.info.holder, "front desk");
        assert!(path.exists());

        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn test_held_lock_rejects_second_writer() {
        let store = temp_store("lock_held");
        let held = store.lock("front desk").unwrap();

        let err = store.lock("back office").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.to_string().contains("front desk"));

        drop(held);
        let again = store.lock("back office").unwrap();
        assert_eq!(again.info.holder, "back office");
    }
}
