//! Local persistence for the ticket snapshot.
//!
//! The last known-good ticket collection is kept as one serialized array
//! under a well-known key in a [`KeyValueStore`]. The store is an injected
//! collaborator: the application uses a JSON file per key under the platform
//! cache directory, tests use an in-memory fake. The snapshot is never
//! authoritative — the backend is. It is overwritten wholesale after a fresh
//! list fetch and patched in place on create/update/delete. There is no
//! versioning or migration; an unreadable snapshot is treated as absent.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, trace, warn};

use crate::api::Ticket;

/// Key under which the ticket snapshot is persisted.
pub const SNAPSHOT_KEY: &str = "tickets";

/// Minimal persisted key-value collaborator.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// File-backed store: one JSON file per key under a base directory.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store under the platform cache directory.
    pub fn new() -> io::Result<Self> {
        let base_dir = dirs::cache_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No cache directory available"))?
            .join("helpdesk");
        Ok(Self { base_dir })
    }

    /// Create a store under an explicit directory.
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Sanitize the key to be safe for the filesystem.
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.base_dir.join(format!("{}.json", safe_key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                trace!(?path, "store hit");
                Some(content)
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(?path, error = %e, "failed to read store file");
                }
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.path_for(key);
        fs::write(&path, value)?;
        trace!(?path, "store write");
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(?path, "store entry removed");
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

/// The persisted ticket snapshot and its reconciliation helpers.
pub struct TicketCache {
    store: Box<dyn KeyValueStore>,
}

impl TicketCache {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the snapshot.
    ///
    /// An absent or unreadable snapshot is `None`; a corrupted one is logged
    /// and discarded rather than propagated.
    pub fn load(&self) -> Option<Vec<Ticket>> {
        let raw = self.store.get(SNAPSHOT_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(tickets) => Some(tickets),
            Err(e) => {
                warn!(error = %e, "discarding unreadable ticket snapshot");
                None
            }
        }
    }

    /// Overwrite the snapshot wholesale.
    pub fn save(&self, tickets: &[Ticket]) -> io::Result<()> {
        let raw = serde_json::to_string(tickets)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.store.set(SNAPSHOT_KEY, &raw)
    }

    /// Append a newly created ticket to the snapshot.
    pub fn append(&self, ticket: &Ticket) -> io::Result<()> {
        let mut tickets = self.load().unwrap_or_default();
        tickets.push(ticket.clone());
        self.save(&tickets)
    }

    /// Replace the snapshot entry with the same id in place.
    ///
    /// A ticket not present in the snapshot leaves it unchanged.
    pub fn replace(&self, ticket: &Ticket) -> io::Result<()> {
        let mut tickets = self.load().unwrap_or_default();
        if let Some(slot) = tickets.iter_mut().find(|t| t.id == ticket.id) {
            *slot = ticket.clone();
            self.save(&tickets)?;
        }
        Ok(())
    }

    /// Remove every snapshot entry with the given id.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> io::Result<bool> {
        let mut tickets = self.load().unwrap_or_default();
        let before = tickets.len();
        tickets.retain(|t| t.id != id);
        if tickets.len() == before {
            return Ok(false);
        }
        self.save(&tickets)?;
        Ok(true)
    }

    /// Drop the snapshot entirely.
    pub fn clear(&self) -> io::Result<()> {
        self.store.remove(SNAPSHOT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ticket(id: &str, name: &str, status: bool) -> Ticket {
        Ticket {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            status,
            created: 0,
        }
    }

    fn memory_cache() -> TicketCache {
        TicketCache::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("tickets").is_none());

        store.set("tickets", "[]").unwrap();
        assert_eq!(store.get("tickets").as_deref(), Some("[]"));

        store.remove("tickets").unwrap();
        assert!(store.get("tickets").is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path());

        assert!(store.get("tickets").is_none());
        store.set("tickets", r#"[{"id":"1"}]"#).unwrap();
        assert_eq!(store.get("tickets").as_deref(), Some(r#"[{"id":"1"}]"#));

        store.remove("tickets").unwrap();
        assert!(store.get("tickets").is_none());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path());

        store.set("week/day:one", "value").unwrap();
        assert_eq!(store.get("week/day:one").as_deref(), Some("value"));
    }

    #[test]
    fn test_snapshot_save_load() {
        let cache = memory_cache();
        assert!(cache.load().is_none());

        let tickets = vec![ticket("1", "A", false), ticket("2", "B", true)];
        cache.save(&tickets).unwrap();
        assert_eq!(cache.load().unwrap(), tickets);
    }

    #[test]
    fn test_corrupted_snapshot_is_absent() {
        let store = MemoryStore::new();
        store.set(SNAPSHOT_KEY, "definitely not json").unwrap();
        let cache = TicketCache::new(Box::new(store));

        assert!(cache.load().is_none());
    }

    #[test]
    fn test_append_grows_snapshot_by_one() {
        let cache = memory_cache();
        cache.save(&[ticket("1", "A", false)]).unwrap();

        cache.append(&ticket("2", "B", false)).unwrap();

        let tickets = cache.load().unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].id, "2");
    }

    #[test]
    fn test_append_to_absent_snapshot() {
        let cache = memory_cache();
        cache.append(&ticket("1", "A", false)).unwrap();
        assert_eq!(cache.load().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_only_touches_matching_entry() {
        let cache = memory_cache();
        cache
            .save(&[ticket("1", "A", false), ticket("2", "B", false)])
            .unwrap();

        cache.replace(&ticket("1", "A", true)).unwrap();

        let tickets = cache.load().unwrap();
        assert!(tickets[0].status);
        assert_eq!(tickets[1], ticket("2", "B", false));
    }

    #[test]
    fn test_replace_missing_id_leaves_snapshot_unchanged() {
        let cache = memory_cache();
        let original = vec![ticket("1", "A", false)];
        cache.save(&original).unwrap();

        cache.replace(&ticket("99", "Ghost", true)).unwrap();

        assert_eq!(cache.load().unwrap(), original);
    }

    #[test]
    fn test_remove_reports_whether_anything_matched() {
        let cache = memory_cache();
        cache
            .save(&[ticket("1", "A", false), ticket("2", "B", false)])
            .unwrap();

        assert!(cache.remove("1").unwrap());
        assert_eq!(cache.load().unwrap(), vec![ticket("2", "B", false)]);

        assert!(!cache.remove("1").unwrap());
        assert_eq!(cache.load().unwrap(), vec![ticket("2", "B", false)]);
    }

    #[test]
    fn test_clear_drops_snapshot() {
        let cache = memory_cache();
        cache.save(&[ticket("1", "A", false)]).unwrap();

        cache.clear().unwrap();
        assert!(cache.load().is_none());
    }
}
