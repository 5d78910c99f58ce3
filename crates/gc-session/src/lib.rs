//! Durable wallet-session storage.
//!
//! A [`SessionStore`] keeps at most one [`SessionRecord`] in a
//! [`KeyValueStore`] and expires it after [`SESSION_TTL`].

mod session;

pub use session::{
    KEY_CONNECTED, KEY_CONNECTED_AT, KEY_WALLET_ADDRESS, SESSION_TTL, SessionRecord, SessionStore,
};

use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(feature = "rocksdb")]
pub use rocks::RocksDbStore;

#[cfg(feature = "rocksdb")]
mod rocks {
    use super::KeyValueStore;
    use anyhow::{Context, Result};
    use rocksdb::{DB, Options};
    use std::sync::Arc;

    pub struct RocksDbStore {
        db: Arc<DB>,
    }

    impl RocksDbStore {
        pub fn open_default(path: &str) -> Result<Self> {
            let mut options = Options::default();
            options.create_if_missing(true);
            let db = DB::open(&options, path)
                .with_context(|| format!("failed to open session store at {path}"))?;
            Ok(Self { db: Arc::new(db) })
        }

        fn key_for(key: &str) -> String {
            format!("session:{key}")
        }
    }

    impl KeyValueStore for RocksDbStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            let value = self.db.get(Self::key_for(key).as_bytes())?;
            match value {
                Some(raw) => Ok(Some(String::from_utf8(raw)?)),
                None => Ok(None),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.db.put(Self::key_for(key).as_bytes(), value.as_bytes())?;
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.db.delete(Self::key_for(key).as_bytes())?;
            Ok(())
        }
    }
}

/// Wall-clock source in epoch milliseconds.
pub trait Clock {
    fn now_epoch_ms(&self) -> u64;
}

#[derive(Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_epoch_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

#[cfg(all(test, feature = "rocksdb"))]
mod tests {
    use super::*;

    #[test]
    fn rocksdb_store_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session");
        let store = RocksDbStore::open_default(path.to_str().unwrap_or_default())?;

        assert_eq!(store.get(KEY_WALLET_ADDRESS)?, None);
        store.set(KEY_WALLET_ADDRESS, "0xabc")?;
        assert_eq!(store.get(KEY_WALLET_ADDRESS)?.as_deref(), Some("0xabc"));
        store.remove(KEY_WALLET_ADDRESS)?;
        assert_eq!(store.get(KEY_WALLET_ADDRESS)?, None);

        Ok(())
    }
}
