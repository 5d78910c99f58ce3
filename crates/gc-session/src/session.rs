use crate::{Clock, KeyValueStore};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

pub const KEY_WALLET_ADDRESS: &str = "greenchain_wallet_address";
pub const KEY_CONNECTED: &str = "greenchain_connected";
pub const KEY_CONNECTED_AT: &str = "greenchain_connection_time";

pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub address: String,
    pub connected_at_epoch_ms: u64,
}

impl SessionRecord {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.connected_at_epoch_ms)
    }

    pub fn is_valid_at(&self, now_ms: u64, ttl: Duration) -> bool {
        u128::from(self.age_ms(now_ms)) < ttl.as_millis()
    }
}

/// Single-slot wallet session persisted under the `greenchain_` keys.
///
/// Storage failures never escape: a store that cannot be read behaves as if
/// no session exists.
#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self::with_ttl(store, clock, SESSION_TTL)
    }

    pub fn with_ttl(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub fn save(&self, address: &str) {
        let now = self.clock.now_epoch_ms();
        let writes = [
            (KEY_WALLET_ADDRESS, address.to_owned()),
            (KEY_CONNECTED, "true".to_owned()),
            (KEY_CONNECTED_AT, now.to_string()),
        ];
        for (key, value) in writes {
            if let Err(err) = self.store.set(key, &value) {
                warn!("session store write failed for {key}: {err}");
                return;
            }
        }
        debug!("wallet session saved for {address}");
    }

    pub fn load(&self) -> Option<SessionRecord> {
        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(err) => {
                warn!("session store unreadable, treating as no session: {err}");
                self.clear();
                return None;
            }
        };

        let now = self.clock.now_epoch_ms();
        if record.is_valid_at(now, self.ttl) {
            Some(record)
        } else {
            debug!(
                "wallet session for {} expired after {} ms",
                record.address,
                record.age_ms(now)
            );
            self.clear();
            None
        }
    }

    pub fn clear(&self) {
        for key in [KEY_WALLET_ADDRESS, KEY_CONNECTED, KEY_CONNECTED_AT] {
            if let Err(err) = self.store.remove(key) {
                warn!("session store remove failed for {key}: {err}");
            }
        }
    }

    fn read_record(&self) -> anyhow::Result<Option<SessionRecord>> {
        let address = self.store.get(KEY_WALLET_ADDRESS)?;
        let connected = self.store.get(KEY_CONNECTED)?;
        let connected_at = self.store.get(KEY_CONNECTED_AT)?;

        if address.is_none() && connected.is_none() && connected_at.is_none() {
            return Ok(None);
        }

        let (Some(address), Some("true"), Some(connected_at)) =
            (address, connected.as_deref(), connected_at)
        else {
            anyhow::bail!("partial session record");
        };

        if address.trim().is_empty() {
            anyhow::bail!("empty session address");
        }

        let connected_at_epoch_ms = connected_at
            .trim()
            .parse::<u64>()
            .map_err(|err| anyhow::anyhow!("bad connection timestamp '{connected_at}': {err}"))?;

        Ok(Some(SessionRecord {
            address,
            connected_at_epoch_ms,
        }))
    }
}
