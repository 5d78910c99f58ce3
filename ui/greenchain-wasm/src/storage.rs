//! Browser-backed session storage and clock.
//!
//! Values are stored as plain strings under the `greenchain_*` keys so they
//! stay readable from devtools.

use anyhow::{Result, anyhow};
use gc_session::{Clock, KeyValueStore};
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

pub struct BrowserStore;

fn js_error(op: &str, key: &str, err: JsValue) -> anyhow::Error {
    anyhow!("localStorage {op} of {key} failed: {err:?}")
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| js_error("read", key, err))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| js_error("write", key, err))
    }

    fn remove(&self, key: &str) -> Result<()> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|err| js_error("remove", key, err))
    }
}

pub struct JsClock;

impl Clock for JsClock {
    fn now_epoch_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}
