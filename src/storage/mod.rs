//! Key-value persistence port.
//!
//! Callers persist whole values under string keys. Reads are forgiving:
//! [`load`] returns the supplied default when nothing is stored or the stored
//! value cannot be parsed, so a damaged file never stops the tracker from
//! starting.

mod file_store;
mod memory_store;

pub use file_store::FileStorage;
pub use memory_store::MemoryStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Key under which the item collection is stored.
pub const ITEMS_KEY: &str = "codeCarts-v2";

/// Key of the session-scoped unlock marker.
pub const AUTH_KEY: &str = "codeCartTrackerAuthenticated_v1";

/// A synchronous string store addressed by key.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Load the value stored under `key`, falling back to `default` when it is
/// missing or unreadable.
pub fn load<T, S>(storage: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    load_stored(storage, key).unwrap_or(default)
}

/// What was found under a key.
#[derive(Debug)]
pub enum Loaded<T> {
    /// Nothing has ever been stored under the key.
    Missing,
    /// The key exists but could not be read.
    Unreadable,
    /// The stored text does not parse; `raw` is kept for recovery.
    Corrupt { raw: String },
    Found(T),
}

/// Read and parse the value under `key`, reporting why nothing usable came
/// back.
pub fn load_entry<T, S>(storage: &S, key: &str) -> Loaded<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored value");
            return Loaded::Missing;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            return Loaded::Unreadable;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Loaded::Found(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is corrupt");
            Loaded::Corrupt { raw }
        }
    }
}

/// Like [`load`] but reports "nothing usable stored" as `None`.
pub fn load_stored<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match load_entry(storage, key) {
        Loaded::Found(value) => Some(value),
        _ => None,
    }
}

/// Key under which an unparseable value of `key` is preserved.
pub fn corrupt_key(key: &str) -> String {
    format!("{}.corrupt", key)
}

/// Serialize `value` and write it under `key`, replacing any previous value.
pub fn save<T, S>(storage: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    storage.write(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "saved value");
    Ok(())
}
