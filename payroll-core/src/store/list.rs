use serde::Serialize;
use serde::de::DeserializeOwned;

use super::kv::{KeyValueStore, StoreError};

/// Reads the JSON list stored under `key`.
///
/// A missing key, an unreachable store or corrupt content all read as an
/// empty list; the failure is logged and never reaches the caller.
pub(crate) async fn read_list<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Vec<T> {
    let raw = match kv.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(key, %error, "store unavailable, treating as empty");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        let error = StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        };
        tracing::warn!(%error, "treating store as empty");
        Vec::new()
    })
}

/// Replaces the list stored under `key`. Failures are logged and dropped.
pub(crate) async fn write_list<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) {
    let json = match serde_json::to_string(items) {
        Ok(json) => json,
        Err(error) => {
            tracing::warn!(key, %error, "could not serialize list");
            return;
        }
    };

    if let Err(error) = kv.set(key, &json).await {
        tracing::warn!(key, %error, "could not persist list");
    }
}
