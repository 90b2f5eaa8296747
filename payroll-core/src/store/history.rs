use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::kv::{KeyValueStore, StoreError};
use super::list::{read_list, write_list};
use crate::models::HistoryEntry;

/// Key under which the history list is stored.
pub const HISTORY_KEY: &str = "lohnsteuer.history";

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded, most-recent-first log of completed calculations.
///
/// Every operation reads the full list from the durable store and, when it
/// changes the list, writes it back before returning. That read-modify-write
/// is not atomic against other processes sharing the same store.
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Inserts `entry` at the front and evicts the oldest entries beyond
    /// [`HISTORY_CAPACITY`].
    pub async fn append(&self, entry: HistoryEntry) {
        let mut entries = self.list().await;
        entries.insert(0, entry);
        if entries.len() > HISTORY_CAPACITY {
            let evicted = entries.len() - HISTORY_CAPACITY;
            entries.truncate(HISTORY_CAPACITY);
            tracing::debug!(evicted, "evicted oldest history entries");
        }
        write_list(self.kv.as_ref(), HISTORY_KEY, &entries).await;
    }

    /// All entries, most recent first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        read_list(self.kv.as_ref(), HISTORY_KEY).await
    }

    /// Removes the first entry stamped `timestamp`. Unknown timestamps are
    /// ignored.
    pub async fn remove(&self, timestamp: DateTime<Utc>) {
        let mut entries = self.list().await;
        let Some(index) = entries.iter().position(|e| e.timestamp == timestamp) else {
            tracing::debug!(%timestamp, "no history entry to remove");
            return;
        };
        entries.remove(index);
        write_list(self.kv.as_ref(), HISTORY_KEY, &entries).await;
    }

    /// # Errors
    /// [`StoreError::NotFound`] when no entry carries `timestamp`.
    pub async fn load(&self, timestamp: DateTime<Utc>) -> Result<HistoryEntry, StoreError> {
        self.list()
            .await
            .into_iter()
            .find(|e| e.timestamp == timestamp)
            .ok_or(StoreError::NotFound)
    }

    pub async fn clear(&self) {
        if let Err(error) = self.kv.remove(HISTORY_KEY).await {
            tracing::warn!(%error, "could not clear history");
        }
    }
}
