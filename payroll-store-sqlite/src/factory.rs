use async_trait::async_trait;
use payroll_core::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::store::SqliteKeyValueStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`payroll_core::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use payroll_core::StoreRegistry;
/// use payroll_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database described by `config.connection_string` (a file
    /// path, `:memory:`, or a sqlx URL) and brings its schema up to date.
    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteKeyValueStore::new(&config.connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Database(format!("{e:#}")))?;
        tracing::info!(path = %config.connection_string, "sqlite store ready");
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use payroll_core::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

    use super::SqliteStoreFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn creates_in_memory_store() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let store = SqliteStoreFactory
            .create(&config)
            .await
            .expect("failed to create in-memory store");

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await, Ok(Some("v".to_string())));
    }

    #[tokio::test]
    async fn unreachable_path_is_a_connection_error() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: "/nonexistent-dir/deeper/payroll.db".to_string(),
        };

        let result = SqliteStoreFactory.create(&config).await;

        assert!(matches!(result, Err(StoreError::Connection(_))));
    }
}
