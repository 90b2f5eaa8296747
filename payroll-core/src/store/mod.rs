//! Durable key/value persistence and the two list stores built on it.

mod factory;
mod history;
mod kv;
mod list;
mod memory;
mod scenarios;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use history::{HISTORY_CAPACITY, HISTORY_KEY, HistoryStore};
pub use kv::{KeyValueStore, StoreError};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use scenarios::{SCENARIOS_KEY, SavedScenarioStore};
