use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::kv::{KeyValueStore, StoreError};
use super::list::{read_list, write_list};
use crate::models::{CalculationRequest, SavedScenario};

/// Key under which saved scenarios are stored.
pub const SCENARIOS_KEY: &str = "lohnsteuer.scenarios";

/// User-named input sets, most recent first, without a capacity bound.
pub struct SavedScenarioStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SavedScenarioStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stores `request` under `name` and returns the new scenario.
    pub async fn save(&self, name: &str, request: CalculationRequest) -> SavedScenario {
        let scenario = SavedScenario::new(name, request);
        let mut scenarios = self.list().await;
        scenarios.insert(0, scenario.clone());
        write_list(self.kv.as_ref(), SCENARIOS_KEY, &scenarios).await;
        tracing::info!(name, count = scenarios.len(), "scenario saved");
        scenario
    }

    pub async fn list(&self) -> Vec<SavedScenario> {
        read_list(self.kv.as_ref(), SCENARIOS_KEY).await
    }

    pub async fn load(&self, timestamp: DateTime<Utc>) -> Result<SavedScenario, StoreError> {
        self.list()
            .await
            .into_iter()
            .find(|s| s.timestamp == timestamp)
            .ok_or(StoreError::NotFound)
    }

    /// Removes the first scenario stamped `timestamp`, if any.
    pub async fn remove(&self, timestamp: DateTime<Utc>) {
        let mut scenarios = self.list().await;
        if let Some(index) = scenarios.iter().position(|s| s.timestamp == timestamp) {
            scenarios.remove(index);
            write_list(self.kv.as_ref(), SCENARIOS_KEY, &scenarios).await;
        }
    }
}
