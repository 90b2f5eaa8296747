//! Wiring: configuration to a ready [`Workflow`].

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use payroll_core::store::MemoryStoreFactory;
use payroll_core::{RawForm, RawValue, StoreRegistry, Workflow};
use payroll_store_sqlite::SqliteStoreFactory;

use crate::config::ClientConfig;
use crate::download::FileDownloadSink;
use crate::http::HttpServiceClient;

/// Registry with every backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

pub async fn build_workflow(config: &ClientConfig) -> Result<Workflow> {
    let store = build_registry()
        .create(&config.store)
        .await
        .with_context(|| format!("Failed to open '{}' store", config.store.backend))?;

    let services = Arc::new(HttpServiceClient::new(config.service.clone())?);
    let sink = Arc::new(FileDownloadSink::new(&config.export.directory));

    Ok(Workflow::new(
        services.clone(),
        services,
        sink,
        Arc::from(store),
    ))
}

/// Parses a form file: a flat TOML table keyed by field id.
///
/// Strings and numbers become text values, booleans become checkbox states.
///
/// ```toml
/// RE4 = "3500"
/// STKL = 1
/// LZZ = 2
/// PVZ = true
/// ```
pub fn parse_form(text: &str) -> Result<RawForm> {
    let table: toml::Table = toml::from_str(text).context("Form file is not valid TOML")?;

    let mut pairs = Vec::with_capacity(table.len());
    for (key, value) in table {
        let raw = match value {
            toml::Value::String(s) => RawValue::Text(s),
            toml::Value::Integer(i) => RawValue::Text(i.to_string()),
            toml::Value::Float(f) => RawValue::Text(f.to_string()),
            toml::Value::Boolean(b) => RawValue::Checked(b),
            other => anyhow::bail!("field '{key}' has unsupported value {other}"),
        };
        pairs.push((key, raw));
    }

    Ok(RawForm::from_pairs(pairs)?)
}

pub fn load_form(path: &Path) -> Result<RawForm> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file '{}'", path.display()))?;
    parse_form(&text).with_context(|| format!("Invalid form file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use payroll_core::{Cents, FormField, build_request};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_ships_sqlite_and_memory() {
        assert_eq!(build_registry().available_backends(), vec!["memory", "sqlite"]);
    }

    #[test]
    fn form_values_map_to_raw_values() {
        let form = parse_form(
            r#"
            RE4 = "3,500.50"
            STKL = 3
            KVZ = 1.7
            PVZ = true
            "#,
        )
        .unwrap();

        assert_eq!(form.get(FormField::TaxClass), Some(&RawValue::Text("3".to_string())));
        assert_eq!(form.get(FormField::CareChildlessSurcharge), Some(&RawValue::Checked(true)));

        let request = build_request(&form);
        assert_eq!(request.gross_pay, Cents(350050));
        assert_eq!(request.health_surcharge_rate, 1.7);
        assert_eq!(request.care_childless_surcharge, 1);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = parse_form("RE5 = 100").unwrap_err();

        assert!(format!("{err:#}").contains("RE5"));
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(parse_form("RE4 = [1, 2]").is_err());
    }

    #[tokio::test]
    async fn memory_backend_workflow_starts_empty() {
        let mut config = ClientConfig::default();
        config.store.backend = "memory".to_string();

        let workflow = build_workflow(&config).await.unwrap();

        assert!(workflow.history().await.is_empty());
        assert!(workflow.current().is_none());
    }
}
