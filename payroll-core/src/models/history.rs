use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::CalculationRequest;
use super::result::CalculationResult;

/// Snapshot of one completed calculation.
///
/// The timestamp is the identity key within the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub request: CalculationRequest,
    pub result: CalculationResult,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time and a name derived
    /// from the request's gross pay, tax class and billing period.
    pub fn new(
        request: CalculationRequest,
        result: CalculationResult,
    ) -> Self {
        Self::at(Utc::now(), request, result)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        request: CalculationRequest,
        result: CalculationResult,
    ) -> Self {
        let name = format!(
            "{} / StKl {} / {}",
            request.gross_pay,
            request.tax_class,
            request.billing_period_label()
        );
        Self {
            name,
            timestamp,
            request,
            result,
        }
    }
}

/// A user-named set of inputs, kept without any result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScenario {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub request: CalculationRequest,
}

impl SavedScenario {
    pub fn new(
        name: impl Into<String>,
        request: CalculationRequest,
    ) -> Self {
        Self {
            name: name.into(),
            timestamp: Utc::now(),
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Cents;

    #[test]
    fn default_name_describes_the_inputs() {
        let request = CalculationRequest {
            gross_pay: Cents(350000),
            tax_class: 1,
            billing_period: 2,
            ..Default::default()
        };
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let entry = HistoryEntry::at(ts, request, CalculationResult::default());

        assert_eq!(entry.name, "3500.00 € / StKl 1 / Monat");
        assert_eq!(entry.timestamp, ts);
    }

    #[test]
    fn entry_survives_json_round_trip() {
        let entry = HistoryEntry::new(
            CalculationRequest {
                gross_pay: Cents(123456),
                factor: 0.975,
                ..Default::default()
            },
            CalculationResult {
                wage_tax: Cents(20000),
                ..Default::default()
            },
        );

        let json = serde_json::to_string(&entry).unwrap();
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(back, entry);
    }
}
