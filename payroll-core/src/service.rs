//! Seams to the two remote services. Implementations live in the client
//! crate; tests use hand-written stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CalculationRequest, CalculationResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Non-success response. `detail` is the service's own message, verbatim.
    #[error("service rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Message shown to the user when a calculation fails.
    pub fn user_message(&self) -> String {
        let detail = match self {
            Self::Rejected { detail, .. } => detail.as_str(),
            Self::Transport(msg) | Self::Decode(msg) => msg.as_str(),
        };
        format!("Fehler bei der Berechnung: {detail}")
    }
}

/// Remote payroll-tax calculation.
#[async_trait]
pub trait CalculationService: Send + Sync {
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    /// Path segment of the document service endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Body sent to the document service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub request: CalculationRequest,
    pub result: CalculationResult,
    pub name: Option<String>,
}

/// Remote document rendering. Returns the rendered file's bytes.
#[async_trait]
pub trait ExportService: Send + Sync {
    async fn export(
        &self,
        format: ExportFormat,
        payload: &ExportPayload,
    ) -> Result<Vec<u8>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Cents;

    #[test]
    fn user_message_carries_detail_verbatim() {
        let err = ServiceError::Rejected {
            status: 422,
            detail: "STKL muss zwischen 1 und 6 liegen".to_string(),
        };

        assert_eq!(
            err.user_message(),
            "Fehler bei der Berechnung: STKL muss zwischen 1 und 6 liegen"
        );
    }

    #[test]
    fn export_format_parsing_and_paths() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("docx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Excel.endpoint(), "excel");
        assert_eq!(ExportFormat::Excel.extension(), "xlsx");
    }

    #[test]
    fn payload_serializes_null_name() {
        let payload = ExportPayload {
            request: CalculationRequest {
                gross_pay: Cents(350000),
                ..Default::default()
            },
            result: CalculationResult::default(),
            name: None,
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert!(json["name"].is_null());
        assert_eq!(json["request"]["RE4"], 350000);
        assert_eq!(json["result"]["LSTLZZ"], 0);
    }
}
