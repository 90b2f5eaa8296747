//! Export orchestration: package the current pair, have the document
//! service render it, hand the bytes to a [`DownloadSink`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::service::{ExportFormat, ExportPayload, ExportService, ServiceError};
use crate::session::CurrentResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("no calculation to export")]
    NoCurrentResult,

    #[error("export failed")]
    Failed(#[source] ServiceError),

    #[error("could not save exported file: {0}")]
    Delivery(String),
}

impl ExportError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NoCurrentResult => "Bitte zuerst eine Berechnung durchführen.".to_string(),
            Self::Failed(_) => "Fehler beim Export.".to_string(),
            Self::Delivery(reason) => format!("Datei konnte nicht gespeichert werden: {reason}"),
        }
    }
}

/// A rendered document ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Where a delivered artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub format: ExportFormat,
    pub filename: String,
    pub location: String,
    pub size: usize,
}

/// Final step of an export; the UI layer's "save as".
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Stores the artifact and returns a human-readable location.
    async fn deliver(&self, artifact: &ExportArtifact) -> std::io::Result<String>;
}

/// `lohnsteuerberechnung_20250131_142500.pdf`, or the user-supplied name
/// reduced to filesystem-safe characters.
pub fn artifact_filename(
    format: ExportFormat,
    name: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let stem = name
        .map(|n| {
            n.trim()
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("lohnsteuerberechnung_{}", now.format("%Y%m%d_%H%M%S")));
    format!("{stem}.{}", format.extension())
}

pub struct Exporter {
    service: Arc<dyn ExportService>,
    sink: Arc<dyn DownloadSink>,
}

impl Exporter {
    pub fn new(service: Arc<dyn ExportService>, sink: Arc<dyn DownloadSink>) -> Self {
        Self { service, sink }
    }

    /// Exports `current` in `format`.
    ///
    /// # Errors
    /// * [`ExportError::NoCurrentResult`] without contacting the service when
    ///   `current` is `None`.
    /// * [`ExportError::Failed`] for any non-success service response.
    /// * [`ExportError::Delivery`] when the sink cannot store the file.
    pub async fn export_as(
        &self,
        format: ExportFormat,
        current: Option<&CurrentResult>,
        name: Option<&str>,
    ) -> Result<ExportReceipt, ExportError> {
        let current = current.ok_or(ExportError::NoCurrentResult)?;

        let payload = ExportPayload {
            request: current.request.clone(),
            result: current.result.clone(),
            name: name.map(str::to_string),
        };

        let bytes = self.service.export(format, &payload).await.map_err(|e| {
            tracing::error!(error = %e, ?format, "document service failed");
            ExportError::Failed(e)
        })?;

        let artifact = ExportArtifact {
            format,
            filename: artifact_filename(format, name, Utc::now()),
            bytes,
        };

        let location = self
            .sink
            .deliver(&artifact)
            .await
            .map_err(|e| ExportError::Delivery(e.to_string()))?;

        tracing::info!(%location, size = artifact.bytes.len(), "export delivered");
        Ok(ExportReceipt {
            format,
            filename: artifact.filename,
            location,
            size: artifact.bytes.len(),
        })
    }
}
