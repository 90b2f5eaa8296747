//! reqwest adapters for the calculation and document services.

use anyhow::{Context, Result};
use async_trait::async_trait;
use payroll_core::{
    CalculationRequest, CalculationResult, CalculationService, ExportFormat, ExportPayload,
    ExportService, ServiceError,
};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ServiceConfig;

/// Error body the services send with a non-success status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Talks JSON over HTTP to both remote services.
pub struct HttpServiceClient {
    client: Client,
    config: ServiceConfig,
}

impl HttpServiceClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Response, ServiceError> {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(rejection(response).await)
        }
    }
}

/// Turns a non-success response into [`ServiceError::Rejected`], keeping the
/// service's `detail` verbatim when the body carries one.
async fn rejection(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    warn!(status = status.as_u16(), %detail, "service rejected request");
    ServiceError::Rejected {
        status: status.as_u16(),
        detail,
    }
}

#[async_trait]
impl CalculationService for HttpServiceClient {
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ServiceError> {
        let response = self.post(&self.config.calculate_url(), request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ExportService for HttpServiceClient {
    async fn export(
        &self,
        format: ExportFormat,
        payload: &ExportPayload,
    ) -> Result<Vec<u8>, ServiceError> {
        let response = self.post(&self.config.export_url(format), payload).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        debug!(?format, size = bytes.len(), "document received");
        Ok(bytes.to_vec())
    }
}
