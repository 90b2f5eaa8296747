//! The async controller behind every user action.
//!
//! Each operation is a short sequence of awaits over the service and store
//! seams. The session lock is only ever held between awaits, so two submits
//! may be in flight at once; the session's ticket fence decides which one
//! lands.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::export::{DownloadSink, ExportError, ExportReceipt, Exporter};
use crate::form::{RawForm, build_request};
use crate::models::{CalculationRequest, HistoryEntry, SavedScenario};
use crate::render::{ComparisonRow, RenderedView, comparison_rows, render};
use crate::service::{CalculationService, ExportFormat, ExportService, ServiceError};
use crate::session::{CurrentResult, Session};
use crate::store::{HistoryStore, KeyValueStore, SavedScenarioStore, StoreError};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl WorkflowError {
    /// Text for the error area of the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(e) => e.user_message(),
            Self::Store(StoreError::NotFound) => "Eintrag nicht gefunden.".to_string(),
            Self::Store(e) => format!("Speicherfehler: {e}"),
            Self::Export(e) => e.user_message(),
        }
    }
}

/// What became of a submitted calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The response was the latest; it is now the current result and the
    /// newest history entry.
    Applied {
        view: RenderedView,
        entry: HistoryEntry,
    },
    /// A newer submit or a history reload overtook this one.
    Stale,
}

pub struct Workflow {
    calculator: Arc<dyn CalculationService>,
    exporter: Exporter,
    history: HistoryStore,
    scenarios: SavedScenarioStore,
    session: Mutex<Session>,
}

impl Workflow {
    pub fn new(
        calculator: Arc<dyn CalculationService>,
        export_service: Arc<dyn ExportService>,
        sink: Arc<dyn DownloadSink>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            calculator,
            exporter: Exporter::new(export_service, sink),
            history: HistoryStore::new(store.clone()),
            scenarios: SavedScenarioStore::new(store),
            session: Mutex::new(Session::new()),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<CurrentResult> {
        self.session().current().cloned()
    }

    /// Builds the request from `form` and submits it.
    pub async fn submit(&self, form: &RawForm) -> Result<SubmitOutcome, WorkflowError> {
        self.calculate(build_request(form)).await
    }

    /// Sends `request` to the calculation service and, if no newer request
    /// was issued meanwhile, makes the response current and records it in
    /// the history.
    ///
    /// # Errors
    /// [`WorkflowError::Service`] when the latest request fails. State is
    /// left untouched.
    pub async fn calculate(
        &self,
        request: CalculationRequest,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let ticket = self.session().begin();
        tracing::debug!(
            ticket = ticket.value(),
            gross = request.gross_pay.value(),
            "submitting calculation"
        );

        let response = self.calculator.calculate(&request).await;

        let result = match response {
            Ok(result) => result,
            Err(e) if !self.session().is_latest(ticket) => {
                tracing::debug!(
                    ticket = ticket.value(),
                    error = %e,
                    "ignoring failure of stale calculation"
                );
                return Ok(SubmitOutcome::Stale);
            }
            Err(e) => {
                tracing::error!(error = %e, "calculation failed");
                return Err(e.into());
            }
        };

        let view = {
            let mut session = self.session();
            match session.complete(ticket, request.clone(), result.clone()) {
                Some(current) => render(&current.request, &current.metrics),
                None => return Ok(SubmitOutcome::Stale),
            }
        };

        let entry = HistoryEntry::new(request, result);
        self.history.append(entry.clone()).await;
        tracing::info!(name = %entry.name, "calculation completed");

        Ok(SubmitOutcome::Applied { view, entry })
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.list().await
    }

    /// Makes a history entry current again without contacting the service.
    pub async fn reload_history(
        &self,
        timestamp: DateTime<Utc>,
    ) -> Result<RenderedView, WorkflowError> {
        let entry = self.history.load(timestamp).await?;
        let mut session = self.session();
        let current = session.reload(entry.request, entry.result);
        tracing::info!(%timestamp, "history entry reloaded");
        Ok(render(&current.request, &current.metrics))
    }

    pub async fn delete_history(&self, timestamp: DateTime<Utc>) {
        self.history.remove(timestamp).await;
    }

    pub async fn clear_history(&self) {
        self.history.clear().await;
        tracing::info!("history cleared");
    }

    /// Comparison table over the current history, most recent first.
    pub async fn compare(&self) -> Vec<ComparisonRow> {
        comparison_rows(&self.history.list().await)
    }

    pub async fn save_scenario(&self, name: &str, form: &RawForm) -> SavedScenario {
        self.scenarios.save(name, build_request(form)).await
    }

    pub async fn scenarios(&self) -> Vec<SavedScenario> {
        self.scenarios.list().await
    }

    /// Returns the saved inputs as a form, ready to prefill the UI.
    pub async fn load_scenario(&self, timestamp: DateTime<Utc>) -> Result<RawForm, WorkflowError> {
        let scenario = self.scenarios.load(timestamp).await?;
        Ok(RawForm::from_request(&scenario.request))
    }

    pub async fn delete_scenario(&self, timestamp: DateTime<Utc>) {
        self.scenarios.remove(timestamp).await;
    }

    pub async fn export(
        &self,
        format: ExportFormat,
        name: Option<&str>,
    ) -> Result<ExportReceipt, WorkflowError> {
        let current = self.current();
        Ok(self
            .exporter
            .export_as(format, current.as_ref(), name)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::export::ExportArtifact;
    use crate::form::FormField;
    use crate::models::{CalculationResult, Cents};
    use crate::render::DisplayField;
    use crate::service::ExportPayload;
    use crate::store::MemoryStore;

    /// Wage tax is 1/10 of gross. Gross ending in 1 cent is slow, gross of
    /// exactly 1 cent is rejected.
    #[derive(Default)]
    struct TenthService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CalculationService for TenthService {
        async fn calculate(
            &self,
            request: &CalculationRequest,
        ) -> Result<CalculationResult, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gross = request.gross_pay.value();
            if gross % 100 == 1 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            if gross == 1 {
                return Err(ServiceError::Rejected {
                    status: 422,
                    detail: "RE4 zu klein".to_string(),
                });
            }
            Ok(CalculationResult {
                wage_tax: Cents(gross / 10),
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct NoExport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExportService for NoExport {
        async fn export(
            &self,
            _format: ExportFormat,
            _payload: &ExportPayload,
        ) -> Result<Vec<u8>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(b"doc".to_vec())
        }
    }

    struct NullSink;

    #[async_trait]
    impl DownloadSink for NullSink {
        async fn deliver(&self, artifact: &ExportArtifact) -> std::io::Result<String> {
            Ok(artifact.filename.clone())
        }
    }

    struct Harness {
        workflow: Workflow,
        calculator: Arc<TenthService>,
        exports: Arc<NoExport>,
    }

    fn harness() -> Harness {
        let calculator = Arc::new(TenthService::default());
        let exports = Arc::new(NoExport::default());
        let workflow = Workflow::new(
            calculator.clone(),
            exports.clone(),
            Arc::new(NullSink),
            Arc::new(MemoryStore::new()),
        );
        Harness {
            workflow,
            calculator,
            exports,
        }
    }

    fn form(gross: &str) -> RawForm {
        RawForm::new()
            .with(FormField::GrossPay, gross)
            .with(FormField::TaxClass, "1")
            .with(FormField::BillingPeriod, "2")
    }

    #[tokio::test]
    async fn submit_renders_and_records_history() {
        let h = harness();

        let outcome = h.workflow.submit(&form("3500")).await.unwrap();

        let SubmitOutcome::Applied { view, entry } = outcome else {
            panic!("expected the calculation to apply");
        };
        assert_eq!(view.get(DisplayField::WageTax), Some("350.00 €"));
        assert_eq!(entry.name, "3500.00 € / StKl 1 / Monat");
        assert_eq!(h.workflow.history().await, vec![entry]);
        assert_eq!(h.workflow.current().unwrap().request.gross_pay, Cents(350000));
    }

    #[tokio::test]
    async fn service_failure_leaves_state_untouched() {
        let h = harness();
        h.workflow.submit(&form("1000")).await.unwrap();

        let err = h.workflow.submit(&form("0.01")).await.unwrap_err();

        assert_eq!(err.user_message(), "Fehler bei der Berechnung: RE4 zu klein");
        assert_eq!(h.workflow.history().await.len(), 1);
        assert_eq!(h.workflow.current().unwrap().request.gross_pay, Cents(100000));
    }

    #[tokio::test]
    async fn slower_earlier_submit_is_discarded() {
        let h = harness();
        let slow = form("1000.01");
        let fast = form("2000");

        let (first, second) = tokio::join!(h.workflow.submit(&slow), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            h.workflow.submit(&fast).await
        });

        assert_eq!(first.unwrap(), SubmitOutcome::Stale);
        assert!(matches!(second.unwrap(), SubmitOutcome::Applied { .. }));
        assert_eq!(h.workflow.current().unwrap().request.gross_pay, Cents(200000));
        assert_eq!(h.workflow.history().await.len(), 1);
        assert_eq!(h.calculator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reload_restores_entry_without_calling_service() {
        let h = harness();
        h.workflow.submit(&form("1000")).await.unwrap();
        h.workflow.submit(&form("2000")).await.unwrap();
        let older = h.workflow.history().await[1].clone();

        let view = h.workflow.reload_history(older.timestamp).await.unwrap();

        assert_eq!(view.get(DisplayField::GrossPay), Some("1000.00 €"));
        assert_eq!(h.workflow.current().unwrap().request, older.request);
        assert_eq!(h.calculator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.workflow.history().await.len(), 2);
    }

    #[tokio::test]
    async fn reload_of_unknown_entry_is_not_found() {
        let h = harness();

        let err = h.workflow.reload_history(Utc::now()).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Store(StoreError::NotFound)));
        assert!(h.workflow.current().is_none());
    }

    #[tokio::test]
    async fn export_requires_a_current_result() {
        let h = harness();

        let err = h.workflow.export(ExportFormat::Pdf, None).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Export(ExportError::NoCurrentResult)));
        assert_eq!(h.exports.calls.load(Ordering::SeqCst), 0);

        h.workflow.submit(&form("3500")).await.unwrap();
        let receipt = h.workflow.export(ExportFormat::Excel, Some("Test")).await.unwrap();

        assert_eq!(receipt.location, "Test.xlsx");
        assert_eq!(h.exports.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scenarios_round_trip_through_the_form() {
        let h = harness();
        let saved = h.workflow.save_scenario("Angebot", &form("4200")).await;

        let restored = h.workflow.load_scenario(saved.timestamp).await.unwrap();

        assert_eq!(build_request(&restored), build_request(&form("4200")));
        assert_eq!(h.workflow.scenarios().await.len(), 1);
        assert!(h.workflow.history().await.is_empty());

        h.workflow.delete_scenario(saved.timestamp).await;
        assert!(h.workflow.scenarios().await.is_empty());
    }

    #[tokio::test]
    async fn compare_lists_history_rows() {
        let h = harness();
        h.workflow.submit(&form("1000")).await.unwrap();
        h.workflow.submit(&form("3000")).await.unwrap();

        let rows = h.workflow.compare().await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].gross_pay, "3000.00 €");
        assert_eq!(rows[1].net_pay, "900.00 €");
    }

    #[tokio::test]
    async fn delete_and_clear_history() {
        let h = harness();
        h.workflow.submit(&form("1000")).await.unwrap();
        h.workflow.submit(&form("2000")).await.unwrap();
        let newest = h.workflow.history().await[0].timestamp;

        h.workflow.delete_history(newest).await;
        assert_eq!(h.workflow.history().await.len(), 1);

        h.workflow.clear_history().await;
        assert!(h.workflow.history().await.is_empty());
    }
}
