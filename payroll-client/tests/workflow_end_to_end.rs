use std::path::PathBuf;

use chrono::Utc;
use payroll_client::app::{build_workflow, parse_form};
use payroll_client::config::ClientConfig;
use payroll_core::export::ExportError;
use payroll_core::render::DisplayField;
use payroll_core::{ExportFormat, SubmitOutcome, WorkflowError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    std::env::temp_dir().join(format!("payroll-{name}-{}-{nanos}", std::process::id()))
}

fn config(server: &MockServer, export_dir: PathBuf) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.service.base_url = server.uri();
    config.store.backend = "memory".to_string();
    config.export.directory = export_dir;
    config
}

#[tokio::test]
async fn calculate_then_export_writes_the_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/calculate_payroll_tax"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "LSTLZZ": 45000, "SOLZLZZ": 0, "BK": 0
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/export/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .mount(&server)
        .await;

    let export_dir = temp_dir("export");
    let workflow = build_workflow(&config(&server, export_dir.clone())).await.unwrap();
    let form = parse_form("RE4 = \"3500\"\nSTKL = 1\nLZZ = 2").unwrap();

    let SubmitOutcome::Applied { view, .. } = workflow.submit(&form).await.unwrap() else {
        panic!("calculation should apply");
    };
    assert_eq!(view.get(DisplayField::NetPay), Some("3050.00 €"));
    assert_eq!(view.get(DisplayField::YearlyTotalTax), Some("5400.00 €"));

    let receipt = workflow.export(ExportFormat::Pdf, Some("Januar")).await.unwrap();

    let written = std::fs::read(export_dir.join("Januar.pdf")).unwrap();
    assert_eq!(written, b"%PDF-1.7".to_vec());
    assert_eq!(receipt.size, 8);

    let _ = std::fs::remove_dir_all(&export_dir);
}

#[tokio::test]
async fn export_without_calculation_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = build_workflow(&config(&server, temp_dir("unused"))).await.unwrap();

    let err = workflow.export(ExportFormat::Excel, None).await.unwrap_err();

    assert!(matches!(err, WorkflowError::Export(ExportError::NoCurrentResult)));
}

#[tokio::test]
async fn rejected_calculation_keeps_history_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "STKL ungültig" })),
        )
        .mount(&server)
        .await;

    let workflow = build_workflow(&config(&server, temp_dir("unused"))).await.unwrap();
    let form = parse_form("RE4 = 3500\nSTKL = 9").unwrap();

    let err = workflow.submit(&form).await.unwrap_err();

    assert_eq!(err.user_message(), "Fehler bei der Berechnung: STKL ungültig");
    assert!(workflow.history().await.is_empty());
    assert!(workflow.current().is_none());
}
