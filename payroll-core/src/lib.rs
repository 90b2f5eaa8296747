pub mod calculations;
pub mod export;
pub mod form;
pub mod models;
pub mod render;
pub mod service;
pub mod session;
pub mod store;
pub mod workflow;

pub use form::{FormError, FormField, RawForm, RawValue, build_request};
pub use models::*;
pub use service::{CalculationService, ExportFormat, ExportPayload, ExportService, ServiceError};
pub use store::{KeyValueStore, StoreConfig, StoreError, StoreFactory, StoreRegistry};
pub use workflow::{SubmitOutcome, Workflow, WorkflowError};
