mod cents;
mod codes;
mod history;
mod request;
mod result;

pub use cents::Cents;
pub use codes::{BillingPeriod, ChurchTax, HealthInsurance, TaxClass};
pub use history::{HistoryEntry, SavedScenario};
pub use request::CalculationRequest;
pub use result::CalculationResult;
