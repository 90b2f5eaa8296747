//! Client-side arithmetic on calculation results.
//!
//! The tax itself is computed by the remote service; this module only
//! converts money, derives display figures and estimates social insurance.

pub mod derive;
pub mod money;
pub mod social_insurance;

pub use derive::{DerivedMetrics, Shares, YearlyProjection, derive_metrics};
pub use social_insurance::SocialInsuranceEstimate;
