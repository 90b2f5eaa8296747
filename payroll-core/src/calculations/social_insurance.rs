//! Employee social-insurance contributions, estimated from gross pay.
//!
//! These figures are a presentational estimate. They use fixed 2025 rates and
//! contribution ceilings and are not reconciled with the calculation
//! service's own insurance deductions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::money::decimal_to_cents;
use crate::models::{BillingPeriod, CalculationRequest, Cents};

/// Total contribution rates (employer + employee), as fractions.
pub struct ContributionRates {
    pub health: Decimal,
    pub long_term_care: Decimal,
    pub pension: Decimal,
    pub unemployment: Decimal,
}

pub const CONTRIBUTION_RATES: ContributionRates = ContributionRates {
    health: dec!(0.146),
    long_term_care: dec!(0.036),
    pension: dec!(0.186),
    unemployment: dec!(0.024),
};

/// Annual contribution ceilings in cents.
pub struct ContributionCeilings {
    pub health_and_care: Decimal,
    pub pension_and_unemployment: Decimal,
}

pub const ANNUAL_CEILINGS: ContributionCeilings = ContributionCeilings {
    health_and_care: dec!(6615000),
    pension_and_unemployment: dec!(9660000),
};

const MONTHS_PER_YEAR: Decimal = dec!(12);
const EMPLOYEE_SHARE: Decimal = dec!(0.5);

/// Monthly employee share per insurance branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceEstimate {
    /// Gross pay converted to a monthly basis, before any ceiling.
    pub monthly_basis: Cents,
    pub health: Cents,
    pub long_term_care: Cents,
    pub pension: Cents,
    pub unemployment: Cents,
}

impl SocialInsuranceEstimate {
    pub fn total(&self) -> Cents {
        self.health + self.long_term_care + self.pension + self.unemployment
    }
}

/// Estimates the monthly employee contributions for `request`.
///
/// Gross pay is divided by 12 unless the billing period is monthly. The
/// health and long-term-care basis is capped at the lower ceiling, the
/// pension and unemployment basis at the higher one; each product is halved.
pub fn estimate(request: &CalculationRequest) -> SocialInsuranceEstimate {
    let gross = Decimal::from(request.gross_pay.value());
    let monthly_basis = match request.billing_period() {
        Some(BillingPeriod::Monthly) => gross,
        _ => gross / MONTHS_PER_YEAR,
    };

    let health_basis = monthly_basis.min(ANNUAL_CEILINGS.health_and_care / MONTHS_PER_YEAR);
    let pension_basis =
        monthly_basis.min(ANNUAL_CEILINGS.pension_and_unemployment / MONTHS_PER_YEAR);

    let share = |basis: Decimal, rate: Decimal| {
        decimal_to_cents(basis * rate * EMPLOYEE_SHARE).unwrap_or(Cents::ZERO)
    };

    SocialInsuranceEstimate {
        monthly_basis: decimal_to_cents(monthly_basis).unwrap_or(Cents::ZERO),
        health: share(health_basis, CONTRIBUTION_RATES.health),
        long_term_care: share(health_basis, CONTRIBUTION_RATES.long_term_care),
        pension: share(pension_basis, CONTRIBUTION_RATES.pension),
        unemployment: share(pension_basis, CONTRIBUTION_RATES.unemployment),
    }
}
