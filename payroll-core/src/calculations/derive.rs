//! Derived figures for a completed calculation.
//!
//! Turns the service's three tax components and the request's gross pay into
//! net pay, shares of gross, a yearly projection and social-insurance
//! estimates.
//!
//! # Example
//!
//! ```
//! use payroll_core::calculations::derive_metrics;
//! use payroll_core::{CalculationRequest, CalculationResult, Cents};
//!
//! let request = CalculationRequest {
//!     gross_pay: Cents(350000),
//!     billing_period: 2,
//!     ..Default::default()
//! };
//! let result = CalculationResult {
//!     wage_tax: Cents(45000),
//!     ..Default::default()
//! };
//!
//! let metrics = derive_metrics(&request, &result);
//!
//! assert_eq!(metrics.net_pay, Cents(305000));
//! assert_eq!(metrics.yearly.total_tax, Cents(540000));
//! assert_eq!(metrics.yearly.net_pay, Cents(3660000));
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::social_insurance::{self, SocialInsuranceEstimate};
use crate::models::{CalculationRequest, CalculationResult, Cents};

/// Share of gross pay per figure, in percent.
///
/// Every value is finite; a zero gross yields zero for all shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shares {
    pub wage_tax: f64,
    pub solidarity_surcharge: f64,
    pub church_tax: f64,
    pub total_tax: f64,
    pub net_pay: f64,
}

/// Base-period figures scaled to a full year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub multiplier: i64,
    pub gross_pay: Cents,
    pub total_tax: Cents,
    pub net_pay: Cents,
    /// Yearly tax as a percentage of yearly gross.
    pub effective_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub gross_pay: Cents,
    pub wage_tax: Cents,
    pub solidarity_surcharge: Cents,
    pub church_tax: Cents,
    pub total_tax: Cents,
    /// Gross minus total tax. Negative when taxes exceed the gross pay.
    pub net_pay: Cents,
    pub shares: Shares,
    pub yearly: YearlyProjection,
    pub social_insurance: SocialInsuranceEstimate,
}

/// Derives all display figures from a request and the service's result.
pub fn derive_metrics(
    request: &CalculationRequest,
    result: &CalculationResult,
) -> DerivedMetrics {
    let gross_pay = request.gross_pay;
    let total_tax = result.total_tax();
    let net_pay = gross_pay - total_tax;

    let shares = Shares {
        wage_tax: result.wage_tax.percent_of(gross_pay),
        solidarity_surcharge: result.solidarity_surcharge.percent_of(gross_pay),
        church_tax: result.church_tax.percent_of(gross_pay),
        total_tax: total_tax.percent_of(gross_pay),
        net_pay: net_pay.percent_of(gross_pay),
    };

    let multiplier = request.yearly_multiplier();
    let yearly_gross = gross_pay * multiplier;
    let yearly_tax = total_tax * multiplier;
    let yearly = YearlyProjection {
        multiplier,
        gross_pay: yearly_gross,
        total_tax: yearly_tax,
        net_pay: yearly_gross - yearly_tax,
        effective_rate: yearly_tax.percent_of(yearly_gross),
    };

    tracing::debug!(
        gross = gross_pay.value(),
        total_tax = total_tax.value(),
        multiplier,
        "derived calculation metrics"
    );

    DerivedMetrics {
        gross_pay,
        wage_tax: result.wage_tax,
        solidarity_surcharge: result.solidarity_surcharge,
        church_tax: result.church_tax,
        total_tax,
        net_pay,
        shares,
        yearly,
        social_insurance: social_insurance::estimate(request),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn request(gross: i64, period: i32) -> CalculationRequest {
        CalculationRequest {
            gross_pay: Cents(gross),
            billing_period: period,
            tax_class: 1,
            ..Default::default()
        }
    }

    fn result(wage_tax: i64, surcharge: i64, church_tax: i64) -> CalculationResult {
        CalculationResult {
            wage_tax: Cents(wage_tax),
            solidarity_surcharge: Cents(surcharge),
            church_tax: Cents(church_tax),
            ..Default::default()
        }
    }

    #[test]
    fn monthly_scenario_matches_reference_figures() {
        let metrics = derive_metrics(&request(350000, 2), &result(45000, 0, 0));

        assert_eq!(metrics.total_tax, Cents(45000));
        assert_eq!(metrics.net_pay, Cents(305000));
        assert!((metrics.shares.wage_tax - 12.857142857142858).abs() < EPSILON);
        assert!((metrics.shares.net_pay - 87.14285714285714).abs() < EPSILON);
        assert_eq!(metrics.yearly.multiplier, 12);
        assert_eq!(metrics.yearly.total_tax, Cents(540000));
        assert_eq!(metrics.yearly.net_pay, Cents(3660000));
        assert_eq!(metrics.yearly.gross_pay, Cents(4200000));
        assert!((metrics.yearly.effective_rate - 12.857142857142858).abs() < EPSILON);
    }

    #[test]
    fn shares_add_up_to_one_hundred() {
        let metrics = derive_metrics(&request(512345, 2), &result(81234, 4467, 6499));
        let s = metrics.shares;

        let sum = s.wage_tax + s.solidarity_surcharge + s.church_tax + s.net_pay;

        assert!((sum - 100.0).abs() < 1e-9, "sum was {sum}");
        assert!((s.total_tax + s.net_pay - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_gross_yields_zero_shares() {
        let metrics = derive_metrics(&request(0, 2), &result(0, 0, 0));

        assert_eq!(metrics.shares, Shares::default());
        assert_eq!(metrics.yearly.effective_rate, 0.0);
        assert!(metrics.shares.net_pay.is_finite());
    }

    #[test]
    fn zero_gross_with_taxes_still_has_finite_shares() {
        let metrics = derive_metrics(&request(0, 2), &result(100, 0, 0));

        assert_eq!(metrics.net_pay, Cents(-100));
        assert_eq!(metrics.shares, Shares::default());
    }

    #[test]
    fn annual_projection_equals_base_figures() {
        let metrics = derive_metrics(&request(4200000, 1), &result(540000, 12000, 0));

        assert_eq!(metrics.yearly.multiplier, 1);
        assert_eq!(metrics.yearly.gross_pay, metrics.gross_pay);
        assert_eq!(metrics.yearly.total_tax, metrics.total_tax);
        assert_eq!(metrics.yearly.net_pay, metrics.net_pay);
        assert_eq!(metrics.yearly.effective_rate, metrics.shares.total_tax);
    }

    #[test]
    fn weekly_and_daily_projections() {
        let weekly = derive_metrics(&request(80000, 3), &result(10000, 0, 0));
        let daily = derive_metrics(&request(16000, 4), &result(2000, 0, 0));

        assert_eq!(weekly.yearly.total_tax, Cents(520000));
        assert_eq!(daily.yearly.gross_pay, Cents(5840000));
    }

    #[test]
    fn unknown_period_projects_monthly() {
        let metrics = derive_metrics(&request(100000, 0), &result(10000, 0, 0));

        assert_eq!(metrics.yearly.multiplier, 12);
        assert_eq!(metrics.yearly.total_tax, Cents(120000));
    }

    #[test]
    fn huge_daily_gross_saturates_the_projection() {
        let gross = crate::calculations::money::to_minor_units("90000000000000000");
        let metrics = derive_metrics(&request(gross.value(), 4), &result(0, 0, 0));

        assert_eq!(metrics.yearly.gross_pay, Cents(i64::MAX));
        assert_eq!(metrics.yearly.net_pay, Cents(i64::MAX));
    }

    #[test]
    fn oversized_service_figures_do_not_overflow() {
        let result: CalculationResult =
            serde_json::from_str(r#"{"LSTLZZ": 9223372036854775807, "SOLZLZZ": 1}"#).unwrap();

        let metrics = derive_metrics(&request(350000, 2), &result);

        assert_eq!(metrics.total_tax, Cents(i64::MAX));
        assert_eq!(metrics.net_pay, Cents(350000 - i64::MAX));
        assert!(metrics.shares.total_tax.is_finite());
    }

    #[test]
    fn negative_net_is_surfaced_unchanged() {
        let metrics = derive_metrics(&request(10000, 2), &result(9000, 500, 1500));

        assert_eq!(metrics.net_pay, Cents(-1000));
        assert!((metrics.shares.net_pay + 10.0).abs() < EPSILON);
    }
}
