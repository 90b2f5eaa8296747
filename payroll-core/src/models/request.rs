use serde::{Deserialize, Serialize};

use super::cents::Cents;
use super::codes::{BillingPeriod, ChurchTax, HealthInsurance, TaxClass};

/// Input parameters sent to the calculation service.
///
/// Serializes as the flat, upper-case keyed body the service expects:
/// money in cents, selectors as integer codes, rates as decimal percentages
/// and flags as 0/1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Gross pay for the billing period.
    #[serde(rename = "RE4")]
    pub gross_pay: Cents,
    #[serde(rename = "STKL")]
    pub tax_class: i32,
    #[serde(rename = "LZZ")]
    pub billing_period: i32,
    #[serde(rename = "ZKF")]
    pub child_allowance_factor: f64,
    #[serde(rename = "R")]
    pub church_tax: i32,
    /// Additional health-insurance contribution rate, in percent.
    #[serde(rename = "KVZ")]
    pub health_surcharge_rate: f64,
    #[serde(rename = "PVS")]
    pub care_saxony: u8,
    #[serde(rename = "PVZ")]
    pub care_childless_surcharge: u8,
    #[serde(rename = "PKV")]
    pub health_insurance: i32,
    #[serde(rename = "af")]
    pub factor_procedure: i32,
    #[serde(rename = "f")]
    pub factor: f64,
    #[serde(rename = "AJAHR")]
    pub age_relief_year: i32,
    #[serde(rename = "ALTER1")]
    pub age_relief: u8,

    // Year-end adjustment amounts
    #[serde(rename = "JFREIB")]
    pub annual_allowance: Cents,
    #[serde(rename = "JHINZU")]
    pub annual_addition: Cents,
    #[serde(rename = "JRE4")]
    pub annual_gross_pay: Cents,
    #[serde(rename = "JRE4ENT")]
    pub annual_compensation: Cents,
    #[serde(rename = "JVBEZ")]
    pub annual_pension_payments: Cents,

    #[serde(rename = "KRV")]
    pub pension_insurance_marker: i32,
    #[serde(rename = "LZZFREIB")]
    pub period_allowance: Cents,
    #[serde(rename = "LZZHINZU")]
    pub period_addition: Cents,
    #[serde(rename = "MBV")]
    pub equity_participation: Cents,
    #[serde(rename = "PKPV")]
    pub private_insurance_premium: Cents,
    #[serde(rename = "PVA")]
    pub care_reductions: f64,
    #[serde(rename = "SONSTB")]
    pub other_payments: Cents,
    #[serde(rename = "SONSTENT")]
    pub other_compensation: Cents,
    #[serde(rename = "STERBE")]
    pub death_benefit: Cents,
    #[serde(rename = "VBEZ")]
    pub pension_payments: Cents,
    #[serde(rename = "VBEZM")]
    pub pension_monthly: Cents,
    #[serde(rename = "VBEZS")]
    pub pension_special: Cents,
    #[serde(rename = "VBS")]
    pub pension_in_other_payments: Cents,
    #[serde(rename = "VJAHR")]
    pub pension_start_year: i32,
    #[serde(rename = "ZMVB")]
    pub pension_months: i32,
}

impl CalculationRequest {
    pub fn tax_class(&self) -> Option<TaxClass> {
        TaxClass::from_code(self.tax_class)
    }

    pub fn billing_period(&self) -> Option<BillingPeriod> {
        BillingPeriod::from_code(self.billing_period)
    }

    pub fn church_tax(&self) -> Option<ChurchTax> {
        ChurchTax::from_code(self.church_tax)
    }

    pub fn health_insurance(&self) -> Option<HealthInsurance> {
        HealthInsurance::from_code(self.health_insurance)
    }

    /// Periods per year; unknown billing periods count as monthly.
    pub fn yearly_multiplier(&self) -> i64 {
        self.billing_period()
            .map(|p| p.yearly_multiplier())
            .unwrap_or(BillingPeriod::FALLBACK_MULTIPLIER)
    }

    // Unknown codes are shown as the bare number.

    pub fn tax_class_label(&self) -> String {
        self.tax_class()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| self.tax_class.to_string())
    }

    pub fn billing_period_label(&self) -> String {
        self.billing_period()
            .map(|p| p.label().to_string())
            .unwrap_or_else(|| self.billing_period.to_string())
    }

    pub fn church_tax_label(&self) -> String {
        self.church_tax()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| self.church_tax.to_string())
    }

    pub fn health_insurance_label(&self) -> String {
        self.health_insurance()
            .map(|h| h.label().to_string())
            .unwrap_or_else(|| self.health_insurance.to_string())
    }
}
