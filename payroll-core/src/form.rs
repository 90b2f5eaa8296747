//! Request builder: raw form values to a typed [`CalculationRequest`].
//!
//! The form vocabulary is closed. String keys are resolved to [`FormField`]
//! once, when the [`RawForm`] is assembled, so a misspelled field id fails
//! there instead of silently producing a zero.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use crate::calculations::money::{format_amount, parse_decimal, to_minor_units};
use crate::models::{CalculationRequest, Cents};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    GrossPay,
    TaxClass,
    BillingPeriod,
    ChildAllowanceFactor,
    ChurchTax,
    HealthSurchargeRate,
    CareSaxony,
    CareChildlessSurcharge,
    HealthInsurance,
    FactorProcedure,
    Factor,
    AgeReliefYear,
    AgeRelief,
    AnnualAllowance,
    AnnualAddition,
    AnnualGrossPay,
    AnnualCompensation,
    AnnualPensionPayments,
    PensionInsuranceMarker,
    PeriodAllowance,
    PeriodAddition,
    EquityParticipation,
    PrivateInsurancePremium,
    CareReductions,
    OtherPayments,
    OtherCompensation,
    DeathBenefit,
    PensionPayments,
    PensionMonthly,
    PensionSpecial,
    PensionInOtherPayments,
    PensionStartYear,
    PensionMonths,
}

impl FormField {
    pub const ALL: [FormField; 33] = [
        Self::GrossPay,
        Self::TaxClass,
        Self::BillingPeriod,
        Self::ChildAllowanceFactor,
        Self::ChurchTax,
        Self::HealthSurchargeRate,
        Self::CareSaxony,
        Self::CareChildlessSurcharge,
        Self::HealthInsurance,
        Self::FactorProcedure,
        Self::Factor,
        Self::AgeReliefYear,
        Self::AgeRelief,
        Self::AnnualAllowance,
        Self::AnnualAddition,
        Self::AnnualGrossPay,
        Self::AnnualCompensation,
        Self::AnnualPensionPayments,
        Self::PensionInsuranceMarker,
        Self::PeriodAllowance,
        Self::PeriodAddition,
        Self::EquityParticipation,
        Self::PrivateInsurancePremium,
        Self::CareReductions,
        Self::OtherPayments,
        Self::OtherCompensation,
        Self::DeathBenefit,
        Self::PensionPayments,
        Self::PensionMonthly,
        Self::PensionSpecial,
        Self::PensionInOtherPayments,
        Self::PensionStartYear,
        Self::PensionMonths,
    ];

    /// Form element id, identical to the service's request key.
    pub fn id(&self) -> &'static str {
        match self {
            Self::GrossPay => "RE4",
            Self::TaxClass => "STKL",
            Self::BillingPeriod => "LZZ",
            Self::ChildAllowanceFactor => "ZKF",
            Self::ChurchTax => "R",
            Self::HealthSurchargeRate => "KVZ",
            Self::CareSaxony => "PVS",
            Self::CareChildlessSurcharge => "PVZ",
            Self::HealthInsurance => "PKV",
            Self::FactorProcedure => "af",
            Self::Factor => "f",
            Self::AgeReliefYear => "AJAHR",
            Self::AgeRelief => "ALTER1",
            Self::AnnualAllowance => "JFREIB",
            Self::AnnualAddition => "JHINZU",
            Self::AnnualGrossPay => "JRE4",
            Self::AnnualCompensation => "JRE4ENT",
            Self::AnnualPensionPayments => "JVBEZ",
            Self::PensionInsuranceMarker => "KRV",
            Self::PeriodAllowance => "LZZFREIB",
            Self::PeriodAddition => "LZZHINZU",
            Self::EquityParticipation => "MBV",
            Self::PrivateInsurancePremium => "PKPV",
            Self::CareReductions => "PVA",
            Self::OtherPayments => "SONSTB",
            Self::OtherCompensation => "SONSTENT",
            Self::DeathBenefit => "STERBE",
            Self::PensionPayments => "VBEZ",
            Self::PensionMonthly => "VBEZM",
            Self::PensionSpecial => "VBEZS",
            Self::PensionInOtherPayments => "VBS",
            Self::PensionStartYear => "VJAHR",
            Self::PensionMonths => "ZMVB",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == id)
    }
}

/// A value as the UI layer hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Checked(bool),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Checked(value)
    }
}

/// Raw form contents keyed by [`FormField`]. Absent fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    values: HashMap<FormField, RawValue>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a form from `(field id, value)` pairs.
    ///
    /// # Errors
    /// [`FormError::UnknownField`] for the first id outside the vocabulary.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let mut form = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let field =
                FormField::from_id(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
            form.set(field, value);
        }
        Ok(form)
    }

    pub fn set(
        &mut self,
        field: FormField,
        value: impl Into<RawValue>,
    ) -> &mut Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn with(
        mut self,
        field: FormField,
        value: impl Into<RawValue>,
    ) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FormField) -> Option<&RawValue> {
        self.values.get(&field)
    }

    fn text(&self, field: FormField) -> &str {
        match self.values.get(&field) {
            Some(RawValue::Text(text)) => text,
            _ => "",
        }
    }

    fn money(&self, field: FormField) -> Cents {
        let cents = to_minor_units(self.text(field));
        if cents.value() < 0 {
            tracing::warn!(field = field.id(), "negative amount clamped to 0");
            return Cents::ZERO;
        }
        cents
    }

    fn integer(&self, field: FormField) -> i32 {
        parse_integer(self.text(field)).unwrap_or_else(|| {
            if !self.text(field).trim().is_empty() {
                tracing::warn!(
                    field = field.id(),
                    input = %self.text(field),
                    "invalid integer, using 0"
                );
            }
            0
        })
    }

    fn decimal(&self, field: FormField) -> f64 {
        parse_decimal(self.text(field))
            .and_then(|d| d.to_f64())
            .unwrap_or_else(|| {
                if !self.text(field).trim().is_empty() {
                    tracing::warn!(
                        field = field.id(),
                        input = %self.text(field),
                        "invalid decimal, using 0"
                    );
                }
                0.0
            })
    }

    fn flag(&self, field: FormField) -> u8 {
        match self.values.get(&field) {
            Some(RawValue::Checked(checked)) => u8::from(*checked),
            Some(RawValue::Text(text)) => {
                let text = text.trim();
                let unchecked = text.is_empty()
                    || text == "0"
                    || text.eq_ignore_ascii_case("false")
                    || text.eq_ignore_ascii_case("off");
                u8::from(!unchecked)
            }
            None => 0,
        }
    }

    /// Form values that reproduce `request` when built again.
    ///
    /// Used to put a saved scenario or history entry back into the form.
    pub fn from_request(request: &CalculationRequest) -> Self {
        let mut source = request.clone();
        let mut form = Self::new();
        for field in FormField::ALL {
            let value = match slot(&mut source, field) {
                Slot::Money(cents) => RawValue::Text(format_amount(*cents)),
                Slot::Integer(value) => RawValue::Text(value.to_string()),
                Slot::Decimal(value) => RawValue::Text(value.to_string()),
                Slot::Flag(value) => RawValue::Checked(*value == 1),
            };
            form.set(field, value);
        }
        form
    }
}

/// Integer parse that never fails loudly: a decimal such as `"2.0"` is
/// truncated, anything else is `None`.
fn parse_integer(s: &str) -> Option<i32> {
    let trimmed = s.trim();
    trimmed
        .parse::<i32>()
        .ok()
        .or_else(|| parse_decimal(trimmed).and_then(|d| d.trunc().to_i32()))
}

/// Assembles a complete request from raw form values.
///
/// Never fails: unparseable or missing values become zero. Enumeration
/// membership of selector codes is not checked here.
pub fn build_request(form: &RawForm) -> CalculationRequest {
    let mut request = CalculationRequest::default();
    for field in FormField::ALL {
        match slot(&mut request, field) {
            Slot::Money(cents) => *cents = form.money(field),
            Slot::Integer(value) => *value = form.integer(field),
            Slot::Decimal(value) => *value = form.decimal(field),
            Slot::Flag(value) => *value = form.flag(field),
        }
    }

    tracing::debug!(
        gross = request.gross_pay.value(),
        tax_class = request.tax_class,
        billing_period = request.billing_period,
        "built calculation request"
    );
    request
}

/// Typed place in a request that a form field reads from and writes to.
enum Slot<'a> {
    /// Euro amount, converted to cents.
    Money(&'a mut Cents),
    /// Integer selector code or year.
    Integer(&'a mut i32),
    /// Decimal rate or factor.
    Decimal(&'a mut f64),
    /// Checkbox, sent as 0/1.
    Flag(&'a mut u8),
}

fn slot(
    request: &mut CalculationRequest,
    field: FormField,
) -> Slot<'_> {
    use FormField as F;

    match field {
        F::GrossPay => Slot::Money(&mut request.gross_pay),
        F::TaxClass => Slot::Integer(&mut request.tax_class),
        F::BillingPeriod => Slot::Integer(&mut request.billing_period),
        F::ChildAllowanceFactor => Slot::Decimal(&mut request.child_allowance_factor),
        F::ChurchTax => Slot::Integer(&mut request.church_tax),
        F::HealthSurchargeRate => Slot::Decimal(&mut request.health_surcharge_rate),
        F::CareSaxony => Slot::Flag(&mut request.care_saxony),
        F::CareChildlessSurcharge => Slot::Flag(&mut request.care_childless_surcharge),
        F::HealthInsurance => Slot::Integer(&mut request.health_insurance),
        F::FactorProcedure => Slot::Integer(&mut request.factor_procedure),
        F::Factor => Slot::Decimal(&mut request.factor),
        F::AgeReliefYear => Slot::Integer(&mut request.age_relief_year),
        F::AgeRelief => Slot::Flag(&mut request.age_relief),
        F::AnnualAllowance => Slot::Money(&mut request.annual_allowance),
        F::AnnualAddition => Slot::Money(&mut request.annual_addition),
        F::AnnualGrossPay => Slot::Money(&mut request.annual_gross_pay),
        F::AnnualCompensation => Slot::Money(&mut request.annual_compensation),
        F::AnnualPensionPayments => Slot::Money(&mut request.annual_pension_payments),
        F::PensionInsuranceMarker => Slot::Integer(&mut request.pension_insurance_marker),
        F::PeriodAllowance => Slot::Money(&mut request.period_allowance),
        F::PeriodAddition => Slot::Money(&mut request.period_addition),
        F::EquityParticipation => Slot::Money(&mut request.equity_participation),
        F::PrivateInsurancePremium => Slot::Money(&mut request.private_insurance_premium),
        F::CareReductions => Slot::Decimal(&mut request.care_reductions),
        F::OtherPayments => Slot::Money(&mut request.other_payments),
        F::OtherCompensation => Slot::Money(&mut request.other_compensation),
        F::DeathBenefit => Slot::Money(&mut request.death_benefit),
        F::PensionPayments => Slot::Money(&mut request.pension_payments),
        F::PensionMonthly => Slot::Money(&mut request.pension_monthly),
        F::PensionSpecial => Slot::Money(&mut request.pension_special),
        F::PensionInOtherPayments => Slot::Money(&mut request.pension_in_other_payments),
        F::PensionStartYear => Slot::Integer(&mut request.pension_start_year),
        F::PensionMonths => Slot::Integer(&mut request.pension_months),
    }
}
