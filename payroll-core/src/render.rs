//! Presentation renderer: derived metrics to named display strings and a
//! proportional chart description.
//!
//! Everything here is a pure projection. The only side effect goes through
//! [`PresentationSurface`], which the UI layer implements.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::money::{to_display_string, to_percent_string};
use crate::calculations::{DerivedMetrics, derive_metrics};
use crate::models::{CalculationRequest, Cents, HistoryEntry};

/// Every named output slot of the result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisplayField {
    WageTax,
    SolidaritySurcharge,
    ChurchTax,
    TotalTax,
    GrossPay,
    NetPay,
    WageTaxShare,
    SolidaritySurchargeShare,
    ChurchTaxShare,
    TotalTaxShare,
    NetPayShare,
    YearlyGrossPay,
    YearlyTotalTax,
    YearlyNetPay,
    EffectiveRate,
    HealthInsurance,
    LongTermCare,
    PensionInsurance,
    UnemploymentInsurance,
    SocialInsuranceTotal,
    TaxClassLabel,
    BillingPeriodLabel,
    ChurchTaxLabel,
    HealthInsuranceLabel,
}

impl DisplayField {
    pub const ALL: [DisplayField; 24] = [
        Self::WageTax,
        Self::SolidaritySurcharge,
        Self::ChurchTax,
        Self::TotalTax,
        Self::GrossPay,
        Self::NetPay,
        Self::WageTaxShare,
        Self::SolidaritySurchargeShare,
        Self::ChurchTaxShare,
        Self::TotalTaxShare,
        Self::NetPayShare,
        Self::YearlyGrossPay,
        Self::YearlyTotalTax,
        Self::YearlyNetPay,
        Self::EffectiveRate,
        Self::HealthInsurance,
        Self::LongTermCare,
        Self::PensionInsurance,
        Self::UnemploymentInsurance,
        Self::SocialInsuranceTotal,
        Self::TaxClassLabel,
        Self::BillingPeriodLabel,
        Self::ChurchTaxLabel,
        Self::HealthInsuranceLabel,
    ];

    /// Element id in the result view. The first four match the
    /// calculation service's result keys.
    pub fn id(self) -> &'static str {
        match self {
            Self::WageTax => "LSTLZZ",
            Self::SolidaritySurcharge => "SOLZLZZ",
            Self::ChurchTax => "BK",
            Self::TotalTax => "TOTAL",
            Self::GrossPay => "gross-pay",
            Self::NetPay => "net-pay",
            Self::WageTaxShare => "wage-tax-percent",
            Self::SolidaritySurchargeShare => "soli-percent",
            Self::ChurchTaxShare => "church-tax-percent",
            Self::TotalTaxShare => "total-tax-percent",
            Self::NetPayShare => "net-pay-percent",
            Self::YearlyGrossPay => "yearly-gross",
            Self::YearlyTotalTax => "yearly-tax",
            Self::YearlyNetPay => "yearly-net",
            Self::EffectiveRate => "effective-rate",
            Self::HealthInsurance => "health-insurance",
            Self::LongTermCare => "care-insurance",
            Self::PensionInsurance => "pension-insurance",
            Self::UnemploymentInsurance => "unemployment-insurance",
            Self::SocialInsuranceTotal => "social-insurance-total",
            Self::TaxClassLabel => "summary-tax-class",
            Self::BillingPeriodLabel => "summary-period",
            Self::ChurchTaxLabel => "summary-church-tax",
            Self::HealthInsuranceLabel => "summary-insurance",
        }
    }

    /// German caption for text surfaces.
    pub fn caption(self) -> &'static str {
        match self {
            Self::WageTax => "Lohnsteuer",
            Self::SolidaritySurcharge => "Solidaritätszuschlag",
            Self::ChurchTax => "Kirchensteuer",
            Self::TotalTax => "Steuern gesamt",
            Self::GrossPay => "Brutto",
            Self::NetPay => "Netto (nach Steuern)",
            Self::WageTaxShare => "Anteil Lohnsteuer",
            Self::SolidaritySurchargeShare => "Anteil Solidaritätszuschlag",
            Self::ChurchTaxShare => "Anteil Kirchensteuer",
            Self::TotalTaxShare => "Anteil Steuern",
            Self::NetPayShare => "Anteil Netto",
            Self::YearlyGrossPay => "Jahresbrutto",
            Self::YearlyTotalTax => "Jahressteuer",
            Self::YearlyNetPay => "Jahresnetto",
            Self::EffectiveRate => "Effektiver Steuersatz",
            Self::HealthInsurance => "Krankenversicherung",
            Self::LongTermCare => "Pflegeversicherung",
            Self::PensionInsurance => "Rentenversicherung",
            Self::UnemploymentInsurance => "Arbeitslosenversicherung",
            Self::SocialInsuranceTotal => "Sozialversicherung gesamt",
            Self::TaxClassLabel => "Steuerklasse",
            Self::BillingPeriodLabel => "Zeitraum",
            Self::ChurchTaxLabel => "Kirchensteuer",
            Self::HealthInsuranceLabel => "Krankenversicherung",
        }
    }
}

impl fmt::Display for DisplayField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    WageTax,
    SolidaritySurcharge,
    ChurchTax,
    NetPay,
}

impl SegmentKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::WageTax => "Lohnsteuer",
            Self::SolidaritySurcharge => "Solidaritätszuschlag",
            Self::ChurchTax => "Kirchensteuer",
            Self::NetPay => "Netto",
        }
    }
}

/// One slice of the breakdown chart. Angles are radians, measured the way a
/// canvas measures them: zero at three o'clock, growing clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSegment {
    pub kind: SegmentKind,
    pub amount: Cents,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ChartSegment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Segments in drawing order, starting at the top of the circle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub segments: Vec<ChartSegment>,
}

/// Display strings per field plus the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub fields: Vec<(DisplayField, String)>,
    pub chart: ChartDescription,
}

impl RenderedView {
    pub fn get(&self, field: DisplayField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, text)| text.as_str())
    }
}

/// Implemented by whatever shows results to the user.
pub trait PresentationSurface {
    fn show(&mut self, view: &RenderedView);

    fn show_error(&mut self, message: &str);
}

/// Projects `metrics` (and `request`, for the summary labels) onto the view.
pub fn render(request: &CalculationRequest, metrics: &DerivedMetrics) -> RenderedView {
    use DisplayField as F;

    let money = to_display_string;
    let pct = to_percent_string;
    let si = &metrics.social_insurance;

    let fields = vec![
        (F::WageTax, money(metrics.wage_tax)),
        (F::SolidaritySurcharge, money(metrics.solidarity_surcharge)),
        (F::ChurchTax, money(metrics.church_tax)),
        (F::TotalTax, money(metrics.total_tax)),
        (F::GrossPay, money(metrics.gross_pay)),
        (F::NetPay, money(metrics.net_pay)),
        (F::WageTaxShare, pct(metrics.shares.wage_tax)),
        (F::SolidaritySurchargeShare, pct(metrics.shares.solidarity_surcharge)),
        (F::ChurchTaxShare, pct(metrics.shares.church_tax)),
        (F::TotalTaxShare, pct(metrics.shares.total_tax)),
        (F::NetPayShare, pct(metrics.shares.net_pay)),
        (F::YearlyGrossPay, money(metrics.yearly.gross_pay)),
        (F::YearlyTotalTax, money(metrics.yearly.total_tax)),
        (F::YearlyNetPay, money(metrics.yearly.net_pay)),
        (F::EffectiveRate, pct(metrics.yearly.effective_rate)),
        (F::HealthInsurance, money(si.health)),
        (F::LongTermCare, money(si.long_term_care)),
        (F::PensionInsurance, money(si.pension)),
        (F::UnemploymentInsurance, money(si.unemployment)),
        (F::SocialInsuranceTotal, money(si.total())),
        (F::TaxClassLabel, request.tax_class_label()),
        (F::BillingPeriodLabel, request.billing_period_label()),
        (F::ChurchTaxLabel, request.church_tax_label()),
        (F::HealthInsuranceLabel, request.health_insurance_label()),
    ];

    RenderedView {
        fields,
        chart: chart(metrics),
    }
}

/// Chart of the four components, each spanning its share of the drawn total.
///
/// Zero and negative amounts are left out. The drawn total equals gross pay
/// unless net pay is negative, in which case the taxes alone fill the circle.
/// With a zero gross the chart is empty.
pub fn chart(metrics: &DerivedMetrics) -> ChartDescription {
    if !metrics.gross_pay.is_positive() {
        return ChartDescription::default();
    }

    let parts: Vec<_> = [
        (SegmentKind::WageTax, metrics.wage_tax),
        (SegmentKind::SolidaritySurcharge, metrics.solidarity_surcharge),
        (SegmentKind::ChurchTax, metrics.church_tax),
        (SegmentKind::NetPay, metrics.net_pay),
    ]
    .into_iter()
    .filter(|(_, amount)| amount.is_positive())
    .collect();
    let whole: f64 = parts.iter().map(|(_, amount)| amount.as_f64()).sum();

    let mut angle = -FRAC_PI_2;
    let segments = parts
        .into_iter()
        .map(|(kind, amount)| {
            let start_angle = angle;
            angle += TAU * amount.as_f64() / whole;
            ChartSegment {
                kind,
                amount,
                start_angle,
                end_angle: angle,
            }
        })
        .collect();

    ChartDescription { segments }
}

/// One row of the scenario comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub gross_pay: String,
    pub wage_tax: String,
    pub solidarity_surcharge: String,
    pub church_tax: String,
    pub net_pay: String,
}

impl ComparisonRow {
    pub const HEADERS: [&'static str; 6] = [
        "Berechnung",
        "Brutto",
        "Lohnsteuer",
        "Solidaritätszuschlag",
        "Kirchensteuer",
        "Netto",
    ];

    pub fn cells(&self) -> [&str; 6] {
        [
            &self.name,
            &self.gross_pay,
            &self.wage_tax,
            &self.solidarity_surcharge,
            &self.church_tax,
            &self.net_pay,
        ]
    }
}

pub fn comparison_rows(entries: &[HistoryEntry]) -> Vec<ComparisonRow> {
    entries
        .iter()
        .map(|entry| {
            let metrics = derive_metrics(&entry.request, &entry.result);
            ComparisonRow {
                name: entry.name.clone(),
                gross_pay: to_display_string(metrics.gross_pay),
                wage_tax: to_display_string(metrics.wage_tax),
                solidarity_surcharge: to_display_string(metrics.solidarity_surcharge),
                church_tax: to_display_string(metrics.church_tax),
                net_pay: to_display_string(metrics.net_pay),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::CalculationResult;

    const EPSILON: f64 = 1e-9;

    fn metrics(
        gross: i64,
        wage_tax: i64,
        soli: i64,
        church: i64,
    ) -> (CalculationRequest, DerivedMetrics) {
        let request = CalculationRequest {
            gross_pay: Cents(gross),
            tax_class: 1,
            billing_period: 2,
            ..Default::default()
        };
        let result = CalculationResult {
            wage_tax: Cents(wage_tax),
            solidarity_surcharge: Cents(soli),
            church_tax: Cents(church),
            ..Default::default()
        };
        let metrics = derive_metrics(&request, &result);
        (request, metrics)
    }

    #[test]
    fn every_display_field_is_rendered_once() {
        let (request, metrics) = metrics(350000, 45000, 0, 0);

        let view = render(&request, &metrics);

        let rendered: Vec<_> = view.fields.iter().map(|(f, _)| *f).collect();
        assert_eq!(rendered, DisplayField::ALL.to_vec());
    }

    #[test]
    fn reference_scenario_strings() {
        let (request, metrics) = metrics(350000, 45000, 0, 0);

        let view = render(&request, &metrics);

        assert_eq!(view.get(DisplayField::WageTax), Some("450.00 €"));
        assert_eq!(view.get(DisplayField::TotalTax), Some("450.00 €"));
        assert_eq!(view.get(DisplayField::NetPay), Some("3050.00 €"));
        assert_eq!(view.get(DisplayField::WageTaxShare), Some("12.9 %"));
        assert_eq!(view.get(DisplayField::NetPayShare), Some("87.1 %"));
        assert_eq!(view.get(DisplayField::YearlyTotalTax), Some("5400.00 €"));
        assert_eq!(view.get(DisplayField::YearlyNetPay), Some("36600.00 €"));
        assert_eq!(view.get(DisplayField::EffectiveRate), Some("12.9 %"));
        assert_eq!(view.get(DisplayField::HealthInsurance), Some("255.50 €"));
        assert_eq!(view.get(DisplayField::TaxClassLabel), Some("I (ledig)"));
        assert_eq!(view.get(DisplayField::BillingPeriodLabel), Some("Monat"));
    }

    #[test]
    fn display_ids_match_service_keys() {
        assert_eq!(DisplayField::WageTax.id(), "LSTLZZ");
        assert_eq!(DisplayField::SolidaritySurcharge.id(), "SOLZLZZ");
        assert_eq!(DisplayField::ChurchTax.id(), "BK");
        assert_eq!(DisplayField::TotalTax.to_string(), "TOTAL");
    }

    #[test]
    fn chart_starts_at_top_and_closes_the_circle() {
        let (_, metrics) = metrics(350000, 40000, 2200, 3600);

        let chart = chart(&metrics);

        assert_eq!(chart.segments.len(), 4);
        assert!((chart.segments[0].start_angle + FRAC_PI_2).abs() < EPSILON);
        for pair in chart.segments.windows(2) {
            assert!((pair[0].end_angle - pair[1].start_angle).abs() < EPSILON);
        }
        let total: f64 = chart.segments.iter().map(ChartSegment::sweep).sum();
        assert!((total - TAU).abs() < EPSILON);
    }

    #[test]
    fn chart_sweep_is_proportional_to_share() {
        let (_, metrics) = metrics(350000, 45000, 0, 0);

        let chart = chart(&metrics);

        assert_eq!(chart.segments[0].kind, SegmentKind::WageTax);
        assert!((chart.segments[0].sweep() - TAU * 45000.0 / 350000.0).abs() < EPSILON);
    }

    #[test]
    fn zero_segments_are_omitted() {
        let (_, metrics) = metrics(350000, 45000, 0, 0);

        let kinds: Vec<_> = chart(&metrics).segments.iter().map(|s| s.kind).collect();

        assert_eq!(kinds, vec![SegmentKind::WageTax, SegmentKind::NetPay]);
    }

    #[test]
    fn zero_gross_has_empty_chart_and_zero_percentages() {
        let (request, metrics) = metrics(0, 0, 0, 0);

        let view = render(&request, &metrics);

        assert!(view.chart.segments.is_empty());
        assert_eq!(view.get(DisplayField::NetPayShare), Some("0.0 %"));
        assert_eq!(view.get(DisplayField::EffectiveRate), Some("0.0 %"));
    }

    #[test]
    fn negative_net_is_left_out_of_the_chart() {
        let (_, metrics) = metrics(10000, 9000, 500, 1500);

        let kinds: Vec<_> = chart(&metrics).segments.iter().map(|s| s.kind).collect();

        assert!(!kinds.contains(&SegmentKind::NetPay));
    }

    #[test]
    fn negative_net_chart_still_spans_one_revolution() {
        let (_, metrics) = metrics(10000, 9000, 500, 1500);

        let chart = chart(&metrics);
        let total: f64 = chart.segments.iter().map(ChartSegment::sweep).sum();

        assert!((total - TAU).abs() < EPSILON);
        assert!((chart.segments[0].sweep() - TAU * 9000.0 / 11000.0).abs() < EPSILON);
        assert!((chart.segments[2].end_angle - (TAU - FRAC_PI_2)).abs() < EPSILON);
    }

    #[test]
    fn comparison_rows_follow_entry_order() {
        let (request, _) = metrics(350000, 45000, 0, 0);
        let first = HistoryEntry::new(
            request.clone(),
            CalculationResult {
                wage_tax: Cents(45000),
                ..Default::default()
            },
        );
        let second = HistoryEntry::new(
            CalculationRequest {
                gross_pay: Cents(100000),
                ..request
            },
            CalculationResult::default(),
        );

        let rows = comparison_rows(&[first.clone(), second]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, first.name);
        assert_eq!(rows[0].net_pay, "3050.00 €");
        assert_eq!(rows[1].gross_pay, "1000.00 €");
        assert_eq!(rows[1].cells()[5], "1000.00 €");
    }
}
