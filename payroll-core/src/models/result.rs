use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::cents::Cents;
use crate::calculations::money::parse_cents;

/// Figures returned by the calculation service, all in cents.
///
/// The service may send numbers or numeric strings. Anything missing or
/// unparseable deserializes as zero so a partial response still renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(rename = "LSTLZZ", default, deserialize_with = "lenient_cents")]
    pub wage_tax: Cents,
    #[serde(rename = "SOLZLZZ", default, deserialize_with = "lenient_cents")]
    pub solidarity_surcharge: Cents,
    #[serde(rename = "BK", default, deserialize_with = "lenient_cents")]
    pub church_tax: Cents,

    // Secondary figures for other payments and insurance deductions
    #[serde(rename = "BKS", default, deserialize_with = "lenient_cents")]
    pub church_tax_other: Cents,
    #[serde(rename = "SOLZS", default, deserialize_with = "lenient_cents")]
    pub solidarity_surcharge_other: Cents,
    #[serde(rename = "STS", default, deserialize_with = "lenient_cents")]
    pub wage_tax_other: Cents,
    #[serde(rename = "VKVLZZ", default, deserialize_with = "lenient_cents")]
    pub insurance_deduction: Cents,
    #[serde(rename = "VKVSONST", default, deserialize_with = "lenient_cents")]
    pub insurance_deduction_other: Cents,
}

impl CalculationResult {
    /// The three tax components deducted from the gross pay.
    pub fn components(&self) -> [Cents; 3] {
        [self.wage_tax, self.solidarity_surcharge, self.church_tax]
    }

    pub fn total_tax(&self) -> Cents {
        self.components().into_iter().sum()
    }
}

fn lenient_cents<'de, D>(deserializer: D) -> Result<Cents, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientCentsVisitor)
}

struct LenientCentsVisitor;

impl<'de> Visitor<'de> for LenientCentsVisitor {
    type Value = Cents;

    fn expecting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("an amount in cents as number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cents, E> {
        Ok(Cents(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cents, E> {
        Ok(Cents(i64::try_from(v).unwrap_or(0)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cents, E> {
        if v.is_finite() {
            Ok(Cents(v.round() as i64))
        } else {
            Ok(Cents::ZERO)
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Cents, E> {
        Ok(parse_cents(v).unwrap_or_else(|| {
            tracing::warn!(value = %v, "non-numeric amount in service response, using 0");
            Cents::ZERO
        }))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Cents, E> {
        Ok(Cents::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Cents, E> {
        Ok(Cents::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Cents, E> {
        Ok(Cents::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Cents, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Cents, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Cents::ZERO)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Cents, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Cents::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let result: CalculationResult = serde_json::from_str(
            r#"{"LSTLZZ": "45000", "SOLZLZZ": 0, "BK": "3600.00", "VKVLZZ": 41234.0}"#,
        )
        .unwrap();

        assert_eq!(result.wage_tax, Cents(45000));
        assert_eq!(result.solidarity_surcharge, Cents(0));
        assert_eq!(result.church_tax, Cents(3600));
        assert_eq!(result.insurance_deduction, Cents(41234));
    }

    #[test]
    fn missing_and_garbage_fields_are_zero() {
        let result: CalculationResult =
            serde_json::from_str(r#"{"LSTLZZ": "n/a", "BK": null, "SOLZLZZ": {"x": 1}}"#).unwrap();

        assert_eq!(result, CalculationResult::default());
    }

    #[test]
    fn total_tax_sums_the_three_components() {
        let result = CalculationResult {
            wage_tax: Cents(45000),
            solidarity_surcharge: Cents(1200),
            church_tax: Cents(3600),
            wage_tax_other: Cents(999),
            ..Default::default()
        };

        assert_eq!(result.total_tax(), Cents(49800));
    }
}
