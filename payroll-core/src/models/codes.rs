//! Integer-coded selectors of the calculation request.
//!
//! The request keeps the raw integer codes (the calculation service expects
//! them verbatim); these enums are the typed views used for projections and
//! labels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxClass {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl TaxClass {
    pub fn code(&self) -> i32 {
        match self {
            Self::I => 1,
            Self::II => 2,
            Self::III => 3,
            Self::IV => 4,
            Self::V => 5,
            Self::VI => 6,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::I),
            2 => Some(Self::II),
            3 => Some(Self::III),
            4 => Some(Self::IV),
            5 => Some(Self::V),
            6 => Some(Self::VI),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::I => "I (ledig)",
            Self::II => "II (alleinerziehend)",
            Self::III => "III (verheiratet, höheres Einkommen)",
            Self::IV => "IV (verheiratet, ähnliches Einkommen)",
            Self::V => "V (verheiratet, geringeres Einkommen)",
            Self::VI => "VI (Nebenjob)",
        }
    }
}

/// Billing period (`LZZ`): how often the gross amount recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingPeriod {
    Annual,
    Monthly,
    Weekly,
    Daily,
}

impl BillingPeriod {
    /// Multiplier used when the period code is unknown.
    pub const FALLBACK_MULTIPLIER: i64 = 12;

    pub fn code(&self) -> i32 {
        match self {
            Self::Annual => 1,
            Self::Monthly => 2,
            Self::Weekly => 3,
            Self::Daily => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Annual),
            2 => Some(Self::Monthly),
            3 => Some(Self::Weekly),
            4 => Some(Self::Daily),
            _ => None,
        }
    }

    /// Number of periods per year.
    pub fn yearly_multiplier(&self) -> i64 {
        match self {
            Self::Annual => 1,
            Self::Monthly => 12,
            Self::Weekly => 52,
            Self::Daily => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Annual => "Jahr",
            Self::Monthly => "Monat",
            Self::Weekly => "Woche",
            Self::Daily => "Tag",
        }
    }
}

/// Church-tax selector (`R`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurchTax {
    None,
    NinePercent,
    EightPercent,
}

impl ChurchTax {
    pub fn code(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::NinePercent => 1,
            Self::EightPercent => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::NinePercent),
            2 => Some(Self::EightPercent),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Keine",
            Self::NinePercent => "Evangelisch/Katholisch (9%)",
            Self::EightPercent => "Andere (8%)",
        }
    }
}

/// Health-insurance selector (`PKV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthInsurance {
    Statutory,
    PrivateWithoutSubsidy,
    PrivateWithSubsidy,
}

impl HealthInsurance {
    pub fn code(&self) -> i32 {
        match self {
            Self::Statutory => 0,
            Self::PrivateWithoutSubsidy => 1,
            Self::PrivateWithSubsidy => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Statutory),
            1 => Some(Self::PrivateWithoutSubsidy),
            2 => Some(Self::PrivateWithSubsidy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Statutory => "Gesetzlich",
            Self::PrivateWithoutSubsidy => "Privat ohne AG-Zuschuss",
            Self::PrivateWithSubsidy => "Privat mit AG-Zuschuss",
        }
    }
}
