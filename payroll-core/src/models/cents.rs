use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A monetary amount in minor units (1/100 of a euro).
///
/// Requests only ever carry non-negative amounts; derived figures such as net
/// pay may go negative when the taxes exceed the gross amount.
///
/// Arithmetic saturates at the `i64` bounds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Lossy conversion for percentage and angle arithmetic.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Share of `self` in `whole` as a percentage, `0.0` when `whole` is zero.
    pub fn percent_of(self, whole: Cents) -> f64 {
        if whole.is_zero() {
            0.0
        } else {
            100.0 * self.as_f64() / whole.as_f64()
        }
    }
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Cents {
    type Output = Cents;

    fn mul(self, rhs: i64) -> Cents {
        Cents(self.0.saturating_mul(rhs))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl fmt::Display for Cents {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&crate::calculations::money::to_display_string(*self))
    }
}
