//! Amount type for cash-in / cash-out values
//!
//! Amounts are IEEE double precision values. Equality is exact, so two
//! amounts that print the same but were produced by different arithmetic
//! (`0.1 + 0.2` vs `0.3`) do not compare equal. The amount filter inherits
//! this behaviour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Self = Self(0.0);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Parse an amount, returning `None` for anything that is not a finite
    /// decimal number. Surrounding whitespace is ignored (`"12.00"`, `" -3"`,
    /// `"1e3"` parse; `"abc"`, `""`, `"NaN"` do not).
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(Self)
    }

    /// Parse an amount, falling back to zero
    pub fn parse_or_zero(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::ZERO)
    }

    /// Format with two decimals for on-screen display
    pub fn format_fixed(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Amount {
    /// Shortest round-trip form, always with a fraction digit (`0.0`, `4.5`,
    /// `100.0`). Magnitudes below 1e-3 or from 1e7 up use scientific
    /// notation (`1.0E7`, `2.5E-4`), which spreadsheet exports also produce.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        if !self.0.is_finite() || magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
            let text = self.0.to_string();
            if self.0.is_finite() && !text.contains('.') {
                return write!(f, "{}.0", text);
            }
            return f.write_str(&text);
        }

        let text = format!("{:e}", self.0);
        let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
        if mantissa.contains('.') {
            write!(f, "{}E{}", mantissa, exponent)
        } else {
            write!(f, "{}.0E{}", mantissa, exponent)
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + *a)
    }
}
