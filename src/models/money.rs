//! This file defines the `Amount` type used for all monetary values.
//!
//! Amounts are stored as integer cents so that summing an arbitrary number of
//! transactions never accumulates floating point error. On the wire an amount
//! is a plain JSON number with at most 2 decimal places.

use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, Sub};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// Largest magnitude accepted from the wire, in whole currency units.
///
/// Staying well below `i64::MAX / 100` cents keeps every realistic lifetime
/// sum of transactions free of overflow.
const MAX_MAJOR_UNITS: f64 = 10_000_000_000_000.0;

/// A monetary value with 2 decimal places, stored as a count of cents.
///
/// The sign of an amount is independent of the direction of the money flow:
/// transaction amounts are always non-negative magnitudes, while a derived
/// balance may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a count of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from a number of whole currency units, e.g. `12.34`.
    ///
    /// The value is rounded to the nearest cent.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `value` is not a finite number or is
    /// too large to represent in cents.
    pub fn from_major_units(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(format!(
                "{value} is not a finite number"
            )));
        }

        if value.abs() > MAX_MAJOR_UNITS {
            return Err(Error::InvalidAmount(format!("{value} is too large")));
        }

        Ok(Self((value * 100.0).round() as i64))
    }

    /// The amount as a count of cents.
    pub fn as_cents(&self) -> i64 {
        self.0
    }

    /// The amount as a number of whole currency units.
    ///
    /// Exact for any amount within the wire range, since 2 decimal place
    /// values of this size are representable in an `f64`.
    pub fn as_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Add two amounts.
    ///
    /// # Panics
    /// Panics on overflow: a sum that exceeds the range of `i64` cents is a
    /// programmer error and must not silently wrap into a wrong balance.
    fn add(self, rhs: Amount) -> Amount {
        Amount(
            self.0
                .checked_add(rhs.0)
                .expect("amount addition overflowed"),
        )
    }
}

impl Sub for Amount {
    type Output = Amount;

    /// Subtract an amount.
    ///
    /// # Panics
    /// Panics on overflow, see [Amount::add].
    fn sub(self, rhs: Amount) -> Amount {
        Amount(
            self.0
                .checked_sub(rhs.0)
                .expect("amount subtraction overflowed"),
        )
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_major_units())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;

        Amount::from_major_units(value).map_err(|error| serde::de::Error::custom(error.to_string()))
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}

#[cfg(test)]
mod amount_tests {
    use super::Amount;

    #[test]
    fn from_major_units_rounds_to_nearest_cent() {
        assert_eq!(Amount::from_major_units(12.34).unwrap().as_cents(), 1234);
        assert_eq!(Amount::from_major_units(0.005).unwrap().as_cents(), 1);
        assert_eq!(Amount::from_major_units(-50.0).unwrap().as_cents(), -5000);
    }

    #[test]
    fn from_major_units_rejects_non_finite_values() {
        assert!(Amount::from_major_units(f64::NAN).is_err());
        assert!(Amount::from_major_units(f64::INFINITY).is_err());
    }

    #[test]
    fn repeated_addition_is_exact() {
        let cent = Amount::from_major_units(0.01).unwrap();

        let total = (0..1000).fold(Amount::ZERO, |acc, _| acc + cent);

        assert_eq!(total, Amount::from_cents(1000));
        assert_eq!(total.to_string(), "10.00");
    }

    #[test]
    fn display_pads_cents() {
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(-1234).to_string(), "-12.34");
    }

    #[test]
    fn serializes_as_plain_number() {
        let serialized = serde_json::to_string(&Amount::from_cents(1234)).unwrap();

        assert_eq!(serialized, "12.34");
    }

    #[test]
    fn deserializes_from_plain_number() {
        let amount: Amount = serde_json::from_str("50.00").unwrap();

        assert_eq!(amount, Amount::from_cents(5000));
    }

    #[test]
    fn deserialize_rejects_strings() {
        assert!(serde_json::from_str::<Amount>("\"12.34\"").is_err());
    }
}
