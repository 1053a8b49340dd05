//! Money in minor currency units
//!
//! Prices cross the public interface in major units (dollars) and are stored in
//! minor units (cents). `Cents::from_major` and `Cents::to_major` are the only
//! places the factor of 100 appears.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// An amount of money in minor units, as persisted in `properties.cost_per_night`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Convert a major-unit amount, rounding half away from zero to the nearest cent.
    ///
    /// Amounts beyond the `i64` range saturate; the store rejects them as out of range.
    pub fn from_major(major: Decimal) -> Self {
        let minor = (major * Decimal::from(MINOR_UNITS_PER_MAJOR))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let value = minor.to_i64().unwrap_or(if minor.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        Self(value)
    }

    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }
}

impl From<Cents> for i64 {
    fn from(value: Cents) -> Self {
        value.0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major())
    }
}
