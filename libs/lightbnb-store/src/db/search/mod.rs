//! Property search - filter bag, result cap and statement construction

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

mod query_builder;

pub use query_builder::PropertySearchQuery;

/// Optional constraints for a property search. `None` means "no constraint".
///
/// Precedence rules:
/// - `owner_id` short-circuits every other filter.
/// - The price range applies only when both bounds are present; a lone bound is dropped.
/// - An empty or whitespace-only `city` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyFilters {
    pub owner_id: Option<i32>,
    pub city: Option<String>,
    /// Major currency units.
    #[serde(alias = "minimum_price")]
    pub minimum_price_per_night: Option<Decimal>,
    /// Major currency units.
    #[serde(alias = "maximum_price")]
    pub maximum_price_per_night: Option<Decimal>,
    pub minimum_rating: Option<f64>,
}

impl PropertyFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_minimum_price(mut self, price: Decimal) -> Self {
        self.minimum_price_per_night = Some(price);
        self
    }

    pub fn with_maximum_price(mut self, price: Decimal) -> Self {
        self.maximum_price_per_night = Some(price);
        self
    }

    pub fn with_price_range(self, minimum: Decimal, maximum: Decimal) -> Self {
        self.with_minimum_price(minimum).with_maximum_price(maximum)
    }

    pub fn with_minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// City to match as given, unless it is missing or blank.
    pub(crate) fn city_pattern_source(&self) -> Option<&str> {
        self.city
            .as_deref()
            .filter(|city| !city.trim().is_empty())
    }

    /// Both price bounds, or nothing.
    pub(crate) fn price_range(&self) -> Option<(Decimal, Decimal)> {
        match (self.minimum_price_per_night, self.maximum_price_per_night) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Maximum number of rows a listing or search returns. Defaults to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResultCap(NonZeroU32);

impl ResultCap {
    pub const DEFAULT: ResultCap = match NonZeroU32::new(10) {
        Some(n) => ResultCap(n),
        None => unreachable!(),
    };

    /// `None` for zero.
    pub fn new(limit: u32) -> Option<Self> {
        NonZeroU32::new(limit).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for ResultCap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<NonZeroU32> for ResultCap {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}
