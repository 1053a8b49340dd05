//! SQL construction for property searches.
//!
//! Two shapes:
//! - Owner listing: plain `properties` rows for one owner, no rating aggregation.
//! - Filtered search: properties joined to their reviews, grouped per property
//!   with the average rating, optionally narrowed by city, price range and
//!   minimum rating.
//!
//! Placeholders are numbered from the bind list as values are pushed, so the
//! n-th bind always matches `$n`.

use super::{PropertyFilters, ResultCap};
use crate::db::gateway::Statement;
use crate::money::Cents;

const OWNER_LISTING_SQL: &str = "SELECT * FROM properties WHERE owner_id = $1 LIMIT $2";

const RATED_PROPERTIES_SQL: &str = "SELECT properties.*, avg(property_reviews.rating) AS average_rating \
     FROM properties \
     JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Query builder for property searches.
#[derive(Debug, Clone)]
pub struct PropertySearchQuery<'a> {
    filters: &'a PropertyFilters,
    cap: ResultCap,
}

impl<'a> PropertySearchQuery<'a> {
    pub fn new(filters: &'a PropertyFilters, cap: ResultCap) -> Self {
        Self { filters, cap }
    }

    /// True when the owner filter takes precedence over every other filter.
    pub fn is_owner_listing(&self) -> bool {
        self.filters.owner_id.is_some()
    }

    pub fn build_sql(&self) -> Statement {
        match self.filters.owner_id {
            Some(owner_id) => Statement::new(OWNER_LISTING_SQL)
                .bind(owner_id)
                .bind(self.cap.get()),
            None => self.build_filtered_sql(),
        }
    }

    fn build_filtered_sql(&self) -> Statement {
        let mut statement = Statement::new(RATED_PROPERTIES_SQL);

        let predicates = self.push_predicates(&mut statement);
        if !predicates.is_empty() {
            statement.push_sql(" WHERE ");
            statement.push_sql(&predicates.join(" AND "));
        }

        statement.push_sql(" GROUP BY properties.id");

        if let Some(rating) = self.filters.minimum_rating {
            let idx = statement.push_bind(rating);
            statement.push_sql(&format!(
                " HAVING avg(property_reviews.rating) >= ${}",
                idx
            ));
        }

        let idx = statement.push_bind(self.cap.get());
        statement.push_sql(&format!(
            " ORDER BY properties.cost_per_night ASC LIMIT ${}",
            idx
        ));

        statement
    }

    /// Push binds for the row-level predicates and return their SQL fragments in order.
    fn push_predicates(&self, statement: &mut Statement) -> Vec<String> {
        let mut predicates = Vec::new();

        if let Some(city) = self.filters.city_pattern_source() {
            let idx = statement.push_bind(format!("%{}%", city));
            predicates.push(format!("properties.city LIKE ${}", idx));
        }

        if let Some((minimum, maximum)) = self.filters.price_range() {
            let min_idx = statement.push_bind(Cents::from_major(minimum));
            let max_idx = statement.push_bind(Cents::from_major(maximum));
            predicates.push(format!(
                "properties.cost_per_night BETWEEN ${} AND ${}",
                min_idx, max_idx
            ));
        }

        predicates
    }
}
