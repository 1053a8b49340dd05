//! Property repository - filtered search and listing creation

use tokio::time::Instant;

use super::gateway::{decode_first, decode_records, Statement, StoreGateway};
use super::search::{PropertyFilters, PropertySearchQuery, ResultCap};
use crate::models::{NewProperty, Property, PropertyWithRating};
use crate::money::Cents;
use crate::Result;

#[derive(Debug, Clone)]
pub struct PropertyRepository<G> {
    gateway: G,
    deadline: Option<Instant>,
}

impl<G: StoreGateway> PropertyRepository<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Search properties.
    ///
    /// With `owner_id` set, returns that owner's properties unaggregated
    /// (`average_rating` is `None`) and ignores the other filters. Otherwise
    /// returns reviewed properties with their average rating, cheapest first.
    pub async fn get_all_properties(
        &self,
        filters: &PropertyFilters,
        cap: ResultCap,
    ) -> Result<Vec<PropertyWithRating>> {
        let query = PropertySearchQuery::new(filters, cap);
        let statement = query.build_sql();

        tracing::debug!(
            owner_listing = query.is_owner_listing(),
            binds = statement.binds.len(),
            cap = cap.get(),
            "Searching properties"
        );

        let records = self.gateway.execute(&statement, self.deadline).await?;
        decode_records(records)
    }

    /// Insert a listing and return the stored row. The nightly cost is stored in cents.
    pub async fn add_property(&self, property: &NewProperty) -> Result<Property> {
        let statement = Statement::new(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, street, city, province, post_code, country,
                parking_spaces, number_of_bathrooms, number_of_bedrooms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(property.title.as_str())
        .bind(property.description.as_str())
        .bind(property.thumbnail_photo_url.as_str())
        .bind(property.cover_photo_url.as_str())
        .bind(Cents::from_major(property.cost_per_night))
        .bind(property.street.as_str())
        .bind(property.city.as_str())
        .bind(property.province.as_str())
        .bind(property.post_code.as_str())
        .bind(property.country.as_str())
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms);

        let records = self.gateway.execute(&statement, self.deadline).await?;
        let created: Option<Property> = decode_first(records)?;
        let created =
            created.ok_or_else(|| crate::Error::Internal("insert returned no row".to_string()))?;

        tracing::debug!(
            property_id = created.id,
            owner_id = created.owner_id,
            "Property created"
        );
        Ok(created)
    }
}
