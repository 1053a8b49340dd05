//! Reservation repository

use tokio::time::Instant;

use super::gateway::{decode_records, Statement, StoreGateway};
use super::search::ResultCap;
use crate::models::Reservation;
use crate::Result;

#[derive(Debug, Clone)]
pub struct ReservationRepository<G> {
    gateway: G,
    deadline: Option<Instant>,
}

impl<G: StoreGateway> ReservationRepository<G> {
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

    /// Reservations made by `guest_id`, each joined with its property, at most `cap` rows.
    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        cap: ResultCap,
    ) -> Result<Vec<Reservation>> {
        let statement = Statement::new(
            r#"
            SELECT
                reservations.id AS reservation_id,
                reservations.guest_id,
                reservations.start_date,
                reservations.end_date,
                properties.*
            FROM reservations
            JOIN properties ON properties.id = reservations.property_id
            WHERE reservations.guest_id = $1
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(cap.get());

        let records = self.gateway.execute(&statement, self.deadline).await?;
        decode_records(records)
    }
}
