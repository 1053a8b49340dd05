//! Database layer - gateway and repositories

pub mod gateway;
pub mod postgres;
pub mod properties;
pub mod reservations;
pub mod search;
pub mod users;

pub use gateway::{with_deadline, BindValue, Record, Statement, StoreGateway};
pub use postgres::PostgresGateway;
pub use properties::PropertyRepository;
pub use reservations::ReservationRepository;
pub use search::{PropertyFilters, PropertySearchQuery, ResultCap};
pub use users::UserRepository;
