//! LightBnB data-access layer
//!
//! Users, reservations and property listings backed by PostgreSQL:
//! - Lookup and registration of users
//! - A guest's reservations joined with their properties
//! - Filtered property search with average review ratings
//! - Creation of property listings
//!
//! Every repository talks to the database through a [`db::StoreGateway`], so
//! the pool is injected at construction and can be replaced in tests.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod money;

pub use config::Config;
pub use error::{Error, Result};
pub use money::Cents;
