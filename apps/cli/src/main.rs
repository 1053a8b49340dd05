//! LightBnB operator CLI
//!
//! Runs the data-access operations against the configured database and prints
//! the results as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use lightbnb_store::config::Config;
use lightbnb_store::db::{
    PostgresGateway, PropertyFilters, PropertyRepository, ReservationRepository, ResultCap,
    UserRepository,
};
use lightbnb_store::logging;
use lightbnb_store::models::{NewProperty, NewUser};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "lightbnb", version, about = "Query and seed the LightBnB database")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Give up on the statement after this many seconds
    #[arg(long, global = true)]
    timeout_seconds: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a user by email
    UserByEmail { email: String },

    /// Look up a user by id
    UserById { id: i32 },

    /// Register a user (password must already be hashed)
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// List a guest's reservations
    Reservations {
        guest_id: i32,
        #[arg(long, default_value = "10")]
        limit: NonZeroU32,
    },

    /// Search properties
    Search {
        #[arg(long)]
        owner_id: Option<i32>,
        #[arg(long)]
        city: Option<String>,
        /// Dollars per night
        #[arg(long)]
        minimum_price: Option<Decimal>,
        /// Dollars per night
        #[arg(long)]
        maximum_price: Option<Decimal>,
        #[arg(long)]
        minimum_rating: Option<f64>,
        #[arg(long, default_value = "10")]
        limit: NonZeroU32,
    },

    /// Create a property listing from a JSON file (cost_per_night in dollars)
    AddProperty {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if cli.json_logs {
        config.logging.json = true;
    }
    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let gateway = PostgresGateway::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let deadline = cli
        .timeout_seconds
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let output = run(cli.command, gateway.clone(), deadline).await;
    gateway.close().await;

    match output? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("null");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Execute one command. `None` means the requested record does not exist.
async fn run(
    command: Command,
    gateway: PostgresGateway,
    deadline: Option<Instant>,
) -> anyhow::Result<Option<JsonValue>> {
    let value = match command {
        Command::UserByEmail { email } => {
            let user = with_optional_deadline(UserRepository::new(gateway), deadline, |r, d| {
                r.with_deadline(d)
            })
            .get_user_with_email(&email)
            .await
            .context("Failed to look up user by email")?;
            user.map(serde_json::to_value).transpose()?
        }
        Command::UserById { id } => {
            let user = with_optional_deadline(UserRepository::new(gateway), deadline, |r, d| {
                r.with_deadline(d)
            })
            .get_user_with_id(id)
            .await
            .context("Failed to look up user by id")?;
            user.map(serde_json::to_value).transpose()?
        }
        Command::AddUser {
            name,
            email,
            password,
        } => {
            let user = with_optional_deadline(UserRepository::new(gateway), deadline, |r, d| {
                r.with_deadline(d)
            })
            .add_user(&NewUser {
                name,
                email,
                password,
            })
            .await
            .context("Failed to add user")?;
            Some(serde_json::to_value(user)?)
        }
        Command::Reservations { guest_id, limit } => {
            let reservations =
                with_optional_deadline(ReservationRepository::new(gateway), deadline, |r, d| {
                    r.with_deadline(d)
                })
                .get_all_reservations(guest_id, ResultCap::from(limit))
                .await
                .context("Failed to list reservations")?;
            Some(serde_json::to_value(reservations)?)
        }
        Command::Search {
            owner_id,
            city,
            minimum_price,
            maximum_price,
            minimum_rating,
            limit,
        } => {
            let filters = PropertyFilters {
                owner_id,
                city,
                minimum_price_per_night: minimum_price,
                maximum_price_per_night: maximum_price,
                minimum_rating,
            };
            if filters.minimum_price_per_night.is_some() != filters.maximum_price_per_night.is_some()
            {
                tracing::warn!("Price range needs both --minimum-price and --maximum-price; ignoring it");
            }
            let properties =
                with_optional_deadline(PropertyRepository::new(gateway), deadline, |r, d| {
                    r.with_deadline(d)
                })
                .get_all_properties(&filters, ResultCap::from(limit))
                .await
                .context("Failed to search properties")?;
            Some(serde_json::to_value(properties)?)
        }
        Command::AddProperty { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let listing: NewProperty = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid property JSON in {}", file.display()))?;
            let property =
                with_optional_deadline(PropertyRepository::new(gateway), deadline, |r, d| {
                    r.with_deadline(d)
                })
                .add_property(&listing)
                .await
                .context("Failed to add property")?;
            Some(serde_json::to_value(property)?)
        }
    };

    Ok(value)
}

fn with_optional_deadline<R>(repo: R, deadline: Option<Instant>, apply: fn(R, Instant) -> R) -> R {
    match deadline {
        Some(deadline) => apply(repo, deadline),
        None => repo,
    }
}
