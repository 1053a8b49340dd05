use anyhow::Context as _;
use lightbnb_store::db::{PropertyRepository, UserRepository};
use lightbnb_store::models::User;

use super::builders::{new_user, PropertyBuilder};
use super::TestDb;

pub struct Catalogue {
    pub owner: User,
    pub second_owner: User,
    pub guest: User,
    /// Property ids in insertion order (see `seed_catalogue`).
    pub property_ids: Vec<i32>,
}

/// City, nightly cost (dollars), review ratings.
const LISTINGS: [(&str, i64, &[i16]); 8] = [
    ("Toronto", 120, &[4, 5]),
    ("Toronto", 80, &[3, 3]),
    ("Toronto", 60, &[1, 2]),
    ("Vancouver", 150, &[5]),
    ("North Vancouver", 90, &[4, 2]),
    ("Calgary", 200, &[4]),
    ("Montreal", 300, &[2]),
    ("Ottawa", 45, &[5, 4]),
];

/// Eight reviewed properties: three in Toronto, two of which average 3 or more.
/// The first four belong to `owner`, the rest to `second_owner`.
pub async fn seed_catalogue(db: &TestDb) -> anyhow::Result<Catalogue> {
    let users = UserRepository::new(db.gateway.clone());
    let properties = PropertyRepository::new(db.gateway.clone());

    let owner = users.add_user(&new_user("Owner One", "owner1@example.com")).await?;
    let second_owner = users
        .add_user(&new_user("Owner Two", "owner2@example.com"))
        .await?;
    let guest = users.add_user(&new_user("Guest", "guest@example.com")).await?;

    let mut property_ids = Vec::new();
    for (i, (city, cost, ratings)) in LISTINGS.iter().enumerate() {
        let owner_id = if i < 4 { owner.id } else { second_owner.id };
        let created = properties
            .add_property(
                &PropertyBuilder::new(owner_id)
                    .title(format!("Listing {}", i + 1))
                    .city(*city)
                    .cost(*cost)
                    .build(),
            )
            .await?;

        for rating in ratings.iter() {
            add_review(db, created.id, guest.id, *rating).await?;
        }
        property_ids.push(created.id);
    }

    Ok(Catalogue {
        owner,
        second_owner,
        guest,
        property_ids,
    })
}

pub async fn add_review(
    db: &TestDb,
    property_id: i32,
    guest_id: i32,
    rating: i16,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO property_reviews (guest_id, property_id, rating) VALUES ($1, $2, $3)")
        .bind(guest_id)
        .bind(property_id)
        .bind(rating)
        .execute(db.gateway.pool())
        .await
        .context("insert property review")?;
    Ok(())
}

pub async fn add_reservation(
    db: &TestDb,
    property_id: i32,
    guest_id: i32,
    start_date: &str,
    end_date: &str,
) -> anyhow::Result<i32> {
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id) \
         VALUES ($1::date, $2::date, $3, $4) RETURNING id",
    )
    .bind(start_date)
    .bind(end_date)
    .bind(property_id)
    .bind(guest_id)
    .fetch_one(db.gateway.pool())
    .await
    .context("insert reservation")?;
    Ok(id)
}
