//! User repository - lookups and registration

use tokio::time::Instant;

use super::gateway::{decode_first, Statement, StoreGateway};
use crate::models::{NewUser, User};
use crate::Result;

/// Repository for `users` table operations
#[derive(Debug, Clone)]
pub struct UserRepository<G> {
    gateway: G,
    deadline: Option<Instant>,
}

impl<G: StoreGateway> UserRepository<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            deadline: None,
        }
    }

    /// Fail calls still running at `deadline` with `Error::Timeout`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Get a single user by email. `None` when no user has that email.
    pub async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        let statement = Statement::new(
            r#"
            SELECT *
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email);

        let records = self.gateway.execute(&statement, self.deadline).await?;
        decode_first(records)
    }

    /// Get a single user by id. `None` when the id is unknown.
    pub async fn get_user_with_id(&self, id: i32) -> Result<Option<User>> {
        let statement = Statement::new(
            r#"
            SELECT *
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id);

        let records = self.gateway.execute(&statement, self.deadline).await?;
        decode_first(records)
    }

    /// Insert a user and return it with its generated id.
    pub async fn add_user(&self, user: &NewUser) -> Result<User> {
        let statement = Statement::new(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_str());

        let records = self.gateway.execute(&statement, self.deadline).await?;
        let created: Option<User> = decode_first(records)?;
        let created =
            created.ok_or_else(|| crate::Error::Internal("insert returned no row".to_string()))?;

        tracing::debug!(user_id = created.id, "User created");
        Ok(created)
    }
}
