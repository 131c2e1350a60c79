use async_trait::async_trait;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User, UserChanges};
use crate::db::{is_unique_violation, PgStore};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("email already in use")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for WriteError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation(&e) {
            WriteError::DuplicateEmail
        } else {
            WriteError::Other(e.into())
        }
    }
}

/// Credential store consumed by the auth service.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: &NewUser) -> Result<User, WriteError>;
    /// Returns `None` when no user has this id.
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, WriteError>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, id_country
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, id_country
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> Result<User, WriteError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, id_country)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, id_country
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.id_country)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, WriteError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET username      = COALESCE($1, username),
                   email         = COALESCE($2, email),
                   password_hash = COALESCE($3, password_hash),
                   id_country    = COALESCE($4, id_country)
             WHERE id = $5
            RETURNING id, username, email, password_hash, id_country
            "#,
        )
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.id_country)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
