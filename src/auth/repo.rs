use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::claims::Role;

const USER_COLUMNS: &str = "id, email, name, role, password_hash, email_verified, \
     verification_code, reset_code, reset_code_expires_at, profile_picture, \
     business_name, business_phone, business_address, created_at";

/// User record in the database. Secrets and pending codes never serialize.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub reset_code: Option<String>,
    #[serde(skip_serializing)]
    pub reset_code_expires_at: Option<OffsetDateTime>,
    pub profile_picture: Option<String>,
    pub business_name: Option<String>,
    pub business_phone: Option<String>,
    pub business_address: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Insert a new unverified user. The unique index on `email` makes a
    /// duplicate registration fail here with a unique violation.
    pub async fn create(
        db: &PgPool,
        email: &str,
        name: &str,
        role: Role,
        password_hash: &str,
        verification_code: &str,
    ) -> sqlx::Result<User> {
        let sql = format!(
            "INSERT INTO users (email, name, role, password_hash, verification_code) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(name)
            .bind(role)
            .bind(password_hash)
            .bind(verification_code)
            .fetch_one(db)
            .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Successful verification clears the pending code in the same statement.
    pub async fn mark_verified(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET email_verified = TRUE, verification_code = NULL WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_verification_code(db: &PgPool, id: Uuid, code: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET verification_code = $2 WHERE id = $1")
            .bind(id)
            .bind(code)
            .execute(db)
            .await?;
        Ok(())
    }

    /// A new reset request overwrites any pending code and its expiry.
    pub async fn set_reset_code(
        db: &PgPool,
        id: Uuid,
        code: &str,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET reset_code = $2, reset_code_expires_at = $3 WHERE id = $1")
            .bind(id)
            .bind(code)
            .bind(expires_at)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Replaces the password hash and clears the reset fields together.
    pub async fn update_password(db: &PgPool, id: Uuid, password_hash: &str) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, reset_code = NULL, reset_code_expires_at = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn set_profile_picture(db: &PgPool, id: Uuid, data_url: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET profile_picture = $2 WHERE id = $1")
            .bind(id)
            .bind(data_url)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&sql).fetch_all(db).await
    }
}
