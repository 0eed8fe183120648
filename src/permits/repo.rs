use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "permit_status", rename_all = "snake_case")]
pub enum PermitStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

const PERMIT_COLUMNS: &str = "id, user_id, user_name, user_email, permit_type, full_name, \
     passport_number, nationality, trek_area, start_date, end_date, status, admin_note, \
     document_data, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub permit_type: String,
    pub full_name: String,
    pub passport_number: String,
    pub nationality: String,
    pub trek_area: String,
    pub start_date: String,
    pub end_date: String,
    pub status: PermitStatus,
    pub admin_note: Option<String>,
    // Base64 passport photo; only returned from the admin detail endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_data: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermitType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: OffsetDateTime,
}

impl Permit {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        user_name: &str,
        user_email: &str,
        permit_type: &str,
        full_name: &str,
        passport_number: &str,
        nationality: &str,
        trek_area: &str,
        start_date: &str,
        end_date: &str,
        document_data: Option<&str>,
    ) -> sqlx::Result<Permit> {
        let sql = format!(
            "INSERT INTO permits (user_id, user_name, user_email, permit_type, full_name, \
             passport_number, nationality, trek_area, start_date, end_date, status, document_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', $11) \
             RETURNING {PERMIT_COLUMNS}"
        );
        sqlx::query_as::<_, Permit>(&sql)
            .bind(user_id)
            .bind(user_name)
            .bind(user_email)
            .bind(permit_type)
            .bind(full_name)
            .bind(passport_number)
            .bind(nationality)
            .bind(trek_area)
            .bind(start_date)
            .bind(end_date)
            .bind(document_data)
            .fetch_one(db)
            .await
    }

    /// User-facing listing omits the document payload.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Permit>> {
        let sql = format!(
            "SELECT id, user_id, user_name, user_email, permit_type, full_name, \
             passport_number, nationality, trek_area, start_date, end_date, status, admin_note, \
             NULL AS document_data, created_at, updated_at \
             FROM permits WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Permit>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_for_user(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> sqlx::Result<Option<Permit>> {
        let sql = format!(
            "SELECT {PERMIT_COLUMNS} FROM permits WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Permit>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Permit>> {
        let sql = format!("SELECT {PERMIT_COLUMNS} FROM permits WHERE id = $1");
        sqlx::query_as::<_, Permit>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Permit>> {
        let sql = format!(
            "SELECT id, user_id, user_name, user_email, permit_type, full_name, \
             passport_number, nationality, trek_area, start_date, end_date, status, admin_note, \
             NULL AS document_data, created_at, updated_at \
             FROM permits ORDER BY created_at DESC LIMIT 1000"
        );
        sqlx::query_as::<_, Permit>(&sql).fetch_all(db).await
    }

    pub async fn set_status(
        db: &PgPool,
        id: Uuid,
        status: PermitStatus,
        admin_note: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE permits SET status = $2, admin_note = COALESCE($3, admin_note), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(admin_note)
        .execute(db)
        .await?;
        Ok(())
    }
}

impl PermitType {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<PermitType>> {
        sqlx::query_as::<_, PermitType>(
            "SELECT id, name, description, price, created_at FROM permit_types ORDER BY name",
        )
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        description: &str,
        price: f64,
    ) -> sqlx::Result<PermitType> {
        sqlx::query_as::<_, PermitType>(
            "INSERT INTO permit_types (name, description, price) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, description, price, created_at",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .fetch_one(db)
        .await
    }
}
