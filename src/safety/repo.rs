use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmergencyContact {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub category: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub available_24_7: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SafetyTip {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub importance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TouristSpot {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub rating: f64,
    pub best_time_to_visit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SosAlert {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub emergency_type: String,
    pub message: Option<String>,
    pub status: String,
    pub google_maps_link: String,
    pub created_at: OffsetDateTime,
    pub resolved_at: Option<OffsetDateTime>,
}

const SOS_COLUMNS: &str = "id, latitude, longitude, user_name, user_email, user_phone, \
     emergency_type, message, status, google_maps_link, created_at, resolved_at";

impl EmergencyContact {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<EmergencyContact>> {
        sqlx::query_as::<_, EmergencyContact>(
            "SELECT id, name, phone, category, location, latitude, longitude, available_24_7 \
             FROM emergency_contacts ORDER BY name LIMIT 100",
        )
        .fetch_all(db)
        .await
    }
}

impl SafetyTip {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<SafetyTip>> {
        sqlx::query_as::<_, SafetyTip>(
            "SELECT id, title, description, category, importance \
             FROM safety_tips ORDER BY importance, title LIMIT 100",
        )
        .fetch_all(db)
        .await
    }
}

impl TouristSpot {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<TouristSpot>> {
        sqlx::query_as::<_, TouristSpot>(
            "SELECT id, name, category, description, latitude, longitude, location, rating, \
             best_time_to_visit FROM tourist_spots ORDER BY rating DESC LIMIT 100",
        )
        .fetch_all(db)
        .await
    }
}

impl SosAlert {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        latitude: f64,
        longitude: f64,
        user_name: &str,
        user_email: Option<&str>,
        user_phone: Option<&str>,
        emergency_type: &str,
        message: Option<&str>,
        google_maps_link: &str,
    ) -> sqlx::Result<SosAlert> {
        let sql = format!(
            "INSERT INTO sos_alerts (latitude, longitude, user_name, user_email, user_phone, \
             emergency_type, message, status, google_maps_link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8) \
             RETURNING {SOS_COLUMNS}"
        );
        sqlx::query_as::<_, SosAlert>(&sql)
            .bind(latitude)
            .bind(longitude)
            .bind(user_name)
            .bind(user_email)
            .bind(user_phone)
            .bind(emergency_type)
            .bind(message)
            .bind(google_maps_link)
            .fetch_one(db)
            .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<SosAlert>> {
        let sql = format!(
            "SELECT {SOS_COLUMNS} FROM sos_alerts ORDER BY created_at DESC LIMIT 100"
        );
        sqlx::query_as::<_, SosAlert>(&sql).fetch_all(db).await
    }

    pub async fn set_status(db: &PgPool, id: Uuid, status: &str) -> sqlx::Result<Option<SosAlert>> {
        let sql = format!(
            "UPDATE sos_alerts SET status = $2, resolved_at = NOW() WHERE id = $1 \
             RETURNING {SOS_COLUMNS}"
        );
        sqlx::query_as::<_, SosAlert>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(db)
            .await
    }
}
