use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::HotelUpdate;

const HOTEL_COLUMNS: &str = "id, name, location, city, latitude, longitude, price_per_night, \
     rating, description, amenities, contact, images, available_rooms, owner_id, owner_name, \
     created_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price_per_night: f64,
    pub rating: f64,
    pub description: String,
    pub amenities: Vec<String>,
    pub contact: String,
    pub images: Vec<String>,
    pub available_rooms: i32,
    pub owner_id: Option<Uuid>,
    pub owner_name: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Hotel {
    pub async fn list(db: &PgPool, city: Option<&str>) -> sqlx::Result<Vec<Hotel>> {
        match city {
            Some(city) => {
                let sql = format!(
                    "SELECT {HOTEL_COLUMNS} FROM hotels WHERE city ILIKE $1 \
                     ORDER BY created_at DESC LIMIT 100"
                );
                sqlx::query_as::<_, Hotel>(&sql)
                    .bind(format!("%{}%", city))
                    .fetch_all(db)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {HOTEL_COLUMNS} FROM hotels ORDER BY created_at DESC LIMIT 100"
                );
                sqlx::query_as::<_, Hotel>(&sql).fetch_all(db).await
            }
        }
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Hotel>> {
        let sql = format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1");
        sqlx::query_as::<_, Hotel>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_by_owner(db: &PgPool, owner_id: Uuid) -> sqlx::Result<Vec<Hotel>> {
        let sql = format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Hotel>(&sql)
            .bind(owner_id)
            .fetch_all(db)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        owner_name: &str,
        name: &str,
        location: &str,
        city: &str,
        latitude: f64,
        longitude: f64,
        price_per_night: f64,
        description: &str,
        amenities: &[String],
        contact: &str,
        available_rooms: i32,
    ) -> sqlx::Result<Hotel> {
        let sql = format!(
            "INSERT INTO hotels (name, location, city, latitude, longitude, price_per_night, \
             rating, description, amenities, contact, available_rooms, owner_id, owner_name) \
             VALUES ($1, $2, $3, $4, $5, $6, 0.0, $7, $8, $9, $10, $11, $12) \
             RETURNING {HOTEL_COLUMNS}"
        );
        sqlx::query_as::<_, Hotel>(&sql)
            .bind(name)
            .bind(location)
            .bind(city)
            .bind(latitude)
            .bind(longitude)
            .bind(price_per_night)
            .bind(description)
            .bind(amenities)
            .bind(contact)
            .bind(available_rooms)
            .bind(owner_id)
            .bind(owner_name)
            .fetch_one(db)
            .await
    }

    /// Merge-patch update scoped to the acting owner: only provided fields
    /// change, and a wrong owner sees the same "no row" as a missing hotel.
    pub async fn update_for_owner(
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        patch: &HotelUpdate,
    ) -> sqlx::Result<Option<Hotel>> {
        let sql = format!(
            "UPDATE hotels SET \
               name = COALESCE($3, name), \
               location = COALESCE($4, location), \
               city = COALESCE($5, city), \
               latitude = COALESCE($6, latitude), \
               longitude = COALESCE($7, longitude), \
               price_per_night = COALESCE($8, price_per_night), \
               description = COALESCE($9, description), \
               amenities = COALESCE($10, amenities), \
               contact = COALESCE($11, contact), \
               available_rooms = COALESCE($12, available_rooms) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {HOTEL_COLUMNS}"
        );
        sqlx::query_as::<_, Hotel>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(&patch.name)
            .bind(&patch.location)
            .bind(&patch.city)
            .bind(patch.latitude)
            .bind(patch.longitude)
            .bind(patch.price_per_night)
            .bind(&patch.description)
            .bind(&patch.amenities)
            .bind(&patch.contact)
            .bind(patch.available_rooms)
            .fetch_optional(db)
            .await
    }

    pub async fn append_images(
        db: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        images: &[String],
    ) -> sqlx::Result<Option<Hotel>> {
        let sql = format!(
            "UPDATE hotels SET images = images || $3 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {HOTEL_COLUMNS}"
        );
        sqlx::query_as::<_, Hotel>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(images)
            .fetch_optional(db)
            .await
    }
}
