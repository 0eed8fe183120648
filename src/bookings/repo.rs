use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

const BOOKING_COLUMNS: &str = "id, user_id, user_name, user_email, hotel_id, hotel_name, \
     check_in, check_out, guests, total_price, status, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize, FromRow)]
pub struct OwnerStats {
    pub total_hotels: i64,
    pub total_bookings: i64,
    pub confirmed_bookings: i64,
    pub cancelled_bookings: i64,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        user_name: &str,
        user_email: &str,
        hotel_id: Uuid,
        hotel_name: &str,
        check_in: &str,
        check_out: &str,
        guests: i32,
        total_price: f64,
    ) -> sqlx::Result<Booking> {
        let sql = format!(
            "INSERT INTO bookings (user_id, user_name, user_email, hotel_id, hotel_name, \
             check_in, check_out, guests, total_price, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'confirmed') \
             RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(user_id)
            .bind(user_name)
            .bind(user_email)
            .bind(hotel_id)
            .bind(hotel_name)
            .bind(check_in)
            .bind(check_out)
            .bind(guests)
            .bind(total_price)
            .fetch_one(db)
            .await
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_for_user(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> sqlx::Result<Option<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn cancel(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Bookings across every hotel the owner holds.
    pub async fn list_for_owner(db: &PgPool, owner_id: Uuid) -> sqlx::Result<Vec<Booking>> {
        let sql = format!(
            "SELECT b.id, b.user_id, b.user_name, b.user_email, b.hotel_id, b.hotel_name, \
             b.check_in, b.check_out, b.guests, b.total_price, b.status, b.created_at \
             FROM bookings b \
             JOIN hotels h ON h.id = b.hotel_id \
             WHERE h.owner_id = $1 \
             ORDER BY b.created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(owner_id)
            .fetch_all(db)
            .await
    }

    /// True when the booking's hotel belongs to `owner_id`.
    pub async fn belongs_to_owner(db: &PgPool, id: Uuid, owner_id: Uuid) -> sqlx::Result<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM bookings b JOIN hotels h ON h.id = b.hotel_id \
             WHERE b.id = $1 AND h.owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(found.is_some())
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC LIMIT 1000"
        );
        sqlx::query_as::<_, Booking>(&sql).fetch_all(db).await
    }

    pub async fn owner_stats(db: &PgPool, owner_id: Uuid) -> sqlx::Result<OwnerStats> {
        sqlx::query_as::<_, OwnerStats>(
            "SELECT \
               (SELECT COUNT(*) FROM hotels WHERE owner_id = $1) AS total_hotels, \
               COUNT(b.id) AS total_bookings, \
               COUNT(b.id) FILTER (WHERE b.status = 'confirmed') AS confirmed_bookings, \
               COUNT(b.id) FILTER (WHERE b.status = 'cancelled') AS cancelled_bookings \
             FROM bookings b \
             JOIN hotels h ON h.id = b.hotel_id \
             WHERE h.owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(db)
        .await
    }
}
