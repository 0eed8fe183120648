use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::auth::jwt::AdminUser;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin_list_users))
        .route("/admin/stats", get(admin_stats))
}

#[derive(Debug, Serialize, FromRow)]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_hotel_owners: i64,
    pub total_hotels: i64,
    pub total_bookings: i64,
    pub confirmed_bookings: i64,
    pub cancelled_bookings: i64,
    pub total_permits: i64,
    pub pending_permits: i64,
    pub approved_permits: i64,
    pub rejected_permits: i64,
}

async fn load_stats(db: &PgPool) -> sqlx::Result<PlatformStats> {
    sqlx::query_as::<_, PlatformStats>(
        "SELECT \
           (SELECT COUNT(*) FROM users WHERE role = 'user') AS total_users, \
           (SELECT COUNT(*) FROM users WHERE role = 'hotel_owner') AS total_hotel_owners, \
           (SELECT COUNT(*) FROM hotels) AS total_hotels, \
           (SELECT COUNT(*) FROM bookings) AS total_bookings, \
           (SELECT COUNT(*) FROM bookings WHERE status = 'confirmed') AS confirmed_bookings, \
           (SELECT COUNT(*) FROM bookings WHERE status = 'cancelled') AS cancelled_bookings, \
           (SELECT COUNT(*) FROM permits) AS total_permits, \
           (SELECT COUNT(*) FROM permits WHERE status = 'pending') AS pending_permits, \
           (SELECT COUNT(*) FROM permits WHERE status = 'approved') AS approved_permits, \
           (SELECT COUNT(*) FROM permits WHERE status = 'rejected') AS rejected_permits",
    )
    .fetch_one(db)
    .await
}

#[instrument(skip(state))]
pub async fn admin_list_users(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<crate::auth::repo::User>>, ApiError> {
    // User's Serialize impl already skips the hash and pending codes.
    let users = User::list_all(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn admin_stats(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<PlatformStats>, ApiError> {
    let stats = load_stats(&state.db).await?;
    Ok(Json(stats))
}
