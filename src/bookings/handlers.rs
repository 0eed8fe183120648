use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::BookingCreate;
use super::repo::{Booking, BookingStatus, OwnerStats};
use crate::auth::jwt::{AdminUser, AuthUser, HotelOwner};
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::hotels::repo::Hotel;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/:id/cancel", patch(cancel_booking))
        .route("/hotel-owner/bookings", get(list_owner_bookings))
        .route("/hotel-owner/bookings/:id/cancel", patch(owner_cancel_booking))
        .route("/hotel-owner/stats", get(owner_stats))
        .route("/admin/bookings", get(admin_list_bookings))
}

/// Number of nights between two ISO dates; a stay must be at least one night.
fn nights_between(check_in: &str, check_out: &str) -> Result<i64, ApiError> {
    let fmt = format_description!("[year]-[month]-[day]");
    let check_in = Date::parse(check_in, &fmt)
        .map_err(|_| ApiError::Validation("check_in must be an ISO date".into()))?;
    let check_out = Date::parse(check_out, &fmt)
        .map_err(|_| ApiError::Validation("check_out must be an ISO date".into()))?;
    let nights = (check_out - check_in).whole_days();
    if nights < 1 {
        return Err(ApiError::Validation(
            "check_out must be after check_in".into(),
        ));
    }
    Ok(nights)
}

#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BookingCreate>,
) -> Result<Json<Booking>, ApiError> {
    if payload.guests < 1 {
        return Err(ApiError::Validation("guests must be at least 1".into()));
    }
    let nights = nights_between(&payload.check_in, &payload.check_out)?;

    let hotel = Hotel::find_by_id(&state.db, payload.hotel_id)
        .await?
        .ok_or(ApiError::NotFound("hotel"))?;
    let account = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let total_price = nights as f64 * hotel.price_per_night;
    let booking = Booking::create(
        &state.db,
        user.id,
        &account.name,
        &account.email,
        hotel.id,
        &hotel.name,
        &payload.check_in,
        &payload.check_out,
        payload.guests,
        total_price,
    )
    .await?;

    info!(booking_id = %booking.id, hotel_id = %hotel.id, "booking created");
    Ok(Json(booking))
}

#[instrument(skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = Booking::list_by_user(&state.db, user.id).await?;
    Ok(Json(bookings))
}

#[instrument(skip(state))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = Booking::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    if booking.status == BookingStatus::Cancelled {
        return Err(ApiError::Conflict("booking already cancelled"));
    }
    Booking::cancel(&state.db, id).await?;
    info!(booking_id = %id, "booking cancelled by user");
    Ok(Json(Booking {
        status: BookingStatus::Cancelled,
        ..booking
    }))
}

#[instrument(skip(state))]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = Booking::list_for_owner(&state.db, owner_id).await?;
    Ok(Json(bookings))
}

#[instrument(skip(state))]
pub async fn owner_cancel_booking(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = Booking::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    if !Booking::belongs_to_owner(&state.db, id, owner_id).await? {
        return Err(ApiError::Forbidden("booking is not for one of your hotels"));
    }
    if booking.status == BookingStatus::Cancelled {
        return Err(ApiError::Conflict("booking already cancelled"));
    }
    Booking::cancel(&state.db, id).await?;
    info!(booking_id = %id, owner_id = %owner_id, "booking cancelled by owner");
    Ok(Json(Booking {
        status: BookingStatus::Cancelled,
        ..booking
    }))
}

#[instrument(skip(state))]
pub async fn owner_stats(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
) -> Result<Json<OwnerStats>, ApiError> {
    let stats = Booking::owner_stats(&state.db, owner_id).await?;
    Ok(Json(stats))
}

#[instrument(skip(state))]
pub async fn admin_list_bookings(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = Booking::list_all(&state.db).await?;
    Ok(Json(bookings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_night_stay() {
        assert_eq!(nights_between("2024-03-10", "2024-03-11").unwrap(), 1);
    }

    #[test]
    fn multi_night_stay() {
        assert_eq!(nights_between("2024-03-10", "2024-03-17").unwrap(), 7);
    }

    #[test]
    fn price_is_nights_times_rate() {
        let nights = nights_between("2024-03-10", "2024-03-13").unwrap();
        assert_eq!(nights as f64 * 80.0, 240.0);
    }

    #[test]
    fn zero_night_stay_is_rejected() {
        assert!(matches!(
            nights_between("2024-03-10", "2024-03-10"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn negative_stay_is_rejected() {
        assert!(matches!(
            nights_between("2024-03-10", "2024-03-09"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(matches!(
            nights_between("next tuesday", "2024-03-10"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            nights_between("2024-03-10", "10/03/2024"),
            Err(ApiError::Validation(_))
        ));
    }
}
