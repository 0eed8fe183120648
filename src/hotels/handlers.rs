use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use base64::Engine;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{HotelCreate, HotelImagesRequest, HotelQuery, HotelUpdate};
use super::repo::Hotel;
use crate::auth::jwt::HotelOwner;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(list_hotels))
        .route("/hotels/:id", get(get_hotel))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/hotel-owner/hotels", post(create_hotel).get(list_owner_hotels))
        .route("/hotel-owner/hotels/:id", patch(update_hotel))
        .route("/hotel-owner/hotels/:id/images", post(upload_hotel_images))
}

#[instrument(skip(state))]
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(q): Query<HotelQuery>,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    let hotels = Hotel::list(&state.db, q.city.as_deref()).await?;
    Ok(Json(hotels))
}

#[instrument(skip(state))]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Hotel>, ApiError> {
    let hotel = Hotel::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("hotel"))?;
    Ok(Json(hotel))
}

#[instrument(skip(state, payload))]
pub async fn create_hotel(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
    Json(payload): Json<HotelCreate>,
) -> Result<Json<Hotel>, ApiError> {
    let owner = User::find_by_id(&state.db, owner_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let hotel = Hotel::create(
        &state.db,
        owner_id,
        &owner.name,
        &payload.name,
        &payload.location,
        &payload.city,
        payload.latitude,
        payload.longitude,
        payload.price_per_night,
        &payload.description,
        &payload.amenities,
        &payload.contact,
        payload.available_rooms,
    )
    .await?;

    info!(hotel_id = %hotel.id, owner_id = %owner_id, "hotel created");
    Ok(Json(hotel))
}

#[instrument(skip(state))]
pub async fn list_owner_hotels(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    let hotels = Hotel::list_by_owner(&state.db, owner_id).await?;
    Ok(Json(hotels))
}

#[instrument(skip(state, patch))]
pub async fn update_hotel(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
    Path(id): Path<Uuid>,
    Json(patch): Json<HotelUpdate>,
) -> Result<Json<Hotel>, ApiError> {
    let hotel = Hotel::update_for_owner(&state.db, id, owner_id, &patch)
        .await?
        .ok_or(ApiError::NotFound("hotel"))?;
    info!(hotel_id = %id, owner_id = %owner_id, "hotel updated");
    Ok(Json(hotel))
}

#[instrument(skip(state, payload))]
pub async fn upload_hotel_images(
    State(state): State<AppState>,
    HotelOwner(owner_id): HotelOwner,
    Path(id): Path<Uuid>,
    Json(payload): Json<HotelImagesRequest>,
) -> Result<Json<Hotel>, ApiError> {
    if payload.images_b64.is_empty() {
        return Err(ApiError::Validation("images_b64 is required".into()));
    }
    let mut data_urls = Vec::with_capacity(payload.images_b64.len());
    for b64 in &payload.images_b64 {
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|_| ApiError::Validation("invalid base64 image".into()))?;
        data_urls.push(format!("data:image/jpeg;base64,{}", b64));
    }

    let hotel = Hotel::append_images(&state.db, id, owner_id, &data_urls)
        .await?
        .ok_or(ApiError::NotFound("hotel"))?;
    info!(hotel_id = %id, count = data_urls.len(), "hotel images uploaded");
    Ok(Json(hotel))
}
