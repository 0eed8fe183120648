use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{SosContact, SosRequest, SosResponse, SosStatusUpdate};
use super::repo::{EmergencyContact, SafetyTip, SosAlert, TouristSpot};
use crate::auth::jwt::AdminUser;
use crate::email::{send_in_background, sos_alert_email};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/emergency-contacts", get(list_emergency_contacts))
        .route("/safety-tips", get(list_safety_tips))
        .route("/tourist-spots", get(list_tourist_spots))
        .route("/sos", post(send_sos))
        .route("/admin/sos-alerts", get(admin_list_sos_alerts))
        .route("/admin/sos-alerts/:id", patch(admin_update_sos_alert))
}

#[instrument(skip(state))]
pub async fn list_emergency_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmergencyContact>>, ApiError> {
    let contacts = EmergencyContact::list(&state.db).await?;
    Ok(Json(contacts))
}

#[instrument(skip(state))]
pub async fn list_safety_tips(
    State(state): State<AppState>,
) -> Result<Json<Vec<SafetyTip>>, ApiError> {
    let tips = SafetyTip::list(&state.db).await?;
    Ok(Json(tips))
}

#[instrument(skip(state))]
pub async fn list_tourist_spots(
    State(state): State<AppState>,
) -> Result<Json<Vec<TouristSpot>>, ApiError> {
    let spots = TouristSpot::list(&state.db).await?;
    Ok(Json(spots))
}

/// Public on purpose: an emergency must not depend on holding a valid token.
#[instrument(skip(state, payload))]
pub async fn send_sos(
    State(state): State<AppState>,
    Json(payload): Json<SosRequest>,
) -> Result<Json<SosResponse>, ApiError> {
    let maps_link = format!(
        "https://www.google.com/maps?q={},{}",
        payload.latitude, payload.longitude
    );
    let user_name = payload.user_name.as_deref().unwrap_or("Anonymous");

    let alert = SosAlert::create(
        &state.db,
        payload.latitude,
        payload.longitude,
        user_name,
        payload.user_email.as_deref(),
        payload.user_phone.as_deref(),
        &payload.emergency_type,
        payload.message.as_deref(),
        &maps_link,
    )
    .await?;

    let nearest_contacts: Vec<SosContact> = EmergencyContact::list(&state.db)
        .await?
        .into_iter()
        .take(5)
        .map(|c| SosContact {
            name: c.name,
            phone: c.phone,
            category: c.category,
        })
        .collect();

    // Notify the rescue inbox in the background; the alert is already stored,
    // so mail failure must not fail the request.
    if let Some(smtp) = &state.config.smtp {
        send_in_background(
            state.mailer.clone(),
            sos_alert_email(
                &smtp.from,
                &payload.emergency_type,
                user_name,
                &maps_link,
                payload.message.as_deref(),
            ),
        );
    }

    info!(
        alert_id = %alert.id,
        latitude = payload.latitude,
        longitude = payload.longitude,
        "sos alert created"
    );
    Ok(Json(SosResponse {
        id: alert.id,
        status: "sent".into(),
        message: "Emergency alert sent! Help is on the way. Stay calm and stay where you are if safe.",
        nearest_contacts,
    }))
}

#[instrument(skip(state))]
pub async fn admin_list_sos_alerts(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<SosAlert>>, ApiError> {
    let alerts = SosAlert::list_all(&state.db).await?;
    Ok(Json(alerts))
}

#[instrument(skip(state, payload))]
pub async fn admin_update_sos_alert(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SosStatusUpdate>,
) -> Result<Json<SosAlert>, ApiError> {
    let alert = SosAlert::set_status(&state.db, id, &payload.status)
        .await?
        .ok_or(ApiError::NotFound("sos alert"))?;
    info!(alert_id = %id, status = %payload.status, "sos alert updated");
    Ok(Json(alert))
}
