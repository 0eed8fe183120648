use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use base64::Engine;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{PermitCreate, PermitTypeCreate, PermitUpdate};
use super::repo::{Permit, PermitStatus, PermitType};
use crate::auth::jwt::{AdminUser, AuthUser};
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/permits", post(create_permit).get(list_permits))
        .route("/permits/:id/cancel", patch(cancel_permit))
        .route("/permit-types", get(list_permit_types))
        .route("/admin/permits", get(admin_list_permits))
        .route("/admin/permits/:id", get(admin_get_permit).patch(admin_update_permit))
        .route("/admin/permit-types", post(admin_create_permit_type))
}

#[instrument(skip(state, payload))]
pub async fn create_permit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PermitCreate>,
) -> Result<Json<Permit>, ApiError> {
    if let Some(ref doc) = payload.document_b64 {
        base64::engine::general_purpose::STANDARD
            .decode(doc)
            .map_err(|_| ApiError::Validation("invalid base64 document".into()))?;
    }

    let account = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let permit = Permit::create(
        &state.db,
        user.id,
        &account.name,
        &account.email,
        &payload.permit_type,
        &payload.full_name,
        &payload.passport_number,
        &payload.nationality,
        &payload.trek_area,
        &payload.start_date,
        &payload.end_date,
        payload.document_b64.as_deref(),
    )
    .await?;

    info!(permit_id = %permit.id, user_id = %user.id, "permit application submitted");
    Ok(Json(permit))
}

#[instrument(skip(state))]
pub async fn list_permits(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Permit>>, ApiError> {
    let permits = Permit::list_by_user(&state.db, user.id).await?;
    Ok(Json(permits))
}

#[instrument(skip(state))]
pub async fn cancel_permit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Permit>, ApiError> {
    let permit = Permit::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("permit"))?;
    if permit.status != PermitStatus::Pending {
        return Err(ApiError::Conflict("only pending permits can be cancelled"));
    }
    Permit::set_status(&state.db, id, PermitStatus::Cancelled, None).await?;
    info!(permit_id = %id, "permit application cancelled");
    Ok(Json(Permit {
        status: PermitStatus::Cancelled,
        ..permit
    }))
}

#[instrument(skip(state))]
pub async fn list_permit_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<PermitType>>, ApiError> {
    let types = PermitType::list(&state.db).await?;
    Ok(Json(types))
}

#[instrument(skip(state))]
pub async fn admin_list_permits(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<Permit>>, ApiError> {
    let permits = Permit::list_all(&state.db).await?;
    Ok(Json(permits))
}

/// Full detail including the passport document, admin only.
#[instrument(skip(state))]
pub async fn admin_get_permit(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Permit>, ApiError> {
    let permit = Permit::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("permit"))?;
    Ok(Json(permit))
}

#[instrument(skip(state, payload))]
pub async fn admin_update_permit(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PermitUpdate>,
) -> Result<Json<Permit>, ApiError> {
    let permit = Permit::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("permit"))?;
    Permit::set_status(&state.db, id, payload.status, payload.admin_note.as_deref()).await?;
    info!(permit_id = %id, admin_id = %admin_id, status = ?payload.status, "permit reviewed");
    Ok(Json(Permit {
        status: payload.status,
        admin_note: payload.admin_note.or(permit.admin_note),
        ..permit
    }))
}

#[instrument(skip(state, payload))]
pub async fn admin_create_permit_type(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Json(payload): Json<PermitTypeCreate>,
) -> Result<Json<PermitType>, ApiError> {
    let permit_type =
        PermitType::create(&state.db, &payload.name, &payload.description, payload.price).await?;
    info!(permit_type = %permit_type.name, "permit type created");
    Ok(Json(permit_type))
}
