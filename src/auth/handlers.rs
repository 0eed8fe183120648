use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::claims::Role;
use super::codes::{codes_match, generate_code, is_expired, reset_expiry_from};
use super::dto::{
    AuthResponse, EmailRequest, LoginRequest, MessageResponse, ProfilePictureRequest,
    PublicUser, RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use super::jwt::{AuthUser, JwtKeys};
use super::password::{check_password, hash_password};
use super::repo::User;
use crate::email::{password_reset_email, send_in_background, verification_email};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/me", get(get_me))
        .route("/auth/profile-picture", post(upload_profile_picture))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Self-service registration only covers tourists and hotel owners; admin
/// accounts are bootstrapped at startup.
fn registration_role(role: Option<&str>) -> Result<Role, ApiError> {
    match role.unwrap_or("user") {
        "user" => Ok(Role::User),
        "hotel_owner" => Ok(Role::HotelOwner),
        _ => Err(ApiError::Validation(
            "invalid role, use 'user' or 'hotel_owner'".into(),
        )),
    }
}

/// Uniform credential check: unknown email and wrong password take the same
/// path out, so the response status never reveals which one failed.
fn authenticate(user: Option<User>, password: &str) -> Result<User, ApiError> {
    let user = user.ok_or(ApiError::Unauthorized)?;
    check_password(password, &user.password_hash)?;
    Ok(user)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation("password too short".into()));
    }
    let role = registration_role(payload.role.as_deref())?;

    let hash = hash_password(&payload.password)?;
    let code = generate_code();

    // The unique index on email turns a concurrent duplicate into Conflict.
    let user = User::create(&state.db, &payload.email, payload.name.trim(), role, &hash, &code)
        .await
        .map_err(|e| match e.into() {
            ApiError::Conflict(_) => ApiError::Conflict("email already registered"),
            other => other,
        })?;

    send_in_background(state.mailer.clone(), verification_email(&user.email, &code));

    let token = JwtKeys::from_ref(&state).sign(user.id, user.role)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
        verification_required: true,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email).await?;
    let user = authenticate(user, &payload.password).map_err(|e| {
        warn!(email = %payload.email, "login rejected");
        e
    })?;

    let token = JwtKeys::from_ref(&state).sign(user.id, user.role)?;
    let verification_required = !user.email_verified;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
        verification_required,
    }))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    // A wrong submission leaves the stored code in place so the user can
    // retry; there is no lockout.
    let stored = user.verification_code.as_deref().unwrap_or("");
    if !codes_match(stored, &payload.code) {
        warn!(user_id = %user.id, "verification code mismatch");
        return Err(ApiError::InvalidCode);
    }

    User::mark_verified(&state.db, user.id).await?;
    let user = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let token = JwtKeys::from_ref(&state).sign(user.id, user.role)?;
    info!(user_id = %user.id, "email verified");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
        verification_required: false,
    }))
}

#[instrument(skip(state, payload))]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if user.email_verified {
        return Err(ApiError::Validation("email already verified".into()));
    }

    let code = generate_code();
    User::set_verification_code(&state.db, user.id, &code).await?;
    send_in_background(state.mailer.clone(), verification_email(&user.email, &code));

    Ok(Json(MessageResponse {
        message: "verification code sent",
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let code = generate_code();
    let expires_at = reset_expiry_from(OffsetDateTime::now_utc());
    User::set_reset_code(&state.db, user.id, &code, expires_at).await?;
    send_in_background(state.mailer.clone(), password_reset_email(&user.email, &code));

    info!(user_id = %user.id, "password reset requested");
    Ok(Json(MessageResponse {
        message: "password reset code sent to your email",
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation("password too short".into()));
    }

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let stored = user.reset_code.as_deref().ok_or_else(|| {
        ApiError::Validation("no reset code found, request a new password reset".into())
    })?;
    if !codes_match(stored, &payload.code) {
        warn!(user_id = %user.id, "reset code mismatch");
        return Err(ApiError::InvalidCode);
    }

    // Expired codes stay on the record until a new request overwrites them.
    if let Some(expires_at) = user.reset_code_expires_at {
        if is_expired(expires_at, OffsetDateTime::now_utc()) {
            return Err(ApiError::CodeExpired);
        }
    }

    let hash = hash_password(&payload.new_password)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password reset completed");
    Ok(Json(MessageResponse {
        message: "password reset successfully, you can now login with your new password",
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProfilePictureRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    base64::engine::general_purpose::STANDARD
        .decode(&payload.image_b64)
        .map_err(|_| ApiError::Validation("invalid base64 image".into()))?;

    let data_url = format!("data:image/jpeg;base64,{}", payload.image_b64);
    User::set_profile_picture(&state.db, user.id, &data_url).await?;

    Ok(Json(MessageResponse {
        message: "profile picture uploaded",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with_password(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "tourist@example.com".into(),
            name: "Tourist".into(),
            role: Role::User,
            password_hash: hash_password(password).unwrap(),
            email_verified: false,
            verification_code: None,
            reset_code: None,
            reset_code_expires_at: None,
            profile_picture: None,
            business_name: None,
            business_phone: None,
            business_address: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("tourist@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn registration_role_accepts_user_and_owner() {
        assert_eq!(registration_role(None).unwrap(), Role::User);
        assert_eq!(registration_role(Some("user")).unwrap(), Role::User);
        assert_eq!(
            registration_role(Some("hotel_owner")).unwrap(),
            Role::HotelOwner
        );
    }

    #[test]
    fn registration_role_rejects_admin() {
        assert!(matches!(
            registration_role(Some("admin")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn authenticate_accepts_correct_password() {
        let user = user_with_password("trekking-2024");
        let out = authenticate(Some(user), "trekking-2024").unwrap();
        assert_eq!(out.email, "tourist@example.com");
    }

    #[test]
    fn authenticate_is_uniform_for_unknown_email_and_wrong_password() {
        let unknown = authenticate(None, "whatever").unwrap_err();
        let wrong = authenticate(Some(user_with_password("right")), "wrong").unwrap_err();
        // Same taxonomy member, so both map to the same 401 response.
        assert!(matches!(unknown, ApiError::Unauthorized));
        assert!(matches!(wrong, ApiError::Unauthorized));
        assert_eq!(unknown.kind(), wrong.kind());
    }
}
