pub mod handlers;

use axum::Router;
use tracing::info;

use crate::auth::claims::Role;
use crate::auth::password::hash_password;
use crate::auth::repo::User;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}

/// Creates the admin account at startup when `ADMIN_EMAIL`/`ADMIN_PASSWORD`
/// are configured and no such user exists. Admins cannot self-register.
pub async fn bootstrap_admin(state: &AppState) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        state.config.admin_email.as_deref(),
        state.config.admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if User::find_by_email(&state.db, email).await?.is_some() {
        return Ok(());
    }

    let hash = hash_password(password)?;
    let admin = User::create(&state.db, email, "Administrator", Role::Admin, &hash, "").await?;
    User::mark_verified(&state.db, admin.id).await?;

    info!(email = %email, "admin account bootstrapped");
    Ok(())
}
