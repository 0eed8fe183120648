mod dto;
pub mod handlers;
mod overpass;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
