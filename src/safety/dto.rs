use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_emergency_type() -> String {
    "general".into()
}

#[derive(Debug, Deserialize)]
pub struct SosRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default = "default_emergency_type")]
    pub emergency_type: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SosContact {
    pub name: String,
    pub phone: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct SosResponse {
    pub id: Uuid,
    pub status: String,
    pub message: &'static str,
    pub nearest_contacts: Vec<SosContact>,
}

#[derive(Debug, Deserialize)]
pub struct SosStatusUpdate {
    pub status: String,
}
