use serde::Deserialize;

use super::repo::PermitStatus;

#[derive(Debug, Deserialize)]
pub struct PermitCreate {
    pub permit_type: String,
    pub full_name: String,
    pub passport_number: String,
    pub nationality: String,
    pub trek_area: String,
    pub start_date: String,
    pub end_date: String,
    /// Optional base64-encoded passport photo.
    #[serde(default)]
    pub document_b64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermitUpdate {
    pub status: PermitStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermitTypeCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
}
