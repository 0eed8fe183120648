use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HotelQuery {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotelCreate {
    pub name: String,
    pub location: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price_per_night: f64,
    pub description: String,
    pub amenities: Vec<String>,
    pub contact: String,
    pub available_rooms: i32,
}

/// Merge-patch body: absent fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct HotelUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price_per_night: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub contact: Option<String>,
    pub available_rooms: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct HotelImagesRequest {
    pub images_b64: Vec<String>,
}
