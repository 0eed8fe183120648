use serde::{Deserialize, Serialize};

fn default_radius() -> u32 {
    1500
}

fn default_types() -> String {
    "restaurant|hotel|cafe|atm".into()
}

fn default_limit() -> usize {
    1000
}

#[derive(Debug, Deserialize)]
pub struct PoiQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_types")]
    pub types: String,
}

#[derive(Debug, Deserialize)]
pub struct TouristPoiQuery {
    #[serde(default)]
    pub bbox: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Simplified Overpass element returned to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct Poi {
    pub id: i64,
    pub osm_type: String,
    pub name: String,
    #[serde(rename = "type")]
    pub poi_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct CurrentWeather {
    pub temp: Option<f64>,
    pub weather: serde_json::Value,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub lat: f64,
    pub lon: f64,
    pub current: CurrentWeather,
    pub alerts: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
}
