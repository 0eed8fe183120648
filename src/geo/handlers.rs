use std::time::Duration;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::dto::{CurrentWeather, Poi, PoiQuery, TouristPoiQuery, WeatherQuery, WeatherResponse};
use super::overpass::{
    parse_bbox, poi_query, simplify_elements, tourism_bbox_query, tourism_country_query,
    OVERPASS_URL,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pois", get(get_pois))
        .route("/tourist-pois", get(get_tourist_pois))
        .route("/weather", get(get_weather))
        .route("/weather/fallback", get(get_weather_fallback))
}

async fn overpass_post(
    state: &AppState,
    query: String,
    timeout: Duration,
) -> Result<serde_json::Value, ApiError> {
    let resp = state
        .http
        .post(OVERPASS_URL)
        .timeout(timeout)
        .body(query)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            error!(error = %e, "overpass request failed");
            ApiError::Upstream("failed to fetch POIs from Overpass")
        })?;
    resp.json().await.map_err(|e| {
        error!(error = %e, "overpass response decode failed");
        ApiError::Upstream("failed to fetch POIs from Overpass")
    })
}

#[instrument(skip(state))]
pub async fn get_pois(
    State(state): State<AppState>,
    Query(q): Query<PoiQuery>,
) -> Result<Json<Vec<Poi>>, ApiError> {
    let query = poi_query(q.lat, q.lon, q.radius, &q.types);
    let data = overpass_post(&state, query, Duration::from_secs(30)).await?;
    let mut pois = simplify_elements(&data, false);
    pois.truncate(2000);
    Ok(Json(pois))
}

#[instrument(skip(state))]
pub async fn get_tourist_pois(
    State(state): State<AppState>,
    Query(q): Query<TouristPoiQuery>,
) -> Result<Json<Vec<Poi>>, ApiError> {
    let query = match (&q.country, &q.bbox) {
        (Some(country), _) => tourism_country_query(country, q.limit),
        (None, Some(bbox)) => {
            let bbox = parse_bbox(bbox).ok_or_else(|| {
                ApiError::Validation("bbox must be minlat,minlon,maxlat,maxlon".into())
            })?;
            tourism_bbox_query(bbox, q.limit)
        }
        (None, None) => return Err(ApiError::Validation("provide bbox or country".into())),
    };

    let data = overpass_post(&state, query, Duration::from_secs(60)).await?;
    let mut pois = simplify_elements(&data, true);
    pois.truncate(q.limit.min(5000));
    Ok(Json(pois))
}

#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(q): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let api_key = state
        .config
        .openweather_api_key
        .as_deref()
        .ok_or_else(|| ApiError::Validation("OPENWEATHER_API_KEY not configured".into()))?;

    let url = format!(
        "https://api.openweathermap.org/data/2.5/onecall?lat={}&lon={}&exclude=minutely,hourly&units=metric&appid={}",
        q.lat, q.lon, api_key
    );
    let data: serde_json::Value = state
        .http
        .get(url)
        .timeout(Duration::from_secs(20))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            error!(error = %e, "openweather request failed");
            ApiError::Upstream("failed to fetch weather data")
        })?
        .json()
        .await
        .map_err(|e| {
            error!(error = %e, "openweather response decode failed");
            ApiError::Upstream("failed to fetch weather data")
        })?;

    let current = data.get("current").cloned().unwrap_or_default();
    Ok(Json(WeatherResponse {
        lat: q.lat,
        lon: q.lon,
        current: CurrentWeather {
            temp: current.get("temp").and_then(|v| v.as_f64()),
            weather: current.get("weather").cloned().unwrap_or_else(|| serde_json::json!([])),
            humidity: current.get("humidity").and_then(|v| v.as_f64()),
            wind_speed: current.get("wind_speed").and_then(|v| v.as_f64()),
        },
        alerts: data.get("alerts").cloned().unwrap_or_else(|| serde_json::json!([])),
        source: None,
    }))
}

/// Open-Meteo needs no API key; only basic current weather is available.
#[instrument(skip(state))]
pub async fn get_weather_fallback(
    State(state): State<AppState>,
    Query(q): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let url = format!(
        "https://api.open-meteo.com/v1/forecast?latitude={}&longitude={}&current_weather=true&timezone=UTC",
        q.lat, q.lon
    );
    let data: serde_json::Value = state
        .http
        .get(url)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            error!(error = %e, "open-meteo request failed");
            ApiError::Upstream("failed to fetch fallback weather data")
        })?
        .json()
        .await
        .map_err(|e| {
            error!(error = %e, "open-meteo response decode failed");
            ApiError::Upstream("failed to fetch fallback weather data")
        })?;

    let current = data.get("current_weather").cloned().unwrap_or_default();
    Ok(Json(WeatherResponse {
        lat: q.lat,
        lon: q.lon,
        current: CurrentWeather {
            temp: current.get("temperature").and_then(|v| v.as_f64()),
            weather: serde_json::json!([{"description": "Current weather from Open-Meteo"}]),
            humidity: None,
            wind_speed: current.get("windspeed").and_then(|v| v.as_f64()),
        },
        alerts: serde_json::json!([]),
        source: Some("open-meteo"),
    }))
}
