use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/chatbot", post(chat_with_bot))
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

const SYSTEM_PROMPT: &str = "You are NepSafe AI Assistant, an expert travel guide for Nepal \
tourism. Your expertise includes trekking permits (TIMS, Annapurna, Everest, Langtang, Manaslu), \
visa requirements, hotels and accommodation, best times to visit, weather and seasonal advice, \
safety tips and emergency procedures, local culture, food, transportation, and altitude sickness \
prevention. Be friendly, helpful, and concise. Provide practical, actionable advice and include \
safety warnings when relevant. For emergencies, always recommend using the SOS button.";

/// Keyword-matched reply used when no completion provider is configured or
/// the provider call fails.
fn local_reply(message: &str) -> &'static str {
    let text = message.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if mentions(&["permit", "tims", "annapurna", "everest", "langtang", "manaslu"]) {
        "For trekking permits in Nepal, you typically need a TIMS card and a park or \
         restricted area permit. Popular routes like Everest and Annapurna require national \
         park or conservation entry permits. Tell me your route and dates, and I can suggest \
         the exact permits."
    } else if mentions(&["hotel", "stay", "accommodation", "book"]) {
        "You can browse verified hotels by city in the Hotels page. Let me know your \
         destination and budget, and I can suggest options."
    } else if mentions(&["weather", "season", "best time", "visit"]) {
        "Spring (Mar-May) and autumn (Sep-Nov) are the best seasons for most treks. Winter \
         is colder but clear, and monsoon brings heavy rain."
    } else if mentions(&["safety", "emergency", "altitude", "sos"]) {
        "For safety: acclimatize gradually, stay hydrated, and monitor symptoms of altitude \
         sickness. In emergencies, use the SOS button for immediate help."
    } else if mentions(&["visa", "immigration", "entry"]) {
        "Most travelers can get a visa on arrival at Tribhuvan International Airport. Ensure \
         your passport is valid for at least 6 months and carry a passport photo."
    } else {
        "Namaste! I can help with permits, hotels, safety, weather, and travel tips in Nepal. \
         What would you like to know?"
    }
}

async fn completion_reply(state: &AppState, api_key: &str, message: &str) -> anyhow::Result<String> {
    let body = serde_json::json!({
        "model": "gpt-3.5-turbo",
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": message},
        ],
        "temperature": 0.7,
        "max_tokens": 500,
    });

    let data: serde_json::Value = state
        .http
        .post("https://api.openai.com/v1/chat/completions")
        .timeout(Duration::from_secs(30))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    data["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("completion response missing content"))
}

/// Public endpoint; a provider failure degrades to the local reply rather
/// than failing the request.
#[instrument(skip(state, payload))]
pub async fn chat_with_bot(
    State(state): State<AppState>,
    Json(payload): Json<ChatMessage>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session_id = payload
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let response = match state.config.openai_api_key.as_deref() {
        Some(api_key) => match completion_reply(&state, api_key, &payload.message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat completion failed, using local reply");
                local_reply(&payload.message).to_string()
            }
        },
        None => local_reply(&payload.message).to_string(),
    };

    Ok(Json(ChatResponse {
        response,
        session_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permit_questions_get_permit_advice() {
        assert!(local_reply("What permits do I need for Annapurna?").contains("TIMS"));
        assert!(local_reply("everest base camp trek").contains("permit"));
    }

    #[test]
    fn hotel_questions_get_hotel_advice() {
        assert!(local_reply("Where should I stay in Pokhara?").contains("hotels"));
    }

    #[test]
    fn weather_questions_get_season_advice() {
        assert!(local_reply("When is the best time to visit?").contains("Spring"));
    }

    #[test]
    fn safety_questions_mention_sos() {
        assert!(local_reply("What about altitude sickness?").contains("SOS"));
    }

    #[test]
    fn unrelated_questions_get_the_generic_greeting() {
        assert!(local_reply("Tell me a joke").starts_with("Namaste"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            local_reply("PERMIT for EVEREST"),
            local_reply("permit for everest")
        );
    }
}
