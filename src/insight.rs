//! AI commentary on the standings: prompt building, the provider seam, and the fallback text.

use crate::logic::{overall_ranks, PlayerStats};
use crate::models::{Player, Round, ScoreSheet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Shown instead of commentary whenever the provider fails.
pub const FALLBACK_INSIGHT: &str =
    "The AI referee is currently reviewing the play tapes. Check back in a moment!";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors from a text-generation provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProviderError {
    /// No API key configured.
    MissingApiKey,
    /// Transport or decoding failure.
    Http(String),
    /// Non-success HTTP status.
    Status(u16),
    /// The provider answered without any text.
    EmptyResponse,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::MissingApiKey => write!(f, "No API key configured"),
            ProviderError::Http(e) => write!(f, "Request failed: {}", e),
            ProviderError::Status(code) => write!(f, "Provider returned HTTP {}", code),
            ProviderError::EmptyResponse => write!(f, "Provider returned no text"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.to_string())
    }
}

/// Everything the prompt is built from, captured when the request is made.
/// A late response belongs to this content even if the live sheet has changed since.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InsightRequest {
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub stats: Vec<PlayerStats>,
}

impl InsightRequest {
    /// Capture `sheet`. `None` when there are no players or no rounds to talk about.
    pub fn from_sheet(sheet: &ScoreSheet) -> Option<Self> {
        if sheet.players.is_empty() || sheet.rounds.is_empty() {
            return None;
        }
        Some(Self {
            players: sheet.players.clone(),
            rounds: sheet.rounds.clone(),
            stats: overall_ranks(sheet),
        })
    }

    /// Round history keyed by player name rather than id, in player order.
    fn round_history_json(&self) -> serde_json::Value {
        let rounds: Vec<serde_json::Value> = self
            .rounds
            .iter()
            .map(|r| {
                let scores: Vec<serde_json::Value> = self
                    .players
                    .iter()
                    .map(|p| serde_json::json!({ "player": p.name, "score": r.score(p.id).value() }))
                    .collect();
                serde_json::json!({ "round": r.index, "scores": scores })
            })
            .collect();
        serde_json::Value::Array(rounds)
    }
}

/// The commentary prompt for `request`.
pub fn build_prompt(request: &InsightRequest) -> String {
    let names: Vec<&str> = request.players.iter().map(|p| p.name.as_str()).collect();
    let standings: Vec<String> = request
        .stats
        .iter()
        .map(|s| format!("{}: Total {}, Rank {}", s.name, s.total_score, s.rank))
        .collect();
    format!(
        "Analyze this game leaderboard. Lower scores are better.\n\
         \n\
         Players: {}\n\
         Current Rankings (Lower is better):\n\
         {}\n\
         \n\
         Round History Data:\n\
         {}\n\
         \n\
         Please provide:\n\
         1. A witty and brief summary of the current standings.\n\
         2. A shoutout to the current leader (the one with the lowest score).\n\
         3. A playful roast for the player in last place.\n\
         4. A strategic insight based on round performance trends.\n\
         \n\
         Keep the tone fun, competitive, and sports-commentary style.\n",
        names.join(", "),
        standings.join("\n"),
        request.round_history_json(),
    )
}

/// Something that turns standings into prose.
pub trait InsightProvider {
    fn summarize(
        &self,
        request: &InsightRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// One attempt at commentary; any failure becomes [`FALLBACK_INSIGHT`].
pub async fn request_insight<P: InsightProvider>(provider: &P, request: &InsightRequest) -> String {
    match provider.summarize(request).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Insight request failed: {}", e);
            FALLBACK_INSIGHT.to_string()
        }
    }
}

/// Commentary shown alongside the dashboard.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsightState {
    #[default]
    Idle,
    /// A request is in flight.
    Pending { requested_at: DateTime<Utc> },
    Ready {
        text: String,
        requested_at: DateTime<Utc>,
    },
}

impl InsightState {
    pub fn is_pending(&self) -> bool {
        matches!(self, InsightState::Pending { .. })
    }
}

/// Google Gemini `generateContent` client.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    /// Configure from `GEMINI_API_KEY` (or `API_KEY`), `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok();
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());
        Self::new(api_key, model, base_url)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl InsightProvider for GeminiProvider {
    async fn summarize(&self, request: &InsightRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(request) }] }]
        });
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}
