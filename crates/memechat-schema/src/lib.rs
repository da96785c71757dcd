use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emoji-like token exposed to clients and used as the media table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneSymbol(String);

impl ToneSymbol {
    /// Symbol returned when no emotion could be detected.
    pub const DEFAULT: &'static str = "🙂";

    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn default_symbol() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for ToneSymbol {
    fn default() -> Self {
        Self::default_symbol()
    }
}

impl fmt::Display for ToneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToneSymbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One request/response cycle, immutable once handed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user_text: String,
    pub reply_text: String,
    pub symbol: ToneSymbol,
    pub chosen_media_url: String,
    pub candidate_urls: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Missing and `null` are both treated as an empty message.
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub emoji: ToneSymbol,
    pub meme: String,
    #[serde(rename = "allMemes", default)]
    pub all_memes: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatTurn> for ChatResponse {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            answer: turn.reply_text.clone(),
            emoji: turn.symbol.clone(),
            meme: turn.chosen_media_url.clone(),
            all_memes: turn.candidate_urls.clone(),
            timestamp: turn.timestamp,
        }
    }
}

/// A past turn as exposed by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub message: String,
    pub ai_reply: String,
    pub emoji: ToneSymbol,
    pub meme_url: String,
    #[serde(default)]
    pub all_memes: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatTurn> for HistoryRecord {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            message: turn.user_text.clone(),
            ai_reply: turn.reply_text.clone(),
            emoji: turn.symbol.clone(),
            meme_url: turn.chosen_media_url.clone(),
            all_memes: turn.candidate_urls.clone(),
            timestamp: turn.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionEntry {
    pub tone: String,
    pub emoji: ToneSymbol,
    pub memes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionCatalog {
    pub emotions: Vec<EmotionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_turn() -> ChatTurn {
        ChatTurn {
            user_text: "tell me a joke".into(),
            reply_text: "That's actually quite funny!".into(),
            symbol: ToneSymbol::new("😂"),
            chosen_media_url: "/laugh.jpeg".into(),
            candidate_urls: vec!["/laugh.jpeg".into(), "https://i.imgflip.com/30b1gx.jpg".into()],
            timestamp: "2025-02-12T10:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn chat_response_uses_client_field_names() {
        let resp = ChatResponse::from(&sample_turn());
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["answer"], "That's actually quite funny!");
        assert_eq!(json["emoji"], "😂");
        assert_eq!(json["meme"], "/laugh.jpeg");
        assert_eq!(json["allMemes"].as_array().unwrap().len(), 2);
        assert_eq!(json["timestamp"], "2025-02-12T10:00:00Z");
    }

    #[test]
    fn history_record_uses_snake_case_fields() {
        let record = HistoryRecord::from(&sample_turn());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["message"], "tell me a joke");
        assert_eq!(json["ai_reply"], "That's actually quite funny!");
        assert_eq!(json["meme_url"], "/laugh.jpeg");
        assert!(json["all_memes"].is_array());
    }

    #[test]
    fn history_record_without_all_memes_still_parses() {
        let raw = r#"{
            "message": "hi",
            "ai_reply": "hello",
            "emoji": "😊",
            "meme_url": "happy.jpeg",
            "timestamp": "2025-02-12T10:00:00Z"
        }"#;

        let record: HistoryRecord = serde_json::from_str(raw).unwrap();
        assert!(record.all_memes.is_empty());
        assert_eq!(record.emoji.as_str(), "😊");
    }

    #[test]
    fn chat_request_missing_message_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message(), "");
    }

    #[test]
    fn chat_request_null_message_is_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": null}"#).unwrap();
        assert!(req.message.is_none());
        assert_eq!(req.message(), "");

        let req: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(req.message(), "hi");
    }

    #[test]
    fn default_symbol_is_flagged() {
        assert!(ToneSymbol::default().is_default());
        assert!(!ToneSymbol::new("😭").is_default());
    }
}
