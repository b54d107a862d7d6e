//! Result content types handed back to the conversation loop.

use crate::run::entities::ToolRunId;
use serde::{Deserialize, Serialize};

/// Declared shape of a completion payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// `{"text": "...", "citation": [...]}`
    Text,
    /// `{"type": "base64" | "url", "data": "...", "media_type": "..."}`
    Image,
    /// `{"error": "..."}`
    Error,
    /// `{"code": "..."}`
    Code,
}

impl ResultKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResultKind::Text => "text",
            ResultKind::Image => "image",
            ResultKind::Error => "error",
            ResultKind::Code => "code",
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an image result comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

/// One piece of a result block's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPiece {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        citations: Vec<serde_json::Value>,
    },
    Image {
        source: ImageSource,
    },
}

impl ContentPiece {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPiece::Text {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// Byte length of the text, zero for images.
    pub fn text_len(&self) -> usize {
        match self {
            ContentPiece::Text { text, .. } => text.len(),
            ContentPiece::Image { .. } => 0,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPiece::Text { text, .. } => Some(text),
            ContentPiece::Image { .. } => None,
        }
    }
}

/// Upstream provider cache hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheControl {
    Ephemeral,
}

/// The result for one tool use id, as the conversation loop resumes with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBlock {
    pub tool_use_id: ToolRunId,
    pub content: Vec<ContentPiece>,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<CacheControl>,
}

impl ResultBlock {
    pub fn new(tool_use_id: ToolRunId, content: Vec<ContentPiece>, is_error: bool) -> Self {
        Self {
            tool_use_id,
            content,
            is_error,
            cache_control: None,
        }
    }

    pub fn cached(mut self, cache: bool) -> Self {
        self.cache_control = cache.then_some(CacheControl::Ephemeral);
        self
    }

    pub fn is_cached(&self) -> bool {
        self.cache_control.is_some()
    }

    /// Combined byte length of all text pieces.
    pub fn text_len(&self) -> usize {
        self.content.iter().map(ContentPiece::text_len).sum()
    }
}
