//! Shaping of raw completion payloads into result content.
//!
//! Executors report free-form JSON. This module turns a payload plus its
//! declared [`ResultKind`] into [`ContentPiece`]s. Error payloads always
//! render as text, whatever kind they declare.

use super::content::{ContentPiece, ImageSource, ResultKind};
use crate::run::entities::ToolRun;
use serde_json::Value;
use thiserror::Error;

/// Text used when a successful run stored no result.
pub const EMPTY_SUCCESS_TEXT: &str = "Tool completed successfully with no result";

/// Text used when a failed run stored no result.
pub const EMPTY_FAILURE_TEXT: &str = "Tool execution failed with no result";

/// A payload that cannot be shaped as its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("image result is not an object")]
    ImageNotAnObject,

    #[error("image result is missing field '{0}'")]
    ImageMissingField(&'static str),

    #[error("unsupported image result type: {0}")]
    UnsupportedImageSource(String),
}

/// Content of one run, ready to be wrapped in a block.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedContent {
    pub content: Vec<ContentPiece>,
    pub is_error: bool,
}

/// Shape a payload according to its declared kind.
pub fn shape_content(
    payload: &Value,
    kind: ResultKind,
    is_error: bool,
) -> Result<Vec<ContentPiece>, ShapeError> {
    if is_error || kind == ResultKind::Error {
        return Ok(vec![ContentPiece::text(error_text(payload))]);
    }

    match kind {
        ResultKind::Text => Ok(vec![text_piece(payload, "text")]),
        ResultKind::Code => Ok(vec![text_piece(payload, "code")]),
        ResultKind::Image => image_piece(payload).map(|piece| vec![piece]),
        ResultKind::Error => Ok(vec![ContentPiece::text(error_text(payload))]),
    }
}

/// Guess the kind of a stored payload that carries no declared kind.
pub fn infer_kind(payload: &Value) -> ResultKind {
    let looks_like_image = payload.get("type").and_then(Value::as_str) == Some("image")
        || payload.get("media_type").is_some();
    if looks_like_image {
        ResultKind::Image
    } else {
        ResultKind::Text
    }
}

/// Shape the stored result of a terminal run.
///
/// Never fails: a missing result renders a fixed notice and an unshapeable
/// one renders as an error text, so a sibling set always produces a block
/// for every child.
pub fn shape_run(run: &ToolRun) -> ShapedContent {
    let is_error = run.is_failed();

    let Some(payload) = run.result.as_ref().filter(|v| !v.is_null()) else {
        let text = if is_error {
            EMPTY_FAILURE_TEXT
        } else {
            EMPTY_SUCCESS_TEXT
        };
        return ShapedContent {
            content: vec![ContentPiece::text(text)],
            is_error,
        };
    };

    let kind = run.result_kind.unwrap_or_else(|| infer_kind(payload));
    match shape_content(payload, kind, is_error) {
        Ok(content) => ShapedContent { content, is_error },
        Err(e) => ShapedContent {
            content: vec![ContentPiece::text(format!("Failed to process result: {}", e))],
            is_error: true,
        },
    }
}

fn error_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("error").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => payload.to_string(),
        },
        other => other.to_string(),
    }
}

fn text_piece(payload: &Value, field: &str) -> ContentPiece {
    let text = match payload {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get(field).and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => payload.to_string(),
        },
        other => other.to_string(),
    };

    let citations = payload
        .get("citation")
        .or_else(|| payload.get("citations"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    ContentPiece::Text { text, citations }
}

fn image_piece(payload: &Value) -> Result<ContentPiece, ShapeError> {
    let object = payload.as_object().ok_or(ShapeError::ImageNotAnObject)?;
    let source_type = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ShapeError::ImageMissingField("type"))?;
    let data = || {
        object
            .get("data")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ShapeError::ImageMissingField("data"))
    };

    let source = match source_type {
        "base64" => ImageSource::Base64 {
            media_type: object
                .get("media_type")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(ShapeError::ImageMissingField("media_type"))?,
            data: data()?,
        },
        "url" => ImageSource::Url { url: data()? },
        other => return Err(ShapeError::UnsupportedImageSource(other.to_string())),
    };

    Ok(ContentPiece::Image { source })
}
