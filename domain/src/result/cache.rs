//! Cache annotation heuristic.
//!
//! Large tool results are worth caching upstream, except on model families
//! known to reject the cache hint. A pure function of content size and model
//! id; no state.

use super::content::ContentPiece;
use serde::{Deserialize, Serialize};

/// Text size above which a result is marked cacheable (40 KiB).
pub const DEFAULT_CACHE_THRESHOLD_BYTES: usize = 40 * 1024;

/// Model-family identifiers that do not support the cache hint.
pub const DEFAULT_CACHE_DENY_LIST: &[&str] = &["3-haiku", "3-5-sonnet"];

/// When to mark a result block cacheable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Strict lower bound on combined text bytes
    pub threshold_bytes: usize,
    /// Case-insensitive substrings of unsupported model ids
    pub deny_list: Vec<String>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            threshold_bytes: DEFAULT_CACHE_THRESHOLD_BYTES,
            deny_list: DEFAULT_CACHE_DENY_LIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CachePolicy {
    pub fn new(threshold_bytes: usize, deny_list: Vec<String>) -> Self {
        Self {
            threshold_bytes,
            deny_list,
        }
    }

    /// Whether `content` should carry the cache hint for `model_id`.
    ///
    /// An unknown model never gets the hint.
    pub fn should_cache(&self, content: &[ContentPiece], model_id: Option<&str>) -> bool {
        let mut total = 0usize;
        for piece in content {
            total += piece.text_len();
            if total > self.threshold_bytes {
                return model_id.is_some_and(|id| self.model_supports_caching(id));
            }
        }
        false
    }

    pub fn model_supports_caching(&self, model_id: &str) -> bool {
        let model_id = model_id.to_lowercase();
        !self
            .deny_list
            .iter()
            .any(|denied| model_id.contains(&denied.to_lowercase()))
    }
}
