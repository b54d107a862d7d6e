//! Result domain — turning stored run results into result blocks.
//!
//! - [`content`] — `ResultKind`, `ContentPiece`, `ResultBlock`
//! - [`shaping`] — payload → content pieces, with fallbacks
//! - [`cache`] — the size/model cache annotation heuristic

pub mod cache;
pub mod content;
pub mod shaping;

pub use cache::{CachePolicy, DEFAULT_CACHE_DENY_LIST, DEFAULT_CACHE_THRESHOLD_BYTES};
pub use content::{CacheControl, ContentPiece, ImageSource, ResultBlock, ResultKind};
pub use shaping::{ShapeError, ShapedContent, infer_kind, shape_content, shape_run};
