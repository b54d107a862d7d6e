//! Model turn domain — the inbound unit the decomposition engine consumes.

pub mod message;

pub use message::{DispatchTrigger, ModelTurn, ToolUseRequest, TurnBlock, TurnRole};
