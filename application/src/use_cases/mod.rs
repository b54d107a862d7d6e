//! Use cases
//!
//! Application-level operations that orchestrate domain logic.
//!
//! - [`decompose_turn`] — model turn → run rows + dispatch plan
//! - [`dispatch_router`] — plan → execution families
//! - [`dispatch_turn`] — the two above, for one dispatch trigger
//! - [`gather_result`] — completion → fan-in → aggregated result
//! - [`tool_service`] — message loop hosting all of the above

pub mod decompose_turn;
pub mod dispatch_router;
pub mod dispatch_turn;
pub mod error;
pub mod gather_result;
pub mod tool_service;

#[cfg(test)]
pub(crate) mod test_support;
