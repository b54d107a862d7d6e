//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`EngineConfig`] — fan-in behaviour (cache annotation policy)
//! - [`ServiceParams`] — message loop control (channel size, redelivery)

pub mod engine_config;
pub mod service_params;

pub use engine_config::EngineConfig;
pub use service_params::ServiceParams;
