//! In-process messaging.
//!
//! Stands in for the external broker: inbound messages flow through an
//! `mpsc` channel into the [`ToolService`](toolrun_application::ToolService),
//! outbound events fan out to any number of subscribers over `broadcast`.

mod bus;

pub use bus::{InProcessBus, OutboundEvent};
