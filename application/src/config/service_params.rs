//! Service parameters — message loop control.
//!
//! [`ServiceParams`] groups the static parameters of the
//! [`ToolService`](crate::use_cases::tool_service::ToolService) message loop.
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceParams {
    /// Capacity of the inbound message channel.
    pub channel_capacity: usize,
    /// Times a message is redelivered after a storage failure.
    pub max_redeliveries: u32,
    /// Wait before each redelivery.
    pub redelivery_delay: Duration,
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            max_redeliveries: 3,
            redelivery_delay: Duration::from_millis(500),
        }
    }
}

impl ServiceParams {
    // ==================== Builder Methods ====================

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn with_max_redeliveries(mut self, max: u32) -> Self {
        self.max_redeliveries = max;
        self
    }

    pub fn with_redelivery_delay(mut self, delay: Duration) -> Self {
        self.redelivery_delay = delay;
        self
    }
}
