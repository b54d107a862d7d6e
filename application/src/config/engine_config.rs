//! Engine configuration — what the fan-in aggregator needs beyond the store.

use toolrun_domain::CachePolicy;

/// Fan-in behaviour knobs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// When result blocks get the upstream cache hint.
    pub cache: CachePolicy,
}

impl EngineConfig {
    pub fn with_cache_policy(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }
}
