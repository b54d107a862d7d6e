//! Engine and message loop configuration (`[engine]`, `[service]` sections)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolrun_application::{EngineConfig, ServiceParams};
use toolrun_domain::CachePolicy;
use toolrun_domain::result::{DEFAULT_CACHE_DENY_LIST, DEFAULT_CACHE_THRESHOLD_BYTES};

/// Raw fan-in configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Combined text size above which result blocks get the cache hint
    pub cache_threshold_bytes: usize,
    /// Model-id substrings that never get the cache hint
    pub cache_deny_list: Vec<String>,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            cache_threshold_bytes: DEFAULT_CACHE_THRESHOLD_BYTES,
            cache_deny_list: DEFAULT_CACHE_DENY_LIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FileEngineConfig {
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::default().with_cache_policy(CachePolicy::new(
            self.cache_threshold_bytes,
            self.cache_deny_list.clone(),
        ))
    }
}

/// Raw message loop configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    pub channel_capacity: usize,
    pub max_redeliveries: u32,
    pub redelivery_delay_ms: u64,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        let params = ServiceParams::default();
        Self {
            channel_capacity: params.channel_capacity,
            max_redeliveries: params.max_redeliveries,
            redelivery_delay_ms: params.redelivery_delay.as_millis() as u64,
        }
    }
}

impl FileServiceConfig {
    pub fn to_service_params(&self) -> ServiceParams {
        ServiceParams::default()
            .with_channel_capacity(self.channel_capacity)
            .with_max_redeliveries(self.max_redeliveries)
            .with_redelivery_delay(Duration::from_millis(self.redelivery_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults_match_cache_policy() {
        let config = FileEngineConfig::default().to_engine_config();
        assert_eq!(config.cache, CachePolicy::default());
    }

    #[test]
    fn test_service_conversion() {
        let toml_str = r#"
[service]
channel_capacity = 16
redelivery_delay_ms = 50
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.service.to_service_params();
        assert_eq!(params.channel_capacity, 16);
        assert_eq!(params.max_redeliveries, 3);
        assert_eq!(params.redelivery_delay, Duration::from_millis(50));
    }
}
