//! HTTP tool endpoint configuration (`[standalone]` section)

use crate::executors::StandaloneSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw standalone executor configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStandaloneConfig {
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request
    pub retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for FileStandaloneConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            retries: 3,
            retry_delay_secs: 2,
        }
    }
}

impl FileStandaloneConfig {
    pub fn to_settings(&self) -> StandaloneSettings {
        StandaloneSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            retries: self.retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_executor() {
        assert_eq!(
            FileStandaloneConfig::default().to_settings(),
            StandaloneSettings::default()
        );
    }
}
