//! Engine configuration

use serde::{Deserialize, Serialize};

/// Configuration for [`QueryEngine`](crate::engine::QueryEngine)
///
/// # Examples
///
/// ```rust
/// use jmes_eval::EngineConfig;
///
/// let config = EngineConfig::default().with_cache_size(64);
/// assert!(config.cache_enabled);
/// assert_eq!(config.max_cache_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cache trees decoded from JSON text, keyed by that text. Default: true
    pub cache_enabled: bool,

    /// Maximum number of cached trees. The cache is cleared when it is full
    /// and a new tree arrives. Default: 1000
    pub max_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_cache_size: 1000,
        }
    }
}

impl EngineConfig {
    /// Create new configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the tree cache
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set maximum cache size
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_cache_size": 5}"#).unwrap();
        assert_eq!(config, EngineConfig::default().with_cache_size(5));
    }
}
