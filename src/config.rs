use serde::{Deserialize, Serialize};

use crate::foundation::error::{PatternError, PatternResult};

pub const DEFAULT_CACHE_KEY_PREFIX: &str = "patterntext";

/// Renderer settings. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// First component of every cache key.
    pub cache_key_prefix: String,
    /// When false, renders always recompute and never write to the cache.
    pub cache_enabled: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cache_key_prefix: DEFAULT_CACHE_KEY_PREFIX.to_string(),
            cache_enabled: true,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> PatternResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PatternResult<()> {
        if self.cache_key_prefix.trim().is_empty() {
            return Err(PatternError::validation("cache_key_prefix must be non-empty"));
        }
        if self.cache_key_prefix.contains(':') {
            return Err(PatternError::validation(
                "cache_key_prefix must not contain ':'",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
