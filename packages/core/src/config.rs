use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default capacity of the recently-viewed list.
pub const DEFAULT_RECENTLY_VIEWED_CAPACITY: usize = 10;

/// Default upper bound on review comment length, in characters.
pub const DEFAULT_REVIEW_COMMENT_MAX_LEN: usize = 1000;

/// Core configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the file-backed substrate. `None` keeps everything in memory.
    pub storage_dir: Option<PathBuf>,
    /// Prefix for every substrate key written by the core.
    pub storage_prefix: String,
    pub recently_viewed_capacity: usize,
    pub review_comment_max_len: usize,
    /// Upper bound on the canonical subscription read before failing open.
    pub reconcile_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            storage_prefix: "marketplace".to_string(),
            recently_viewed_capacity: DEFAULT_RECENTLY_VIEWED_CAPACITY,
            review_comment_max_len: DEFAULT_REVIEW_COMMENT_MAX_LEN,
            reconcile_timeout: Duration::from_millis(5000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            storage_dir: env::var("MARKETPLACE_STORAGE_DIR").ok().map(PathBuf::from),
            storage_prefix: env::var("MARKETPLACE_STORAGE_PREFIX")
                .unwrap_or(defaults.storage_prefix),
            recently_viewed_capacity: match env::var("RECENTLY_VIEWED_CAPACITY") {
                Ok(raw) => raw
                    .parse()
                    .context("RECENTLY_VIEWED_CAPACITY must be a valid number")?,
                Err(_) => defaults.recently_viewed_capacity,
            },
            review_comment_max_len: match env::var("REVIEW_COMMENT_MAX_LEN") {
                Ok(raw) => raw
                    .parse()
                    .context("REVIEW_COMMENT_MAX_LEN must be a valid number")?,
                Err(_) => defaults.review_comment_max_len,
            },
            reconcile_timeout: match env::var("SUBSCRIPTION_RECONCILE_TIMEOUT_MS") {
                Ok(raw) => Duration::from_millis(
                    raw.parse()
                        .context("SUBSCRIPTION_RECONCILE_TIMEOUT_MS must be a valid number")?,
                ),
                Err(_) => defaults.reconcile_timeout,
            },
        })
    }

    /// Fully qualified substrate key for a storage slot.
    pub fn storage_key(&self, slot: &str) -> String {
        format!("{}.{}", self.storage_prefix, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_prefixed() {
        let config = Config::default();
        assert_eq!(
            config.storage_key("creators.modifications"),
            "marketplace.creators.modifications"
        );
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.recently_viewed_capacity, 10);
        assert_eq!(config.review_comment_max_len, 1000);
        assert_eq!(config.reconcile_timeout, Duration::from_secs(5));
        assert!(config.storage_dir.is_none());
    }
}
