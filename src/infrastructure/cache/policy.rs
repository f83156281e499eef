//! Key layout and expiry policy for cached profiles.

use rand::Rng;
use std::time::Duration;

/// Namespace prefix of every profile cache key.
pub const PROFILE_KEY_PREFIX: &str = "userinfo:get_profile:";

/// Computes cache keys and jittered expiries for profile entries.
///
/// Every entry lives `base + jitter` where `jitter` is drawn uniformly from
/// whole seconds in `[0, max_jitter)` on each write, so keys populated in the
/// same instant do not expire together.
#[derive(Debug, Clone)]
pub struct ProfileCachePolicy {
    key_prefix: String,
    base_ttl: Duration,
    max_jitter: Duration,
}

impl ProfileCachePolicy {
    pub fn new(base_ttl: Duration, max_jitter: Duration) -> Self {
        Self {
            key_prefix: PROFILE_KEY_PREFIX.to_string(),
            base_ttl,
            max_jitter,
        }
    }

    /// Cache key for a user's profile: prefix followed by the decimal user id.
    pub fn key(&self, user_id: i64) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }

    /// Draws a fresh expiry for one write.
    pub fn ttl(&self) -> Duration {
        let jitter_secs = self.max_jitter.as_secs();
        if jitter_secs == 0 {
            return self.base_ttl;
        }
        let shift = rand::rng().random_range(0..jitter_secs);
        self.base_ttl + Duration::from_secs(shift)
    }
}

impl Default for ProfileCachePolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Duration::from_secs(30))
    }
}
