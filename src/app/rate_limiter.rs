use anyhow::Result;

use crate::config::rate_limits::{current_window, RateWindow};
use crate::infra::cache::RedisCache;

#[derive(Clone)]
pub struct RateLimiter {
    cache: RedisCache,
}

impl RateLimiter {
    pub fn new(cache: RedisCache) -> Self {
        Self { cache }
    }

    /// Check rate limit by IP address (for unauthenticated requests)
    pub async fn check_ip_rate_limit(
        &self,
        ip: &str,
        action: &str,
        limit: u32,
        window: RateWindow,
    ) -> Result<bool> {
        let count = self.cache.counter(&ip_key(ip, action, window)).await?;

        if count >= limit {
            tracing::debug!(
                ip = ip,
                action = action,
                count = count,
                limit = limit,
                "IP rate limit exceeded"
            );
            return Ok(true);
        }

        Ok(false)
    }

    /// Increment IP-based rate limit counter
    pub async fn increment_ip(&self, ip: &str, action: &str, window: RateWindow) -> Result<()> {
        self.cache
            .bump_counter(&ip_key(ip, action, window), window.seconds())
            .await?;
        Ok(())
    }
}

fn ip_key(ip: &str, action: &str, window: RateWindow) -> String {
    format!(
        "ratelimit:ip:{}:{}:{}",
        ip,
        action,
        current_window(window.seconds())
    )
}
