use std::time::{SystemTime, UNIX_EPOCH};

/// Per-IP limits for the unauthenticated credential endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRateLimits {
    pub login_attempts_per_hour: u32,
    pub signups_per_day: u32,
}

impl AuthRateLimits {
    /// Limit rule for a request, keyed by action name. Matches on the path
    /// suffix so the rule holds whether or not the router is nested.
    pub fn rule_for(&self, path: &str, method: &str) -> Option<(&'static str, u32, RateWindow)> {
        if method != "POST" {
            return None;
        }
        if path.ends_with("/auth/login") {
            Some(("login", self.login_attempts_per_hour, RateWindow::Hour))
        } else if path.ends_with("/auth/register") {
            Some(("signup", self.signups_per_day, RateWindow::Day))
        } else {
            None
        }
    }
}

/// Time window for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateWindow {
    Hour,
    Day,
}

impl RateWindow {
    pub fn seconds(&self) -> u64 {
        match self {
            RateWindow::Hour => 3600,
            RateWindow::Day => 86400,
        }
    }
}

/// Calculate current window timestamp for rate limiting
pub fn current_window(window_seconds: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    now / window_seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: AuthRateLimits = AuthRateLimits {
        login_attempts_per_hour: 10,
        signups_per_day: 3,
    };

    #[test]
    fn login_and_register_are_limited() {
        assert_eq!(
            LIMITS.rule_for("/api/auth/login", "POST"),
            Some(("login", 10, RateWindow::Hour))
        );
        assert_eq!(
            LIMITS.rule_for("/auth/register", "POST"),
            Some(("signup", 3, RateWindow::Day))
        );
    }

    #[test]
    fn other_requests_are_not_limited() {
        assert_eq!(LIMITS.rule_for("/api/auth/login", "GET"), None);
        assert_eq!(LIMITS.rule_for("/api/auth/refresh", "POST"), None);
        assert_eq!(LIMITS.rule_for("/api/recipes", "GET"), None);
    }

    #[test]
    fn windows_advance_with_time() {
        assert!(current_window(RateWindow::Hour.seconds()) > 0);
        assert!(
            current_window(RateWindow::Day.seconds()) <= current_window(RateWindow::Hour.seconds())
        );
    }
}
