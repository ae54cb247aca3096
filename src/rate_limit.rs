use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per-identity submission rate limiter using a fixed window.
pub struct SubmissionRateLimiter {
    /// user_id -> (count, window_start)
    entries: DashMap<String, (u32, Instant)>,
}

impl Default for SubmissionRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Check if a submission is allowed. Returns Ok(()) or Err with retry-after seconds.
    /// A limit of 0 disables throttling.
    pub fn check(&self, user_id: &str, limit: u32, window_secs: u64) -> Result<(), u64> {
        if limit == 0 {
            return Ok(());
        }

        let window = Duration::from_secs(window_secs);
        let now = Instant::now();

        let mut entry = self
            .entries
            .entry(user_id.to_string())
            .or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > window {
            *count = 1;
            *start = now;
            return Ok(());
        }

        if *count >= limit {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(window_secs.saturating_sub(elapsed));
        }

        *count += 1;
        Ok(())
    }

    /// Remove stale entries older than the given duration.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_applies_per_identity() {
        let limiter = SubmissionRateLimiter::new();
        assert!(limiter.check("u1", 2, 60).is_ok());
        assert!(limiter.check("u1", 2, 60).is_ok());
        assert!(limiter.check("u1", 2, 60).is_err());
        assert!(limiter.check("u2", 2, 60).is_ok());
    }

    #[test]
    fn zero_limit_disables_throttling() {
        let limiter = SubmissionRateLimiter::new();
        for _ in 0..100 {
            assert!(limiter.check("u1", 0, 60).is_ok());
        }
        assert!(limiter.is_empty());
    }

    #[test]
    fn retry_after_is_within_window() {
        let limiter = SubmissionRateLimiter::new();
        limiter.check("u1", 1, 30).unwrap();
        let retry = limiter.check("u1", 1, 30).unwrap_err();
        assert!(retry <= 30);
    }

    #[test]
    fn cleanup_drops_old_windows() {
        let limiter = SubmissionRateLimiter::new();
        limiter.check("u1", 5, 60).unwrap();
        limiter.cleanup(Duration::ZERO);
        assert!(limiter.is_empty());
    }
}
