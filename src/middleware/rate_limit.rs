use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::AppError;
use crate::state::AttemptBucket;

/// Login attempts allowed per access code within one window.
pub const MAX_ATTEMPTS: u32 = 5;
/// Window duration in seconds; one attempt is restored every `WINDOW_SECS / MAX_ATTEMPTS`.
pub const WINDOW_SECS: u64 = 300;

const REFILL_EVERY: Duration = Duration::from_secs(WINDOW_SECS / MAX_ATTEMPTS as u64);

/// Consumes one login attempt for `key`, or fails with `RateLimited`.
pub fn check_login_attempt(
    buckets: &DashMap<String, AttemptBucket>,
    key: &str,
) -> Result<(), AppError> {
    take_attempt(buckets, key, Instant::now())
}

/// Forget the bucket after a successful login.
pub fn clear_login_attempts(buckets: &DashMap<String, AttemptBucket>, key: &str) {
    buckets.remove(key);
}

/// Drops buckets that have had a full window to refill; they would be
/// recreated identical on the next attempt. Returns how many were removed.
pub fn evict_idle_buckets(buckets: &DashMap<String, AttemptBucket>) -> usize {
    evict_at(buckets, Instant::now())
}

fn evict_at(buckets: &DashMap<String, AttemptBucket>, now: Instant) -> usize {
    let before = buckets.len();
    buckets.retain(|_, bucket| {
        now.saturating_duration_since(bucket.last_refill) < Duration::from_secs(WINDOW_SECS)
    });
    before.saturating_sub(buckets.len())
}

fn take_attempt(
    buckets: &DashMap<String, AttemptBucket>,
    key: &str,
    now: Instant,
) -> Result<(), AppError> {
    let mut entry = buckets
        .entry(key.to_string())
        .or_insert_with(|| AttemptBucket {
            remaining: MAX_ATTEMPTS,
            last_refill: now,
        });
    let bucket = entry.value_mut();

    let elapsed = now.saturating_duration_since(bucket.last_refill);
    let refill = (elapsed.as_secs() / REFILL_EVERY.as_secs()) as u32;
    if refill > 0 {
        bucket.remaining = (bucket.remaining + refill).min(MAX_ATTEMPTS);
        bucket.last_refill = if bucket.remaining == MAX_ATTEMPTS {
            now
        } else {
            bucket.last_refill + REFILL_EVERY * refill
        };
    }

    if bucket.remaining == 0 {
        let waited = now.saturating_duration_since(bucket.last_refill);
        let retry_after = REFILL_EVERY.saturating_sub(waited).as_secs().max(1);
        return Err(AppError::RateLimited { retry_after });
    }

    bucket.remaining -= 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max_attempts() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for _ in 0..MAX_ATTEMPTS {
            assert!(take_attempt(&buckets, "elf", now).is_ok());
        }
        match take_attempt(&buckets, "elf", now) {
            Err(AppError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, REFILL_EVERY.as_secs());
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[test]
    fn test_keys_are_independent() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for _ in 0..MAX_ATTEMPTS {
            take_attempt(&buckets, "elf", now).unwrap();
        }
        assert!(take_attempt(&buckets, "reindeer", now).is_ok());
    }

    #[test]
    fn test_refills_one_attempt_per_interval() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for _ in 0..MAX_ATTEMPTS {
            take_attempt(&buckets, "elf", now).unwrap();
        }
        let later = now + REFILL_EVERY;
        assert!(take_attempt(&buckets, "elf", later).is_ok());
        assert!(take_attempt(&buckets, "elf", later).is_err());
    }

    #[test]
    fn test_full_window_restores_everything() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for _ in 0..MAX_ATTEMPTS {
            take_attempt(&buckets, "elf", now).unwrap();
        }
        let later = now + Duration::from_secs(WINDOW_SECS * 2);
        for _ in 0..MAX_ATTEMPTS {
            assert!(take_attempt(&buckets, "elf", later).is_ok());
        }
    }

    #[test]
    fn test_idle_buckets_are_evicted() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for i in 0..10_000 {
            let _ = take_attempt(&buckets, &format!("guess-{i}"), now);
        }
        assert_eq!(buckets.len(), 10_000);

        let later = now + Duration::from_secs(WINDOW_SECS * 2);
        take_attempt(&buckets, "elf", later).unwrap();
        assert_eq!(evict_at(&buckets, later), 10_000);
        assert_eq!(buckets.len(), 1);
        assert!(buckets.contains_key("elf"));
    }

    #[test]
    fn test_eviction_keeps_limited_buckets() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for _ in 0..MAX_ATTEMPTS {
            take_attempt(&buckets, "elf", now).unwrap();
        }
        assert_eq!(evict_at(&buckets, now + REFILL_EVERY), 0);
        assert!(take_attempt(&buckets, "elf", now + REFILL_EVERY).is_ok());
        assert!(take_attempt(&buckets, "elf", now + REFILL_EVERY).is_err());
    }

    #[test]
    fn test_clear_resets_bucket() {
        let buckets = DashMap::new();
        let now = Instant::now();
        for _ in 0..MAX_ATTEMPTS {
            take_attempt(&buckets, "elf", now).unwrap();
        }
        clear_login_attempts(&buckets, "elf");
        assert!(take_attempt(&buckets, "elf", now).is_ok());
    }
}
