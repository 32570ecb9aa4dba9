//! Time-ordered row identifiers.
//!
//! Ids are `(ms since EPOCH) << 22 | sequence`, rendered as decimal strings so
//! they sort by creation time both numerically and in `ORDER BY id` once
//! they share a length.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

// 2025-01-01T00:00:00Z
const EPOCH: u64 = 1_735_689_600_000;
const SEQUENCE_BITS: u32 = 22;

static LAST_ID: AtomicU64 = AtomicU64::new(0);

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(EPOCH)
}

pub fn generate() -> String {
    let base = now_ms().saturating_sub(EPOCH) << SEQUENCE_BITS;
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        // Same millisecond (or a clock step backwards): bump the sequence.
        let next = base.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(current) => last = current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_unique_ids() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_encodes_creation_time() {
        let id: u64 = generate().parse().unwrap();
        let ts = (id >> SEQUENCE_BITS) + EPOCH;
        let now = now_ms();
        assert!(ts <= now && ts + 1000 > now);
    }

    #[test]
    fn test_monotonically_increasing() {
        let ids: Vec<u64> = (0..500)
            .map(|_| generate().parse::<u64>().unwrap())
            .collect();
        for w in ids.windows(2) {
            assert!(w[0] < w[1], "ids should be strictly increasing");
        }
    }

    #[test]
    fn test_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| generate()).collect::<Vec<_>>()))
            .collect();
        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
