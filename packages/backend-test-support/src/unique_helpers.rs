//! Unique ids so tests sharing a store do not collide.

use std::sync::atomic::{AtomicI64, Ordering};

use once_cell::sync::Lazy;
use rand::Rng;

static NEXT_USER_ID: Lazy<AtomicI64> =
    Lazy::new(|| AtomicI64::new(rand::rng().random_range(1_000_000..2_000_000)));

/// A user id no other caller in this process has received.
pub fn unique_user_id() -> i64 {
    NEXT_USER_ID.fetch_add(1, Ordering::Relaxed)
}

/// `n` distinct user ids.
pub fn unique_user_ids(n: usize) -> Vec<i64> {
    (0..n).map(|_| unique_user_id()).collect()
}
