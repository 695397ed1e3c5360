use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Time source for the cache, injected so tests can drive it.
pub trait Clock: Send + Sync {
    fn now_unix_ts(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ts(&self) -> i64 {
        now_i64()
    }
}

/// Hand-driven clock for virtual-time tests.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start_unix_ts: i64) -> Self {
        Self(AtomicI64::new(start_unix_ts))
    }

    pub fn set(&self, unix_ts: i64) {
        self.0.store(unix_ts, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix_ts(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
