use chrono::Utc;

/// Source of the millisecond timestamps used for seeds and file names.
pub trait TimeSource: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Always returns the same instant. Makes seed sequences reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl TimeSource for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
