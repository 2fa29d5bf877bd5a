//! Timestamp-based entity ids.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Issues ids from the current time in milliseconds.
///
/// Ids are strictly increasing within the process: when the clock has not
/// moved past the last id, the next one is the last id plus one.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_after(Utc::now().timestamp_millis()).to_string()
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = if now > prev { now } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}
