//! Time-based synthetic ids.

use chrono::Utc;
use std::cell::Cell;

use crate::ports::id_port::IdPort;

/// Millisecond timestamps, strictly increasing within one adapter even when
/// several ids are requested in the same millisecond.
#[derive(Debug, Default)]
pub struct ClockIdAdapter {
    last: Cell<u64>,
}

impl ClockIdAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdPort for ClockIdAdapter {
    fn next_id(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(self.last.get() + 1);
        self.last.set(id);
        id
    }
}
