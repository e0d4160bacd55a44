//! Clock port for obtaining the current time and pausing.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Provides the current time and blocking delays.
///
/// Abstracting time access keeps the poll cursor and the loop driver
/// deterministic under test: a mock clock can advance on demand and record
/// requested sleeps instead of actually waiting.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Blocks the calling thread for the given duration.
    fn sleep(&self, duration: Duration);
}
