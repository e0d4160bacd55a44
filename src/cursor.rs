//! Poll cursor: the lower time bound for "newly created" issues.

use chrono::{DateTime, Duration, Utc};

use crate::ports::clock::Clock;

/// Lookback applied at initialization to tolerate clock skew and tracker
/// indexing lag.
const LOOKBACK_MINUTES: i64 = 5;

/// The timestamp boundary that keeps each poll from re-reading old issues.
///
/// The query window is `[lower_bound, ∞)` — no upper bound, so issues
/// created while a fetch is in flight are still picked up next cycle.
/// Invariants: the cursor never moves backwards, and it advances only after
/// a successful fetch, so a failed fetch retries the same window.
#[derive(Debug, Clone, Copy)]
pub struct PollCursor {
    since: DateTime<Utc>,
}

impl PollCursor {
    /// Creates a cursor positioned five minutes before now.
    #[must_use]
    pub fn initialize(clock: &dyn Clock) -> Self {
        Self { since: clock.now() - Duration::minutes(LOOKBACK_MINUTES) }
    }

    /// The inclusive lower bound of the current query window.
    #[must_use]
    pub fn lower_bound(&self) -> DateTime<Utc> {
        self.since
    }

    /// Moves the cursor to now. Call only after the fetch that used this
    /// cursor's window has returned successfully.
    pub fn advance(&mut self, clock: &dyn Clock) {
        let now = clock.now();
        if now > self.since {
            self.since = now;
        }
    }
}
