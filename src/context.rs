//! Service context bundling the port trait objects.

use crate::adapters::live::{JiraTracker, LiveClock};
use crate::config::Config;
use crate::ports::clock::Clock;
use crate::ports::tracker::Tracker;

/// Bundles the port trait objects into a single context.
///
/// Constructed once at process start and passed by reference to every
/// component; there is no ambient global state. Tests build one from mock
/// ports to script tracker behavior and control time.
pub struct ServiceContext {
    /// Clock for the poll cursor and for loop/backoff sleeps.
    pub clock: Box<dyn Clock>,
    /// The external issue tracker.
    pub tracker: Box<dyn Tracker>,
}

impl ServiceContext {
    /// Creates a live context: system clock plus a Jira REST client built
    /// from the configured server and credentials.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            clock: Box::new(LiveClock),
            tracker: Box::new(JiraTracker::new(&config.server, &config.email, &config.api_token)),
        }
    }

    /// Creates a context from explicit port implementations.
    ///
    /// This is the seam tests use to substitute mocks.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, tracker: Box<dyn Tracker>) -> Self {
        Self { clock, tracker }
    }
}
