//! Live adapters backed by the system clock and the real tracker API.

pub mod clock;
pub mod tracker;

pub use clock::LiveClock;
pub use tracker::JiraTracker;
