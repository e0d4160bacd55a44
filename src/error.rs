//! Error taxonomy for the assignment loop.
//!
//! Tracker errors are keyed by the operation that produced them so callers
//! can tell a recoverable per-issue failure from a per-cycle fetch failure.
//! Configuration errors are fatal and only occur before polling starts.

use thiserror::Error;

/// An error returned by one of the tracker port operations.
///
/// Each variant corresponds to one operation on the [`Tracker`] port and
/// carries the underlying cause as text. All variants are recoverable at
/// their own granularity: a `Search` failure ends the cycle (retried after
/// backoff with an unchanged cursor), the other three are isolated to a
/// single issue.
///
/// [`Tracker`]: crate::ports::Tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The issue search query failed (network, auth, or bad JQL).
    #[error("issue search failed: {0}")]
    Search(String),

    /// Assigning an issue failed.
    #[error("assign failed: {0}")]
    Assign(String),

    /// Listing the transitions available from an issue's current state failed.
    #[error("transition fetch failed: {0}")]
    TransitionFetch(String),

    /// Applying a workflow transition failed.
    #[error("transition apply failed: {0}")]
    TransitionApply(String),
}

/// Top-level error for startup and one-shot execution.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration. Fatal; aborts before any polling.
    #[error("configuration error: {0}")]
    Config(String),

    /// A tracker operation failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
