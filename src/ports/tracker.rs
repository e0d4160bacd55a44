//! Issue tracker port: search, assign, and workflow transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// An issue as returned by a tracker search.
///
/// Issues are ephemeral: fetched fresh each poll cycle, never persisted.
/// The tracker owns the authoritative state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The issue key (e.g. `"OPS-142"`).
    pub key: String,
    /// When the issue was created.
    pub created: DateTime<Utc>,
    /// The current workflow status name (e.g. `"Open"`).
    pub status: String,
    /// Labels attached to the issue.
    pub labels: Vec<String>,
    /// The current assignee identity, if any.
    pub assignee: Option<String>,
}

/// A workflow transition available from an issue's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The tracker-assigned transition id, used to apply it.
    pub id: String,
    /// The transition name (e.g. `"In Progress"`).
    pub name: String,
}

/// Read/write access to the external issue tracker.
///
/// Abstracting the tracker allows the assignment and transition engines to
/// be tested against scripted mocks without touching a real tracker API.
/// All operations are synchronous, blocking calls; the loop driver is the
/// only caller, one issue at a time.
pub trait Tracker: Send + Sync {
    /// Runs a JQL search and returns the matching issues in tracker order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Search`] on network, auth, or query failure.
    fn search(&self, jql: &str) -> Result<Vec<Issue>, TrackerError>;

    /// Assigns the issue to the given assignee identity.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Assign`] if the assignment is rejected.
    fn assign(&self, issue_key: &str, assignee: &str) -> Result<(), TrackerError>;

    /// Lists the transitions currently available from the issue's live
    /// state, in the order the tracker returns them.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TransitionFetch`] if the list cannot be read.
    fn list_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, TrackerError>;

    /// Applies the transition with the given id to the issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TransitionApply`] if the tracker rejects it.
    fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), TrackerError>;
}
