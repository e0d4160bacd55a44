//! Transition engine: moves an assigned issue toward "In Progress".
//!
//! The workflow states and their legal transitions are owned by the tracker;
//! this engine only searches what the tracker currently offers and applies
//! the first match. When the target is not directly reachable it tries one
//! hop through the "Investigate" staging state.

use std::time::Duration;

use tracing::debug;

use crate::error::TrackerError;
use crate::ports::clock::Clock;
use crate::ports::tracker::{Tracker, Transition};

/// Wait after entering the staging state before re-reading the available
/// transitions; the tracker recomputes them asynchronously.
const STAGING_SETTLE: Duration = Duration::from_secs(2);

/// The fixed pair of workflow targets the engine steers toward.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    /// Accepted names for the primary target, matched case-insensitively.
    /// Any of them counts as "reached".
    pub primary: Vec<String>,
    /// Optional intermediate state used only when the primary target is not
    /// directly reachable.
    pub staging: Option<String>,
}

impl Default for TransitionPlan {
    fn default() -> Self {
        Self {
            primary: vec!["work in progress".to_string(), "in progress".to_string()],
            staging: Some("investigate".to_string()),
        }
    }
}

/// Where an issue ended up after a transition attempt.
#[derive(Debug)]
pub enum TransitionOutcome {
    /// The issue reached the primary target state.
    Reached,
    /// The issue entered the staging state but the primary target never
    /// became reachable. Terminal; reported, not fatal.
    PartiallyReached,
    /// Neither the primary target nor the staging state was reachable;
    /// the issue was left untouched.
    NotFound,
    /// A tracker call failed; remaining steps were abandoned and the issue
    /// is left in whatever state the last successful step produced.
    Failed(TrackerError),
}

/// First transition whose name matches any primary synonym, in tracker order.
fn find_primary<'a>(transitions: &'a [Transition], plan: &TransitionPlan) -> Option<&'a Transition> {
    transitions
        .iter()
        .find(|t| plan.primary.iter().any(|name| t.name.eq_ignore_ascii_case(name)))
}

/// First transition matching the staging name, in tracker order.
fn find_staging<'a>(transitions: &'a [Transition], name: &str) -> Option<&'a Transition> {
    transitions.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Tries to move the issue into the plan's primary target state.
///
/// Steps: fetch the available transitions and apply a primary match if one
/// exists; otherwise apply the staging transition, wait for the tracker to
/// recompute, and retry the primary search exactly once. If multiple
/// transitions match, the first in tracker order wins.
pub fn advance_to_wip(
    tracker: &dyn Tracker,
    clock: &dyn Clock,
    issue_key: &str,
    plan: &TransitionPlan,
) -> TransitionOutcome {
    let transitions = match tracker.list_transitions(issue_key) {
        Ok(transitions) => transitions,
        Err(e) => return TransitionOutcome::Failed(e),
    };

    if let Some(target) = find_primary(&transitions, plan) {
        debug!(issue = issue_key, transition = %target.name, "applying direct transition");
        return match tracker.apply_transition(issue_key, &target.id) {
            Ok(()) => TransitionOutcome::Reached,
            Err(e) => TransitionOutcome::Failed(e),
        };
    }

    let Some(staging_name) = plan.staging.as_deref() else {
        return TransitionOutcome::NotFound;
    };
    let Some(staging) = find_staging(&transitions, staging_name) else {
        return TransitionOutcome::NotFound;
    };

    debug!(issue = issue_key, transition = %staging.name, "staging through intermediate state");
    if let Err(e) = tracker.apply_transition(issue_key, &staging.id) {
        return TransitionOutcome::Failed(e);
    }

    // The tracker recomputes available transitions after a state change.
    clock.sleep(STAGING_SETTLE);

    let transitions = match tracker.list_transitions(issue_key) {
        Ok(transitions) => transitions,
        Err(e) => return TransitionOutcome::Failed(e),
    };

    match find_primary(&transitions, plan) {
        Some(target) => {
            debug!(issue = issue_key, transition = %target.name, "applying transition after staging");
            match tracker.apply_transition(issue_key, &target.id) {
                Ok(()) => TransitionOutcome::Reached,
                Err(e) => TransitionOutcome::Failed(e),
            }
        }
        None => TransitionOutcome::PartiallyReached,
    }
}
