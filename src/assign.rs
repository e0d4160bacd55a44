//! Assignment decision engine: the label gate and the assign call.

use tracing::{info, warn};

use crate::config::AssignmentRule;
use crate::error::TrackerError;
use crate::ports::clock::Clock;
use crate::ports::tracker::{Issue, Tracker};
use crate::transition::{advance_to_wip, TransitionOutcome, TransitionPlan};

/// What happened to one issue during a poll cycle.
#[derive(Debug)]
pub enum AssignmentOutcome {
    /// The issue was assigned. Carries the subsequent transition outcome;
    /// a failed transition after a successful assignment is still
    /// `Assigned` overall.
    Assigned(TransitionOutcome),
    /// The issue's labels did not intersect the rule's label set; no
    /// tracker call was made.
    Skipped,
    /// The assign call itself failed. Isolated to this issue.
    Failed(TrackerError),
}

/// Decides whether the issue qualifies for assignment and performs it.
///
/// The upstream query already restricts results to unassigned issues, so
/// the assignee is not re-checked here. On a successful assignment the
/// transition engine runs as a side effect; its failures are logged but
/// never surfaced as an assignment failure.
pub fn evaluate_and_assign(
    tracker: &dyn Tracker,
    clock: &dyn Clock,
    issue: &Issue,
    rule: &AssignmentRule,
    plan: &TransitionPlan,
) -> AssignmentOutcome {
    if !rule.matches(&issue.labels) {
        return AssignmentOutcome::Skipped;
    }

    if let Err(e) = tracker.assign(&issue.key, &rule.assignee) {
        warn!(issue = %issue.key, error = %e, "failed to assign issue");
        return AssignmentOutcome::Failed(e);
    }
    info!(issue = %issue.key, assignee = %rule.assignee, "assigned issue");

    let transition = advance_to_wip(tracker, clock, &issue.key, plan);
    match &transition {
        TransitionOutcome::Reached => {
            info!(issue = %issue.key, "issue moved to in progress");
        }
        TransitionOutcome::PartiallyReached => {
            warn!(issue = %issue.key, "issue parked in staging state; target not reachable");
        }
        TransitionOutcome::NotFound => {
            warn!(issue = %issue.key, "no usable workflow transition; issue left as assigned");
        }
        TransitionOutcome::Failed(e) => {
            warn!(issue = %issue.key, error = %e, "transition attempt failed after assignment");
        }
    }

    AssignmentOutcome::Assigned(transition)
}
