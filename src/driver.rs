//! Loop driver: fetch, process, sleep, repeat.
//!
//! One sequential pass per cycle: build the query window, search, advance
//! the cursor, then hand each issue to the assignment engine in the order
//! the tracker returned them. Failures are isolated per issue; a fetch
//! failure ends the cycle early with the cursor untouched.

use std::time::Duration;

use tracing::{error, info};

use crate::assign::{evaluate_and_assign, AssignmentOutcome};
use crate::config::{AssignmentRule, Config};
use crate::context::ServiceContext;
use crate::cursor::PollCursor;
use crate::error::{Result, TrackerError};
use crate::transition::TransitionPlan;

/// Delay before retrying after a failed fetch cycle.
const ERROR_BACKOFF: Duration = Duration::from_secs(60);

/// Per-cycle issue counts, for the cycle summary log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Issues returned by the search.
    pub fetched: usize,
    /// Issues assigned (regardless of their transition outcome).
    pub assigned: usize,
    /// Issues skipped by the label gate.
    pub skipped: usize,
    /// Issues whose assign call failed.
    pub failed: usize,
}

/// The JQL selecting newly created, unassigned issues in the project.
///
/// The window has no upper bound: anything created since the cursor's lower
/// bound is eligible, including issues created mid-fetch.
fn build_jql(project_key: &str, lower_bound: chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "project = {project_key} AND created >= '{}' AND assignee is EMPTY",
        lower_bound.format("%Y-%m-%d %H:%M")
    )
}

/// Runs one fetch + process pass.
///
/// The cursor advances only after the search succeeds, so a failed search
/// retries the same window next cycle.
///
/// # Errors
///
/// Returns the search error; per-issue failures are counted, not returned.
pub fn run_cycle(
    ctx: &ServiceContext,
    rule: &AssignmentRule,
    plan: &TransitionPlan,
    cursor: &mut PollCursor,
) -> std::result::Result<CycleOutcome, TrackerError> {
    let jql = build_jql(&rule.project_key, cursor.lower_bound());
    let issues = ctx.tracker.search(&jql)?;
    cursor.advance(ctx.clock.as_ref());

    let mut outcome = CycleOutcome { fetched: issues.len(), ..CycleOutcome::default() };
    for issue in &issues {
        match evaluate_and_assign(ctx.tracker.as_ref(), ctx.clock.as_ref(), issue, rule, plan) {
            AssignmentOutcome::Assigned(_) => outcome.assigned += 1,
            AssignmentOutcome::Skipped => outcome.skipped += 1,
            AssignmentOutcome::Failed(_) => outcome.failed += 1,
        }
    }
    Ok(outcome)
}

/// Runs a single cycle and exits: the one-shot / triggered entry point.
///
/// # Errors
///
/// Returns the fetch error if the search fails; one-shot mode has no retry.
pub fn run_once(ctx: &ServiceContext, config: &Config) -> Result<CycleOutcome> {
    let plan = TransitionPlan::default();
    let mut cursor = PollCursor::initialize(ctx.clock.as_ref());
    let outcome = run_cycle(ctx, &config.rule, &plan, &mut cursor)?;
    log_summary(outcome);
    Ok(outcome)
}

/// One daemon iteration: cycle, then sleep the interval appropriate to the
/// result. Split out from [`run_forever`] so the backoff behavior is
/// testable.
fn tick(
    ctx: &ServiceContext,
    rule: &AssignmentRule,
    plan: &TransitionPlan,
    cursor: &mut PollCursor,
    interval: Duration,
) {
    match run_cycle(ctx, rule, plan, cursor) {
        Ok(outcome) => {
            log_summary(outcome);
            ctx.clock.sleep(interval);
        }
        Err(e) => {
            error!(error = %e, "poll cycle failed; backing off");
            ctx.clock.sleep(ERROR_BACKOFF);
        }
    }
}

/// Polls forever: the daemon entry point. Termination is external.
pub fn run_forever(ctx: &ServiceContext, config: &Config) -> ! {
    let plan = TransitionPlan::default();
    let mut cursor = PollCursor::initialize(ctx.clock.as_ref());
    info!(
        project = %config.rule.project_key,
        interval_seconds = config.poll_interval.as_secs(),
        "starting assignment loop"
    );
    loop {
        tick(ctx, &config.rule, &plan, &mut cursor, config.poll_interval);
    }
}

fn log_summary(outcome: CycleOutcome) {
    info!(
        fetched = outcome.fetched,
        assigned = outcome.assigned,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "poll cycle complete"
    );
}
