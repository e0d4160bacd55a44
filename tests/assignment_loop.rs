//! End-to-end test of a one-shot cycle through the public API.
//!
//! Drives `run_once` against mock ports: a mixed batch where one issue
//! passes the label gate (and walks the full assign + transition path) while
//! another is skipped, plus the failed-fetch path where the cycle errors out
//! without touching any issue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use assignbot::config::{AssignmentRule, Config};
use assignbot::context::ServiceContext;
use assignbot::driver::{run_once, CycleOutcome};
use assignbot::error::{Error, TrackerError};
use assignbot::ports::clock::Clock;
use assignbot::ports::tracker::{Issue, Tracker, Transition};

/// Everything the mock tracker observed, shared with the test body.
#[derive(Default)]
struct Observed {
    assigned: Mutex<Vec<(String, String)>>,
    applied: Mutex<Vec<(String, String)>>,
}

/// Scripted tracker: one search result, one transitions list per fetch.
struct MockTracker {
    search_result: Mutex<Option<Result<Vec<Issue>, TrackerError>>>,
    transition_rounds: Mutex<VecDeque<Vec<Transition>>>,
    observed: Arc<Observed>,
}

impl MockTracker {
    fn new(
        search_result: Result<Vec<Issue>, TrackerError>,
        transition_rounds: Vec<Vec<Transition>>,
        observed: Arc<Observed>,
    ) -> Self {
        Self {
            search_result: Mutex::new(Some(search_result)),
            transition_rounds: Mutex::new(transition_rounds.into()),
            observed,
        }
    }
}

impl Tracker for MockTracker {
    fn search(&self, _jql: &str) -> Result<Vec<Issue>, TrackerError> {
        self.search_result
            .lock()
            .unwrap()
            .take()
            .expect("search scripted for exactly one cycle")
    }

    fn assign(&self, issue_key: &str, assignee: &str) -> Result<(), TrackerError> {
        self.observed
            .assigned
            .lock()
            .unwrap()
            .push((issue_key.to_string(), assignee.to_string()));
        Ok(())
    }

    fn list_transitions(&self, _issue_key: &str) -> Result<Vec<Transition>, TrackerError> {
        Ok(self.transition_rounds.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), TrackerError> {
        self.observed
            .applied
            .lock()
            .unwrap()
            .push((issue_key.to_string(), transition_id.to_string()));
        Ok(())
    }
}

/// Fixed clock; sleeps return immediately.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn sleep(&self, _duration: Duration) {}
}

fn config() -> Config {
    Config {
        server: "https://jira.example.com".into(),
        email: "bot@example.com".into(),
        api_token: "token".into(),
        rule: AssignmentRule {
            project_key: "OPS".into(),
            labels: vec!["dynatrace".into(), "tracing".into()],
            assignee: "bot@example.com".into(),
        },
        poll_interval: Duration::from_secs(300),
    }
}

fn issue(key: &str, labels: &[&str]) -> Issue {
    Issue {
        key: key.to_string(),
        created: Utc::now(),
        status: "Open".to_string(),
        labels: labels.iter().map(ToString::to_string).collect(),
        assignee: None,
    }
}

#[test]
fn one_shot_cycle_assigns_gated_issues_and_walks_the_workflow() {
    let observed = Arc::new(Observed::default());
    let tracker = MockTracker::new(
        Ok(vec![issue("OPS-1", &["tracing"]), issue("OPS-2", &["billing"])]),
        // OPS-1 stages through Investigate, then In Progress appears.
        vec![
            vec![Transition { id: "41".into(), name: "Investigate".into() }],
            vec![Transition { id: "21".into(), name: "In Progress".into() }],
        ],
        Arc::clone(&observed),
    );
    let clock = FixedClock(Utc::now());
    let ctx = ServiceContext::new(Box::new(clock), Box::new(tracker));

    let outcome = run_once(&ctx, &config()).unwrap();

    assert_eq!(outcome, CycleOutcome { fetched: 2, assigned: 1, skipped: 1, failed: 0 });

    // Only the gated issue was assigned, to the configured assignee.
    assert_eq!(
        *observed.assigned.lock().unwrap(),
        vec![("OPS-1".to_string(), "bot@example.com".to_string())]
    );
    // Two applies, both on OPS-1: the staging hop then the target.
    assert_eq!(
        *observed.applied.lock().unwrap(),
        vec![
            ("OPS-1".to_string(), "41".to_string()),
            ("OPS-1".to_string(), "21".to_string()),
        ]
    );
}

#[test]
fn one_shot_cycle_propagates_a_fetch_failure() {
    let observed = Arc::new(Observed::default());
    let tracker = MockTracker::new(
        Err(TrackerError::Search("HTTP 401: expired token".into())),
        Vec::new(),
        Arc::clone(&observed),
    );
    let clock = FixedClock(Utc::now());
    let ctx = ServiceContext::new(Box::new(clock), Box::new(tracker));

    let err = run_once(&ctx, &config()).unwrap_err();

    assert!(matches!(err, Error::Tracker(TrackerError::Search(_))));
    assert!(observed.assigned.lock().unwrap().is_empty());
    assert!(observed.applied.lock().unwrap().is_empty());
}
