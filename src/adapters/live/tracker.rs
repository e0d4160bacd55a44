//! Live adapter for the `Tracker` port using the Jira REST v2 API.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::ports::tracker::{Issue, Tracker, Transition};

/// Issue fields requested from the search endpoint.
const SEARCH_FIELDS: &str = "labels,status,created,assignee";

/// Live tracker client that calls a Jira server over REST v2.
///
/// Authenticates with basic auth (email + API token). All calls are
/// blocking; the loop driver is the only caller.
pub struct JiraTracker {
    client: Client,
    server: String,
    email: String,
    api_token: String,
}

impl JiraTracker {
    /// Creates a client for the given server URL and credential pair.
    ///
    /// A trailing slash on the server URL is tolerated.
    #[must_use]
    pub fn new(server: &str, email: &str, api_token: &str) -> Self {
        Self {
            client: Client::new(),
            server: server.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server)
    }
}

/// Response body of `GET /rest/api/2/search`.
#[derive(Deserialize)]
struct SearchResponse {
    issues: Vec<JiraIssue>,
}

/// One issue in a search response.
#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraFields,
}

/// The subset of issue fields the loop needs.
#[derive(Deserialize)]
struct JiraFields {
    created: String,
    #[serde(default)]
    labels: Vec<String>,
    status: JiraStatus,
    assignee: Option<JiraUser>,
}

/// An issue status object.
#[derive(Deserialize)]
struct JiraStatus {
    name: String,
}

/// A Jira user reference. Server deployments carry `name`, cloud carries
/// only an email address on some endpoints; either serves as identity here.
#[derive(Deserialize)]
struct JiraUser {
    name: Option<String>,
    #[serde(rename = "emailAddress")]
    email: Option<String>,
}

impl JiraUser {
    fn identity(self) -> Option<String> {
        self.name.or(self.email)
    }
}

/// Request body of `PUT /rest/api/2/issue/{key}/assignee`.
#[derive(Serialize)]
struct AssigneeBody<'a> {
    name: &'a str,
}

/// Response body of `GET /rest/api/2/issue/{key}/transitions`.
#[derive(Deserialize)]
struct TransitionsResponse {
    transitions: Vec<JiraTransition>,
}

/// One transition in a transitions response.
#[derive(Deserialize)]
struct JiraTransition {
    id: String,
    name: String,
}

/// Request body of `POST /rest/api/2/issue/{key}/transitions`.
#[derive(Serialize)]
struct ApplyTransitionBody<'a> {
    transition: TransitionRef<'a>,
}

/// The transition reference inside an apply request.
#[derive(Serialize)]
struct TransitionRef<'a> {
    id: &'a str,
}

/// Jira timestamps look like `2024-03-15T14:30:00.000+0000`.
fn parse_created(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("unparseable created timestamp {raw:?}: {e}"))
}

impl JiraIssue {
    fn into_issue(self) -> Result<Issue, String> {
        Ok(Issue {
            key: self.key,
            created: parse_created(&self.fields.created)?,
            status: self.fields.status.name,
            labels: self.fields.labels,
            assignee: self.fields.assignee.and_then(JiraUser::identity),
        })
    }
}

/// Reads a response, mapping transport failures and non-2xx statuses to
/// `make_err`. Returns the body text for the caller to deserialize.
fn read_body(
    response: reqwest::blocking::Response,
    make_err: fn(String) -> TrackerError,
) -> Result<String, TrackerError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| make_err(format!("failed to read response body: {e}")))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(make_err(format!("HTTP {}: {body}", status.as_u16())))
    }
}

impl Tracker for JiraTracker {
    fn search(&self, jql: &str) -> Result<Vec<Issue>, TrackerError> {
        let response = self
            .client
            .get(self.url("/rest/api/2/search"))
            .basic_auth(&self.email, Some(&self.api_token))
            .query(&[("jql", jql), ("fields", SEARCH_FIELDS)])
            .send()
            .map_err(|e| TrackerError::Search(format!("request failed: {e}")))?;

        let body = read_body(response, TrackerError::Search)?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| TrackerError::Search(format!("unexpected response shape: {e}")))?;

        parsed
            .issues
            .into_iter()
            .map(|issue| issue.into_issue().map_err(TrackerError::Search))
            .collect()
    }

    fn assign(&self, issue_key: &str, assignee: &str) -> Result<(), TrackerError> {
        let response = self
            .client
            .put(self.url(&format!("/rest/api/2/issue/{issue_key}/assignee")))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&AssigneeBody { name: assignee })
            .send()
            .map_err(|e| TrackerError::Assign(format!("request failed: {e}")))?;

        read_body(response, TrackerError::Assign).map(|_| ())
    }

    fn list_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, TrackerError> {
        let response = self
            .client
            .get(self.url(&format!("/rest/api/2/issue/{issue_key}/transitions")))
            .basic_auth(&self.email, Some(&self.api_token))
            .send()
            .map_err(|e| TrackerError::TransitionFetch(format!("request failed: {e}")))?;

        let body = read_body(response, TrackerError::TransitionFetch)?;
        let parsed: TransitionsResponse = serde_json::from_str(&body)
            .map_err(|e| TrackerError::TransitionFetch(format!("unexpected response shape: {e}")))?;

        Ok(parsed
            .transitions
            .into_iter()
            .map(|t| Transition { id: t.id, name: t.name })
            .collect())
    }

    fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), TrackerError> {
        let response = self
            .client
            .post(self.url(&format!("/rest/api/2/issue/{issue_key}/transitions")))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&ApplyTransitionBody { transition: TransitionRef { id: transition_id } })
            .send()
            .map_err(|e| TrackerError::TransitionApply(format!("request failed: {e}")))?;

        read_body(response, TrackerError::TransitionApply).map(|_| ())
    }
}
