//! Configuration loading and the assignment rule snapshot.
//!
//! Values come from a YAML file, with each field independently overridable
//! by an environment variable. Loaded once at process start; invalid or
//! missing values are fatal before any polling begins.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Poll interval used when the file and environment specify none.
const DEFAULT_INTERVAL_SECONDS: u64 = 300;

/// Raw YAML file layout.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    jira: JiraSection,
    #[serde(default)]
    assignment: AssignmentSection,
    #[serde(default)]
    polling: PollingSection,
}

/// The `jira:` section — server URL and credential pair.
#[derive(Debug, Default, Deserialize)]
struct JiraSection {
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    api_token: Option<String>,
}

/// The `assignment:` section — project, label gate, and assignee.
#[derive(Debug, Default, Deserialize)]
struct AssignmentSection {
    #[serde(default)]
    project_key: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    assignee: Option<String>,
}

/// The `polling:` section — cadence between successful cycles.
#[derive(Debug, Default, Deserialize)]
struct PollingSection {
    #[serde(default)]
    interval_seconds: Option<u64>,
}

/// What makes an issue eligible for assignment, and to whom.
///
/// Immutable for the process lifetime; a snapshot of configuration.
#[derive(Debug, Clone)]
pub struct AssignmentRule {
    /// The project whose new issues are polled.
    pub project_key: String,
    /// Labels that gate assignment; at least one must be on the issue.
    pub labels: Vec<String>,
    /// Identity the eligible issues are assigned to.
    pub assignee: String,
}

impl AssignmentRule {
    /// Returns true when the issue's labels intersect the rule's label set.
    ///
    /// Exact string match; an empty issue label set never qualifies.
    #[must_use]
    pub fn matches(&self, issue_labels: &[String]) -> bool {
        issue_labels.iter().any(|label| self.labels.contains(label))
    }
}

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Jira server.
    pub server: String,
    /// Login email for basic auth.
    pub email: String,
    /// API token for basic auth.
    pub api_token: String,
    /// The single assignment rule driving the loop.
    pub rule: AssignmentRule,
    /// Delay between successful poll cycles.
    pub poll_interval: Duration,
}

impl Config {
    /// Loads configuration from a YAML file plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed, or
    /// when a required field is missing or empty after overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let file: FileConfig = serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!("cannot parse config file {}: {e}", path.display()))
        })?;
        Self::from_parts(file, |name| std::env::var(name).ok())
    }

    /// Merges file values with environment overrides and validates.
    ///
    /// `lookup` abstracts the environment so tests can inject overrides
    /// without mutating real process state.
    fn from_parts<F>(file: FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = lookup("JIRA_SERVER").or(file.jira.server);
        let email = lookup("JIRA_EMAIL").or(file.jira.email);
        let api_token = lookup("JIRA_API_TOKEN").or(file.jira.api_token);
        let project_key = lookup("JIRA_PROJECT_KEY").or(file.assignment.project_key);
        let assignee = lookup("JIRA_ASSIGNEE").or(file.assignment.assignee);

        let labels = match lookup("JIRA_LABELS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect(),
            None => file.assignment.labels,
        };

        let interval_seconds = match lookup("POLL_INTERVAL_SECONDS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("POLL_INTERVAL_SECONDS must be an integer, got {raw:?}"))
            })?),
            None => file.polling.interval_seconds,
        };

        if labels.is_empty() {
            return Err(Error::Config("assignment label set must not be empty".into()));
        }

        Ok(Self {
            server: required("jira.server / JIRA_SERVER", server)?,
            email: required("jira.email / JIRA_EMAIL", email)?,
            api_token: required("jira.api_token / JIRA_API_TOKEN", api_token)?,
            rule: AssignmentRule {
                project_key: required("assignment.project_key / JIRA_PROJECT_KEY", project_key)?,
                labels,
                assignee: required("assignment.assignee / JIRA_ASSIGNEE", assignee)?,
            },
            poll_interval: Duration::from_secs(
                interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS),
            ),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!("missing required field: {field}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FULL_YAML: &str = r"
jira:
  server: https://jira.example.com
  email: bot@example.com
  api_token: file-token
assignment:
  project_key: OPS
  labels: [dynatrace, tracing]
  assignee: bot@example.com
polling:
  interval_seconds: 120
";

    fn no_env(_name: &str) -> Option<String> {
        None
    }

    fn parse(yaml: &str) -> FileConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn loads_all_fields_from_file() {
        let config = Config::from_parts(parse(FULL_YAML), no_env).unwrap();
        assert_eq!(config.server, "https://jira.example.com");
        assert_eq!(config.rule.project_key, "OPS");
        assert_eq!(config.rule.labels, vec!["dynatrace", "tracing"]);
        assert_eq!(config.poll_interval, Duration::from_secs(120));
    }

    #[test]
    fn env_overrides_win_per_field() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("JIRA_API_TOKEN", "env-token"),
            ("JIRA_LABELS", "billing, infra"),
            ("POLL_INTERVAL_SECONDS", "30"),
        ]);
        let lookup = |name: &str| env.get(name).map(ToString::to_string);

        let config = Config::from_parts(parse(FULL_YAML), lookup).unwrap();
        // Overridden fields.
        assert_eq!(config.api_token, "env-token");
        assert_eq!(config.rule.labels, vec!["billing", "infra"]);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        // Untouched fields keep file values.
        assert_eq!(config.server, "https://jira.example.com");
        assert_eq!(config.rule.assignee, "bot@example.com");
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let yaml = r"
assignment:
  project_key: OPS
  labels: [tracing]
  assignee: bot@example.com
";
        let err = Config::from_parts(parse(yaml), no_env).unwrap_err();
        assert!(err.to_string().contains("jira.server"));
    }

    #[test]
    fn empty_label_set_is_fatal() {
        let yaml = r"
jira:
  server: https://jira.example.com
  email: bot@example.com
  api_token: t
assignment:
  project_key: OPS
  assignee: bot@example.com
";
        let err = Config::from_parts(parse(yaml), no_env).unwrap_err();
        assert!(err.to_string().contains("label set"));
    }

    #[test]
    fn interval_defaults_when_absent() {
        let yaml = r"
jira:
  server: https://jira.example.com
  email: bot@example.com
  api_token: t
assignment:
  project_key: OPS
  labels: [tracing]
  assignee: bot@example.com
";
        let config = Config::from_parts(parse(yaml), no_env).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(300));
    }

    #[test]
    fn non_numeric_interval_override_is_fatal() {
        let lookup = |name: &str| {
            (name == "POLL_INTERVAL_SECONDS").then(|| "soon".to_string())
        };
        let err = Config::from_parts(parse(FULL_YAML), lookup).unwrap_err();
        assert!(err.to_string().contains("POLL_INTERVAL_SECONDS"));
    }

    #[test]
    fn rule_matches_on_any_shared_label() {
        let rule = AssignmentRule {
            project_key: "OPS".into(),
            labels: vec!["dynatrace".into(), "tracing".into()],
            assignee: "bot@example.com".into(),
        };
        assert!(rule.matches(&["tracing".to_string()]));
        assert!(rule.matches(&["billing".to_string(), "dynatrace".to_string()]));
        assert!(!rule.matches(&["billing".to_string()]));
        assert!(!rule.matches(&[]));
    }
}
