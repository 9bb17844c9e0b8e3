//! Configuration for tracker services.
//!
//! Tracker settings live in a flat string property store. They can be built
//! from a map, a JSON file holding that map, and environment variables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

/// Default JIRA REST API version.
pub const DEFAULT_API_VERSION: &str = "2";

/// Default JIRA transition used to close issues.
pub const DEFAULT_TRANSITION_ID: &str = "2";

/// Default host application URL.
const DEFAULT_HOST_URL: &str = "http://localhost";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables mapped onto property keys.
const ENV_PROPERTIES: &[(&str, &str)] = &[
    ("JIRA_USERNAME", "username"),
    ("JIRA_PASSWORD", "password"),
    ("JIRA_API_VERSION", "api_version"),
    ("JIRA_TRANSITION_ID", "jira_issue_transition_id"),
    ("JIRA_PROJECT_URL", "project_url"),
    ("JIRA_ISSUES_URL", "issues_url"),
    ("JIRA_NEW_ISSUE_URL", "new_issue_url"),
    ("JIRA_TITLE", "title"),
    ("JIRA_DESCRIPTION", "description"),
];

/// JIRA service properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraProperties {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub api_version: Option<String>,
    pub jira_issue_transition_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_url: Option<String>,
    pub issues_url: Option<String>,
    pub new_issue_url: Option<String>,
}

impl JiraProperties {
    /// Build properties from a key/value store. Unknown keys are ignored.
    #[must_use]
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let mut props = Self::default();
        for (key, value) in map {
            props.set(key, value.clone());
        }
        props
    }

    /// Load properties from a JSON object of strings.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a string map.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let map: HashMap<String, String> = serde_json::from_str(&raw)?;
        Ok(Self::from_map(&map))
    }

    /// Build properties from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut props = Self::default();
        props.merge_env();
        props
    }

    /// Override properties with environment variables that are set.
    pub fn merge_env(&mut self) {
        self.merge_lookup(|key| env::var(key).ok());
    }

    /// Override properties using an arbitrary variable lookup.
    pub fn merge_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, key) in ENV_PROPERTIES {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                self.set(key, value);
            }
        }
    }

    /// Set a single property by its store key.
    ///
    /// Returns `false` when the key is not a JIRA property.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "username" => &mut self.username,
            "password" => &mut self.password,
            "api_version" => &mut self.api_version,
            "jira_issue_transition_id" => &mut self.jira_issue_transition_id,
            "title" => &mut self.title,
            "description" => &mut self.description,
            "project_url" => &mut self.project_url,
            "issues_url" => &mut self.issues_url,
            "new_issue_url" => &mut self.new_issue_url,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Fill `api_version` and `jira_issue_transition_id` when blank.
    ///
    /// Runs before validation. Values already present are kept.
    pub fn set_defaults(&mut self) {
        if is_blank(self.api_version.as_deref()) {
            self.api_version = Some(DEFAULT_API_VERSION.to_string());
        }
        if is_blank(self.jira_issue_transition_id.as_deref()) {
            self.jira_issue_transition_id = Some(DEFAULT_TRANSITION_ID.to_string());
        }
    }

    /// Validate the navigation URLs of an active service.
    ///
    /// Inactive services are never validated.
    ///
    /// # Errors
    /// Returns the first blank or malformed URL property.
    pub fn validate(&self, active: bool) -> Result<(), ConfigError> {
        if !active {
            return Ok(());
        }

        for (field, value) in [
            ("project_url", &self.project_url),
            ("issues_url", &self.issues_url),
            ("new_issue_url", &self.new_issue_url),
        ] {
            let value = value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(field))?;

            if !is_http_url(value) {
                return Err(ConfigError::NotAUrl {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    /// API version, falling back to the default.
    #[must_use]
    pub fn api_version(&self) -> &str {
        non_blank(self.api_version.as_deref()).unwrap_or(DEFAULT_API_VERSION)
    }

    /// Transition id used to close issues, falling back to the default.
    #[must_use]
    pub fn transition_id(&self) -> &str {
        non_blank(self.jira_issue_transition_id.as_deref()).unwrap_or(DEFAULT_TRANSITION_ID)
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

/// Settings of the host application the tracker links back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Public base URL of the host, e.g. `https://gitlab.example.com`.
    pub url: String,
}

impl HostConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Read `GITLAB_URL`, defaulting to `http://localhost`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            env::var("GITLAB_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST_URL.to_string()),
        )
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_URL)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(
                env::var("TRACKER_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> JiraProperties {
        JiraProperties {
            project_url: Some("https://jira.example.com/projects/PROJ".to_string()),
            issues_url: Some("https://jira.example.com/browse/:id".to_string()),
            new_issue_url: Some("https://jira.example.com/secure/CreateIssue.jspa".to_string()),
            ..JiraProperties::default()
        }
    }

    #[test]
    fn test_set_defaults_fills_blank_fields() {
        let mut props = JiraProperties {
            api_version: Some(String::new()),
            ..JiraProperties::default()
        };
        props.set_defaults();
        assert_eq!(props.api_version.as_deref(), Some("2"));
        assert_eq!(props.jira_issue_transition_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_set_defaults_keeps_existing_values() {
        let mut props = JiraProperties {
            api_version: Some("3".to_string()),
            jira_issue_transition_id: Some("31".to_string()),
            ..JiraProperties::default()
        };
        props.set_defaults();
        assert_eq!(props.api_version(), "3");
        assert_eq!(props.transition_id(), "31");
    }

    #[test]
    fn test_from_map_ignores_unknown_keys() {
        let map = HashMap::from([
            ("username".to_string(), "jira_user".to_string()),
            ("colour".to_string(), "blue".to_string()),
        ]);
        let props = JiraProperties::from_map(&map);
        assert_eq!(props.username(), "jira_user");
        assert!(props.password.is_none());
    }

    #[test]
    fn test_merge_lookup_overrides() {
        let mut props = JiraProperties {
            username: Some("file_user".to_string()),
            ..JiraProperties::default()
        };
        props.merge_lookup(|key| match key {
            "JIRA_USERNAME" => Some("env_user".to_string()),
            "JIRA_PASSWORD" => Some(String::new()),
            _ => None,
        });
        assert_eq!(props.username(), "env_user");
        assert!(props.password.is_none());
    }

    #[test]
    fn test_validate_skipped_when_inactive() {
        assert!(JiraProperties::default().validate(false).is_ok());
    }

    #[test]
    fn test_validate_active() {
        assert!(valid().validate(true).is_ok());

        let mut missing = valid();
        missing.issues_url = None;
        assert!(matches!(
            missing.validate(true),
            Err(ConfigError::Missing("issues_url"))
        ));

        let mut bad = valid();
        bad.project_url = Some("ftp://jira.example.com".to_string());
        assert!(matches!(
            bad.validate(true),
            Err(ConfigError::NotAUrl { field: "project_url", .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jira.json");
        std::fs::write(&path, r#"{"username":"u","api_version":"3"}"#).unwrap();
        let props = JiraProperties::from_file(&path).unwrap();
        assert_eq!(props.username(), "u");
        assert_eq!(props.api_version(), "3");

        std::fs::write(&path, r#"{"username": 5}"#).unwrap();
        assert!(matches!(
            JiraProperties::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_host_base_strips_slash() {
        assert_eq!(HostConfig::new("https://gitlab.example.com/").base(), "https://gitlab.example.com");
    }
}
