//! Endpoint resolution for the remote tracker and links back to the host.

use reqwest::Url;

use crate::config::{HostConfig, JiraProperties};
use crate::error::{Result, TrackerError};
use crate::events::{Noteable, Project, User};

/// Ports omitted from the server URL.
const DEFAULT_PORTS: [u16; 2] = [80, 443];

/// Derive `scheme://host[:port]` from a tracker project URL.
///
/// Ports 80 and 443 are dropped whatever the scheme.
///
/// # Errors
/// Returns [`TrackerError::InvalidUrl`] if the URL cannot be parsed or has no host.
pub fn server_url(project_url: &str) -> Result<String> {
    let invalid = |reason: String| TrackerError::InvalidUrl {
        url: project_url.to_string(),
        reason,
    };

    let server = Url::parse(project_url).map_err(|e| invalid(e.to_string()))?;
    let host = server
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;

    let mut url = format!("{}://{host}", server.scheme());
    if let Some(port) = server.port_or_known_default() {
        if !DEFAULT_PORTS.contains(&port) {
            url.push_str(&format!(":{port}"));
        }
    }
    Ok(url)
}

/// Resolved JIRA REST endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraUrls {
    server: String,
    api_version: String,
    username: String,
}

impl JiraUrls {
    /// Resolve endpoints from stored properties.
    ///
    /// # Errors
    /// Fails when `project_url` is missing or unparseable.
    pub fn from_properties(props: &JiraProperties) -> Result<Self> {
        let project_url = props.project_url.as_deref().unwrap_or_default();
        Ok(Self {
            server: server_url(project_url)?,
            api_version: props.api_version().to_string(),
            username: props.username().to_string(),
        })
    }

    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Base of the issue REST resource.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/rest/api/{}/issue", self.server, self.api_version)
    }

    /// Endpoint that transitions (closes) an issue.
    #[must_use]
    pub fn close_issue_url(&self, issue: &str) -> String {
        format!("{}/{issue}/transitions", self.api_base())
    }

    /// Endpoint that adds a comment to an issue.
    #[must_use]
    pub fn add_comment_url(&self, issue: &str) -> String {
        format!("{}/{issue}/comment", self.api_base())
    }

    /// Endpoint used to check credentials.
    ///
    /// The username is percent-encoded into the query string.
    #[must_use]
    pub fn api_test_url(&self) -> String {
        let base = format!("{}/rest/api/{}/user", self.server, self.api_version);
        match Url::parse(&base) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("username", &self.username);
                url.into()
            }
            Err(_) => base,
        }
    }
}

/// Link to an external issue built from the `issues_url` template.
///
/// Every `:id` placeholder is replaced with the issue id.
#[must_use]
pub fn issue_url(issues_url: &str, iid: &str) -> String {
    issues_url.replace(":id", iid)
}

/// URLs pointing back into the host application.
#[derive(Debug, Clone)]
pub struct HostUrls {
    base: String,
}

impl HostUrls {
    #[must_use]
    pub fn new(host: &HostConfig) -> Self {
        Self {
            base: host.base().to_string(),
        }
    }

    /// Absolute URL for a host-relative path.
    #[must_use]
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    #[must_use]
    pub fn user_url(&self, user: &User) -> String {
        self.resource_url(&format!("/u/{}", user.username))
    }

    #[must_use]
    pub fn project_url(&self, project: &Project) -> String {
        self.resource_url(&format!("/{}", project.path_with_namespace()))
    }

    /// URL of a commit in the project.
    #[must_use]
    pub fn commit_url(&self, project: &Project, sha: &str) -> String {
        format!("{}/commit/{sha}", self.project_url(project))
    }

    /// URL of any noteable in the project.
    #[must_use]
    pub fn entity_url(&self, project: &Project, noteable: &Noteable) -> String {
        format!(
            "{}/{}/{}",
            self.project_url(project),
            noteable.route(),
            noteable.url_id()
        )
    }
}
