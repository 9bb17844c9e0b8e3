//! JIRA issue tracker service.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{HostConfig, HttpSettings, JiraProperties};
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::Result;
use crate::events::{ExternalIssue, Noteable, Project, PushEvent, User};
use crate::payload::{close_issue_payload, cross_reference_payload, CrossReferenceData};
use crate::service::{base_fields, Field, IssueTrackerService};
use crate::urls::{issue_url, HostUrls, JiraUrls};

/// Name used as the prefix of every log line.
const SERVICE_NAME: &str = "JiraService";

const HELP: &str = "Setting `project_url`, `issues_url` and `new_issue_url` will allow a user \
to easily navigate to the Jira issue tracker. See the integration doc for details.";

/// JIRA service bound to a single host project.
#[derive(Debug, Clone)]
pub struct JiraService {
    props: JiraProperties,
    project: Project,
    host: HostUrls,
    urls: JiraUrls,
    dispatcher: Dispatcher,
}

impl JiraService {
    /// Build the service. Defaults are applied to `props` first.
    ///
    /// # Errors
    /// Fails when `project_url` cannot be parsed or the HTTP client cannot
    /// be built.
    pub fn new(
        mut props: JiraProperties,
        project: Project,
        host: &HostConfig,
        http: HttpSettings,
    ) -> Result<Self> {
        props.set_defaults();
        let urls = JiraUrls::from_properties(&props)?;
        let dispatcher = Dispatcher::new(SERVICE_NAME, props.username(), props.password(), http)?;

        debug!(
            server = urls.server(),
            project = %project.path_with_namespace(),
            "JIRA service configured"
        );

        Ok(Self {
            props,
            project,
            host: HostUrls::new(host),
            urls,
            dispatcher,
        })
    }

    #[must_use]
    pub const fn properties(&self) -> &JiraProperties {
        &self.props
    }

    #[must_use]
    pub const fn urls(&self) -> &JiraUrls {
        &self.urls
    }

    /// Configured `project_url`.
    #[must_use]
    pub fn project_path(&self) -> Option<&str> {
        self.props.project_url.as_deref()
    }

    /// Configured `new_issue_url`.
    #[must_use]
    pub fn new_issue_path(&self) -> Option<&str> {
        self.props.new_issue_url.as_deref()
    }

    /// Comment on and transition `issue` as solved by `commit_id`.
    pub async fn close_issue(&self, commit_id: &str, issue: &ExternalIssue) -> DispatchOutcome {
        let commit_url = self.host.commit_url(&self.project, commit_id);
        let body = close_issue_payload(commit_id, &commit_url, self.props.transition_id());

        info!(issue = %issue.id, commit = commit_id, "Closing JIRA issue");
        self.dispatcher
            .send_message(&self.urls.close_issue_url(&issue.id), &body)
            .await
    }
}

#[async_trait]
impl IssueTrackerService for JiraService {
    fn to_param(&self) -> &'static str {
        "jira"
    }

    fn title(&self) -> String {
        self.props
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "JIRA".to_string())
    }

    fn description(&self) -> String {
        self.props
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Jira issue tracker".to_string())
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn fields(&self) -> Vec<Field> {
        let mut fields = base_fields();
        fields.extend([
            Field::text("api_version", "Jira API version, 2 by default"),
            Field::text(
                "jira_issue_transition_id",
                "Jira issue transition ID, 2 by default",
            ),
            Field::text("username", ""),
            Field::password("password"),
        ]);
        fields
    }

    fn issue_url(&self, iid: &str) -> String {
        issue_url(self.props.issues_url.as_deref().unwrap_or_default(), iid)
    }

    async fn execute(&self, event: &PushEvent) -> Option<DispatchOutcome> {
        let issue = event.issue.as_ref()?;
        Some(self.close_issue(event.entity.commit_id(), issue).await)
    }

    async fn create_cross_reference_note(
        &self,
        mentioned: &ExternalIssue,
        noteable: &Noteable,
        author: &User,
    ) -> DispatchOutcome {
        let data = CrossReferenceData::new(&self.host, &self.project, noteable, author);
        let body = cross_reference_payload(&data);

        self.dispatcher
            .send_message(&self.urls.add_comment_url(&mentioned.id), &body)
            .await
    }

    async fn test_settings(&self) -> bool {
        self.dispatcher
            .check(&self.urls.api_test_url())
            .await
            .is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ClosingEntity, Commit};

    fn service(props: JiraProperties) -> JiraService {
        JiraService::new(
            props,
            Project::from_full_path("acme/app"),
            &HostConfig::new("https://gitlab.example.com"),
            HttpSettings::default(),
        )
        .unwrap()
    }

    fn props() -> JiraProperties {
        JiraProperties {
            username: Some("jira_user".to_string()),
            password: Some("secret".to_string()),
            project_url: Some("https://jira.example.com/projects/PROJ".to_string()),
            issues_url: Some("https://jira.example.com/browse/:id".to_string()),
            new_issue_url: Some("https://jira.example.com/secure/CreateIssue.jspa".to_string()),
            ..JiraProperties::default()
        }
    }

    #[test]
    fn test_defaults_applied_on_build() {
        let built = service(props());
        assert_eq!(built.properties().api_version(), "2");
        assert_eq!(built.properties().jira_issue_transition_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_title_and_description_fallbacks() {
        let default = service(props());
        assert_eq!(default.title(), "JIRA");
        assert_eq!(default.description(), "Jira issue tracker");
        assert_eq!(default.to_param(), "jira");

        let custom = service(JiraProperties {
            title: Some("Acme JIRA".to_string()),
            description: Some("  ".to_string()),
            ..props()
        });
        assert_eq!(custom.title(), "Acme JIRA");
        assert_eq!(custom.description(), "Jira issue tracker");
    }

    #[test]
    fn test_fields_extend_base() {
        let names: Vec<_> = service(props()).fields().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "description",
                "project_url",
                "issues_url",
                "new_issue_url",
                "api_version",
                "jira_issue_transition_id",
                "username",
                "password"
            ]
        );
    }

    #[test]
    fn test_issue_url() {
        assert_eq!(
            service(props()).issue_url("PROJ-3"),
            "https://jira.example.com/browse/PROJ-3"
        );
    }

    #[test]
    fn test_invalid_project_url_fails() {
        let result = JiraService::new(
            JiraProperties {
                project_url: Some("::".to_string()),
                ..props()
            },
            Project::from_full_path("acme/app"),
            &HostConfig::default(),
            HttpSettings::default(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_execute_without_issue_is_noop() {
        let event = PushEvent {
            entity: ClosingEntity::Commit(Commit::new("abc")),
            issue: None,
        };
        assert!(service(props()).execute(&event).await.is_none());
    }
}
