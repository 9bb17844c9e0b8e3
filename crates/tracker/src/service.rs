//! Interface shared by external issue tracker services.

use async_trait::async_trait;
use serde::Serialize;

use crate::dispatcher::DispatchOutcome;
use crate::events::{ExternalIssue, Noteable, PushEvent, User};

/// Kind of input rendered in the service settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Password,
}

/// A settings form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub name: &'static str,
    pub placeholder: &'static str,
}

impl Field {
    #[must_use]
    pub const fn text(name: &'static str, placeholder: &'static str) -> Self {
        Self {
            kind: FieldType::Text,
            name,
            placeholder,
        }
    }

    #[must_use]
    pub const fn password(name: &'static str) -> Self {
        Self {
            kind: FieldType::Password,
            name,
            placeholder: "",
        }
    }
}

/// Fields every issue tracker exposes.
#[must_use]
pub fn base_fields() -> Vec<Field> {
    vec![
        Field::text("description", ""),
        Field::text("project_url", "Project url"),
        Field::text("issues_url", "Issue url"),
        Field::text("new_issue_url", "New Issue url"),
    ]
}

/// Adapter translating host events into calls on an external tracker.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Identifier used in routes and settings (`jira`).
    fn to_param(&self) -> &'static str;

    /// Display title.
    fn title(&self) -> String;

    /// Short description.
    fn description(&self) -> String;

    /// Help text for the settings page.
    fn help(&self) -> &'static str;

    /// Settings form fields.
    fn fields(&self) -> Vec<Field> {
        base_fields()
    }

    /// Host events the service reacts to.
    fn supported_events(&self) -> &'static [&'static str] {
        &["push"]
    }

    /// Link to an issue in the tracker.
    fn issue_url(&self, iid: &str) -> String;

    /// Handle a push. Returns `None` when there was nothing to send.
    async fn execute(&self, event: &PushEvent) -> Option<DispatchOutcome>;

    /// Record that `noteable`, written by `author`, mentioned `mentioned`.
    async fn create_cross_reference_note(
        &self,
        mentioned: &ExternalIssue,
        noteable: &Noteable,
        author: &User,
    ) -> DispatchOutcome;

    /// Check connectivity and credentials.
    async fn test_settings(&self) -> bool;
}
