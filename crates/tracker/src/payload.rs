//! JIRA REST payloads for closing issues and cross-reference comments.

use serde::Serialize;
use serde_json::{json, Value};

use crate::events::{Noteable, Project, User};
use crate::urls::HostUrls;

/// A named link, rendered as `[name|url]` in JIRA wiki markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

/// Everything needed to describe a mention of an external issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossReferenceData {
    pub user: Link,
    pub project: Link,
    pub entity: Link,
}

impl CrossReferenceData {
    /// Describe `noteable` in `project`, authored by `author`.
    #[must_use]
    pub fn new(host: &HostUrls, project: &Project, noteable: &Noteable, author: &User) -> Self {
        Self {
            user: Link {
                name: author.name.clone(),
                url: host.user_url(author),
            },
            project: Link {
                name: project.path_with_namespace(),
                url: host.project_url(project),
            },
            entity: Link {
                name: noteable.human_name().to_string(),
                url: host.entity_url(project, noteable),
            },
        }
    }
}

/// Body that comments on and transitions an issue closed by a commit.
#[must_use]
pub fn close_issue_payload(commit_id: &str, commit_url: &str, transition_id: &str) -> Value {
    json!({
        "update": {
            "comment": [{
                "add": {
                    "body": format!("Issue solved with [{commit_id}|{commit_url}].")
                }
            }]
        },
        "transition": {
            "id": transition_id
        }
    })
}

/// Body of the comment announcing a mention from the host.
#[must_use]
pub fn cross_reference_payload(data: &CrossReferenceData) -> Value {
    json!({
        "body": format!(
            "[{}|{}] mentioned this issue in [a {} of {}|{}].",
            data.user.name, data.user.url, data.entity.name, data.project.name, data.entity.url
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostConfig;

    #[test]
    fn test_close_issue_payload() {
        let payload = close_issue_payload("abc123", "http://gl/acme/app/commit/abc123", "31");
        assert_eq!(
            payload["update"]["comment"][0]["add"]["body"],
            "Issue solved with [abc123|http://gl/acme/app/commit/abc123]."
        );
        assert_eq!(payload["transition"]["id"], "31");
    }

    #[test]
    fn test_cross_reference_payload() {
        let host = HostUrls::new(&HostConfig::new("https://gitlab.example.com"));
        let project = Project::from_full_path("acme/app");
        let author = User {
            username: "jdoe".to_string(),
            name: "Jane Doe".to_string(),
        };
        let data = CrossReferenceData::new(&host, &project, &Noteable::MergeRequest { iid: 5 }, &author);

        assert_eq!(
            cross_reference_payload(&data)["body"],
            "[Jane Doe|https://gitlab.example.com/u/jdoe] mentioned this issue in \
             [a merge request of acme/app|https://gitlab.example.com/acme/app/merge_requests/5]."
        );
    }

    #[test]
    fn test_payload_survives_odd_input() {
        let payload = close_issue_payload("\"quoted\"]|", "", "");
        let text = serde_json::to_string(&payload).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, payload);
    }
}
