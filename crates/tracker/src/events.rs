//! Domain entities handed to tracker services by the host application.
//!
//! These are plain snapshots of host records. Services only read them.

use serde::{Deserialize, Serialize};

/// A user of the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
}

/// A host project, addressed by namespace and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub namespace: String,
    pub path: String,
}

impl Project {
    /// Build a project from a `namespace/path` string.
    ///
    /// Nested namespaces keep everything before the last `/`.
    #[must_use]
    pub fn from_full_path(full_path: &str) -> Self {
        match full_path.trim_matches('/').rsplit_once('/') {
            Some((namespace, path)) => Self {
                namespace: namespace.to_string(),
                path: path.to_string(),
            },
            None => Self {
                namespace: String::new(),
                path: full_path.trim_matches('/').to_string(),
            },
        }
    }

    /// `namespace/path`, or just `path` for a project without namespace.
    #[must_use]
    pub fn path_with_namespace(&self) -> String {
        if self.namespace.is_empty() {
            self.path.clone()
        } else {
            format!("{}/{}", self.namespace, self.path)
        }
    }
}

/// A commit pushed to the host project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
}

impl Commit {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A merge request; closes issues through its last commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub last_commit: Commit,
}

/// An issue living in the external tracker (e.g. `PROJ-42`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIssue {
    pub id: String,
}

impl ExternalIssue {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Host entities that can mention an external issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Noteable {
    Commit { id: String },
    Issue { iid: u64 },
    MergeRequest { iid: u64 },
    Snippet { id: u64 },
}

impl Noteable {
    /// Human-readable, lower-cased type name used in comment text.
    #[must_use]
    pub const fn human_name(&self) -> &'static str {
        match self {
            Self::Commit { .. } => "commit",
            Self::Issue { .. } => "issue",
            Self::MergeRequest { .. } => "merge request",
            Self::Snippet { .. } => "snippet",
        }
    }

    /// Route segment of this entity under a project URL.
    #[must_use]
    pub const fn route(&self) -> &'static str {
        match self {
            Self::Commit { .. } => "commit",
            Self::Issue { .. } => "issues",
            Self::MergeRequest { .. } => "merge_requests",
            Self::Snippet { .. } => "snippets",
        }
    }

    /// Identifier used in URLs: the sha for commits, the iid otherwise.
    #[must_use]
    pub fn url_id(&self) -> String {
        match self {
            Self::Commit { id } => id.clone(),
            Self::Issue { iid } | Self::MergeRequest { iid } => iid.to_string(),
            Self::Snippet { id } => id.to_string(),
        }
    }
}

/// Entity that closes an external issue when pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClosingEntity {
    Commit(Commit),
    MergeRequest(MergeRequest),
}

impl ClosingEntity {
    /// Sha of the commit that closes the issue.
    #[must_use]
    pub fn commit_id(&self) -> &str {
        match self {
            Self::Commit(commit) => &commit.id,
            Self::MergeRequest(mr) => &mr.last_commit.id,
        }
    }
}

/// A push event forwarded to a tracker service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    pub entity: ClosingEntity,
    /// External issue referenced as closed by the push, if any.
    #[serde(default)]
    pub issue: Option<ExternalIssue>,
}
