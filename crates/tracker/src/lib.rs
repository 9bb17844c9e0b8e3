//! External issue tracker services.
//!
//! This crate forwards host events to a third-party issue tracker. The only
//! provider today is JIRA: pushes that close an issue transition it, and
//! mentions of an issue from the host are posted as comments.
//!
//! # Usage
//!
//! ```no_run
//! use tracker::{
//!     ClosingEntity, Commit, ExternalIssue, HostConfig, HttpSettings, IssueTrackerService,
//!     JiraProperties, JiraService, Project, PushEvent,
//! };
//!
//! # async fn run() -> tracker::Result<()> {
//! let service = JiraService::new(
//!     JiraProperties::from_env(),
//!     Project::from_full_path("acme/app"),
//!     &HostConfig::from_env(),
//!     HttpSettings::default(),
//! )?;
//!
//! let outcome = service
//!     .execute(&PushEvent {
//!         entity: ClosingEntity::Commit(Commit::new("b83d6e391c22777fca1ed3012fce84f633d7fed0")),
//!         issue: Some(ExternalIssue::new("PROJ-42")),
//!     })
//!     .await;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`payload`] renders events into JIRA REST bodies
//! - [`urls`] resolves tracker endpoints and links back to the host
//! - [`Dispatcher`] posts bodies with basic auth and classifies the response
//! - [`IssueTrackerService`] is the per-provider contract, [`JiraService`] implements it

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod jira;
pub mod payload;
pub mod service;
pub mod urls;

pub use config::{HostConfig, HttpSettings, JiraProperties};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{ConfigError, Result, TrackerError};
pub use events::{
    ClosingEntity, Commit, ExternalIssue, MergeRequest, Noteable, Project, PushEvent, User,
};
pub use jira::JiraService;
pub use service::{Field, FieldType, IssueTrackerService};
pub use urls::{server_url, HostUrls, JiraUrls};
