//! Authenticated delivery of payloads to the remote tracker.
//!
//! The dispatcher never returns an error for tracker-side failures. Each
//! request is classified into a [`DispatchOutcome`], logged and handed back.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::HttpSettings;
use crate::error::Result;

/// Result of a single request to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 200 or 201 on a POST
    Success { code: u16, url: String },
    /// 200 or 201 on a credentials check
    Connected { code: u16, url: String },
    /// 401
    Unauthorized { username: String },
    /// Any other status
    Error { code: u16, body: String },
    /// The URL could not be parsed
    InvalidUri { url: String, reason: String },
    /// The request never got a response
    Unreachable { url: String, reason: String },
}

impl DispatchOutcome {
    /// Classify a tracker response.
    #[must_use]
    pub fn from_response(url: &str, username: &str, code: u16, body: String) -> Self {
        match code {
            200 | 201 => Self::Success {
                code,
                url: url.to_string(),
            },
            401 => Self::Unauthorized {
                username: username.to_string(),
            },
            _ => Self::Error { code, body },
        }
    }

    /// Classify the response to a credentials check.
    #[must_use]
    pub fn from_check_response(url: &str, username: &str, code: u16, body: String) -> Self {
        match Self::from_response(url, username, code, body) {
            Self::Success { code, url } => Self::Connected { code, url },
            other => other,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Connected { .. })
    }

    /// Human-readable summary, prefixed with the service name.
    #[must_use]
    pub fn message(&self, service: &str) -> String {
        format!("{service} {self}")
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { code, url } => {
                write!(f, "SUCCESS {code}: Successfully posted to {url}.")
            }
            Self::Connected { code, url } => {
                write!(f, "SUCCESS {code}: Successfully connected to {url}.")
            }
            Self::Unauthorized { username } => write!(
                f,
                "ERROR 401: Unauthorized. Check the {username} credentials and JIRA access permissions and try again."
            ),
            Self::Error { code, body } => write!(f, "ERROR {code}: {body}"),
            Self::InvalidUri { url, reason } | Self::Unreachable { url, reason } => {
                write!(f, "ERROR: {reason}. Hostname: {url}.")
            }
        }
    }
}

/// Sends JSON bodies to the tracker with basic authentication.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    service: &'static str,
    username: String,
    auth: String,
}

impl Dispatcher {
    /// Create a dispatcher for `service` authenticating as `username`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        service: &'static str,
        username: &str,
        password: &str,
        settings: HttpSettings,
    ) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            service,
            username: username.to_string(),
            auth: basic_auth(username, password),
        })
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.auth
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Base64 output is always a valid header value
        if let Ok(value) = HeaderValue::from_str(&self.auth) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// POST `body` to `url` once, returning the logged outcome.
    pub async fn send_message(&self, url: &str, body: &Value) -> DispatchOutcome {
        let outcome = match Url::parse(url) {
            Err(e) => DispatchOutcome::InvalidUri {
                url: url.to_string(),
                reason: e.to_string(),
            },
            Ok(parsed) => {
                debug!(url = %parsed, "POST request");
                let request = self.client.post(parsed).headers(self.headers()).json(body);
                match request.send().await {
                    Ok(response) => {
                        let code = response.status().as_u16();
                        let text = response.text().await.unwrap_or_default();
                        DispatchOutcome::from_response(url, &self.username, code, text)
                    }
                    Err(e) => DispatchOutcome::Unreachable {
                        url: url.to_string(),
                        reason: e.to_string(),
                    },
                }
            }
        };

        self.log(&outcome);
        outcome
    }

    /// GET `url` to check that the tracker accepts the credentials.
    pub async fn check(&self, url: &str) -> DispatchOutcome {
        debug!(url = %url, "GET request");
        let outcome = match self.client.get(url).headers(self.headers()).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                let text = response.text().await.unwrap_or_default();
                DispatchOutcome::from_check_response(url, &self.username, code, text)
            }
            Err(e) => DispatchOutcome::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            },
        };

        self.log(&outcome);
        outcome
    }

    fn log(&self, outcome: &DispatchOutcome) {
        let message = outcome.message(self.service);
        match outcome {
            DispatchOutcome::Success { code, .. }
            | DispatchOutcome::Connected { code, .. }
            | DispatchOutcome::Error { code, .. } => {
                info!(service = self.service, status = code, "{message}");
            }
            DispatchOutcome::Unauthorized { .. } => {
                info!(service = self.service, status = 401, "{message}");
            }
            DispatchOutcome::InvalidUri { .. } | DispatchOutcome::Unreachable { .. } => {
                info!(service = self.service, "{message}");
            }
        }
    }
}

/// `Basic` header value with URL-safe base64 credentials.
#[must_use]
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", URL_SAFE.encode(format!("{username}:{password}")))
}
