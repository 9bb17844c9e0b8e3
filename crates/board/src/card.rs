//! Issue data bound to a board card.

use serde::{Deserialize, Serialize};

/// Text color used on light label backgrounds.
pub const DARK_TEXT: &str = "#333333";

/// Text color used on dark label backgrounds.
pub const LIGHT_TEXT: &str = "#FFFFFF";

/// A user assigned to the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: u64,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Assignee {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: username.into(),
            avatar_url: None,
        }
    }

    /// Link to the assignee's profile.
    #[must_use]
    pub fn profile_path(&self) -> String {
        format!("/{}", self.username)
    }
}

/// A label attached to the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub title: String,
    /// Background as `#rrggbb`.
    pub color: String,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: color.into(),
            text_color: None,
            description: None,
        }
    }

    /// Text color for the label, derived from the background when unset.
    #[must_use]
    pub fn text_color(&self) -> &str {
        self.text_color
            .as_deref()
            .unwrap_or_else(|| contrast_text_color(&self.color))
    }
}

/// Pick dark or light text for a `#rrggbb` background.
///
/// Unparseable colors get dark text.
#[must_use]
pub fn contrast_text_color(background: &str) -> &'static str {
    let hex = background.trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return DARK_TEXT;
    }

    let Ok(rgb) = u32::from_str_radix(hex, 16) else {
        return DARK_TEXT;
    };
    let (r, g, b) = ((rgb >> 16) & 0xff, (rgb >> 8) & 0xff, rgb & 0xff);
    if r + g + b > 500 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Issue fields shown on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCard {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub confidential: bool,
    /// Project path the issue belongs to, e.g. `acme/app`.
    pub project_path: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
}

impl IssueCard {
    #[must_use]
    pub fn new(id: u64, iid: u64, title: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            id,
            iid,
            title: title.into(),
            confidential: false,
            project_path: project_path.into(),
            labels: Vec::new(),
            assignees: Vec::new(),
        }
    }

    /// Path of the issue page.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/issues/{}", self.project_path.trim_matches('/'), self.iid)
    }

    /// Short reference, `#iid`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("#{}", self.iid)
    }
}
