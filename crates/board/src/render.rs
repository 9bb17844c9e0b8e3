//! Rendering of a card into a view and into HTML.

use std::fmt::Write as _;

use serde::Serialize;

use crate::avatars::AvatarLayout;
use crate::card::IssueCard;

/// Avatar shown when an assignee has none.
const DEFAULT_AVATAR: &str = "/assets/no_avatar.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelView {
    pub title: String,
    pub background: String,
    pub text_color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarView {
    pub name: String,
    pub href: String,
    pub src: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub label: String,
    pub tooltip: String,
}

/// Everything displayed by a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: u64,
    pub title: String,
    pub href: String,
    pub reference: String,
    pub confidential: bool,
    pub labels: Vec<LabelView>,
    pub avatars: Vec<AvatarView>,
    pub counter: Option<CounterView>,
}

impl CardView {
    /// Stable HTML for the card.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        let _ = write!(html, r#"<div class="card" data-id="{}">"#, self.id);
        html.push_str(r#"<h4 class="card-title">"#);
        if self.confidential {
            html.push_str(r#"<i class="fa fa-eye-slash confidential-icon" aria-hidden="true"></i>"#);
        }
        let _ = write!(
            html,
            r#"<a href="{}" title="{}">{}</a>"#,
            html_escape(&self.href),
            html_escape(&self.title),
            html_escape(&self.title)
        );
        let _ = write!(html, r#"<span class="card-number">{}</span>"#, html_escape(&self.reference));
        html.push_str("</h4>");

        if !self.labels.is_empty() {
            html.push_str(r#"<div class="card-footer">"#);
            for label in &self.labels {
                let _ = write!(
                    html,
                    r#"<span class="label" style="background-color: {}; color: {};" title="{}">{}</span>"#,
                    html_escape(&label.background),
                    html_escape(&label.text_color),
                    html_escape(label.description.as_deref().unwrap_or_default()),
                    html_escape(&label.title)
                );
            }
            html.push_str("</div>");
        }

        if !self.avatars.is_empty() {
            html.push_str(r#"<div class="card-assignee">"#);
            for avatar in &self.avatars {
                let _ = write!(
                    html,
                    r#"<a class="user-avatar-link" href="{}" title="{}"><img class="avatar" src="{}" alt="Avatar for {}"></a>"#,
                    html_escape(&avatar.href),
                    html_escape(&avatar.tooltip),
                    html_escape(&avatar.src),
                    html_escape(&avatar.name)
                );
            }
            if let Some(counter) = &self.counter {
                let _ = write!(
                    html,
                    r#"<span class="avatar-counter" title="{}">{}</span>"#,
                    html_escape(&counter.tooltip),
                    html_escape(&counter.label)
                );
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        html
    }
}

/// Build the view for an issue.
#[must_use]
pub fn render(card: &IssueCard) -> CardView {
    let layout = AvatarLayout::new(&card.assignees);

    let avatars = layout
        .visible(&card.assignees)
        .iter()
        .map(|a| AvatarView {
            name: a.name.clone(),
            href: a.profile_path(),
            src: a
                .avatar_url
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            tooltip: format!("Assigned to {}", a.name),
        })
        .collect();

    let counter = layout
        .counter_label()
        .zip(layout.counter_tooltip())
        .map(|(label, tooltip)| CounterView { label, tooltip });

    CardView {
        id: card.id,
        title: card.title.clone(),
        href: card.path(),
        reference: card.reference(),
        confidential: card.confidential,
        labels: card
            .labels
            .iter()
            .map(|l| LabelView {
                title: l.title.clone(),
                background: l.color.clone(),
                text_color: l.text_color().to_string(),
                description: l.description.clone(),
            })
            .collect(),
        avatars,
        counter,
    }
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Assignee, Label};

    fn card() -> IssueCard {
        let mut card = IssueCard::new(1, 12, "Fix <login>", "acme/app");
        card.labels.push(Label::new(1, "bug", "#FF0000"));
        card
    }

    #[test]
    fn test_render_basic_fields() {
        let view = render(&card());
        assert_eq!(view.title, "Fix <login>");
        assert_eq!(view.href, "/acme/app/issues/12");
        assert_eq!(view.reference, "#12");
        assert!(!view.confidential);
        assert_eq!(view.labels[0].text_color, "#FFFFFF");
    }

    #[test]
    fn test_html_escapes_and_marks_confidential() {
        let mut card = card();
        card.confidential = true;
        let html = render(&card).to_html();
        assert!(html.contains("Fix &lt;login&gt;"));
        assert!(html.contains("confidential-icon"));
        assert!(html.contains(r#"<span class="card-number">#12</span>"#));
    }

    #[test]
    fn test_html_without_confidential_icon() {
        assert!(!render(&card()).to_html().contains("confidential-icon"));
    }

    #[test]
    fn test_avatars_and_counter() {
        let mut card = card();
        card.assignees = (0..6)
            .map(|i| Assignee::new(i, format!("User {i}"), format!("user{i}")))
            .collect();
        card.assignees[0].avatar_url = Some("https://cdn/u0.png".to_string());

        let view = render(&card);
        assert_eq!(view.avatars.len(), 3);
        assert_eq!(view.avatars[0].src, "https://cdn/u0.png");
        assert_eq!(view.avatars[1].src, DEFAULT_AVATAR);
        assert_eq!(view.avatars[2].tooltip, "Assigned to User 2");
        assert_eq!(
            view.counter,
            Some(CounterView {
                label: "+3".to_string(),
                tooltip: "+3 more assignees".to_string()
            })
        );

        let html = view.to_html();
        assert_eq!(html.matches(r#"class="avatar""#).count(), 3);
        assert!(html.contains(r#"<span class="avatar-counter" title="+3 more assignees">+3</span>"#));
    }

    #[test]
    fn test_render_non_ascii_label_color() {
        let mut card = card();
        card.labels.push(Label::new(2, "odd", "aébc0"));
        let view = render(&card);
        assert_eq!(view.labels[1].text_color, "#333333");
        assert!(view.to_html().contains("color: #333333;"));
    }

    #[test]
    fn test_four_assignees_no_counter() {
        let mut card = card();
        card.assignees = (0..4)
            .map(|i| Assignee::new(i, format!("User {i}"), format!("user{i}")))
            .collect();
        let view = render(&card);
        assert_eq!(view.avatars.len(), 4);
        assert!(view.counter.is_none());
        assert!(!view.to_html().contains("avatar-counter"));
    }
}
