//! Batched re-rendering of a bound card.
//!
//! Mutations are queued and applied together on the next [`CardBinding::tick`].
//! Within one tick the last write to a field wins.

use tracing::debug;

use crate::card::{Assignee, IssueCard, Label};
use crate::render::{render, CardView};

/// A queued change to the bound issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetTitle(String),
    SetConfidential(bool),
    AddLabel(Label),
    RemoveLabel(u64),
    SetLabels(Vec<Label>),
    AddAssignee(Assignee),
    RemoveAssignee(u64),
    SetAssignees(Vec<Assignee>),
}

impl Mutation {
    /// Apply to `card`, returning whether anything changed.
    fn apply(self, card: &mut IssueCard) -> bool {
        match self {
            Self::SetTitle(title) => replace(&mut card.title, title),
            Self::SetConfidential(flag) => replace(&mut card.confidential, flag),
            Self::AddLabel(label) => {
                if card.labels.iter().any(|l| l.id == label.id) {
                    false
                } else {
                    card.labels.push(label);
                    true
                }
            }
            Self::RemoveLabel(id) => {
                let before = card.labels.len();
                card.labels.retain(|l| l.id != id);
                card.labels.len() != before
            }
            Self::SetLabels(labels) => replace(&mut card.labels, labels),
            Self::AddAssignee(assignee) => {
                if card.assignees.iter().any(|a| a.id == assignee.id) {
                    false
                } else {
                    card.assignees.push(assignee);
                    true
                }
            }
            Self::RemoveAssignee(id) => {
                let before = card.assignees.len();
                card.assignees.retain(|a| a.id != id);
                card.assignees.len() != before
            }
            Self::SetAssignees(assignees) => replace(&mut card.assignees, assignees),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// An issue bound to its rendered card.
#[derive(Debug)]
pub struct CardBinding {
    card: IssueCard,
    view: CardView,
    pending: Vec<Mutation>,
    renders: usize,
}

impl CardBinding {
    /// Bind `card` and render it once.
    #[must_use]
    pub fn new(card: IssueCard) -> Self {
        let view = render(&card);
        Self {
            card,
            view,
            pending: Vec::new(),
            renders: 1,
        }
    }

    #[must_use]
    pub const fn card(&self) -> &IssueCard {
        &self.card
    }

    /// The view as of the last tick.
    #[must_use]
    pub const fn view(&self) -> &CardView {
        &self.view
    }

    /// Number of renders so far, including the initial one.
    #[must_use]
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn queue(&mut self, mutation: Mutation) {
        self.pending.push(mutation);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.queue(Mutation::SetTitle(title.into()));
    }

    pub fn set_confidential(&mut self, confidential: bool) {
        self.queue(Mutation::SetConfidential(confidential));
    }

    pub fn add_label(&mut self, label: Label) {
        self.queue(Mutation::AddLabel(label));
    }

    pub fn remove_label(&mut self, id: u64) {
        self.queue(Mutation::RemoveLabel(id));
    }

    pub fn set_assignees(&mut self, assignees: Vec<Assignee>) {
        self.queue(Mutation::SetAssignees(assignees));
    }

    pub fn add_assignee(&mut self, assignee: Assignee) {
        self.queue(Mutation::AddAssignee(assignee));
    }

    pub fn remove_assignee(&mut self, id: u64) {
        self.queue(Mutation::RemoveAssignee(id));
    }

    /// Apply queued mutations in order and re-render once if the card changed.
    ///
    /// Returns the new view, or `None` when nothing changed.
    pub fn tick(&mut self) -> Option<&CardView> {
        if self.pending.is_empty() {
            return None;
        }

        let batch = std::mem::take(&mut self.pending);
        let size = batch.len();
        let before = self.card.clone();
        let mut applied = 0;
        for mutation in batch {
            if mutation.apply(&mut self.card) {
                applied += 1;
            }
        }

        if self.card == before {
            debug!(card = self.card.id, mutations = size, applied, "Tick produced no change");
            return None;
        }

        self.view = render(&self.card);
        self.renders += 1;
        debug!(card = self.card.id, mutations = size, applied, "Card re-rendered");
        Some(&self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> CardBinding {
        CardBinding::new(IssueCard::new(1, 7, "Initial", "acme/app"))
    }

    #[test]
    fn test_mutations_wait_for_tick() {
        let mut binding = binding();
        binding.set_title("Changed");
        assert_eq!(binding.view().title, "Initial");
        assert!(binding.has_pending());

        let view = binding.tick().unwrap();
        assert_eq!(view.title, "Changed");
        assert_eq!(binding.render_count(), 2);
        assert!(!binding.has_pending());
    }

    #[test]
    fn test_last_write_wins_in_one_render() {
        let mut binding = binding();
        binding.set_title("First");
        binding.set_confidential(true);
        binding.set_title("Second");
        binding.tick();

        assert_eq!(binding.view().title, "Second");
        assert!(binding.view().confidential);
        assert_eq!(binding.render_count(), 2);
    }

    #[test]
    fn test_noop_batch_skips_render() {
        let mut binding = binding();
        assert!(binding.tick().is_none());

        binding.set_title("Other");
        binding.set_title("Initial");
        assert!(binding.tick().is_none());
        assert_eq!(binding.render_count(), 1);
    }

    #[test]
    fn test_labels_and_assignees() {
        let mut binding = binding();
        binding.add_label(Label::new(1, "bug", "#FF0000"));
        binding.add_label(Label::new(1, "bug", "#FF0000"));
        binding.add_label(Label::new(2, "ux", "#FFFFFF"));
        binding.remove_label(2);
        for i in 0..5 {
            binding.add_assignee(Assignee::new(i, format!("User {i}"), format!("user{i}")));
        }
        binding.tick();

        assert_eq!(binding.card().labels.len(), 1);
        assert_eq!(binding.view().avatars.len(), 3);
        assert_eq!(
            binding.view().counter.as_ref().map(|c| c.label.as_str()),
            Some("+2")
        );

        binding.remove_assignee(4);
        binding.tick();
        assert_eq!(binding.view().avatars.len(), 4);
        assert!(binding.view().counter.is_none());

        binding.set_assignees(Vec::new());
        binding.tick();
        assert!(binding.view().avatars.is_empty());
    }
}
