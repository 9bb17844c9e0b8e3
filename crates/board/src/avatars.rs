//! Assignee avatar overflow.
//!
//! A card shows up to [`MAX_RENDER`] avatars. Past that it shows one less
//! avatar and a counter for the rest, capped at `99+`.

use crate::card::Assignee;

/// Avatars shown before a counter is needed.
pub const MAX_RENDER: usize = 4;

/// Largest number printed on the counter.
pub const MAX_COUNTER: usize = 99;

/// How a list of assignees is laid out on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarLayout {
    total: usize,
}

impl AvatarLayout {
    #[must_use]
    pub fn new(assignees: &[Assignee]) -> Self {
        Self {
            total: assignees.len(),
        }
    }

    /// Number of avatars rendered before the counter.
    #[must_use]
    pub const fn limit_before_counter(&self) -> usize {
        if self.total > MAX_RENDER {
            MAX_RENDER - 1
        } else {
            MAX_RENDER
        }
    }

    #[must_use]
    pub const fn should_render_counter(&self) -> bool {
        self.total > MAX_RENDER
    }

    /// Assignees hidden behind the counter.
    #[must_use]
    pub const fn number_over_limit(&self) -> usize {
        self.total.saturating_sub(self.limit_before_counter())
    }

    /// Counter text, `+N` or `99+`.
    #[must_use]
    pub fn counter_label(&self) -> Option<String> {
        if !self.should_render_counter() {
            return None;
        }
        let hidden = self.number_over_limit();
        Some(if hidden > MAX_COUNTER {
            format!("{MAX_COUNTER}+")
        } else {
            format!("+{hidden}")
        })
    }

    /// Tooltip on the counter.
    #[must_use]
    pub fn counter_tooltip(&self) -> Option<String> {
        self.should_render_counter()
            .then(|| format!("+{} more assignees", self.number_over_limit()))
    }

    /// The assignees that get an avatar.
    #[must_use]
    pub fn visible<'a>(&self, assignees: &'a [Assignee]) -> &'a [Assignee] {
        let end = assignees.len().min(self.limit_before_counter());
        &assignees[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignees(n: usize) -> Vec<Assignee> {
        (0..n)
            .map(|i| Assignee::new(i as u64, format!("User {i}"), format!("user{i}")))
            .collect()
    }

    #[test]
    fn test_no_counter_up_to_max_render() {
        for n in 0..=MAX_RENDER {
            let list = assignees(n);
            let layout = AvatarLayout::new(&list);
            assert!(!layout.should_render_counter());
            assert_eq!(layout.visible(&list).len(), n);
            assert_eq!(layout.counter_label(), None);
        }
    }

    #[test]
    fn test_counter_past_max_render() {
        let list = assignees(5);
        let layout = AvatarLayout::new(&list);
        assert_eq!(layout.visible(&list).len(), 3);
        assert_eq!(layout.counter_label().as_deref(), Some("+2"));
        assert_eq!(layout.counter_tooltip().as_deref(), Some("+2 more assignees"));
    }

    #[test]
    fn test_counter_at_cap() {
        let list = assignees(102);
        let layout = AvatarLayout::new(&list);
        assert_eq!(layout.number_over_limit(), 99);
        assert_eq!(layout.counter_label().as_deref(), Some("+99"));
    }

    #[test]
    fn test_counter_caps_at_99_plus() {
        let list = assignees(103);
        let layout = AvatarLayout::new(&list);
        assert_eq!(layout.visible(&list).len(), 3);
        assert_eq!(layout.counter_label().as_deref(), Some("99+"));
        assert_eq!(layout.counter_tooltip().as_deref(), Some("+100 more assignees"));
    }
}
