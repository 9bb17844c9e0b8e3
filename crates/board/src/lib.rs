//! Issue board card view model.
//!
//! A card binds an issue's title, reference, confidential flag, labels and
//! assignees to a rendered view.
//!
//! # Usage
//!
//! ```
//! use board::{Assignee, CardBinding, IssueCard};
//!
//! let mut binding = CardBinding::new(IssueCard::new(1, 42, "Broken login", "acme/app"));
//! for i in 0..5 {
//!     binding.add_assignee(Assignee::new(i, format!("User {i}"), format!("user{i}")));
//! }
//!
//! let view = binding.tick().expect("assignees changed");
//! assert_eq!(view.avatars.len(), 3);
//! assert_eq!(view.counter.as_ref().unwrap().label, "+2");
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod avatars;
pub mod card;
pub mod reactive;
pub mod render;

pub use avatars::{AvatarLayout, MAX_COUNTER, MAX_RENDER};
pub use card::{contrast_text_color, Assignee, IssueCard, Label};
pub use reactive::{CardBinding, Mutation};
pub use render::{render, AvatarView, CardView, CounterView, LabelView};
