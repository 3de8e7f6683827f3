//! Scroll-synchronized narrative.
//!
//! A story is an ordered list of [`StoryStep`]s, each armed at a scroll
//! fraction (`trigger`). [`StoryState`] is the pure reducer that turns a
//! stream of progress values into step transitions; [`ScrollStory`] wires it
//! to a [`crate::ProgressSource`] and performs the audio side effect.

mod controller;
mod snapshot;
mod step;
mod transitions;

pub use controller::ScrollStory;
pub use snapshot::{StepView, StorySnapshot};
pub use step::{StoryStep, step_progress};
pub use transitions::{StoryPhase, StoryState, StoryTransition, resolve_active_index};
