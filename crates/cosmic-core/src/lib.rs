//! Core logic for Cosmic Explorer.
//!
//! The scroll-story controller lives in [`story`]; everything else is a thin
//! wrapper around a platform capability expressed as a trait so the host
//! (desktop binary, tests, or a web shell) can plug in its own implementation.

pub mod audio;
pub mod i18n;
pub mod pwa;
pub mod share;
pub mod signal;
pub mod story;
pub mod story_loader;

pub use audio::{AudioOutput, NullAudio, RodioAudio};
pub use signal::{ProgressSource, ScrollSignal, Signal, Subscription};
pub use story::{ScrollStory, StorySnapshot, StoryStep, step_progress};
pub use story_loader::{Story, load_story, parse_story};
