use super::snapshot::StorySnapshot;
use super::step::StoryStep;
use super::transitions::{StoryPhase, StoryState, StoryTransition};
use crate::audio::AudioOutput;
use crate::signal::{ProgressSource, Subscription};
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Scroll-story controller bound to a progress source for its lifetime.
///
/// The subscription is released by [`ScrollStory::detach`] or when the
/// controller is dropped; after that the source may keep emitting without
/// touching this controller's state.
pub struct ScrollStory<A> {
    runtime: Rc<RefCell<StoryRuntime<A>>>,
    subscription: Option<Subscription>,
}

struct StoryRuntime<A> {
    state: StoryState,
    audio: A,
}

impl<A: AudioOutput + 'static> ScrollStory<A> {
    pub fn attach<S>(source: &S, steps: Vec<StoryStep>, audio: A) -> Self
    where
        S: ProgressSource + ?Sized,
    {
        let step_count = steps.len();
        let runtime = Rc::new(RefCell::new(StoryRuntime {
            state: StoryState::new(steps),
            audio,
        }));

        // Resolve against where the view already is; a step at trigger 0.0
        // is active before the first scroll event arrives.
        runtime
            .borrow_mut()
            .on_progress(source.current_progress());

        let weak = Rc::downgrade(&runtime);
        let subscription = source.subscribe_progress(Box::new(move |latest| {
            if let Some(runtime) = weak.upgrade() {
                runtime.borrow_mut().on_progress(latest);
            }
        }));
        info!(steps = step_count, "Scroll story attached");

        Self {
            runtime,
            subscription: Some(subscription),
        }
    }

    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("Scroll story detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.runtime.borrow().state.progress()
    }

    pub fn phase(&self) -> StoryPhase {
        self.runtime.borrow().state.phase()
    }

    pub fn current_step(&self) -> Option<StoryStep> {
        self.runtime.borrow().state.current_step().cloned()
    }

    pub fn current_step_id(&self) -> Option<String> {
        self.runtime
            .borrow()
            .state
            .current_step()
            .map(|step| step.id.clone())
    }

    /// Sub-progress of any step (not only the active one) at the current
    /// scroll position.
    pub fn step_progress(&self, step: &StoryStep) -> f32 {
        self.runtime.borrow().state.step_progress(step)
    }

    pub fn steps(&self) -> Vec<StoryStep> {
        self.runtime.borrow().state.steps().to_vec()
    }

    /// Swap the step sequence; takes effect on the next progress update.
    pub fn replace_steps(&self, steps: Vec<StoryStep>) {
        self.runtime.borrow_mut().state.replace_steps(steps);
    }

    pub fn snapshot(&self) -> StorySnapshot {
        self.runtime.borrow().state.snapshot()
    }

    pub fn with_audio<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        f(&self.runtime.borrow().audio)
    }
}

impl<A: AudioOutput> StoryRuntime<A> {
    fn on_progress(&mut self, latest: f32) {
        match self.state.apply_progress(latest) {
            Some(StoryTransition::Entered { index, step }) => {
                info!(
                    index,
                    id = %step.id,
                    progress = self.state.progress(),
                    "Entered story step"
                );
                if let Some(resource) = step.audio.as_deref() {
                    self.start_audio(&step.id, resource);
                }
            }
            Some(StoryTransition::Cleared) => {
                debug!(progress = self.state.progress(), "No story step active");
            }
            None => {}
        }
    }

    /// Best-effort playback; a missing file or blocked device must not stall
    /// the story.
    fn start_audio(&mut self, step_id: &str, resource: &str) {
        let audio = &mut self.audio;
        let result = (|| -> Result<()> {
            audio.set_source(resource)?;
            audio.play()
        })();
        if let Err(err) = result {
            warn!(step = step_id, resource, "Audio playback failed: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ScrollSignal;
    use anyhow::anyhow;

    #[derive(Default)]
    struct RecordingAudio {
        sources: Vec<String>,
        plays: usize,
        fail_play: bool,
    }

    impl AudioOutput for RecordingAudio {
        fn set_source(&mut self, resource: &str) -> Result<()> {
            self.sources.push(resource.to_string());
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            if self.fail_play {
                return Err(anyhow!("output blocked"));
            }
            self.plays += 1;
            Ok(())
        }
    }

    fn narrated_steps() -> Vec<StoryStep> {
        vec![
            StoryStep::new("launch", "Launch", 0.1).with_audio("launch.ogg"),
            StoryStep::new("orbit", "Orbit", 0.4).with_audio("orbit.ogg"),
            StoryStep::new("landing", "Landing", 0.8).with_audio("landing.ogg"),
        ]
    }

    #[test]
    fn plays_audio_once_per_transition_in_order() {
        let scroll = ScrollSignal::new();
        let story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());

        let mut seen = Vec::new();
        for i in 0..=20 {
            scroll.set(i as f32 * 0.05);
            if let Some(id) = story.current_step_id() {
                if seen.last() != Some(&id) {
                    seen.push(id);
                }
            }
        }

        assert_eq!(seen, vec!["launch", "orbit", "landing"]);
        story.with_audio(|audio| {
            assert_eq!(audio.sources, vec!["launch.ogg", "orbit.ogg", "landing.ogg"]);
            assert_eq!(audio.plays, 3);
        });
    }

    #[test]
    fn step_at_top_of_view_is_active_on_attach() {
        let scroll = ScrollSignal::new();
        let steps = vec![
            StoryStep::new("countdown", "Countdown", 0.0).with_audio("countdown.ogg"),
            StoryStep::new("orbit", "Orbit", 0.5),
        ];
        let story = ScrollStory::attach(&scroll, steps, RecordingAudio::default());

        assert_eq!(story.current_step_id().as_deref(), Some("countdown"));
        assert_eq!(
            story.snapshot().active_step_id.as_deref(),
            Some("countdown")
        );
        story.with_audio(|audio| {
            assert_eq!(audio.sources, vec!["countdown.ogg"]);
            assert_eq!(audio.plays, 1);
        });

        scroll.set(0.0);
        scroll.set(0.2);
        story.with_audio(|audio| assert_eq!(audio.plays, 1));
    }

    #[test]
    fn attaching_mid_scroll_resolves_current_position() {
        let scroll = ScrollSignal::new();
        scroll.set(0.6);
        let story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());

        assert_eq!(story.current_step_id().as_deref(), Some("orbit"));
        assert!((story.progress() - 0.6).abs() < f32::EPSILON);
        story.with_audio(|audio| assert_eq!(audio.sources, vec!["orbit.ogg"]));
    }

    #[test]
    fn repeated_updates_inside_one_step_do_not_restart_audio() {
        let scroll = ScrollSignal::new();
        let story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());

        for p in [0.15, 0.2, 0.25, 0.3, 0.35] {
            scroll.set(p);
        }
        story.with_audio(|audio| assert_eq!(audio.plays, 1));
    }

    #[test]
    fn scrolling_back_to_top_reverts_to_inactive() {
        let scroll = ScrollSignal::new();
        let story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());

        scroll.set(0.9);
        assert_eq!(story.current_step_id().as_deref(), Some("landing"));
        scroll.set(0.05);
        assert_eq!(story.phase(), StoryPhase::Inactive);
        assert!(story.current_step().is_none());
    }

    #[test]
    fn playback_failure_does_not_disturb_state() {
        let scroll = ScrollSignal::new();
        let audio = RecordingAudio {
            fail_play: true,
            ..RecordingAudio::default()
        };
        let story = ScrollStory::attach(&scroll, narrated_steps(), audio);

        scroll.set(0.45);
        assert_eq!(story.current_step_id().as_deref(), Some("orbit"));
        scroll.set(0.85);
        assert_eq!(story.current_step_id().as_deref(), Some("landing"));
        assert!((story.progress() - 0.85).abs() < f32::EPSILON);
        story.with_audio(|audio| assert_eq!(audio.sources.len(), 2));
    }

    #[test]
    fn silent_steps_skip_audio() {
        let scroll = ScrollSignal::new();
        let steps = vec![
            StoryStep::new("quiet", "Quiet", 0.0),
            StoryStep::new("loud", "Loud", 0.5).with_audio("boom.wav"),
        ];
        let story = ScrollStory::attach(&scroll, steps, RecordingAudio::default());

        scroll.set(0.2);
        story.with_audio(|audio| assert!(audio.sources.is_empty()));
        scroll.set(0.6);
        story.with_audio(|audio| assert_eq!(audio.sources, vec!["boom.wav"]));
    }

    #[test]
    fn detach_stops_further_updates() {
        let scroll = ScrollSignal::new();
        let mut story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());
        scroll.set(0.2);
        story.detach();
        assert!(!story.is_attached());
        assert_eq!(scroll.listener_count(), 0);

        scroll.set(0.9);
        assert_eq!(story.current_step_id().as_deref(), Some("launch"));
        assert!((story.progress() - 0.2).abs() < f32::EPSILON);
        story.with_audio(|audio| assert_eq!(audio.plays, 1));
    }

    #[test]
    fn dropping_controller_releases_subscription() {
        let scroll = ScrollSignal::new();
        let story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());
        assert_eq!(scroll.listener_count(), 1);
        drop(story);
        assert_eq!(scroll.listener_count(), 0);
        scroll.set(0.5);
    }

    #[test]
    fn step_progress_uses_latest_scroll_position() {
        let scroll = ScrollSignal::new();
        let nebula = StoryStep::new("nebula", "Nebula", 0.2).with_duration(0.3);
        let story = ScrollStory::attach(&scroll, vec![nebula.clone()], RecordingAudio::default());

        scroll.set(0.35);
        assert!((story.step_progress(&nebula) - 0.5).abs() < 1e-5);
        scroll.set(0.6);
        assert_eq!(story.step_progress(&nebula), 1.0);
    }

    #[test]
    fn replaced_steps_replay_audio_on_next_update() {
        let scroll = ScrollSignal::new();
        let story = ScrollStory::attach(&scroll, narrated_steps(), RecordingAudio::default());
        scroll.set(0.5);
        story.replace_steps(narrated_steps());
        scroll.set(0.55);

        story.with_audio(|audio| {
            assert_eq!(audio.sources, vec!["orbit.ogg", "orbit.ogg"]);
        });
    }
}
