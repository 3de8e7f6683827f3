use super::snapshot::{StepView, StorySnapshot};
use super::step::{StoryStep, step_progress};
use crate::signal::sanitize_progress;
use tracing::{debug, warn};

/// Identity of a step: its position within a particular step sequence.
/// Swapping the sequence bumps `generation`, so an equal-looking step from a
/// new sequence is still a different identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepKey {
    generation: u64,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryPhase {
    Inactive,
    Active(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoryTransition {
    Entered { index: usize, step: StoryStep },
    Cleared,
}

pub struct StoryState {
    steps: Vec<StoryStep>,
    sorted: bool,
    generation: u64,
    progress: f32,
    current: Option<(StepKey, StoryStep)>,
}

impl StoryState {
    pub fn new(steps: Vec<StoryStep>) -> Self {
        let sorted = check_ordering(&steps);
        Self {
            steps,
            sorted,
            generation: 0,
            progress: 0.0,
            current: None,
        }
    }

    pub fn steps(&self) -> &[StoryStep] {
        &self.steps
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current_step(&self) -> Option<&StoryStep> {
        self.current.as_ref().map(|(_, step)| step)
    }

    pub fn phase(&self) -> StoryPhase {
        match &self.current {
            Some((key, _)) => StoryPhase::Active(key.index),
            None => StoryPhase::Inactive,
        }
    }

    /// Record a new scroll position and report whether the active step
    /// changed identity.
    pub fn apply_progress(&mut self, latest: f32) -> Option<StoryTransition> {
        self.progress = sanitize_progress(latest);

        let next = resolve_active_index(&self.steps, self.sorted, self.progress).map(|index| {
            StepKey {
                generation: self.generation,
                index,
            }
        });
        let previous = self.current.as_ref().map(|(key, _)| *key);
        if next == previous {
            return None;
        }

        match next {
            Some(key) => {
                let step = self.steps[key.index].clone();
                debug!(
                    from = ?previous.map(|k| k.index),
                    to = key.index,
                    progress = self.progress,
                    "Story step changed"
                );
                self.current = Some((key, step.clone()));
                Some(StoryTransition::Entered {
                    index: key.index,
                    step,
                })
            }
            None => {
                debug!(progress = self.progress, "Story returned to inactive");
                self.current = None;
                Some(StoryTransition::Cleared)
            }
        }
    }

    /// Swap in a new step sequence. The current step is kept as-is until the
    /// next progress update resolves against the new sequence.
    pub fn replace_steps(&mut self, steps: Vec<StoryStep>) {
        self.sorted = check_ordering(&steps);
        self.steps = steps;
        self.generation = self.generation.wrapping_add(1);
        debug!(
            generation = self.generation,
            count = self.steps.len(),
            "Replaced story steps"
        );
    }

    pub fn step_progress(&self, step: &StoryStep) -> f32 {
        step_progress(step, self.progress)
    }

    pub fn snapshot(&self) -> StorySnapshot {
        // A step held over from a replaced sequence is not part of this one.
        let live = self
            .current
            .as_ref()
            .filter(|(key, _)| key.generation == self.generation);
        let active = live.map(|(key, _)| key.index);
        StorySnapshot {
            progress: self.progress,
            active_step_id: live.map(|(_, step)| step.id.clone()),
            steps: self
                .steps
                .iter()
                .enumerate()
                .map(|(idx, step)| StepView {
                    id: step.id.clone(),
                    title: step.title.clone(),
                    trigger: step.trigger,
                    progress: self.step_progress(step),
                    active: active == Some(idx),
                })
                .collect(),
        }
    }
}

/// Index of the last step, in sequence order, whose trigger has been reached.
///
/// `sorted` must only be true when triggers are non-decreasing; it enables a
/// binary search that agrees with the linear scan for such input.
pub fn resolve_active_index(steps: &[StoryStep], sorted: bool, progress: f32) -> Option<usize> {
    if sorted {
        steps
            .partition_point(|step| step.trigger <= progress)
            .checked_sub(1)
    } else {
        steps.iter().rposition(|step| step.trigger <= progress)
    }
}

fn triggers_sorted(steps: &[StoryStep]) -> bool {
    steps.windows(2).all(|pair| pair[0].trigger <= pair[1].trigger)
}

fn check_ordering(steps: &[StoryStep]) -> bool {
    let sorted = triggers_sorted(steps);
    if !sorted {
        warn!(
            count = steps.len(),
            "Story steps are not ordered by trigger; resolving by sequence order"
        );
    }
    sorted
}
