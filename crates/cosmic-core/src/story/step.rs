use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One narrative unit, armed once scroll progress reaches `trigger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoryStep {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub trigger: f32,
    /// Width of the window, in scroll units, over which the step's own
    /// progress ramps from 0 to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub duration: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub audio: Option<String>,
}

impl StoryStep {
    pub fn new(id: impl Into<String>, title: impl Into<String>, trigger: f32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            trigger,
            duration: None,
            audio: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }
}

/// Sub-progress of `step` at scroll position `progress`, in `[0, 1]`.
///
/// Steps without a usable duration are instantaneous and report 1.0
/// regardless of where the view is.
pub fn step_progress(step: &StoryStep, progress: f32) -> f32 {
    let duration = match step.duration {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => return 1.0,
    };

    let start = step.trigger;
    let end = step.trigger + duration;
    if progress < start {
        0.0
    } else if progress > end {
        1.0
    } else {
        ((progress - start) / duration).clamp(0.0, 1.0)
    }
}
