use serde::Serialize;
use ts_rs::TS;

/// Per-step state as a view layer renders it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct StepView {
    pub id: String,
    pub title: String,
    pub trigger: f32,
    pub progress: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct StorySnapshot {
    pub progress: f32,
    pub active_step_id: Option<String>,
    pub steps: Vec<StepView>,
}
