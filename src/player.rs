//! Feeds scroll positions into the story and prints what happens.

use anyhow::{Context, Result};
use cosmic_core::i18n::{Language, translate, translate_with};
use cosmic_core::share::{SharePayload, share_links};
use cosmic_core::story::StoryPhase;
use cosmic_core::{AudioOutput, ScrollSignal, ScrollStory, Story};
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    Sweep { step: f32, interval: Duration },
    Stdin,
}

pub fn play<A: AudioOutput + 'static>(
    scroll: &ScrollSignal,
    story: &ScrollStory<A>,
    input: ScrollInput,
    language: Language,
    stop: &AtomicBool,
) -> Result<()> {
    let mut reporter = Reporter::new(language);
    match input {
        ScrollInput::Sweep { step, interval } => {
            let positions = sweep_positions(step);
            info!(ticks = positions.len(), step, "Starting scroll sweep");
            for position in positions {
                if stop.load(Ordering::Acquire) {
                    info!("Sweep interrupted");
                    break;
                }
                scroll.set(position);
                reporter.observe(story);
                thread::sleep(interval);
            }
        }
        ScrollInput::Stdin => {
            println!("{}", translate(language, "story.inactive"));
            for line in io::stdin().lock().lines() {
                let line = line.context("Reading scroll position from stdin")?;
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("q") || stop.load(Ordering::Acquire) {
                    break;
                }
                match parse_position(trimmed) {
                    Some(position) => {
                        scroll.set(position);
                        reporter.observe(story);
                    }
                    None => warn!(input = trimmed, "Ignoring non-numeric scroll position"),
                }
            }
        }
    }

    if matches!(story.phase(), StoryPhase::Active(idx) if idx + 1 == story.steps().len()) {
        println!("{}", translate(language, "story.finished"));
    }
    Ok(())
}

/// Evenly spaced positions from 0 to 1 inclusive.
pub fn sweep_positions(step: f32) -> Vec<f32> {
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        0.01
    };
    let ticks = (1.0 / step).ceil() as usize;
    (0..=ticks)
        .map(|i| (i as f32 * step).min(1.0))
        .collect()
}

/// Accepts `0.42` or `42%`.
pub fn parse_position(input: &str) -> Option<f32> {
    let (number, scale) = match input.strip_suffix('%') {
        Some(percent) => (percent.trim(), 100.0),
        None => (input, 1.0),
    };
    number
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value / scale)
}

/// Prints a status line whenever the active step or its sub-progress bucket
/// changes, so a sweep does not flood the terminal.
struct Reporter {
    language: Language,
    last: Option<(Option<String>, u32)>,
}

impl Reporter {
    fn new(language: Language) -> Self {
        Self {
            language,
            last: None,
        }
    }

    fn observe<A: AudioOutput + 'static>(&mut self, story: &ScrollStory<A>) {
        let current = story.current_step();
        let step_pct = current
            .as_ref()
            .map(|step| story.step_progress(step))
            .unwrap_or(0.0);
        let bucket = (step_pct * 4.0).floor() as u32;
        let key = (current.as_ref().map(|step| step.id.clone()), bucket);
        if self.last.as_ref() == Some(&key) {
            return;
        }
        self.last = Some(key);

        let line = status_line(
            self.language,
            story.progress(),
            story.phase(),
            current.as_ref().map(|step| step.title.as_str()),
            story.steps().len(),
            step_pct,
        );
        debug!(%line, "Status");
        println!("{line}");
    }
}

pub fn status_line(
    language: Language,
    progress: f32,
    phase: StoryPhase,
    title: Option<&str>,
    total: usize,
    step_progress: f32,
) -> String {
    let percent = format!("{:.0}", progress * 100.0);
    let overall = translate_with(language, "story.progress", &[("percent", percent.as_str())]);
    match (phase, title) {
        (StoryPhase::Active(idx), Some(title)) => {
            let index = (idx + 1).to_string();
            let total = total.to_string();
            let step = translate_with(
                language,
                "story.active_step",
                &[
                    ("index", index.as_str()),
                    ("total", total.as_str()),
                    ("title", title),
                ],
            );
            format!("[{overall}] {step} ({:.0}%)", step_progress * 100.0)
        }
        _ => format!("[{overall}] {}", translate(language, "story.inactive")),
    }
}

/// Deep links for sharing the story, headed by a translated title.
pub fn share_report(story: &Story, url: &str, language: Language) -> Vec<String> {
    let payload = SharePayload {
        title: story.title.clone(),
        text: format!("{}: {}", translate(language, "app.title"), story.title),
        url: url.to_string(),
    };
    let mut lines = vec![translate(language, "share.title").to_string()];
    lines.extend(
        share_links(&payload)
            .into_iter()
            .map(|(network, link)| format!("  {network}: {link}")),
    );
    lines
}
