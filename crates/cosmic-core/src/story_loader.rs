//! Story files.
//!
//! A story is a small TOML document:
//!
//! ```toml
//! title = "Journey to Andromeda"
//!
//! [[steps]]
//! id = "launch"
//! title = "Liftoff"
//! trigger = 0.0
//! duration = 0.15
//! audio = "audio/launch.ogg"
//! ```
//!
//! Steps are kept in file order; the controller relies on that order.

use crate::story::StoryStep;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<StoryStep>,
}

pub fn load_story(path: &Path) -> Result<Story> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Reading story file {}", path.display()))?;
    let story =
        parse_story(&contents).with_context(|| format!("Parsing story {}", path.display()))?;
    info!(
        path = %path.display(),
        title = %story.title,
        steps = story.steps.len(),
        "Loaded story"
    );
    Ok(story)
}

pub fn parse_story(contents: &str) -> Result<Story> {
    let story: Story = toml::from_str(contents).context("Invalid story TOML")?;
    validate(&story)?;
    Ok(story)
}

fn validate(story: &Story) -> Result<()> {
    if story.steps.is_empty() {
        bail!("story has no steps");
    }

    let mut ids = HashSet::new();
    for step in &story.steps {
        if step.id.trim().is_empty() {
            bail!("step with title {:?} has an empty id", step.title);
        }
        if !ids.insert(step.id.as_str()) {
            bail!("duplicate step id {:?}", step.id);
        }
        if !step.trigger.is_finite() || !(0.0..=1.0).contains(&step.trigger) {
            bail!(
                "step {:?} has trigger {} outside [0, 1]",
                step.id,
                step.trigger
            );
        }
        match step.duration {
            Some(d) if !d.is_finite() => {
                bail!("step {:?} has a non-finite duration", step.id);
            }
            Some(d) if d <= 0.0 => {
                warn!(
                    id = %step.id,
                    duration = d,
                    "Non-positive step duration; step will be instantaneous"
                );
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SAMPLE: &str = r#"
title = "Journey to Andromeda"
description = "A scroll through the local group"

[[steps]]
id = "launch"
title = "Liftoff"
content = "Engines ignite."
trigger = 0.0
duration = 0.15
audio = "audio/launch.ogg"

[[steps]]
id = "milky-way"
title = "Leaving Home"
trigger = 0.35
"#;

    #[test]
    fn parses_steps_in_file_order() {
        let story = parse_story(SAMPLE).unwrap();
        assert_eq!(story.title, "Journey to Andromeda");
        let ids: Vec<_> = story.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["launch", "milky-way"]);
        assert_eq!(story.steps[0].duration, Some(0.15));
        assert_eq!(story.steps[0].audio.as_deref(), Some("audio/launch.ogg"));
        assert!(story.steps[1].audio.is_none());
        assert!(story.steps[1].content.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let doc = r#"
title = "Twins"
[[steps]]
id = "a"
title = "One"
trigger = 0.1
[[steps]]
id = "a"
title = "Two"
trigger = 0.2
"#;
        let err = parse_story(doc).unwrap_err();
        assert!(err.to_string().contains("duplicate step id"));
    }

    #[test]
    fn rejects_out_of_range_trigger() {
        let doc = r#"
title = "Overflow"
[[steps]]
id = "far"
title = "Too far"
trigger = 1.5
"#;
        assert!(parse_story(doc).is_err());
    }

    #[test]
    fn rejects_empty_story() {
        assert!(parse_story("title = \"Empty\"").is_err());
    }

    #[test]
    fn accepts_unsorted_triggers() {
        let doc = r#"
title = "Shuffled"
[[steps]]
id = "late"
title = "Late"
trigger = 0.8
[[steps]]
id = "early"
title = "Early"
trigger = 0.2
"#;
        let story = parse_story(doc).unwrap();
        assert_eq!(story.steps[0].id, "late");
    }

    #[test]
    fn loads_from_disk() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("cosmic-story-{nanos}.toml"));
        fs::write(&path, SAMPLE).unwrap();

        let story = load_story(&path).unwrap();
        assert_eq!(story.steps.len(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_story(Path::new("/nonexistent/cosmic/story.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cosmic/story.toml"));
    }
}
