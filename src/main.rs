//! Entry point for Cosmic Explorer.
//!
//! Loads configuration and a story file, attaches the scroll-story controller
//! to a scroll signal, then drives that signal from an automatic sweep or
//! from fractions typed on stdin.

mod config;
mod player;

use crate::config::{load_config, serialize_config};
use crate::player::{ScrollInput, share_report};
use anyhow::{Context, Result, anyhow};
use cosmic_core::i18n::{Language, translate};
use cosmic_core::{AudioOutput, NullAudio, RodioAudio, ScrollSignal, ScrollStory, load_story};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: cosmic-explorer [story.toml] [--stdin] [--lang <tag>] \
                     [--config <path>] [--print-config]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    story_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    language: Option<Language>,
    read_stdin: bool,
    print_config: bool,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("conf/config.toml"));
    let mut config = load_config(&config_path);
    if let Some(language) = args.language {
        config.language = language;
    }
    set_log_level(reload_handle, config.log_level.as_filter_str());

    if args.print_config {
        print!("{}", serialize_config(&config)?);
        return Ok(());
    }

    let story_path = args
        .story_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.story_path));
    if !story_path.exists() {
        return Err(anyhow!("File not found: {}", story_path.display()));
    }
    info!(
        story = %story_path.display(),
        language = %config.language,
        level = %config.log_level,
        "Starting Cosmic Explorer"
    );

    let story = load_story(&story_path)?;
    let base_dir = story_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let audio = open_audio(config.audio_enabled, &base_dir, config.audio_volume);

    let scroll = ScrollSignal::new();
    let mut controller = ScrollStory::attach(&scroll, story.steps.clone(), audio);

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Release))
        .context("Installing Ctrl-C handler")?;

    println!("{}: {}", translate(config.language, "app.title"), story.title);
    if !story.description.is_empty() {
        println!("{}", story.description);
    }

    let input = if args.read_stdin {
        ScrollInput::Stdin
    } else {
        ScrollInput::Sweep {
            step: config.scroll_step,
            interval: Duration::from_millis(config.scroll_interval_ms),
        }
    };
    player::play(&scroll, &controller, input, config.language, &stop)?;
    controller.detach();

    let snapshot = controller.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("Serializing final snapshot")?
    );
    for line in share_report(&story, &config.share_url, config.language) {
        println!("{line}");
    }
    Ok(())
}

fn open_audio(enabled: bool, base_dir: &Path, volume: f32) -> Box<dyn AudioOutput> {
    if !enabled {
        info!("Audio disabled by configuration");
        return Box::new(NullAudio::default());
    }
    match RodioAudio::open(base_dir, volume) {
        Ok(audio) => Box::new(audio),
        Err(err) => {
            warn!("No audio output available, continuing silently: {err:#}");
            Box::new(NullAudio::default())
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stdin" => parsed.read_stdin = true,
            "--print-config" => parsed.print_config = true,
            "--lang" => {
                let tag = args.next().ok_or_else(|| anyhow!("--lang needs a value\n{USAGE}"))?;
                let language = Language::from_tag(&tag)
                    .ok_or_else(|| anyhow!("Unsupported language: {tag}"))?;
                parsed.language = Some(language);
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a value\n{USAGE}"))?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            flag if flag.starts_with("--") => {
                return Err(anyhow!("Unknown option: {flag}\n{USAGE}"));
            }
            path => {
                if parsed.story_path.is_some() {
                    return Err(anyhow!("Only one story file may be given\n{USAGE}"));
                }
                parsed.story_path = Some(PathBuf::from(path));
            }
        }
    }
    Ok(parsed)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_story_and_flags() {
        let parsed = parse_args(args(&["story.toml", "--stdin", "--lang", "es-AR"])).unwrap();
        assert_eq!(parsed.story_path, Some(PathBuf::from("story.toml")));
        assert!(parsed.read_stdin);
        assert_eq!(parsed.language, Some(Language::Es));
    }

    #[test]
    fn rejects_unknown_language_and_options() {
        assert!(parse_args(args(&["--lang", "xx"])).is_err());
        assert!(parse_args(args(&["--fast"])).is_err());
        assert!(parse_args(args(&["a.toml", "b.toml"])).is_err());
    }

    #[test]
    fn print_config_combines_with_overrides() {
        let parsed = parse_args(args(&["--config", "alt.toml", "--print-config", "--lang", "de"]))
            .unwrap();
        assert!(parsed.print_config);
        assert_eq!(parsed.config_path, Some(PathBuf::from("alt.toml")));
        assert_eq!(parsed.language, Some(Language::De));
        assert_eq!(parsed.story_path, None);
    }

    #[test]
    fn no_arguments_means_defaults() {
        assert_eq!(parse_args(args(&[])).unwrap(), CliArgs::default());
    }
}
