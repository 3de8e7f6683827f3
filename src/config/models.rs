use super::defaults;
use cosmic_core::i18n::Language;
use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "defaults::default_story_path")]
    pub story_path: String,
    /// Scroll fraction advanced per tick during an automatic sweep.
    #[serde(default = "defaults::default_scroll_step")]
    pub scroll_step: f32,
    #[serde(default = "defaults::default_scroll_interval_ms")]
    pub scroll_interval_ms: u64,
    #[serde(default = "defaults::default_audio_enabled")]
    pub audio_enabled: bool,
    #[serde(default = "defaults::default_audio_volume")]
    pub audio_volume: f32,
    #[serde(default = "defaults::default_language")]
    pub language: Language,
    #[serde(default = "defaults::default_share_url")]
    pub share_url: String,
    #[serde(default = "defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            story_path: defaults::default_story_path(),
            scroll_step: defaults::default_scroll_step(),
            scroll_interval_ms: defaults::default_scroll_interval_ms(),
            audio_enabled: defaults::default_audio_enabled(),
            audio_volume: defaults::default_audio_volume(),
            language: defaults::default_language(),
            share_url: defaults::default_share_url(),
            log_level: defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Clamp values that would stall or overshoot a sweep.
    pub fn sanitized(mut self) -> Self {
        self.scroll_step = if self.scroll_step.is_finite() {
            self.scroll_step.clamp(0.001, 0.5)
        } else {
            defaults::default_scroll_step()
        };
        self.audio_volume = if self.audio_volume.is_finite() {
            self.audio_volume.clamp(0.0, 2.0)
        } else {
            defaults::default_audio_volume()
        };
        self
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
