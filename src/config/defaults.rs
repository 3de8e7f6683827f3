use super::models::LogLevel;
use cosmic_core::i18n::Language;

pub(crate) fn default_story_path() -> String {
    "conf/story.toml".to_string()
}

pub(crate) fn default_scroll_step() -> f32 {
    0.01
}

pub(crate) fn default_scroll_interval_ms() -> u64 {
    60
}

pub(crate) fn default_audio_enabled() -> bool {
    true
}

pub(crate) fn default_audio_volume() -> f32 {
    1.0
}

pub(crate) fn default_language() -> Language {
    Language::En
}

pub(crate) fn default_share_url() -> String {
    "https://cosmic-explorer.app/".to_string()
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Debug
}
