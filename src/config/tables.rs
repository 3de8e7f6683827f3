use super::defaults;
use super::models::{AppConfig, LogLevel};
use cosmic_core::i18n::Language;
use serde::Deserialize;

pub(super) const TABLE_NAMES: [&str; 6] = ["story", "scroll", "audio", "i18n", "share", "logging"];

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    story: StoryConfig,
    #[serde(default)]
    scroll: ScrollConfig,
    #[serde(default)]
    audio: AudioConfig,
    #[serde(default)]
    i18n: I18nConfig,
    #[serde(default)]
    share: ShareConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            story_path: tables.story.path,
            scroll_step: tables.scroll.step,
            scroll_interval_ms: tables.scroll.interval_ms,
            audio_enabled: tables.audio.enabled,
            audio_volume: tables.audio.volume,
            language: tables.i18n.language,
            share_url: tables.share.url,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            story: StoryConfig {
                path: config.story_path.clone(),
            },
            scroll: ScrollConfig {
                step: config.scroll_step,
                interval_ms: config.scroll_interval_ms,
            },
            audio: AudioConfig {
                enabled: config.audio_enabled,
                volume: config.audio_volume,
            },
            i18n: I18nConfig {
                language: config.language,
            },
            share: ShareConfig {
                url: config.share_url.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StoryConfig {
    #[serde(default = "defaults::default_story_path")]
    path: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        StoryConfig {
            path: defaults::default_story_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ScrollConfig {
    #[serde(default = "defaults::default_scroll_step")]
    step: f32,
    #[serde(default = "defaults::default_scroll_interval_ms")]
    interval_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            step: defaults::default_scroll_step(),
            interval_ms: defaults::default_scroll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AudioConfig {
    #[serde(default = "defaults::default_audio_enabled")]
    enabled: bool,
    #[serde(default = "defaults::default_audio_volume")]
    volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            enabled: defaults::default_audio_enabled(),
            volume: defaults::default_audio_volume(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct I18nConfig {
    #[serde(default = "defaults::default_language")]
    language: Language,
}

impl Default for I18nConfig {
    fn default() -> Self {
        I18nConfig {
            language: defaults::default_language(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ShareConfig {
    #[serde(default = "defaults::default_share_url")]
    url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        ShareConfig {
            url: defaults::default_share_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
