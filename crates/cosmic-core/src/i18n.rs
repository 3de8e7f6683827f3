//! Key-based UI text with a default-language fallback.
//!
//! Lookups go requested language → English → the key itself, so a missing
//! translation degrades to readable English instead of failing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Es, Language::Fr, Language::De];

    /// Parse a language tag such as `es-MX` or `fr_CA` by its primary subtag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            "fr" => Some(Language::Fr),
            "de" => Some(Language::De),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

type Table = HashMap<&'static str, &'static str>;

static TABLES: Lazy<HashMap<Language, Table>> = Lazy::new(|| {
    let mut tables = HashMap::new();
    tables.insert(
        Language::En,
        Table::from([
            ("app.title", "Cosmic Explorer"),
            ("app.tagline", "Scroll to travel through the universe"),
            ("story.inactive", "Scroll down to begin the journey"),
            ("story.active_step", "Step {{index}} of {{total}}: {{title}}"),
            ("story.progress", "{{percent}}% explored"),
            ("story.finished", "Journey complete"),
            ("share.title", "Share this journey"),
            ("share.shared", "Thanks for sharing!"),
            ("share.copied", "Link copied to clipboard"),
            ("share.cancelled", "Sharing cancelled"),
            ("share.unavailable", "Sharing is not available"),
            ("pwa.install", "Install Cosmic Explorer"),
            ("pwa.installed", "App installed"),
            ("pwa.update_available", "A new version is available"),
            ("pwa.offline_ready", "Ready to explore offline"),
            ("pwa.online", "Back online"),
            ("pwa.offline", "You are offline"),
            ("pwa.cache_cleared", "Cleared {{count}} caches"),
        ]),
    );
    tables.insert(
        Language::Es,
        Table::from([
            ("app.title", "Explorador Cósmico"),
            ("app.tagline", "Desplázate para viajar por el universo"),
            ("story.inactive", "Desplázate hacia abajo para comenzar el viaje"),
            ("story.active_step", "Paso {{index}} de {{total}}: {{title}}"),
            ("story.progress", "{{percent}}% explorado"),
            ("story.finished", "Viaje completado"),
            ("share.title", "Comparte este viaje"),
            ("share.shared", "¡Gracias por compartir!"),
            ("share.copied", "Enlace copiado al portapapeles"),
            ("share.cancelled", "Compartir cancelado"),
            ("share.unavailable", "Compartir no está disponible"),
            ("pwa.install", "Instalar Explorador Cósmico"),
            ("pwa.installed", "Aplicación instalada"),
            ("pwa.update_available", "Hay una nueva versión disponible"),
            ("pwa.offline_ready", "Listo para explorar sin conexión"),
            ("pwa.online", "Conectado de nuevo"),
            ("pwa.offline", "Estás sin conexión"),
            ("pwa.cache_cleared", "Se borraron {{count}} cachés"),
        ]),
    );
    tables.insert(
        Language::Fr,
        Table::from([
            ("app.title", "Explorateur Cosmique"),
            ("app.tagline", "Faites défiler pour voyager dans l'univers"),
            ("story.inactive", "Faites défiler pour commencer le voyage"),
            ("story.active_step", "Étape {{index}} sur {{total}} : {{title}}"),
            ("story.progress", "{{percent}} % exploré"),
            ("story.finished", "Voyage terminé"),
            ("share.title", "Partager ce voyage"),
            ("share.copied", "Lien copié dans le presse-papiers"),
            ("share.cancelled", "Partage annulé"),
            ("pwa.install", "Installer Explorateur Cosmique"),
            ("pwa.update_available", "Une nouvelle version est disponible"),
            ("pwa.online", "De nouveau en ligne"),
            ("pwa.offline", "Vous êtes hors ligne"),
        ]),
    );
    tables.insert(
        Language::De,
        Table::from([
            ("app.title", "Kosmischer Entdecker"),
            ("story.inactive", "Scrolle nach unten, um die Reise zu beginnen"),
            ("story.active_step", "Schritt {{index}} von {{total}}: {{title}}"),
            ("story.progress", "{{percent}} % erkundet"),
            ("share.copied", "Link in die Zwischenablage kopiert"),
            ("pwa.offline", "Du bist offline"),
        ]),
    );
    tables
});

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap());

/// Look up `key`, falling back to English and finally to the key itself.
pub fn translate(lang: Language, key: &str) -> &str {
    if let Some(text) = lookup(lang, key) {
        return text;
    }
    if lang != Language::En {
        if let Some(text) = lookup(Language::En, key) {
            trace!(%lang, key, "Falling back to English text");
            return text;
        }
    }
    trace!(%lang, key, "No translation found");
    key
}

/// [`translate`] plus `{{name}}` interpolation. Placeholders without a
/// matching argument are left untouched.
pub fn translate_with(lang: Language, key: &str, args: &[(&str, &str)]) -> String {
    let template = translate(lang, key);
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            args.iter()
                .find(|(arg, _)| *arg == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn lookup(lang: Language, key: &str) -> Option<&'static str> {
    TABLES.get(&lang).and_then(|table| table.get(key)).copied()
}
