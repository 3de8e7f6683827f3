//! Sharing a story link.
//!
//! The native share sheet is preferred. If it is missing or fails for any
//! reason other than the user backing out, the link is copied to the
//! clipboard instead. Per-network deep links are available for hosts that
//! render their own share buttons.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Twitter,
    Facebook,
    LinkedIn,
    Reddit,
    WhatsApp,
    Telegram,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Twitter,
        Network::Facebook,
        Network::LinkedIn,
        Network::Reddit,
        Network::WhatsApp,
        Network::Telegram,
    ];
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Network::Twitter => "Twitter",
            Network::Facebook => "Facebook",
            Network::LinkedIn => "LinkedIn",
            Network::Reddit => "Reddit",
            Network::WhatsApp => "WhatsApp",
            Network::Telegram => "Telegram",
        };
        write!(f, "{}", label)
    }
}

/// Deep link that opens `network`'s composer prefilled with `payload`.
pub fn share_link(network: Network, payload: &SharePayload) -> Result<Url> {
    let (base, params): (&str, Vec<(&str, String)>) = match network {
        Network::Twitter => (
            "https://twitter.com/intent/tweet",
            vec![("text", payload.text.clone()), ("url", payload.url.clone())],
        ),
        Network::Facebook => (
            "https://www.facebook.com/sharer/sharer.php",
            vec![("u", payload.url.clone())],
        ),
        Network::LinkedIn => (
            "https://www.linkedin.com/sharing/share-offsite/",
            vec![("url", payload.url.clone())],
        ),
        Network::Reddit => (
            "https://www.reddit.com/submit",
            vec![("url", payload.url.clone()), ("title", payload.title.clone())],
        ),
        Network::WhatsApp => (
            "https://wa.me/",
            vec![("text", format!("{} {}", payload.text, payload.url))],
        ),
        Network::Telegram => (
            "https://t.me/share/url",
            vec![("url", payload.url.clone()), ("text", payload.text.clone())],
        ),
    };
    Url::parse_with_params(base, &params)
        .with_context(|| format!("Building {network} share link"))
}

pub fn share_links(payload: &SharePayload) -> Vec<(Network, Url)> {
    Network::ALL
        .into_iter()
        .filter_map(|network| match share_link(network, payload) {
            Ok(url) => Some((network, url)),
            Err(err) => {
                warn!(%network, "Skipping share link: {err:#}");
                None
            }
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum ShareSheetError {
    #[error("share cancelled by user")]
    Cancelled,
    #[error("share sheet failed: {0}")]
    Failed(String),
}

pub trait ShareSheet {
    fn is_supported(&self) -> bool;
    fn share(&mut self, payload: &SharePayload) -> std::result::Result<(), ShareSheetError>;
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Cancelled,
    Unavailable,
}

impl ShareOutcome {
    /// Translation key for the user-facing status line.
    pub fn message_key(self) -> &'static str {
        match self {
            ShareOutcome::Shared => "share.shared",
            ShareOutcome::Copied => "share.copied",
            ShareOutcome::Cancelled => "share.cancelled",
            ShareOutcome::Unavailable => "share.unavailable",
        }
    }
}

/// Share through the native sheet, falling back to copying the URL.
pub fn share(
    payload: &SharePayload,
    sheet: Option<&mut dyn ShareSheet>,
    clipboard: &mut dyn Clipboard,
) -> ShareOutcome {
    if let Some(sheet) = sheet.filter(|sheet| sheet.is_supported()) {
        match sheet.share(payload) {
            Ok(()) => {
                info!(url = %payload.url, "Shared via native sheet");
                return ShareOutcome::Shared;
            }
            Err(ShareSheetError::Cancelled) => {
                debug!("Share sheet dismissed");
                return ShareOutcome::Cancelled;
            }
            Err(err) => {
                warn!("Native share failed, copying link instead: {err}");
            }
        }
    }

    match clipboard.write_text(&payload.url) {
        Ok(()) => {
            info!(url = %payload.url, "Copied share link to clipboard");
            ShareOutcome::Copied
        }
        Err(err) => {
            warn!("Clipboard unavailable: {err:#}");
            ShareOutcome::Unavailable
        }
    }
}
