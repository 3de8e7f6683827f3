use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallChoice {
    Accepted,
    Dismissed,
}

/// A captured install prompt; can be shown at most once.
pub trait DeferredPrompt {
    fn prompt(self) -> Result<InstallChoice>;
}

/// Holds the platform's install prompt until the user asks to install.
pub struct InstallPrompt<P> {
    deferred: Option<P>,
    installed: bool,
}

impl<P> Default for InstallPrompt<P> {
    fn default() -> Self {
        Self {
            deferred: None,
            installed: false,
        }
    }
}

impl<P: DeferredPrompt> InstallPrompt<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the prompt the platform offered instead of letting it show
    /// immediately.
    pub fn capture(&mut self, prompt: P) {
        if self.installed {
            debug!("Ignoring install prompt; app already installed");
            return;
        }
        debug!("Captured install prompt");
        self.deferred = Some(prompt);
    }

    pub fn can_install(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Show the captured prompt. `Ok(None)` when nothing was captured.
    pub fn prompt(&mut self) -> Result<Option<InstallChoice>> {
        let Some(deferred) = self.deferred.take() else {
            return Ok(None);
        };
        let choice = deferred.prompt()?;
        info!(?choice, "Install prompt answered");
        if choice == InstallChoice::Accepted {
            self.installed = true;
        }
        Ok(Some(choice))
    }

    pub fn mark_installed(&mut self) {
        self.deferred = None;
        self.installed = true;
        info!("App installed");
    }
}
