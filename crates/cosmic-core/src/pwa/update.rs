use anyhow::Result;
use tracing::{info, warn};

/// Lifecycle of an installing service worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// New content is waiting behind the worker that controls the page.
    UpdateAvailable,
    /// First install finished; assets are cached for offline use.
    OfflineReady,
}

impl UpdateStatus {
    pub fn message_key(self) -> &'static str {
        match self {
            UpdateStatus::UpdateAvailable => "pwa.update_available",
            UpdateStatus::OfflineReady => "pwa.offline_ready",
        }
    }
}

/// Interpret a worker state change. Only `Installed` is meaningful; whether
/// the page already has a controller distinguishes an update from a first
/// install.
pub fn classify_worker_state(state: WorkerState, has_controller: bool) -> Option<UpdateStatus> {
    match state {
        WorkerState::Installed if has_controller => Some(UpdateStatus::UpdateAvailable),
        WorkerState::Installed => Some(UpdateStatus::OfflineReady),
        _ => None,
    }
}

pub trait WorkerContainer {
    fn is_supported(&self) -> bool;
    fn register(&mut self, script_url: &str) -> Result<()>;
}

/// Register the service worker; failure leaves the app running uncached.
pub fn register_worker(container: &mut dyn WorkerContainer, script_url: &str) -> bool {
    if !container.is_supported() {
        info!("Service workers unsupported; skipping registration");
        return false;
    }
    match container.register(script_url) {
        Ok(()) => {
            info!(script = script_url, "Service worker registered");
            true
        }
        Err(err) => {
            warn!(script = script_url, "Service worker registration failed: {err:#}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FakeContainer {
        supported: bool,
        fail: bool,
        registered: Vec<String>,
    }

    impl WorkerContainer for FakeContainer {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn register(&mut self, script_url: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("scope not allowed"));
            }
            self.registered.push(script_url.to_string());
            Ok(())
        }
    }

    #[test]
    fn installed_worker_with_controller_is_an_update() {
        assert_eq!(
            classify_worker_state(WorkerState::Installed, true),
            Some(UpdateStatus::UpdateAvailable)
        );
        assert_eq!(
            classify_worker_state(WorkerState::Installed, false),
            Some(UpdateStatus::OfflineReady)
        );
        assert_eq!(classify_worker_state(WorkerState::Activating, true), None);
        assert_eq!(classify_worker_state(WorkerState::Redundant, false), None);
    }

    #[test]
    fn registration_failure_is_not_fatal() {
        let mut container = FakeContainer {
            supported: true,
            fail: true,
            registered: Vec::new(),
        };
        assert!(!register_worker(&mut container, "/sw.js"));
    }

    #[test]
    fn registers_when_supported() {
        let mut container = FakeContainer {
            supported: true,
            fail: false,
            registered: Vec::new(),
        };
        assert!(register_worker(&mut container, "/sw.js"));
        assert_eq!(container.registered, vec!["/sw.js"]);

        let mut unsupported = FakeContainer {
            supported: false,
            fail: false,
            registered: Vec::new(),
        };
        assert!(!register_worker(&mut unsupported, "/sw.js"));
        assert!(unsupported.registered.is_empty());
    }
}
