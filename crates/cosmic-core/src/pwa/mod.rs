//! Progressive-web-app lifecycle helpers.
//!
//! None of these hold interesting state; each wraps one platform capability
//! behind a trait and turns its events into plain values.

pub mod cache;
pub mod connectivity;
pub mod install;
pub mod timing;
pub mod update;

pub use cache::{CacheStorage, DirCacheStorage, clear_caches};
pub use connectivity::Connectivity;
pub use install::{DeferredPrompt, InstallChoice, InstallPrompt};
pub use timing::{LoadMetrics, NavigationTiming};
pub use update::{UpdateStatus, WorkerContainer, WorkerState, classify_worker_state, register_worker};
