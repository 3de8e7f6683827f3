use serde::{Deserialize, Serialize};
use tracing::debug;

/// Navigation timing marks in milliseconds since the epoch; `0` means the
/// mark was never recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_end: f64,
}

/// Durations, in milliseconds, of the phases of a page load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadMetrics {
    pub dns: Option<f64>,
    pub tcp: Option<f64>,
    pub ttfb: Option<f64>,
    pub dom_ready: Option<f64>,
    pub page_load: Option<f64>,
}

impl LoadMetrics {
    pub fn from_timing(timing: &NavigationTiming) -> Self {
        let metrics = Self {
            dns: span(timing.domain_lookup_start, timing.domain_lookup_end),
            tcp: span(timing.connect_start, timing.connect_end),
            ttfb: span(timing.request_start, timing.response_start),
            dom_ready: span(timing.navigation_start, timing.dom_content_loaded_event_end),
            page_load: span(timing.navigation_start, timing.load_event_end),
        };
        debug!(?metrics, "Computed load metrics");
        metrics
    }
}

fn span(start: f64, end: f64) -> Option<f64> {
    if start > 0.0 && end >= start && end.is_finite() {
        Some(end - start)
    } else {
        None
    }
}
