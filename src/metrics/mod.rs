use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters for navigation activity. Shared as `Arc<Mutex<NavigationMetrics>>`
/// between the service and its history listener.
#[derive(Debug, Default, Clone)]
pub struct NavigationMetrics {
    pushes: u64,
    replaces: u64,
    partials: u64,
    changes: u64,
    forced_reloads: u64,
    view_mode_applications: u64,
    legacy_calls: u64,
}

impl NavigationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_push(&mut self) {
        self.pushes = self.pushes.saturating_add(1);
    }

    pub fn record_replace(&mut self) {
        self.replaces = self.replaces.saturating_add(1);
    }

    pub fn record_partial(&mut self) {
        self.partials = self.partials.saturating_add(1);
    }

    pub fn record_change(&mut self) {
        self.changes = self.changes.saturating_add(1);
    }

    pub fn record_forced_reload(&mut self) {
        self.forced_reloads = self.forced_reloads.saturating_add(1);
    }

    pub fn record_view_mode(&mut self) {
        self.view_mode_applications = self.view_mode_applications.saturating_add(1);
    }

    pub fn record_legacy_call(&mut self) {
        self.legacy_calls = self.legacy_calls.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            pushes: self.pushes,
            replaces: self.replaces,
            partials: self.partials,
            changes: self.changes,
            forced_reloads: self.forced_reloads,
            view_mode_applications: self.view_mode_applications,
            legacy_calls: self.legacy_calls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub pushes: u64,
    pub replaces: u64,
    pub partials: u64,
    pub changes: u64,
    pub forced_reloads: u64,
    pub view_mode_applications: u64,
    pub legacy_calls: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("pushes".to_string(), json!(self.pushes));
        map.insert("replaces".to_string(), json!(self.replaces));
        map.insert("partials".to_string(), json!(self.partials));
        map.insert("changes".to_string(), json!(self.changes));
        map.insert("forced_reloads".to_string(), json!(self.forced_reloads));
        map.insert(
            "view_mode_applications".to_string(),
            json!(self.view_mode_applications),
        );
        map.insert("legacy_calls".to_string(), json!(self.legacy_calls));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "navigation_metrics", self.as_fields())
    }
}
