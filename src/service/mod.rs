//! The location service: single entry point for reading and changing the
//! current location.
//!
//! Every read goes straight to the history adapter, so there is no cached
//! location to go stale. Construction installs one history listener that runs
//! the navigation side effects for each change, and (outside release builds by
//! default) registers the service with the configured debug port.

mod config;
mod legacy;

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::debug::DebugInspect;
use crate::effects::{NavigationSideEffects, SharedViewMode};
use crate::history::{HistoryAction, HistoryAdapter, HistoryListener, MemoryHistory, Subscription};
use crate::location::{Location, LocationDescriptor};
use crate::logging::{LogLevel, Logger, StderrSink, event_with_fields, json_kv, json_str};
use crate::metrics::{MetricSnapshot, NavigationMetrics};
use crate::query::{QueryParams, QueryPatch, merge};

pub use config::{LocationConfig, NavigationSettings};
pub use legacy::{LegacyLocation, LegacySearch, LegacyValue};

/// Key the service registers itself under in the debug port.
pub const DEBUG_KEY: &str = "location";

const LOG_TARGET: &str = "nav::location";
const LEGACY_TARGET: &str = "nav::location.legacy";

pub struct LocationService<H: HistoryAdapter + 'static> {
    history: Arc<H>,
    view_mode: SharedViewMode,
    logger: Option<Logger>,
    // Shim traces are never silent: without a configured logger they go to stderr.
    legacy_logger: Logger,
    metrics: Option<Arc<Mutex<NavigationMetrics>>>,
    subscription: Option<Subscription>,
}

impl LocationService<MemoryHistory> {
    /// Service backed by a fresh [`MemoryHistory`] starting at `initial`.
    pub fn in_memory(initial: impl Into<LocationDescriptor>, config: LocationConfig) -> Self {
        Self::new(MemoryHistory::new(initial), config)
    }
}

impl<H: HistoryAdapter + 'static> LocationService<H> {
    pub fn new(history: H, config: LocationConfig) -> Self {
        Self::with_shared(Arc::new(history), config)
    }

    pub fn with_shared(history: Arc<H>, config: LocationConfig) -> Self {
        let LocationConfig {
            base_path,
            reload_routes,
            navigator,
            view_mode,
            debug,
            register_debug,
            logger,
            metrics,
        } = config;

        let effects = NavigationSideEffects::new(base_path, reload_routes, navigator, view_mode.clone())
            .with_logger(logger.clone())
            .with_metrics(metrics.clone());
        let subscription = history.listen(Self::listener(effects, logger.clone()));

        let legacy_logger = logger.clone().unwrap_or_else(|| Logger::new(StderrSink));
        let service = Self {
            history,
            view_mode,
            logger,
            legacy_logger,
            metrics,
            subscription: Some(subscription),
        };

        if register_debug {
            debug.register(
                DEBUG_KEY,
                Arc::new(LocationInspector {
                    history: Arc::clone(&service.history),
                }),
            );
            service.log(
                LogLevel::Debug,
                "debug_registered",
                [json_str("key", DEBUG_KEY)],
            );
        }

        service
    }

    fn listener(effects: NavigationSideEffects, logger: Option<Logger>) -> HistoryListener {
        Arc::new(move |location: &Location, action: HistoryAction| {
            if let Some(logger) = logger.as_ref() {
                let event = event_with_fields(
                    LogLevel::Debug,
                    LOG_TARGET,
                    "history.listen",
                    [
                        json_str("action", action.as_str()),
                        json_str("pathname", location.pathname.as_str()),
                        json_str("search", location.search.as_str()),
                        json_str("hash", location.hash.as_str()),
                    ],
                );
                let _ = logger.log_event(event);
            }
            effects.on_location_changed(location);
        })
    }

    /// The wrapped history adapter.
    pub fn history(&self) -> &Arc<H> {
        &self.history
    }

    pub fn view_mode(&self) -> &SharedViewMode {
        &self.view_mode
    }

    pub fn get_current_location(&self) -> Location {
        self.history.location()
    }

    pub fn get_url_search_params(&self) -> QueryParams {
        QueryParams::parse(&self.history.location().search)
    }

    /// Merge `patch` into the current query and navigate to the result, keeping
    /// pathname, hash and state. Pushes unless `replace` is set.
    pub fn partial(&self, patch: &QueryPatch, replace: bool) {
        let current = self.history.location();
        let update = current.with_search(merge(&current.search, patch));
        self.record(NavigationMetrics::record_partial);
        self.log(
            LogLevel::Debug,
            "partial",
            [
                json_str("search", update.search.as_str()),
                json_kv("replace", replace),
            ],
        );

        if replace {
            self.replace(update);
        } else {
            self.push(update);
        }
    }

    pub fn push(&self, target: impl Into<LocationDescriptor>) {
        self.record(NavigationMetrics::record_push);
        self.history.push(target.into());
    }

    pub fn replace(&self, target: impl Into<LocationDescriptor>) {
        self.record(NavigationMetrics::record_replace);
        self.history.replace(target.into());
    }

    /// Legacy synchronous location surface.
    pub fn legacy(&self) -> LegacyLocation<'_, H> {
        LegacyLocation::new(self)
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Remove the history listener early. Returns `false` if it was already gone.
    pub fn unlisten(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                subscription.dispose();
                true
            }
            None => false,
        }
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    pub(crate) fn trace_legacy(&self, method: &'static str, args: Vec<Value>) {
        self.record(NavigationMetrics::record_legacy_call);
        let event = event_with_fields(
            LogLevel::Debug,
            LEGACY_TARGET,
            &format!("legacy.{method}"),
            [json_str("method", method), json_kv("args", Value::Array(args))],
        );
        let _ = self.legacy_logger.log_event(event);
    }

    fn record(&self, update: fn(&mut NavigationMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut *guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

struct LocationInspector<H: HistoryAdapter> {
    history: Arc<H>,
}

impl<H: HistoryAdapter> DebugInspect for LocationInspector<H> {
    fn inspect(&self) -> Value {
        let location = self.history.location();
        json!({
            "location": serde_json::to_value(&location).unwrap_or(Value::Null),
            "href": location.href(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::{DebugPort, DebugRegistry};
    use crate::effects::{PresentationMode, QueuedNavigator, ReloadRoutes, ViewModeState};
    use crate::logging::MemorySink;

    fn recording_history(
        history: &MemoryHistory,
    ) -> (Arc<Mutex<Vec<HistoryAction>>>, Subscription) {
        let actions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&actions);
        let subscription = history.listen(Arc::new(move |_location: &Location, action: HistoryAction| {
            sink.lock().unwrap().push(action);
        }));
        (actions, subscription)
    }

    #[test]
    fn current_location_tracks_adapter() {
        let history = MemoryHistory::new("/start");
        let service = LocationService::new(history.clone(), LocationConfig::default());

        history.push("/elsewhere?x=1".into());
        let current = service.get_current_location();
        assert_eq!(current.pathname, "/elsewhere");
        assert_eq!(service.get_url_search_params().get("x"), Some("1"));
    }

    #[test]
    fn partial_pushes_by_default_and_preserves_location() {
        let history = MemoryHistory::new(
            Location::parse_path("/d/abc?orgId=1#panel-2").with_state(json!({"scroll": 40})),
        );
        let (actions, _subscription) = recording_history(&history);
        let service = LocationService::new(history.clone(), LocationConfig::default());

        service.partial(&QueryPatch::new().set("x", "5"), false);
        let current = service.get_current_location();
        assert_eq!(current.search, "?orgId=1&x=5");
        assert_eq!(current.pathname, "/d/abc");
        assert_eq!(current.hash, "#panel-2");
        assert_eq!(current.state, json!({"scroll": 40}));
        assert_eq!(history.len(), 2);
        assert_eq!(actions.lock().unwrap().as_slice(), &[HistoryAction::Push]);
    }

    #[test]
    fn partial_replace_keeps_history_length() {
        let history = MemoryHistory::new(Location::parse_path("/d/abc#top").with_state(json!(7)));
        let (actions, _subscription) = recording_history(&history);
        let service = LocationService::new(history.clone(), LocationConfig::default());

        service.partial(&QueryPatch::new().set("x", "5"), true);
        let current = service.get_current_location();
        assert_eq!(current.search, "?x=5");
        assert_eq!(current.hash, "#top");
        assert_eq!(current.state, json!(7));
        assert_eq!(history.len(), 1);
        assert_eq!(actions.lock().unwrap().as_slice(), &[HistoryAction::Replace]);
    }

    #[test]
    fn partial_does_not_touch_previous_entry() {
        let history = MemoryHistory::new("/list?page=1");
        let service = LocationService::new(history.clone(), LocationConfig::default());
        let before = service.get_current_location();

        service.partial(&QueryPatch::new().set("page", "2"), false);
        assert_eq!(before.search, "?page=1");
        assert_eq!(history.entries()[0].search, "?page=1");
    }

    #[test]
    fn partial_removing_last_key_clears_search() {
        let service = LocationService::in_memory("/list?page=1", LocationConfig::default());
        service.partial(&QueryPatch::new().remove("page"), false);
        assert_eq!(service.get_current_location().search, "");
    }

    #[test]
    fn push_and_replace_accept_paths_and_locations() {
        let service = LocationService::in_memory("/", LocationConfig::default());
        service.push("/a?b=1#c");
        assert_eq!(service.get_current_location().href(), "/a?b=1#c");

        service.replace(Location::new("/z").with_state(json!("s")));
        let current = service.get_current_location();
        assert_eq!(current.href(), "/z");
        assert_eq!(current.state, json!("s"));
        assert_eq!(service.history().len(), 2);
    }

    #[test]
    fn navigation_to_logout_forces_reload() {
        let navigator = Arc::new(QueuedNavigator::new());
        let view_mode = ViewModeState::shared();
        let config = LocationConfig::default()
            .with_navigator(navigator.clone())
            .with_view_mode(view_mode.clone())
            .with_base_path("/monitoring");
        let service = LocationService::in_memory("/monitoring/d/abc", config);

        service.push("/monitoring/logout");
        assert_eq!(navigator.drain(), vec!["/monitoring/logout".to_string()]);
        assert_eq!(view_mode.applications(), 0);
        assert_eq!(view_mode.current(), PresentationMode::None);
    }

    #[test]
    fn custom_reload_routes_replace_defaults() {
        let navigator = Arc::new(QueuedNavigator::new());
        let config = LocationConfig::default()
            .with_navigator(navigator.clone())
            .with_reload_routes(ReloadRoutes::new(["/signout"]));
        let service = LocationService::in_memory("/", config);

        service.push("/logout");
        assert!(navigator.pending().is_empty());
        service.push("/signout");
        assert_eq!(navigator.pending(), vec!["/signout".to_string()]);
    }

    #[test]
    fn kiosk_param_sets_presentation_mode() {
        let service = LocationService::in_memory("/", LocationConfig::default());

        service.push("/d/abc?kiosk=tv");
        assert_eq!(service.view_mode().current(), PresentationMode::Tv);
        service.partial(&QueryPatch::new().set("kiosk", "xyz"), true);
        assert_eq!(service.view_mode().current(), PresentationMode::Full);
        service.partial(&QueryPatch::new().remove("kiosk"), false);
        assert_eq!(service.view_mode().current(), PresentationMode::None);
        assert_eq!(service.view_mode().body_class(), None);
    }

    #[test]
    fn exactly_one_listener_installed() {
        let history = MemoryHistory::new("/");
        let mut service = LocationService::new(history.clone(), LocationConfig::default());
        assert_eq!(history.listener_count(), 1);
        assert!(service.is_listening());

        assert!(service.unlisten());
        assert!(!service.unlisten());
        assert_eq!(history.listener_count(), 0);

        service.push("/d/abc?kiosk=tv");
        assert_eq!(service.view_mode().current(), PresentationMode::None);
    }

    #[test]
    fn dropping_service_removes_listener() {
        let history = MemoryHistory::new("/");
        {
            let _service = LocationService::new(history.clone(), LocationConfig::default());
            assert_eq!(history.listener_count(), 1);
        }
        assert_eq!(history.listener_count(), 0);
    }

    #[test]
    fn registers_into_debug_registry_additively() {
        struct Store;
        impl DebugInspect for Store {
            fn inspect(&self) -> Value {
                json!("store")
            }
        }

        let registry = DebugRegistry::new();
        registry.register("store", Arc::new(Store));

        let config = LocationConfig::default()
            .with_debug(Arc::new(registry.clone()))
            .register_debug(true);
        let service = LocationService::in_memory("/a?b=1", config);
        service.push("/c");

        assert_eq!(registry.keys(), vec!["location", "store"]);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot["location"]["href"], json!("/c"));
        assert_eq!(snapshot["store"], json!("store"));
    }

    #[test]
    fn debug_registration_can_be_disabled() {
        let registry = DebugRegistry::new();
        let config = LocationConfig::default()
            .with_debug(Arc::new(registry.clone()))
            .register_debug(false);
        let _service = LocationService::in_memory("/", config);
        assert!(registry.is_empty());
    }

    #[test]
    fn listener_logs_each_change_and_metrics_count() {
        let sink = MemorySink::new();
        let mut config = LocationConfig::default()
            .with_logger(Logger::new(sink.clone()))
            .register_debug(false);
        config.enable_metrics();
        let service = LocationService::in_memory("/", config);

        service.push("/a");
        service.partial(&QueryPatch::new().set("q", "1"), true);

        let listen_events: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.message == "history.listen")
            .collect();
        assert_eq!(listen_events.len(), 2);
        assert_eq!(listen_events[1].field("action"), Some(&json!("REPLACE")));
        assert_eq!(listen_events[1].field("search"), Some(&json!("?q=1")));

        let snapshot = service.metrics_snapshot().unwrap();
        assert_eq!(snapshot.pushes, 1);
        assert_eq!(snapshot.replaces, 1);
        assert_eq!(snapshot.partials, 1);
        assert_eq!(snapshot.changes, 2);
    }
}
