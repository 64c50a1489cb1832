//! Reactions to history changes: forced full reloads for configured routes and
//! the `kiosk` presentation mode.

mod routes;
mod view_mode;

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::location::Location;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::metrics::NavigationMetrics;

pub use routes::{BasePath, HardNavigator, QueuedNavigator, ReloadRoutes};
pub use view_mode::{KIOSK_PARAM, PresentationMode, SharedViewMode, ViewModeState};

const LOG_TARGET: &str = "nav::location";

/// Outcome of handling one location change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// A hard navigation to the contained pathname was issued.
    ForcedReload(String),
    /// The presentation mode was (re)applied.
    ViewMode(PresentationMode),
}

pub struct NavigationSideEffects {
    base_path: BasePath,
    reload_routes: ReloadRoutes,
    navigator: Arc<dyn HardNavigator>,
    view_mode: SharedViewMode,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<NavigationMetrics>>>,
}

impl NavigationSideEffects {
    pub fn new(
        base_path: BasePath,
        reload_routes: ReloadRoutes,
        navigator: Arc<dyn HardNavigator>,
        view_mode: SharedViewMode,
    ) -> Self {
        Self {
            base_path,
            reload_routes,
            navigator,
            view_mode,
            logger: None,
            metrics: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_metrics(mut self, metrics: Option<Arc<Mutex<NavigationMetrics>>>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn view_mode(&self) -> &SharedViewMode {
        &self.view_mode
    }

    /// React to `location` becoming current. Reload routes short-circuit: the
    /// hard navigation is terminal and the presentation mode is left alone.
    pub fn on_location_changed(&self, location: &Location) -> SideEffect {
        self.record(NavigationMetrics::record_change);

        let without_base = self.base_path.strip(&location.pathname);
        if self.reload_routes.contains(without_base) {
            self.log(
                LogLevel::Info,
                "forced_reload",
                [json_str("pathname", location.pathname.as_str())],
            );
            self.record(NavigationMetrics::record_forced_reload);
            self.navigator.assign(&location.pathname);
            return SideEffect::ForcedReload(location.pathname.clone());
        }

        let mode = PresentationMode::from_search(&location.search);
        self.view_mode.apply(mode);
        self.record(NavigationMetrics::record_view_mode);
        self.log(
            LogLevel::Debug,
            "view_mode_applied",
            [
                json_kv("mode", json!(mode)),
                json_kv("body_class", json!(mode.body_class())),
            ],
        );
        SideEffect::ViewMode(mode)
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
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}
