use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::debug::{DebugPort, NullDebugRegistry};
use crate::effects::{BasePath, HardNavigator, QueuedNavigator, ReloadRoutes, SharedViewMode, ViewModeState};
use crate::error::{NavError, Result};
use crate::logging::{FileSink, Logger};
use crate::metrics::NavigationMetrics;

/// Construction-time knobs for [`LocationService`](super::LocationService).
#[derive(Clone)]
pub struct LocationConfig {
    /// Sub-path stripped before checking reload routes.
    pub base_path: BasePath,
    /// Pathnames that bypass client-side navigation.
    pub reload_routes: ReloadRoutes,
    /// Performs hard navigations for reload routes.
    pub navigator: Arc<dyn HardNavigator>,
    /// UI marker receiving the presentation mode.
    pub view_mode: SharedViewMode,
    /// Where the service registers itself for inspection.
    pub debug: Arc<dyn DebugPort>,
    /// Register into `debug` at construction. Off in release builds by default.
    pub register_debug: bool,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Optional navigation counters.
    pub metrics: Option<Arc<Mutex<NavigationMetrics>>>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            base_path: BasePath::default(),
            reload_routes: ReloadRoutes::default(),
            navigator: Arc::new(QueuedNavigator::new()),
            view_mode: ViewModeState::shared(),
            debug: Arc::new(NullDebugRegistry),
            register_debug: cfg!(debug_assertions),
            logger: None,
            metrics: None,
        }
    }
}

impl LocationConfig {
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = BasePath::new(base_path);
        self
    }

    pub fn with_reload_routes(mut self, routes: ReloadRoutes) -> Self {
        self.reload_routes = routes;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn HardNavigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_view_mode(mut self, view_mode: SharedViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_debug(mut self, debug: Arc<dyn DebugPort>) -> Self {
        self.debug = debug;
        self
    }

    pub fn register_debug(mut self, enabled: bool) -> Self {
        self.register_debug = enabled;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Log JSON lines to `path`, truncating past `max_bytes` (zero disables).
    pub fn with_log_file(self, path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let sink = FileSink::new(path, max_bytes)?;
        Ok(self.with_logger(Logger::new(sink)))
    }

    /// Apply data-only settings, typically loaded from JSON.
    pub fn with_settings(mut self, settings: &NavigationSettings) -> Self {
        self.base_path = BasePath::new(settings.base_path.clone());
        self.reload_routes = ReloadRoutes::new(settings.reload_routes.iter().cloned());
        if let Some(enabled) = settings.register_debug {
            self.register_debug = enabled;
        }
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(NavigationMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<NavigationMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Serializable subset of [`LocationConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    pub base_path: String,
    pub reload_routes: Vec<String>,
    pub register_debug: Option<bool>,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            reload_routes: vec!["/logout".to_string()],
            register_debug: None,
        }
    }
}

impl NavigationSettings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(NavError::Config(format!(
                "base path `{}` must start with '/'",
                self.base_path
            )));
        }
        if let Some(route) = self.reload_routes.iter().find(|r| !r.starts_with('/')) {
            return Err(NavError::Config(format!(
                "reload route `{route}` must be an absolute pathname"
            )));
        }
        Ok(())
    }
}
