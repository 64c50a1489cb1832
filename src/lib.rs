//! Process-wide navigation/location service.
//!
//! All URL reads and writes go through [`LocationService`]: query merging,
//! forced full reloads for configured routes, the `kiosk` presentation mode and
//! a legacy synchronous location surface for call sites still being migrated.

pub mod debug;
pub mod effects;
pub mod error;
pub mod history;
pub mod location;
pub mod logging;
pub mod metrics;
pub mod query;
pub mod service;

pub use debug::{DebugHandle, DebugInspect, DebugPort, DebugRegistry, NullDebugRegistry};
pub use effects::{
    BasePath, HardNavigator, KIOSK_PARAM, NavigationSideEffects, PresentationMode,
    QueuedNavigator, ReloadRoutes, SharedViewMode, SideEffect, ViewModeState,
};
pub use error::{NavError, Result};
pub use history::{HistoryAction, HistoryAdapter, HistoryListener, MemoryHistory, Subscription};
pub use location::{Location, LocationDescriptor};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, StderrSink,
};
pub use metrics::{MetricSnapshot, NavigationMetrics};
pub use query::{QueryParams, QueryPatch, QueryValue, merge};
pub use service::{
    DEBUG_KEY, LegacyLocation, LegacySearch, LegacyValue, LocationConfig, LocationService,
    NavigationSettings,
};
