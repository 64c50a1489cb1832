use std::sync::{Arc, RwLock};

use serde::Serialize;
use url::form_urlencoded;

/// Reserved query parameter driving the presentation mode.
pub const KIOSK_PARAM: &str = "kiosk";

/// Display mode derived from the `kiosk` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    None,
    Tv,
    Full,
}

impl PresentationMode {
    /// `tv` maps to [`PresentationMode::Tv`], any other non-empty value to
    /// [`PresentationMode::Full`], absent or empty to [`PresentationMode::None`].
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") => PresentationMode::None,
            Some("tv") => PresentationMode::Tv,
            Some(_) => PresentationMode::Full,
        }
    }

    /// Reads the first `kiosk` segment of `search`. A bare `kiosk` flag (no
    /// `=`) turns the full mode on, while `kiosk=` stays off.
    pub fn from_search(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        for segment in raw.split('&').filter(|segment| !segment.is_empty()) {
            let Some((key, value)) = form_urlencoded::parse(segment.as_bytes()).next() else {
                continue;
            };
            if key != KIOSK_PARAM {
                continue;
            }
            if !segment.contains('=') {
                return PresentationMode::Full;
            }
            return Self::from_query_value(Some(&*value));
        }
        PresentationMode::None
    }

    /// Class placed on the document root while this mode is active.
    pub fn body_class(&self) -> Option<&'static str> {
        match self {
            PresentationMode::None => None,
            PresentationMode::Tv => Some("view-mode--tv"),
            PresentationMode::Full => Some("view-mode--kiosk"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ViewModeEntry {
    mode: PresentationMode,
    applications: u64,
}

/// Process-wide UI marker for the active presentation mode. Written only by
/// the navigation side effects, read by anything that renders.
#[derive(Debug, Default)]
pub struct ViewModeState {
    inner: RwLock<ViewModeEntry>,
}

pub type SharedViewMode = Arc<ViewModeState>;

impl ViewModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedViewMode {
        Arc::new(Self::new())
    }

    pub fn apply(&self, mode: PresentationMode) {
        if let Ok(mut guard) = self.inner.write() {
            guard.mode = mode;
            guard.applications = guard.applications.saturating_add(1);
        }
    }

    pub fn current(&self) -> PresentationMode {
        self.inner
            .read()
            .map(|guard| guard.mode)
            .unwrap_or_default()
    }

    /// Number of times a mode was written, including re-applications of the
    /// same mode.
    pub fn applications(&self) -> u64 {
        self.inner
            .read()
            .map(|guard| guard.applications)
            .unwrap_or(0)
    }

    pub fn body_class(&self) -> Option<&'static str> {
        self.current().body_class()
    }
}
