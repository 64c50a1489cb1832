use std::collections::BTreeSet;
use std::sync::Mutex;

/// Sub-path the application is served under, e.g. `/monitoring`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath {
    prefix: String,
}

impl BasePath {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Remove the prefix from `url` when it starts with it. A prefix ending in
    /// `/` leaves that slash on the remainder.
    pub fn strip<'a>(&self, url: &'a str) -> &'a str {
        if url.is_empty() || !url.starts_with(&self.prefix) {
            return url;
        }
        let keep_slash = usize::from(self.prefix.ends_with('/'));
        &url[self.prefix.len() - keep_slash..]
    }
}

/// Pathnames that always leave the single-page app with a full navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRoutes {
    routes: BTreeSet<String>,
}

impl Default for ReloadRoutes {
    fn default() -> Self {
        Self::new(["/logout"])
    }
}

impl ReloadRoutes {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            routes: BTreeSet::new(),
        }
    }

    pub fn contains(&self, pathname: &str) -> bool {
        self.routes.contains(pathname)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }
}

/// Port that performs a hard, non-SPA navigation (assigning the real browser
/// location). Nothing after it runs for the current event.
pub trait HardNavigator: Send + Sync {
    fn assign(&self, href: &str);
}

/// Collects hard navigation targets so the host can perform them. Also what
/// tests assert against.
#[derive(Debug, Default)]
pub struct QueuedNavigator {
    pending: Mutex<Vec<String>>,
}

impl QueuedNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<String> {
        self.pending
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }

    pub fn pending(&self) -> Vec<String> {
        self.pending
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl HardNavigator for QueuedNavigator {
    fn assign(&self, href: &str) {
        if let Ok(mut guard) = self.pending.lock() {
            guard.push(href.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_matching_prefix() {
        let base = BasePath::new("/monitoring");
        assert_eq!(base.strip("/monitoring/logout"), "/logout");
        assert_eq!(base.strip("/other/logout"), "/other/logout");
        assert_eq!(base.strip(""), "");
        assert_eq!(BasePath::default().strip("/logout"), "/logout");
    }

    #[test]
    fn strip_keeps_slash_for_trailing_slash_prefix() {
        let base = BasePath::new("/monitoring/");
        assert_eq!(base.strip("/monitoring/logout"), "/logout");
    }

    #[test]
    fn default_reload_routes_include_logout() {
        let routes = ReloadRoutes::default();
        assert!(routes.contains("/logout"));
        assert!(!routes.contains("/login"));
        assert!(!ReloadRoutes::empty().contains("/logout"));

        let routes = ReloadRoutes::new(["/signout", "/logout"]);
        assert_eq!(routes.iter().collect::<Vec<_>>(), vec!["/logout", "/signout"]);
    }

    #[test]
    fn queued_navigator_drains_targets() {
        let navigator = QueuedNavigator::new();
        navigator.assign("/logout");
        assert_eq!(navigator.pending(), vec!["/logout".to_string()]);
        assert_eq!(navigator.drain(), vec!["/logout".to_string()]);
        assert!(navigator.pending().is_empty());
    }
}
