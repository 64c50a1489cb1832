use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of a history entry. Values are never mutated once handed out;
/// every navigation produces a new `Location`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    #[serde(default)]
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    #[serde(default)]
    pub hash: String,
    /// Opaque caller state carried alongside the entry.
    #[serde(default)]
    pub state: Value,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    /// Split a path string into pathname, search and hash. The hash is cut
    /// first so a `?` inside the fragment stays part of it.
    pub fn parse_path(path: &str) -> Self {
        let mut pathname = if path.is_empty() { "/" } else { path };
        let mut search = "";
        let mut hash = "";

        if let Some(idx) = pathname.find('#') {
            hash = &pathname[idx..];
            pathname = &pathname[..idx];
        }
        if let Some(idx) = pathname.find('?') {
            search = &pathname[idx..];
            pathname = &pathname[..idx];
        }

        Self {
            pathname: pathname.to_string(),
            search: if search == "?" { String::new() } else { search.to_string() },
            hash: if hash == "#" { String::new() } else { hash.to_string() },
            state: Value::Null,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    /// Copy of this location with only the query string swapped out.
    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self.clone()
        }
        .normalized()
    }

    /// `pathname + search + hash`.
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }

    /// Ensure `search` starts with `?` and `hash` with `#` when non-empty.
    pub fn normalized(mut self) -> Self {
        if !self.search.is_empty() && !self.search.starts_with('?') {
            self.search.insert(0, '?');
        }
        if self.search == "?" {
            self.search.clear();
        }
        if !self.hash.is_empty() && !self.hash.starts_with('#') {
            self.hash.insert(0, '#');
        }
        if self.hash == "#" {
            self.hash.clear();
        }
        self
    }
}

/// Navigation target accepted by `push`/`replace`: either a bare path string or
/// a complete location.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationDescriptor {
    Path(String),
    Location(Location),
}

impl LocationDescriptor {
    /// Turn the descriptor into a concrete location. An empty pathname keeps the
    /// current one.
    pub fn resolve(self, current: &Location) -> Location {
        let mut location = match self {
            LocationDescriptor::Path(path) => Location::parse_path(&path),
            LocationDescriptor::Location(location) => location,
        };
        if location.pathname.is_empty() {
            location.pathname = current.pathname.clone();
        }
        location.normalized()
    }
}

impl From<&str> for LocationDescriptor {
    fn from(path: &str) -> Self {
        LocationDescriptor::Path(path.to_string())
    }
}

impl From<String> for LocationDescriptor {
    fn from(path: String) -> Self {
        LocationDescriptor::Path(path)
    }
}

impl From<Location> for LocationDescriptor {
    fn from(location: Location) -> Self {
        LocationDescriptor::Location(location)
    }
}

impl From<&Location> for LocationDescriptor {
    fn from(location: &Location) -> Self {
        LocationDescriptor::Location(location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_path_splits_components() {
        let location = Location::parse_path("/d/abc?orgId=1&kiosk#panel?x");
        assert_eq!(location.pathname, "/d/abc");
        assert_eq!(location.search, "?orgId=1&kiosk");
        assert_eq!(location.hash, "#panel?x");
        assert_eq!(location.href(), "/d/abc?orgId=1&kiosk#panel?x");
    }

    #[test]
    fn parse_path_drops_bare_separators() {
        let location = Location::parse_path("/a?#");
        assert_eq!(location.pathname, "/a");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "");
        assert_eq!(Location::parse_path("").pathname, "/");
    }

    #[test]
    fn with_search_keeps_everything_else() {
        let original = Location::parse_path("/a?b=1#top").with_state(json!({"from": "list"}));
        let updated = original.with_search("c=2");
        assert_eq!(updated.search, "?c=2");
        assert_eq!(updated.pathname, "/a");
        assert_eq!(updated.hash, "#top");
        assert_eq!(updated.state, json!({"from": "list"}));
        assert_eq!(original.search, "?b=1");
    }

    #[test]
    fn resolve_fills_empty_pathname() {
        let current = Location::new("/current");
        let target = LocationDescriptor::from(Location {
            search: "x=1".into(),
            ..Location::default()
        });
        let resolved = target.resolve(&current);
        assert_eq!(resolved.pathname, "/current");
        assert_eq!(resolved.search, "?x=1");
    }
}
