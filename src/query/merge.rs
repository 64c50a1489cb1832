use super::QueryParams;

/// Value side of a [`QueryPatch`] entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    /// Stored as one entry whose value is the items joined with `,`.
    Multi(Vec<String>),
    /// Drop the key from the query.
    Remove,
}

impl QueryValue {
    /// The string written into the query, or `None` for removals.
    pub fn to_param(&self) -> Option<String> {
        match self {
            QueryValue::Single(value) => Some(value.clone()),
            QueryValue::Multi(values) => Some(values.join(",")),
            QueryValue::Remove => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Remove)
    }
}

/// Ordered set of query updates. Entries apply in insertion order; assigning a
/// key twice keeps its original position with the latest value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    entries: Vec<(String, QueryValue)>,
}

impl QueryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(self, key: impl Into<String>) -> Self {
        self.set(key, QueryValue::Remove)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryPatch
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut patch = QueryPatch::new();
        for (key, value) in iter {
            patch.insert(key, value);
        }
        patch
    }
}

/// Merge `patch` into `current_search` and return the serialized query without
/// a leading `?`.
///
/// Keys already present are overwritten (every duplicate collapses into one
/// entry) or deleted when the patch value is [`QueryValue::Remove`]. Absent keys
/// are appended; removing an absent key does nothing. Untouched entries keep
/// their relative order.
pub fn merge(current_search: &str, patch: &QueryPatch) -> String {
    let mut params = QueryParams::parse(current_search);

    for (key, value) in patch.iter() {
        match (params.has(key), value.to_param()) {
            (true, None) => params.delete(key),
            (true, Some(value)) => params.set(key, value),
            (false, Some(value)) => params.append(key, value),
            (false, None) => {}
        }
    }

    params.to_string()
}
