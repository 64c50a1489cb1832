//! Developer-only inspection hooks.
//!
//! Services register named handles into a [`DebugPort`] so a developer can dump
//! their state while poking at a running session. The port is passed in through
//! configuration; [`NullDebugRegistry`] is the default and discards everything.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

/// Something that can describe itself for manual inspection.
pub trait DebugInspect: Send + Sync {
    fn inspect(&self) -> Value;
}

pub type DebugHandle = Arc<dyn DebugInspect>;

/// Sink accepting named debug handles.
pub trait DebugPort: Send + Sync {
    fn register(&self, key: &str, handle: DebugHandle);
}

/// Default port used when debug registration is disabled.
#[derive(Debug, Default)]
pub struct NullDebugRegistry;

impl DebugPort for NullDebugRegistry {
    fn register(&self, _key: &str, _handle: DebugHandle) {}
}

/// Additive registry of named handles. Registering a key only touches that key;
/// every other entry is kept. Clones share the same map.
#[derive(Clone, Default)]
pub struct DebugRegistry {
    inner: Arc<RwLock<BTreeMap<String, DebugHandle>>>,
}

impl DebugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<DebugHandle> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.get(key).cloned())
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| guard.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON object with one member per handle.
    pub fn snapshot(&self) -> Value {
        let handles: Vec<(String, DebugHandle)> = match self.inner.read() {
            Ok(guard) => guard
                .iter()
                .map(|(key, handle)| (key.clone(), Arc::clone(handle)))
                .collect(),
            Err(_) => Vec::new(),
        };
        let members: Map<String, Value> = handles
            .into_iter()
            .map(|(key, handle)| (key, handle.inspect()))
            .collect();
        Value::Object(members)
    }
}

impl DebugPort for DebugRegistry {
    fn register(&self, key: &str, handle: DebugHandle) {
        if let Ok(mut guard) = self.inner.write() {
            guard.insert(key.to_string(), handle);
        }
    }
}
