//! Navigation history primitive consumed by the location service.
//!
//! [`HistoryAdapter`] is the seam: a browser host would back it with the real
//! history stack, while [`MemoryHistory`] keeps entries in process and is what
//! tests and headless hosts use.

mod memory;

use std::fmt;
use std::sync::Arc;

use crate::location::{Location, LocationDescriptor};

pub use memory::MemoryHistory;

/// How the current entry changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Push,
    Replace,
    Pop,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Push => "PUSH",
            HistoryAction::Replace => "REPLACE",
            HistoryAction::Pop => "POP",
        }
    }
}

/// Callback invoked synchronously after every navigation with the new location.
pub type HistoryListener = Arc<dyn Fn(&Location, HistoryAction) + Send + Sync>;

/// Contract for navigation history backends.
pub trait HistoryAdapter: Send + Sync {
    /// The current entry.
    fn location(&self) -> Location;
    fn push(&self, target: LocationDescriptor);
    fn replace(&self, target: LocationDescriptor);
    /// Register `listener`; it stays installed until the returned subscription
    /// is dropped or disposed.
    fn listen(&self, listener: HistoryListener) -> Subscription;
}

/// Disposer for a history listener. Dropping it removes the listener.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new<F>(unsubscribe: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn dispose(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
