use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::location::{Location, LocationDescriptor};

use super::{HistoryAction, HistoryAdapter, HistoryListener, Subscription};

struct HistoryState {
    entries: Vec<Location>,
    index: usize,
    listeners: Vec<(u64, HistoryListener)>,
    next_listener_id: u64,
}

impl HistoryState {
    fn current(&self) -> &Location {
        &self.entries[self.index]
    }
}

/// In-process history stack. Clones share the same entries and listeners.
#[derive(Clone)]
pub struct MemoryHistory {
    state: Arc<Mutex<HistoryState>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryHistory {
    pub fn new(initial: impl Into<LocationDescriptor>) -> Self {
        let root = Location::new("/");
        let first = initial.into().resolve(&root);
        Self {
            state: Arc::new(Mutex::new(HistoryState {
                entries: vec![first],
                index: 0,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.lock().index
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn entries(&self) -> Vec<Location> {
        self.lock().entries.clone()
    }

    /// Move `delta` entries through the stack, clamped to its bounds. Listeners
    /// are notified with [`HistoryAction::Pop`] even when the index is unchanged.
    pub fn go(&self, delta: isize) {
        {
            let mut state = self.lock();
            let last = state.entries.len().saturating_sub(1) as isize;
            let target = (state.index as isize).saturating_add(delta).clamp(0, last);
            state.index = target as usize;
        }
        self.notify(HistoryAction::Pop);
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Listeners run without the lock held so they can read the new location.
    fn notify(&self, action: HistoryAction) {
        let (location, listeners) = {
            let state = self.lock();
            let listeners: Vec<HistoryListener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            (state.current().clone(), listeners)
        };
        for listener in listeners {
            listener(&location, action);
        }
    }
}

impl HistoryAdapter for MemoryHistory {
    fn location(&self) -> Location {
        self.lock().current().clone()
    }

    fn push(&self, target: LocationDescriptor) {
        {
            let mut state = self.lock();
            let next = target.resolve(state.current());
            let keep = state.index + 1;
            state.entries.truncate(keep);
            state.entries.push(next);
            state.index = keep;
        }
        self.notify(HistoryAction::Push);
    }

    fn replace(&self, target: LocationDescriptor) {
        {
            let mut state = self.lock();
            let next = target.resolve(state.current());
            let index = state.index;
            state.entries[index] = next;
        }
        self.notify(HistoryAction::Replace);
    }

    fn listen(&self, listener: HistoryListener) -> Subscription {
        let id = {
            let mut state = self.lock();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.push((id, listener));
            id
        };

        let weak: Weak<Mutex<HistoryState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                guard.listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(history: &MemoryHistory) -> (Arc<Mutex<Vec<(String, HistoryAction)>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = history.listen(Arc::new(move |location: &Location, action: HistoryAction| {
            sink.lock().unwrap().push((location.href(), action));
        }));
        (seen, subscription)
    }

    #[test]
    fn push_appends_and_notifies() {
        let history = MemoryHistory::new("/home");
        let (seen, _subscription) = recorder(&history);

        history.push("/dashboards?tag=ops".into());
        assert_eq!(history.location().pathname, "/dashboards");
        assert_eq!(history.location().search, "?tag=ops");
        assert_eq!(history.len(), 2);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[("/dashboards?tag=ops".to_string(), HistoryAction::Push)]
        );
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let history = MemoryHistory::new("/a");
        let (seen, _subscription) = recorder(&history);

        history.replace("/b".into());
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().pathname, "/b");
        assert_eq!(seen.lock().unwrap()[0].1, HistoryAction::Replace);
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let history = MemoryHistory::new("/a");
        history.push("/b".into());
        history.push("/c".into());
        history.back();
        assert_eq!(history.location().pathname, "/b");

        history.push("/d".into());
        let paths: Vec<String> = history.entries().into_iter().map(|l| l.pathname).collect();
        assert_eq!(paths, vec!["/a", "/b", "/d"]);
    }

    #[test]
    fn go_clamps_to_bounds() {
        let history = MemoryHistory::new("/a");
        history.push("/b".into());
        let (seen, _subscription) = recorder(&history);

        history.go(-5);
        assert_eq!(history.index(), 0);
        history.go(10);
        assert_eq!(history.index(), 1);
        assert!(seen.lock().unwrap().iter().all(|(_, action)| *action == HistoryAction::Pop));
    }

    #[test]
    fn go_saturates_extreme_deltas() {
        let history = MemoryHistory::new("/a");
        history.push("/b".into());

        history.go(isize::MAX);
        assert_eq!(history.location().pathname, "/b");
        history.go(isize::MIN);
        assert_eq!(history.location().pathname, "/a");
        history.go(isize::MIN);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn listener_can_read_location_during_dispatch() {
        let history = MemoryHistory::new("/a");
        let observed = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&observed);
        let inner = history.clone();
        let _subscription = history.listen(Arc::new(move |_location: &Location, _action: HistoryAction| {
            *slot.lock().unwrap() = Some(inner.location().pathname);
        }));

        history.push("/b".into());
        assert_eq!(observed.lock().unwrap().as_deref(), Some("/b"));
    }

    #[test]
    fn dropping_subscription_removes_listener() {
        let history = MemoryHistory::new("/a");
        let (seen, subscription) = recorder(&history);
        assert_eq!(history.listener_count(), 1);

        subscription.dispose();
        assert_eq!(history.listener_count(), 0);
        history.push("/b".into());
        assert!(seen.lock().unwrap().is_empty());

        {
            let _scoped = recorder(&history);
            assert_eq!(history.listener_count(), 1);
        }
        assert_eq!(history.listener_count(), 0);
    }
}
