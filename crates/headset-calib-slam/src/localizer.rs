//! The localization capability the checker drives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Notifications a localizer emits for a map load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocalizerEvent {
    MapLoadingFailed,
    MappingCompleted,
}

/// Handle returned by [`SlamLocalizer::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Zero-argument notification callback.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Map loading / localization engine.
///
/// Implementations may notify from any thread, including synchronously from
/// inside [`load_slam_map`](Self::load_slam_map). They must not hold internal
/// locks while invoking listeners (listeners remove themselves during
/// dispatch), and removing an unknown id must be a no-op.
pub trait SlamLocalizer: Send + Sync {
    /// Whether the engine starts loading on its own at startup.
    fn set_initialize_on_start(&self, enabled: bool);

    /// True once the engine has finished an attempt and cannot be reused.
    fn is_finished(&self) -> bool;

    /// Start loading the map at `path`. Must not block on completion.
    fn load_slam_map(&self, path: &str);

    fn add_listener(&self, event: LocalizerEvent, listener: Listener) -> ListenerId;

    fn remove_listener(&self, event: LocalizerEvent, id: ListenerId);
}

/// Listener bookkeeping for [`SlamLocalizer`] implementations.
///
/// `notify` snapshots the matching listeners and calls them with no lock
/// held, so listeners may add or remove listeners while being dispatched.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(LocalizerEvent, ListenerId, Listener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, event: LocalizerEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((event, id, listener));
        id
    }

    pub fn remove(&self, event: LocalizerEvent, id: ListenerId) {
        self.lock().retain(|(e, i, _)| !(*e == event && *i == id));
    }

    /// Number of listeners registered for `event`.
    pub fn count(&self, event: LocalizerEvent) -> usize {
        self.lock().iter().filter(|(e, _, _)| *e == event).count()
    }

    /// Invoke every listener registered for `event`; returns how many ran.
    pub fn notify(&self, event: LocalizerEvent) -> usize {
        let snapshot: Vec<Listener> = self
            .lock()
            .iter()
            .filter(|(e, _, _)| *e == event)
            .map(|(_, _, l)| Arc::clone(l))
            .collect();
        for listener in &snapshot {
            listener();
        }
        snapshot.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LocalizerEvent, ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.lock().len())
            .finish()
    }
}
