//! The state store and its distribution boundary
//!
//! [`DeskStore`] owns the current snapshot and is the single write point:
//! `dispatch` applies the transition function, installs the successor
//! snapshot, and then publishes an event, all synchronously. Immediately
//! after `dispatch` returns, `snapshot()` reflects the new state.
//!
//! The store itself is single-writer by construction (`dispatch` takes
//! `&mut self`). Hosts with multiple threads wrap it in [`SharedStore`],
//! whose mutex is the external serialization point: one dispatch is fully
//! applied before the next begins, so last-dispatch-wins semantics carry
//! over unchanged.

use std::sync::{Arc, Mutex};

use crate::actions::Action;
use crate::events::{EventBus, EventReceiver, StoreEvent};
use crate::snapshot::Snapshot;
use crate::transition;

/// Per-subscriber event buffer
const EVENT_CAPACITY: usize = 100;

/// Owner of the current snapshot and the only sanctioned write path
pub struct DeskStore {
    snapshot: Snapshot,
    events: EventBus,
}

impl DeskStore {
    /// Create a store over an empty snapshot
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::new())
    }

    /// Create a store over a pre-built snapshot (e.g. a loaded seed file)
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            events: EventBus::new(EVENT_CAPACITY),
        }
    }

    /// The latest snapshot
    ///
    /// Cheap: every collection is behind an `Arc`, so this clones pointers,
    /// not data. The returned value is frozen; later dispatches never
    /// mutate it.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    /// Apply one action and publish the result
    pub fn dispatch(&mut self, action: Action) {
        let kind = action.kind();
        self.snapshot = transition::apply(&self.snapshot, action);
        tracing::debug!(action = kind, "applied action");
        self.events.emit(StoreEvent::ActionApplied {
            kind: kind.to_string(),
        });
    }

    /// Swap in a whole snapshot, e.g. after loading a seed file
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.events.emit(StoreEvent::SnapshotReplaced);
    }

    /// Subscribe to store events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }
}

impl Default for DeskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle around a [`DeskStore`]
///
/// The mutex serializes writers; the transition function is not designed
/// to race on a shared snapshot reference.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<DeskStore>>,
}

impl SharedStore {
    pub fn new(store: DeskStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// The latest snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Apply one action; fully applied before the call returns
    pub fn dispatch(&self, action: Action) {
        self.lock().dispatch(action);
    }

    /// Subscribe to store events
    pub fn subscribe(&self) -> EventReceiver {
        self.lock().subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DeskStore> {
        // A poisoned lock still holds a coherent snapshot; the transition
        // function replaces state wholesale rather than editing in place
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new(DeskStore::new())
    }
}
