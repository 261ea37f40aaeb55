use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::domain::DashState;

use super::{events::DashEvent, reducer::reduce};

/// Canonical owner of the mirrored state. Consumers read snapshots and
/// wait on `subscribe()`; only the kernel applies events. Mutations are
/// whole-state swaps, so an observer never sees a half-applied event.
#[derive(Clone)]
pub struct DashStore {
    inner: Arc<Mutex<DashState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl DashStore {
    pub fn new(state: DashState) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(state)),
            revision: Arc::new(revision),
        }
    }

    pub fn state(&self) -> DashState {
        self.inner.lock().unwrap().clone()
    }

    pub fn apply(&self, ev: DashEvent) {
        let mut guard = self.inner.lock().unwrap();
        let next = reduce(guard.clone(), ev);
        *guard = next;
        drop(guard);
        self.revision.send_modify(|r| *r += 1);
    }

    /// Monotonic mutation counter, bumped once per applied event.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Wake-up channel for observers; the carried value is the revision.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Wait until `pred` holds, returning the satisfying snapshot.
    pub async fn wait_for(&self, pred: impl Fn(&DashState) -> bool) -> DashState {
        let mut rx = self.subscribe();
        loop {
            let snapshot = self.state();
            if pred(&snapshot) || rx.changed().await.is_err() {
                return snapshot;
            }
        }
    }
}
