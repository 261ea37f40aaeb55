use std::collections::HashMap;
use std::sync::Mutex;

use opsdeck_core::{Command, Group, GroupId};

use crate::dash_core::DashStore;

#[derive(Default)]
struct IndexCache {
    revision: Option<u64>,
    groups: HashMap<GroupId, Group>,
    commands: HashMap<String, Command>,
}

/// Id → group and name → command lookups derived from the store.
/// Rebuilt at most once per store mutation, on the first read after the
/// revision moves, so staleness is bounded by one event.
pub struct Projections {
    store: DashStore,
    cache: Mutex<IndexCache>,
}

impl Projections {
    pub fn new(store: DashStore) -> Self {
        Self {
            store,
            cache: Mutex::new(IndexCache::default()),
        }
    }

    pub fn group(&self, id: &str) -> Option<Group> {
        let mut cache = self.cache.lock().unwrap();
        self.refresh(&mut cache);
        cache.groups.get(id).cloned()
    }

    pub fn command(&self, name: &str) -> Option<Command> {
        let mut cache = self.cache.lock().unwrap();
        self.refresh(&mut cache);
        cache.commands.get(name).cloned()
    }

    fn refresh(&self, cache: &mut IndexCache) {
        // Revision is read before the snapshot: if a mutation lands in
        // between, the cache is tagged older than its data and the next
        // read rebuilds again, never the other way around.
        let revision = self.store.revision();
        if cache.revision == Some(revision) {
            return;
        }
        let state = self.store.state();
        cache.groups = state
            .groups
            .iter()
            .map(|g| (g.id.clone(), g.clone()))
            .collect();
        cache.commands = state
            .commands
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect();
        cache.revision = Some(revision);
    }
}
