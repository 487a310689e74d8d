// The persistence collaborator boundary.
//
// The engine never touches disks or wire formats: the `Save` command hands
// a consistent snapshot to whatever implements `Persistence`, and session
// start asks the same implementor for the previous snapshot. The snapshot
// type is `GameState` itself — fully serde-serializable — so implementors
// pick their own encoding (JSON, bincode, a database row) and own every
// corruption/migration concern.
//
// `InMemoryStore` is the reference implementation used by the integration
// tests; a real frontend would put a file-backed store here.

use capsica_sim::state::GameState;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Save/load collaborator. `save` is called from the executor's consumer
/// thread with a fully-applied snapshot; `load` is called once at session
/// start. Returning `None` from `load` means "no previous session".
pub trait Persistence: Send {
    fn save(&self, snapshot: &GameState);
    fn load(&self) -> Option<GameState>;
}

/// Share one store between the executor and test code.
impl<P: Persistence + Sync> Persistence for std::sync::Arc<P> {
    fn save(&self, snapshot: &GameState) {
        (**self).save(snapshot);
    }

    fn load(&self) -> Option<GameState> {
        (**self).load()
    }
}

/// Restore the previous session, or start a fresh game from `seed`.
pub fn load_or_new(persistence: &dyn Persistence, seed: u64) -> GameState {
    persistence.load().unwrap_or_else(|| GameState::new(seed))
}

/// Keeps the latest snapshot in memory. No encoding at all — useful for
/// tests and as the template for real stores.
#[derive(Default)]
pub struct InMemoryStore {
    slot: Mutex<Option<GameState>>,
    saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently saved snapshot, if any.
    pub fn last(&self) -> Option<GameState> {
        match self.slot.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Persistence for InMemoryStore {
    fn save(&self, snapshot: &GameState) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(snapshot.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot.clone()),
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
    }

    fn load(&self) -> Option<GameState> {
        self.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_or_new_prefers_the_stored_session() {
        let store = InMemoryStore::new();
        assert_eq!(store.save_count(), 0);

        let fresh = load_or_new(&store, 42);
        assert_eq!(fresh, GameState::new(42));

        let mut played = GameState::new(42);
        played.balance.0 = 12_345;
        store.save(&played);
        assert_eq!(store.save_count(), 1);

        let restored = load_or_new(&store, 99);
        assert_eq!(restored, played);
    }
}
