//! Shared access to many matches.
//!
//! Each match lives in its own slot: a `Mutex` around the engine serializes
//! writers of that match, and an `RwLock<Arc<MatchSnapshot>>` holds the view
//! published by the last write. Readers only clone the `Arc`, so they never
//! wait for a move in progress. The outer map lock is held just long enough
//! to find a slot; unrelated matches never contend.
//!
//! After every successful write the registry, still holding the match lock:
//! 1. publishes a fresh snapshot
//! 2. saves the record to the `MatchStore`, if any
//! 3. hands the resulting events to the `EventSink`, if any
//!
//! Store failures are logged and do not undo the move.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::store::{MatchStore, StoreError};
use crate::board::Position;
use crate::cards::InstanceId;
use crate::core::{MatchConfig, PlayerId};
use crate::deck::ValidatedDeck;
use crate::engine::{
    EventSink, MatchEngine, MatchError, MatchEvent, MatchId, MatchOutcome, MatchSnapshot,
    MatchStatus, MoveApplied, RecordError,
};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown match {0}")]
    UnknownMatch(MatchId),
    #[error("match {0} already exists")]
    DuplicateMatch(MatchId),
    #[error("no match store configured")]
    NoStore,
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("match registry lock poisoned")]
    StoragePoisoned,
}

struct MatchSlot {
    engine: Mutex<MatchEngine>,
    snapshot: RwLock<Arc<MatchSnapshot>>,
}

impl MatchSlot {
    fn new(engine: MatchEngine) -> Self {
        let snapshot = Arc::new(engine.snapshot());
        Self {
            engine: Mutex::new(engine),
            snapshot: RwLock::new(snapshot),
        }
    }

    fn current(&self) -> Result<Arc<MatchSnapshot>, RegistryError> {
        let guard = self.snapshot.read().map_err(|_| RegistryError::StoragePoisoned)?;
        Ok(Arc::clone(&guard))
    }
}

/// Registry of live matches.
///
/// ## Example
///
/// ```
/// use grid_duel::core::{MatchConfig, PlayerId};
/// use grid_duel::engine::{MatchId, MatchStatus};
/// use grid_duel::registry::MatchRegistry;
///
/// let registry = MatchRegistry::new();
/// let id = MatchId::new("m1");
/// registry.create(id.clone(), PlayerId::new("a"), PlayerId::new("b"), MatchConfig::default())?;
///
/// assert_eq!(registry.snapshot(&id)?.status, MatchStatus::Pending);
/// # Ok::<(), grid_duel::registry::RegistryError>(())
/// ```
#[derive(Default)]
pub struct MatchRegistry {
    matches: RwLock<FxHashMap<MatchId, Arc<MatchSlot>>>,
    store: Option<Arc<dyn MatchStore>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl MatchRegistry {
    /// Registry without persistence or event delivery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist every match through `store`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn MatchStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Deliver events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Register a new pending match.
    pub fn create(
        &self,
        id: MatchId,
        player1: PlayerId,
        player2: PlayerId,
        config: MatchConfig,
    ) -> Result<Arc<MatchSnapshot>, RegistryError> {
        let engine = MatchEngine::new(id.clone(), player1, player2, config)?;
        self.insert(engine)
    }

    /// Reload a match from the store, e.g. after a restart.
    pub fn recover(&self, id: &MatchId) -> Result<Arc<MatchSnapshot>, RegistryError> {
        let store = self.store.as_ref().ok_or(RegistryError::NoStore)?;
        let record = store
            .load(id)?
            .ok_or_else(|| RegistryError::UnknownMatch(id.clone()))?;
        let engine = MatchEngine::from_record(record)?;
        info!(match_id = %id, status = %engine.status(), moves = engine.history().len(), "match recovered");
        self.insert(engine)
    }

    fn insert(&self, engine: MatchEngine) -> Result<Arc<MatchSnapshot>, RegistryError> {
        let id = engine.id().clone();
        let slot = Arc::new(MatchSlot::new(engine));
        {
            let mut guard = self.matches.write().map_err(|_| RegistryError::StoragePoisoned)?;
            if guard.contains_key(&id) {
                return Err(RegistryError::DuplicateMatch(id));
            }
            guard.insert(id.clone(), Arc::clone(&slot));
        }

        let engine = slot.engine.lock().map_err(|_| RegistryError::StoragePoisoned)?;
        self.persist(&engine);
        debug!(match_id = %id, "match registered");
        slot.current()
    }

    /// Start a pending match.
    pub fn start(
        &self,
        id: &MatchId,
        deck1: ValidatedDeck,
        deck2: ValidatedDeck,
    ) -> Result<Arc<MatchSnapshot>, RegistryError> {
        self.begin(id, deck1, deck2, None)
    }

    /// `start`, stamping the match with `at` (milliseconds since the Unix epoch).
    pub fn start_at(
        &self,
        id: &MatchId,
        deck1: ValidatedDeck,
        deck2: ValidatedDeck,
        at: u64,
    ) -> Result<Arc<MatchSnapshot>, RegistryError> {
        self.begin(id, deck1, deck2, Some(at))
    }

    fn begin(
        &self,
        id: &MatchId,
        deck1: ValidatedDeck,
        deck2: ValidatedDeck,
        at: Option<u64>,
    ) -> Result<Arc<MatchSnapshot>, RegistryError> {
        self.write(
            id,
            |engine| engine.begin(deck1, deck2, at),
            |_, engine| {
                let mut events = vec![MatchEvent::Started {
                    match_id: engine.id().clone(),
                    players: engine.players().clone(),
                    first_turn: engine.turn(),
                    cell_elements: engine.board().elements(),
                }];
                events.extend(completed_event(engine));
                events
            },
        )?;
        self.snapshot(id)
    }

    /// Apply a move to a match.
    pub fn apply_move(
        &self,
        id: &MatchId,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
    ) -> Result<MoveApplied, RegistryError> {
        self.place(id, player, instance_id, position, None)
    }

    /// `apply_move`, stamping the move with `at`.
    pub fn apply_move_at(
        &self,
        id: &MatchId,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
        at: u64,
    ) -> Result<MoveApplied, RegistryError> {
        self.place(id, player, instance_id, position, Some(at))
    }

    fn place(
        &self,
        id: &MatchId,
        player: &PlayerId,
        instance_id: InstanceId,
        position: Position,
        at: Option<u64>,
    ) -> Result<MoveApplied, RegistryError> {
        self.write(
            id,
            |engine| engine.place(player, instance_id, position, at),
            |applied, engine| {
                let mut events = vec![MatchEvent::MoveApplied(applied.clone())];
                events.extend(completed_event(engine));
                events
            },
        )
    }

    /// Abandon a match.
    pub fn abandon(&self, id: &MatchId) -> Result<(), RegistryError> {
        self.close(id, None)
    }

    /// `abandon`, stamping the end of the match with `at`.
    pub fn abandon_at(&self, id: &MatchId, at: u64) -> Result<(), RegistryError> {
        self.close(id, Some(at))
    }

    fn close(&self, id: &MatchId, at: Option<u64>) -> Result<(), RegistryError> {
        self.write(id, |engine| engine.close(at), |_, engine| {
            vec![MatchEvent::Abandoned {
                match_id: engine.id().clone(),
            }]
        })
    }

    /// Forfeit a match on behalf of `player`.
    pub fn forfeit(&self, id: &MatchId, player: &PlayerId) -> Result<MatchOutcome, RegistryError> {
        self.concede(id, player, None)
    }

    /// `forfeit`, stamping the end of the match with `at`.
    pub fn forfeit_at(
        &self,
        id: &MatchId,
        player: &PlayerId,
        at: u64,
    ) -> Result<MatchOutcome, RegistryError> {
        self.concede(id, player, Some(at))
    }

    fn concede(
        &self,
        id: &MatchId,
        player: &PlayerId,
        at: Option<u64>,
    ) -> Result<MatchOutcome, RegistryError> {
        self.write(
            id,
            |engine| engine.concede(player, at),
            |_, engine| completed_event(engine).into_iter().collect(),
        )
    }

    /// Latest published view of a match. Never waits on a writer.
    pub fn snapshot(&self, id: &MatchId) -> Result<Arc<MatchSnapshot>, RegistryError> {
        self.slot(id)?.current()
    }

    /// Drop a match from memory. Its stored record is kept.
    pub fn remove(&self, id: &MatchId) -> Result<bool, RegistryError> {
        let mut guard = self.matches.write().map_err(|_| RegistryError::StoragePoisoned)?;
        Ok(guard.remove(id).is_some())
    }

    /// Ids of all registered matches.
    pub fn ids(&self) -> Result<Vec<MatchId>, RegistryError> {
        let guard = self.matches.read().map_err(|_| RegistryError::StoragePoisoned)?;
        Ok(guard.keys().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, RegistryError> {
        let guard = self.matches.read().map_err(|_| RegistryError::StoragePoisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }

    fn slot(&self, id: &MatchId) -> Result<Arc<MatchSlot>, RegistryError> {
        let guard = self.matches.read().map_err(|_| RegistryError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownMatch(id.clone()))
    }

    fn write<T>(
        &self,
        id: &MatchId,
        op: impl FnOnce(&mut MatchEngine) -> Result<T, MatchError>,
        events: impl FnOnce(&T, &MatchEngine) -> Vec<MatchEvent>,
    ) -> Result<T, RegistryError> {
        let slot = self.slot(id)?;
        let mut engine = slot.engine.lock().map_err(|_| RegistryError::StoragePoisoned)?;

        let value = op(&mut *engine)?;

        let snapshot = Arc::new(engine.snapshot());
        *slot.snapshot.write().map_err(|_| RegistryError::StoragePoisoned)? = snapshot;

        self.persist(&engine);

        if let Some(sink) = &self.sink {
            for event in events(&value, &*engine) {
                sink.publish(event);
            }
        }
        Ok(value)
    }

    fn persist(&self, engine: &MatchEngine) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(&engine.record()) {
            warn!(match_id = %engine.id(), error = %err, "failed to persist match");
        }
    }
}

fn completed_event(engine: &MatchEngine) -> Option<MatchEvent> {
    match (engine.status(), engine.outcome()) {
        (MatchStatus::Completed, Some(outcome)) => Some(MatchEvent::Completed {
            match_id: engine.id().clone(),
            outcome,
            scores: engine.scores(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryStore;
    use std::sync::mpsc;

    fn players() -> (PlayerId, PlayerId) {
        (PlayerId::new("a"), PlayerId::new("b"))
    }

    #[test]
    fn test_create_and_snapshot() {
        let registry = MatchRegistry::new();
        let (a, b) = players();
        let snapshot = registry
            .create(MatchId::new("m"), a, b, MatchConfig::default())
            .unwrap();

        assert_eq!(snapshot.status, MatchStatus::Pending);
        assert_eq!(registry.len().unwrap(), 1);
        assert_eq!(registry.ids().unwrap(), vec![MatchId::new("m")]);
    }

    #[test]
    fn test_duplicate_match() {
        let registry = MatchRegistry::new();
        let (a, b) = players();
        registry.create(MatchId::new("m"), a.clone(), b.clone(), MatchConfig::default()).unwrap();

        let err = registry.create(MatchId::new("m"), a, b, MatchConfig::default()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateMatch(_)));
    }

    #[test]
    fn test_unknown_match() {
        let registry = MatchRegistry::new();
        let id = MatchId::new("nope");
        assert!(matches!(registry.snapshot(&id), Err(RegistryError::UnknownMatch(_))));
        assert!(matches!(registry.abandon(&id), Err(RegistryError::UnknownMatch(_))));
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let registry = MatchRegistry::new();
        let (a, b) = players();
        let id = MatchId::new("m");
        registry.create(id.clone(), a, b, MatchConfig::default()).unwrap();

        let err = registry.abandon(&id).unwrap_err();
        assert!(matches!(err, RegistryError::Match(MatchError::IllegalState { .. })));
    }

    #[test]
    fn test_recover_requires_store() {
        let registry = MatchRegistry::new();
        assert!(matches!(
            registry.recover(&MatchId::new("m")),
            Err(RegistryError::NoStore)
        ));
    }

    #[test]
    fn test_remove_and_recover() {
        let store = Arc::new(MemoryStore::new());
        let registry = MatchRegistry::new().with_store(store.clone());
        let (a, b) = players();
        let id = MatchId::new("m");
        registry.create(id.clone(), a, b, MatchConfig::default()).unwrap();
        assert_eq!(store.len().unwrap(), 1);

        assert!(registry.remove(&id).unwrap());
        assert!(!registry.remove(&id).unwrap());
        assert!(registry.is_empty().unwrap());

        let snapshot = registry.recover(&id).unwrap();
        assert_eq!(snapshot.id, id);
        assert!(matches!(registry.recover(&id), Err(RegistryError::DuplicateMatch(_))));
    }

    #[test]
    fn test_rejected_write_publishes_nothing() {
        let (tx, rx) = mpsc::channel();
        let registry = MatchRegistry::new().with_sink(Arc::new(tx));
        let (a, b) = players();
        let id = MatchId::new("m");
        registry.create(id.clone(), a.clone(), b, MatchConfig::default()).unwrap();

        // forfeit needs an active match
        assert!(registry.forfeit(&id, &a).is_err());
        assert!(rx.try_recv().is_err());
    }
}
