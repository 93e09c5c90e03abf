//! Overlay store: base entities + locally created entities + modifications.
//!
//! Every mutating call merges, then writes its slot through to the
//! substrate before returning, all under one write guard. There is no
//! `.await` anywhere in this file, so two mutations of the same entity can
//! never interleave halfway.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use super::{Modification, OverlayEntity, Patch};
use crate::common::{CoreError, CoreResult, Id};
use crate::config::Config;
use crate::kernel::storage::{load_json, persist_json};
use crate::kernel::BaseKeyValueStore;

/// Substrate keys used by one overlay store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySlots {
    pub modifications: String,
    pub created: String,
}

impl OverlaySlots {
    /// Slots for an entity kind, e.g. `creators` → `marketplace.creators.modifications`.
    pub fn for_kind(config: &Config, kind: &str) -> Self {
        Self {
            modifications: config.storage_key(&format!("{}.modifications", kind)),
            created: config.storage_key(&format!("{}.created", kind)),
        }
    }
}

/// Result of a read-merge-write.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<E> {
    /// A modification was written; holds the merged view after the write.
    Changed(E),
    /// The decision was a no-op; nothing was written.
    Unchanged(E),
}

impl<E> UpdateOutcome<E> {
    pub fn is_changed(&self) -> bool {
        matches!(self, UpdateOutcome::Changed(_))
    }

    pub fn entity(&self) -> &E {
        match self {
            UpdateOutcome::Changed(e) | UpdateOutcome::Unchanged(e) => e,
        }
    }

    pub fn into_entity(self) -> E {
        match self {
            UpdateOutcome::Changed(e) | UpdateOutcome::Unchanged(e) => e,
        }
    }
}

/// A local change that has not reached the remote store yet.
#[derive(Debug, Clone)]
pub enum PendingChange<E: OverlayEntity> {
    /// A locally created entity (merged view) and the modification folded into it.
    Create {
        entity: E,
        modification: Option<Modification<E::Patch>>,
    },
    Update {
        id: Id<E::Marker>,
        modification: Modification<E::Patch>,
    },
    Delete {
        id: Id<E::Marker>,
        modification: Modification<E::Patch>,
    },
}

struct OverlayState<E: OverlayEntity> {
    base: Vec<E>,
    base_index: HashMap<Id<E::Marker>, usize>,
    created: BTreeMap<Id<E::Marker>, E>,
    modifications: BTreeMap<Id<E::Marker>, Modification<E::Patch>>,
}

impl<E: OverlayEntity> OverlayState<E> {
    fn source(&self, id: &Id<E::Marker>) -> Option<&E> {
        self.base_index
            .get(id)
            .map(|&idx| &self.base[idx])
            .or_else(|| self.created.get(id))
    }

    fn view(&self, entity: &E) -> Option<E> {
        match self.modifications.get(entity.id()) {
            Some(m) if m.deleted => None,
            Some(m) => {
                let mut merged = entity.clone();
                merged.apply(&m.fields);
                Some(merged)
            }
            None => Some(entity.clone()),
        }
    }

    fn resolve(&self, id: &Id<E::Marker>) -> Option<E> {
        self.source(id).and_then(|e| self.view(e))
    }

    fn set_base(&mut self, entities: Vec<E>) {
        self.base_index = entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id().clone(), idx))
            .collect();
        self.base = entities;
    }

    fn upsert_base(&mut self, entity: E) {
        match self.base_index.get(entity.id()) {
            Some(&idx) => self.base[idx] = entity,
            None => {
                self.base_index.insert(entity.id().clone(), self.base.len());
                self.base.push(entity);
            }
        }
    }

    fn remove_base(&mut self, id: &Id<E::Marker>) {
        if self.base_index.contains_key(id) {
            let remaining: Vec<E> = self.base.drain(..).filter(|e| e.id() != id).collect();
            self.set_base(remaining);
        }
    }

    /// Retire what was pushed for `id`. A modification that is still exactly
    /// what was pushed goes away; one that changed meanwhile is rebased onto
    /// the pushed patch. Returns whether the modification map changed.
    fn clear_pushed(
        &mut self,
        id: &Id<E::Marker>,
        pushed: Option<&Modification<E::Patch>>,
    ) -> bool {
        if self.modifications.get(id) == pushed {
            return self.modifications.remove(id).is_some();
        }

        let (Some(pushed), Some(current)) = (pushed, self.modifications.get_mut(id)) else {
            return false;
        };
        current.fields.rebase(&pushed.fields);
        if current.fields.is_empty() && !current.deleted {
            self.modifications.remove(id);
        }
        true
    }

    /// Drop tombstones for base entities the remote store no longer has.
    /// Tombstones on locally created entities stay with them.
    fn prune_tombstones(&mut self) -> usize {
        let before = self.modifications.len();
        let base_index = &self.base_index;
        let created = &self.created;
        self.modifications.retain(|id, m| {
            !m.deleted || base_index.contains_key(id) || created.contains_key(id)
        });
        before - self.modifications.len()
    }
}

/// Local, mutable view of one remotely-owned entity kind.
pub struct OverlayStore<E: OverlayEntity> {
    substrate: Arc<dyn BaseKeyValueStore>,
    slots: OverlaySlots,
    state: RwLock<OverlayState<E>>,
}

impl<E: OverlayEntity> OverlayStore<E> {
    /// Open the store, restoring created entities and modifications from the substrate.
    ///
    /// The base dataset starts empty; install it with [`replace_base`](Self::replace_base).
    pub fn open(substrate: Arc<dyn BaseKeyValueStore>, slots: OverlaySlots) -> Self {
        let modifications: BTreeMap<Id<E::Marker>, Modification<E::Patch>> =
            load_json(substrate.as_ref(), &slots.modifications).unwrap_or_default();

        let records: BTreeMap<Id<E::Marker>, serde_json::Value> =
            load_json(substrate.as_ref(), &slots.created).unwrap_or_default();

        let mut created = BTreeMap::new();
        for (id, record) in records {
            match E::from_record(record) {
                Ok(entity) => {
                    created.insert(id, entity);
                }
                Err(e) => {
                    warn!(
                        kind = %E::KIND,
                        id = %id,
                        error = %e,
                        "Skipping unreadable created record"
                    );
                }
            }
        }

        debug!(
            kind = %E::KIND,
            created = created.len(),
            modifications = modifications.len(),
            "Overlay store opened"
        );

        Self {
            substrate,
            slots,
            state: RwLock::new(OverlayState {
                base: Vec::new(),
                base_index: HashMap::new(),
                created,
                modifications,
            }),
        }
    }

    pub fn slots(&self) -> &OverlaySlots {
        &self.slots
    }

    fn read_state(&self) -> RwLockReadGuard<'_, OverlayState<E>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, OverlayState<E>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn persist_modifications(&self, state: &OverlayState<E>) {
        persist_json(
            self.substrate.as_ref(),
            &self.slots.modifications,
            &state.modifications,
        );
    }

    fn persist_created(&self, state: &OverlayState<E>) {
        let mut records = BTreeMap::new();
        for (id, entity) in &state.created {
            match entity.to_record() {
                Ok(record) => {
                    records.insert(id.clone(), record);
                }
                Err(e) => {
                    warn!(
                        kind = %E::KIND,
                        id = %id,
                        error = %e,
                        "Persistence warning: failed to serialize created record"
                    );
                }
            }
        }
        persist_json(self.substrate.as_ref(), &self.slots.created, &records);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Merged view of `id`, `None` when absent or tombstoned.
    pub fn get(&self, id: &Id<E::Marker>) -> Option<E> {
        self.read_state().resolve(id)
    }

    /// Merged views of every live entity, base order then creation order.
    ///
    /// With `include_hidden == false` only publicly listed entities are kept.
    pub fn list(&self, include_hidden: bool) -> Vec<E> {
        let state = self.read_state();
        state
            .base
            .iter()
            .chain(state.created.values())
            .filter_map(|e| state.view(e))
            .filter(|e| include_hidden || e.is_publicly_listed())
            .collect()
    }

    /// The raw modification record for `id`, if any.
    pub fn modification(&self, id: &Id<E::Marker>) -> Option<Modification<E::Patch>> {
        self.read_state().modifications.get(id).cloned()
    }

    pub fn is_deleted(&self, id: &Id<E::Marker>) -> bool {
        self.read_state()
            .modifications
            .get(id)
            .map(|m| m.deleted)
            .unwrap_or(false)
    }

    /// Whether `id` was created locally (as opposed to coming from the base dataset).
    pub fn is_locally_created(&self, id: &Id<E::Marker>) -> bool {
        self.read_state().created.contains_key(id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Install the base dataset. The base is never persisted by the overlay.
    ///
    /// Tombstones for entities missing from the new base are pruned: the
    /// remote store has confirmed they are gone.
    pub fn replace_base(&self, entities: Vec<E>) {
        let mut state = self.write_state();
        debug!(kind = %E::KIND, count = entities.len(), "Replacing base dataset");
        state.set_base(entities);

        let pruned = state.prune_tombstones();
        if pruned > 0 {
            debug!(kind = %E::KIND, pruned, "Pruned settled tombstones");
            self.persist_modifications(&state);
        }
    }

    /// Shallow-merge `patch` into the modification record for `id`.
    pub fn update(&self, id: &Id<E::Marker>, patch: E::Patch) -> CoreResult<E> {
        self.update_with(id, |_| Ok(Some(patch)))
            .map(UpdateOutcome::into_entity)
    }

    /// Read-merge-write under a single guard.
    ///
    /// `decide` sees the current merged view and returns the patch to apply,
    /// `Ok(None)` for a no-op, or an error that aborts without writing.
    pub fn update_with<F>(&self, id: &Id<E::Marker>, decide: F) -> CoreResult<UpdateOutcome<E>>
    where
        F: FnOnce(&E) -> CoreResult<Option<E::Patch>>,
    {
        let mut state = self.write_state();
        let current = state
            .resolve(id)
            .ok_or_else(|| CoreError::not_found(E::KIND, id))?;

        let patch = match decide(&current)? {
            Some(patch) if !patch.is_empty() => patch,
            _ => return Ok(UpdateOutcome::Unchanged(current)),
        };

        let mut merged = current;
        merged.apply(&patch);
        state
            .modifications
            .entry(id.clone())
            .or_default()
            .merge(patch);
        self.persist_modifications(&state);

        Ok(UpdateOutcome::Changed(merged))
    }

    /// Tombstone `id`; later reads never return it.
    pub fn soft_delete(&self, id: &Id<E::Marker>) -> CoreResult<()> {
        let mut state = self.write_state();
        if state.resolve(id).is_none() {
            return Err(CoreError::not_found(E::KIND, id));
        }

        state.modifications.entry(id.clone()).or_default().deleted = true;
        self.persist_modifications(&state);
        Ok(())
    }

    /// Store a locally created entity in the separate created slot.
    pub fn insert_created(&self, entity: E) -> CoreResult<E> {
        let mut state = self.write_state();
        if state.source(entity.id()).is_some() {
            return Err(CoreError::validation(format!(
                "{} {} already exists",
                E::KIND,
                entity.id()
            )));
        }

        state.created.insert(entity.id().clone(), entity.clone());
        self.persist_created(&state);
        Ok(entity)
    }

    // =========================================================================
    // Remote sync support
    // =========================================================================

    /// Local changes not yet acknowledged by the remote store.
    ///
    /// Entities created and deleted locally never left this device and are
    /// not reported.
    pub fn pending_changes(&self) -> Vec<PendingChange<E>> {
        let state = self.read_state();
        let mut changes = Vec::new();

        for (id, entity) in &state.created {
            if let Some(merged) = state.view(entity) {
                changes.push(PendingChange::Create {
                    entity: merged,
                    modification: state.modifications.get(id).cloned(),
                });
            }
        }

        for (id, modification) in &state.modifications {
            if !state.base_index.contains_key(id) {
                continue;
            }
            if modification.deleted {
                changes.push(PendingChange::Delete {
                    id: id.clone(),
                    modification: modification.clone(),
                });
            } else if !modification.fields.is_empty() {
                changes.push(PendingChange::Update {
                    id: id.clone(),
                    modification: modification.clone(),
                });
            }
        }

        changes
    }

    /// The remote store accepted a locally created entity.
    pub fn settle_created(&self, canonical: E, pushed: Option<&Modification<E::Patch>>) {
        let mut state = self.write_state();
        let id = canonical.id().clone();

        state.created.remove(&id);
        state.upsert_base(canonical);
        let cleared = state.clear_pushed(&id, pushed);

        self.persist_created(&state);
        if cleared {
            self.persist_modifications(&state);
        }
    }

    /// The remote store accepted a partial update.
    pub fn settle_updated(&self, canonical: E, pushed: &Modification<E::Patch>) {
        let mut state = self.write_state();
        let id = canonical.id().clone();

        state.upsert_base(canonical);
        if state.clear_pushed(&id, Some(pushed)) {
            self.persist_modifications(&state);
        }
    }

    /// The remote store deleted the entity. The tombstone stays until a
    /// base dataset without the entity arrives, so a stale one cannot
    /// resurrect it.
    pub fn settle_deleted(&self, id: &Id<E::Marker>) {
        self.write_state().remove_base(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CreatorId, EntityKind};
    use crate::domains::creators::models::{Creator, CreatorPatch, CreatorStatus};
    use crate::kernel::storage::MemoryStore;
    use chrono::NaiveDate;

    fn creator(id: &str, status: CreatorStatus) -> Creator {
        let mut c = Creator::sample(id, "Name");
        c.status = status;
        c
    }

    fn open_store(substrate: Arc<MemoryStore>) -> OverlayStore<Creator> {
        OverlayStore::open(
            substrate,
            OverlaySlots::for_kind(&Config::default(), "creators"),
        )
    }

    #[test]
    fn update_merges_onto_base() {
        let store = open_store(Arc::new(MemoryStore::new()));
        let base = creator("c1", CreatorStatus::Approved);
        store.replace_base(vec![base.clone()]);

        let patch = CreatorPatch {
            bio: Some("New bio".into()),
            price: Some(250),
            ..Default::default()
        };
        let merged = store.update(&CreatorId::from("c1"), patch.clone()).unwrap();

        let mut expected = base;
        expected.apply(&patch);
        assert_eq!(merged, expected);
        assert_eq!(store.get(&CreatorId::from("c1")), Some(expected));
    }

    #[test]
    fn later_patches_win_field_by_field() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![creator("c1", CreatorStatus::Approved)]);
        let id = CreatorId::from("c1");

        store
            .update(
                &id,
                CreatorPatch {
                    bio: Some("first".into()),
                    location: Some("Lisbon".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .update(
                &id,
                CreatorPatch {
                    bio: Some("second".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let view = store.get(&id).unwrap();
        assert_eq!(view.bio, "second");
        assert_eq!(view.location, "Lisbon");
    }

    #[test]
    fn soft_delete_hides_from_every_read_path() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![
            creator("c1", CreatorStatus::Approved),
            creator("c2", CreatorStatus::Approved),
        ]);
        let id = CreatorId::from("c1");

        store.soft_delete(&id).unwrap();

        assert!(store.get(&id).is_none());
        assert!(store.list(true).iter().all(|c| c.id != id));
        assert!(store.list(false).iter().all(|c| c.id != id));
        assert!(store.is_deleted(&id));
    }

    #[test]
    fn mutations_on_tombstoned_entities_are_not_found() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![creator("c1", CreatorStatus::Approved)]);
        let id = CreatorId::from("c1");
        store.soft_delete(&id).unwrap();

        let err = store.update(&id, CreatorPatch::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NotFound {
                kind: EntityKind::Creator,
                ..
            }
        ));
        assert!(store.soft_delete(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn list_hides_non_approved_unless_requested() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![
            creator("c1", CreatorStatus::Approved),
            creator("c2", CreatorStatus::Pending),
        ]);

        let public: Vec<_> = store.list(false).into_iter().map(|c| c.id).collect();
        assert_eq!(public, vec![CreatorId::from("c1")]);
        assert_eq!(store.list(true).len(), 2);

        // Hidden filter is overlay-aware
        store
            .update(
                &CreatorId::from("c1"),
                CreatorPatch {
                    status: Some(CreatorStatus::Deactivated),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(store.list(false).is_empty());
    }

    #[test]
    fn created_entities_survive_reopen_in_their_own_slot() {
        let substrate = Arc::new(MemoryStore::new());
        let store = open_store(substrate.clone());
        let mut fresh = creator("new-1", CreatorStatus::Pending);
        fresh.created_at = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        store.insert_created(fresh.clone()).unwrap();
        store
            .update(
                &fresh.id,
                CreatorPatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let reopened = open_store(substrate.clone());
        let view = reopened.get(&fresh.id).unwrap();
        assert_eq!(view.name, "Renamed");
        assert!(reopened.is_locally_created(&fresh.id));
        assert!(substrate
            .keys()
            .contains(&"marketplace.creators.created".to_string()));
    }

    #[test]
    fn insert_created_rejects_existing_ids() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![creator("c1", CreatorStatus::Approved)]);

        let err = store
            .insert_created(creator("c1", CreatorStatus::Pending))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn no_op_decision_writes_nothing() {
        let substrate = Arc::new(MemoryStore::new());
        let store = open_store(substrate.clone());
        store.replace_base(vec![creator("c1", CreatorStatus::Approved)]);

        let outcome = store
            .update_with(&CreatorId::from("c1"), |_| Ok(None))
            .unwrap();

        assert!(!outcome.is_changed());
        assert!(store.modification(&CreatorId::from("c1")).is_none());
        assert!(substrate.keys().is_empty());
    }

    #[test]
    fn pending_changes_and_settle() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![
            creator("c1", CreatorStatus::Approved),
            creator("c2", CreatorStatus::Approved),
        ]);
        let c1 = CreatorId::from("c1");
        let c2 = CreatorId::from("c2");
        store
            .update(
                &c1,
                CreatorPatch {
                    bio: Some("pushed".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        store.soft_delete(&c2).unwrap();

        let changes = store.pending_changes();
        assert_eq!(changes.len(), 2);

        for change in changes {
            match change {
                PendingChange::Update { id, modification } => {
                    let canonical = store.get(&id).unwrap();
                    store.settle_updated(canonical, &modification);
                }
                PendingChange::Delete { id, .. } => store.settle_deleted(&id),
                PendingChange::Create { .. } => unreachable!(),
            }
        }

        assert!(store.pending_changes().is_empty());
        assert_eq!(store.get(&c1).unwrap().bio, "pushed");
        assert!(store.modification(&c1).is_none());
        assert!(store.get(&c2).is_none());
    }

    #[test]
    fn tombstones_pruned_once_remote_drops_the_entity() {
        let substrate = Arc::new(MemoryStore::new());
        let store = open_store(substrate.clone());
        store.replace_base(vec![
            creator("c1", CreatorStatus::Approved),
            creator("c2", CreatorStatus::Approved),
        ]);
        let c2 = CreatorId::from("c2");
        store.soft_delete(&c2).unwrap();

        // Remote still has it: the tombstone keeps hiding it
        store.replace_base(vec![
            creator("c1", CreatorStatus::Approved),
            creator("c2", CreatorStatus::Approved),
        ]);
        assert!(store.is_deleted(&c2));
        assert!(store.get(&c2).is_none());

        // Remote no longer has it: nothing left to hide
        store.replace_base(vec![creator("c1", CreatorStatus::Approved)]);
        assert!(store.modification(&c2).is_none());
        assert!(open_store(substrate).modification(&c2).is_none());
    }

    #[test]
    fn settle_keeps_views_counted_during_the_push() {
        let store = open_store(Arc::new(MemoryStore::new()));
        store.replace_base(vec![creator("c1", CreatorStatus::Approved)]);
        let id = CreatorId::from("c1");
        let one_view = || CreatorPatch {
            profile_views_delta: Some(1),
            ..Default::default()
        };
        store.update(&id, one_view()).unwrap();

        let pushed = store.modification(&id).unwrap();
        let mut canonical = creator("c1", CreatorStatus::Approved);
        canonical.profile_views = 8;

        // Another view lands while the push is in flight
        store.update(&id, one_view()).unwrap();
        store.settle_updated(canonical, &pushed);

        assert_eq!(store.modification(&id).unwrap().fields.profile_views_delta, Some(1));
        assert_eq!(store.get(&id).unwrap().profile_views, 9);
    }
}
