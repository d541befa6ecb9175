//! Registry of the characters currently visible behind the doors.

use std::time::Duration;

use bertha_knockout_core::{CharacterKind, PopId, PopSnapshot, ScreenPoint, SlotId};

use crate::layout::SlotLayout;

/// Pop stored inside the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pop {
    pub(crate) id: PopId,
    pub(crate) slot: SlotId,
    pub(crate) kind: CharacterKind,
    pub(crate) spawned_at: Duration,
    pub(crate) lifetime: Duration,
    pub(crate) hit: bool,
}

impl Pop {
    fn expired_at(&self, elapsed: Duration) -> bool {
        elapsed.saturating_sub(self.spawned_at) >= self.lifetime
    }

    pub(crate) fn snapshot(&self) -> PopSnapshot {
        PopSnapshot {
            id: self.id,
            slot: self.slot,
            kind: self.kind,
            spawned_at: self.spawned_at,
            lifetime: self.lifetime,
            hit: self.hit,
        }
    }
}

/// Live pops in spawn order, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PopRegistry {
    entries: Vec<Pop>,
    next_pop_id: PopId,
}

impl PopRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_pop_id: PopId::new(0),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Pop> {
        self.entries.iter()
    }

    pub(crate) fn is_occupied(&self, slot: SlotId) -> bool {
        self.entries.iter().any(|pop| pop.slot == slot)
    }

    /// Inserts a pop and allocates its identifier. Callers check occupancy first.
    pub(crate) fn insert(
        &mut self,
        slot: SlotId,
        kind: CharacterKind,
        spawned_at: Duration,
        lifetime: Duration,
    ) -> PopId {
        debug_assert!(!self.is_occupied(slot), "slot {slot:?} already hosts a pop");
        let id = self.next_pop_id;
        self.next_pop_id = PopId::new(id.get().wrapping_add(1));
        self.entries.push(Pop {
            id,
            slot,
            kind,
            spawned_at,
            lifetime,
            hit: false,
        });
        id
    }

    /// Returns the most recently spawned unhit pop whose door contains `point`.
    pub(crate) fn topmost_at(&self, layout: &SlotLayout, point: ScreenPoint) -> Option<PopId> {
        self.entries
            .iter()
            .rev()
            .find(|pop| layout.slot_contains(pop.slot, point))
            .filter(|pop| !pop.hit)
            .map(|pop| pop.id)
    }

    /// Marks the pop as hit and removes it. Resolving a pop twice yields `None`.
    pub(crate) fn resolve(&mut self, id: PopId) -> Option<Pop> {
        let index = self
            .entries
            .iter()
            .position(|pop| pop.id == id && !pop.hit)?;
        let mut pop = self.entries.remove(index);
        pop.hit = true;
        Some(pop)
    }

    /// Removes every pop whose lifetime elapsed, returning them oldest first.
    pub(crate) fn expire(&mut self, elapsed: Duration) -> Vec<Pop> {
        let mut expired = Vec::new();
        self.entries.retain(|pop| {
            if pop.expired_at(elapsed) {
                expired.push(pop.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_pop_id = PopId::new(0);
    }
}
