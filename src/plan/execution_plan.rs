//! Owns the record pool and the alias→slot mapping. Grounded on spec.md
//! §4.5's `Modifies`/`AliasModifier`/`Aware` contract and on the teacher's
//! `engine/circuit_indexmap.rs`, whose comment on using `indexmap::IndexMap`
//! for "stable indexing & O(1) lookup" is exactly the property this mapping
//! needs: slot ids assigned in insertion order and never reassigned.

use super::record::{Record, RecordPool};
use indexmap::IndexMap;
use smol_str::SmolStr;

pub type SlotId = usize;

#[derive(Debug, Default)]
pub struct ExecutionPlan {
    mapping: IndexMap<SmolStr, SlotId>,
    pool: RecordPool,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        ExecutionPlan { mapping: IndexMap::new(), pool: RecordPool::new() }
    }

    /// Declares that some operator writes `alias`, allocating a dense slot
    /// if new. Returns the stable slot id either way.
    pub fn modifies(&mut self, alias: &str) -> SlotId {
        if let Some(&slot) = self.mapping.get(alias) {
            return slot;
        }
        let slot = self.mapping.len();
        self.mapping.insert(SmolStr::new(alias), slot);
        self.pool.set_width(self.mapping.len());
        slot
    }

    /// Declares `alias` a synonym of `existing`, which must already be
    /// registered. Both aliases resolve to the same slot id afterward.
    pub fn alias_modifier(&mut self, existing: &str, alias: &str) -> SlotId {
        let slot = *self
            .mapping
            .get(existing)
            .unwrap_or_else(|| panic!("AliasModifier: \"{existing}\" is not yet registered"));
        self.mapping.insert(SmolStr::new(alias), slot);
        slot
    }

    /// True (with the slot id) if `alias` exists anywhere in this plan's
    /// mapping — a plan-wide lookup, independent of which operator asks.
    pub fn aware(&self, alias: &str) -> Option<SlotId> {
        self.mapping.get(alias).copied()
    }

    pub fn create_record(&self) -> Record {
        self.pool.create_record()
    }

    pub fn slot_count(&self) -> usize {
        self.mapping.len()
    }
}
