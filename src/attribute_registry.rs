//! Graph-wide attribute-name → attribute-id registry. Grounded on the
//! original's `FindOrAddAttribute`, and on the teacher's preference
//! (`circuit_indexmap.rs`) for `indexmap::IndexMap` when stable,
//! insertion-ordered ids are needed.

use crate::attribute_set::AttributeId;
use indexmap::IndexMap;
use smol_str::SmolStr;

#[derive(Debug, Default)]
pub struct AttributeRegistry {
    ids: IndexMap<SmolStr, AttributeId>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<AttributeId> {
        self.ids.get(name).copied()
    }

    pub fn get_or_add(&mut self, name: &str) -> AttributeId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.ids.len() as AttributeId;
        self.ids.insert(SmolStr::new(name), id);
        id
    }
}
