//! A compact map from attribute id to value, attached to every node and
//! edge. Grounded on `attribute_set.c` in the retrieval pack's
//! `original_source/`: linear-scan lookup over a handful of entries, with
//! the empty set represented by an absent allocation rather than an empty
//! one.

use crate::value::PropertyValue;
use smallvec::SmallVec;

pub type AttributeId = u16;

/// Sentinel meaning "no such attribute id was resolved" — distinct from
/// "attribute id resolved but not present in this set", which `get`
/// expresses as `None`.
pub const ATTRIBUTE_ID_NONE: AttributeId = AttributeId::MAX;

/// Typical property counts are small; inline storage for up to 8 avoids a
/// heap allocation for the common case, matching the original's intent
/// (a single allocation sized to the entry count) without its realloc
/// churn on every add/remove.
const INLINE_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: AttributeId,
    pub value: PropertyValue,
}

/// Result of `set_allow_null`, describing which mutation actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSetChange {
    Add,
    Update,
    Del,
    None,
}

/// `None` is the sentinel "absent" set: no allocation at all. Once any
/// attribute is added the set becomes `Some(..)`, and removing the last
/// attribute drops back to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet(Option<SmallVec<[Attribute; INLINE_CAPACITY]>>);

impl AttributeSet {
    pub fn empty() -> Self {
        AttributeSet(None)
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// O(n) linear scan, as specified — property counts are small enough
    /// that this beats a hash map in practice.
    pub fn get(&self, id: AttributeId) -> Option<&PropertyValue> {
        if id == ATTRIBUTE_ID_NONE {
            return None;
        }
        self.0
            .as_ref()
            .and_then(|attrs| attrs.iter().find(|a| a.id == id))
            .map(|a| &a.value)
    }

    pub fn get_idx(&self, i: usize) -> (AttributeId, &PropertyValue) {
        let attrs = self.0.as_ref().expect("AttributeSet::get_idx on empty set");
        let attr = &attrs[i];
        (attr.id, &attr.value)
    }

    /// Appends a single attribute, cloning `value`. Caller guarantees `id`
    /// is absent; debug-asserted.
    pub fn add(&mut self, id: AttributeId, value: PropertyValue) {
        debug_assert!(value.is_valid_property_value());
        debug_assert!(self.get(id).is_none(), "attribute {id} already present");
        self.0.get_or_insert_with(SmallVec::new).push(Attribute { id, value });
    }

    /// Bulk append, taking ownership of `values`. Mirrors the original's
    /// `AddNoClone`: in Rust the value is always moved in, so this differs
    /// from `add` only in accepting a pre-built batch and an `allow_null`
    /// flag for the debug assertion.
    pub fn add_no_clone(&mut self, ids: &[AttributeId], values: Vec<PropertyValue>, allow_null: bool) {
        debug_assert_eq!(ids.len(), values.len());
        let attrs = self.0.get_or_insert_with(SmallVec::new);
        for (id, value) in ids.iter().copied().zip(values) {
            debug_assert!(
                value.is_valid_property_value() || (allow_null && value.is_null()),
                "invalid property value for attribute {id}"
            );
            debug_assert!(!attrs.iter().any(|a| a.id == id), "attribute {id} already present");
            attrs.push(Attribute { id, value });
        }
    }

    /// Add, update, or remove, allowing `PropertyValue::Null` to mean
    /// "remove". Returns which of the four outcomes occurred.
    pub fn set_allow_null(&mut self, id: AttributeId, value: PropertyValue) -> AttributeSetChange {
        debug_assert_ne!(id, ATTRIBUTE_ID_NONE);
        debug_assert!(value.is_valid_property_value());

        if self.get(id).is_some() {
            return if self.update(id, value) {
                AttributeSetChange::Update
            } else {
                AttributeSetChange::None
            };
        }

        if value.is_null() {
            return AttributeSetChange::None;
        }

        self.0.get_or_insert_with(SmallVec::new).push(Attribute { id, value });
        AttributeSetChange::Add
    }

    /// Precondition: `id` is present. `PropertyValue::Null` removes the
    /// attribute. Returns `false` if the new value equals the current one
    /// (no-op).
    pub fn update(&mut self, id: AttributeId, value: PropertyValue) -> bool {
        if value.is_null() {
            return self.remove(id);
        }

        let attrs = self.0.as_mut().expect("update on absent attribute set");
        let attr = attrs
            .iter_mut()
            .find(|a| a.id == id)
            .expect("update called for an attribute id that is not present");
        if attr.value == value {
            return false;
        }
        attr.value = value;
        true
    }

    /// Swap-removes the attribute, freeing the whole allocation (dropping
    /// back to the `None` sentinel) when it was the last entry.
    fn remove(&mut self, id: AttributeId) -> bool {
        let Some(attrs) = self.0.as_mut() else {
            return false;
        };
        let Some(pos) = attrs.iter().position(|a| a.id == id) else {
            return false;
        };
        attrs.swap_remove(pos);
        if attrs.is_empty() {
            self.0 = None;
        }
        true
    }

    /// Deep copy: every contained value is independently owned, so
    /// mutating through the clone never reaches `self`'s storage.
    pub fn clone_deep(&self) -> AttributeSet {
        self.clone()
    }

    /// Shares values between `self` and the returned clone. Safe because
    /// `PropertyValue`'s heap-backed variants (`Array`, `Path`, `Map`) are
    /// reference-counted and immutable once built — replacing a slot's
    /// value (via `update`/`remove`) never mutates shared contents in
    /// place, it only swaps which value the slot points at.
    pub fn shallow_clone(&self) -> AttributeSet {
        self.clone()
    }

    /// No-op in this representation: `PropertyValue` never borrows from a
    /// transient buffer, so there is nothing to promote to owned storage.
    /// Kept for API parity with the original, which used this to promote
    /// values pointing into a query's expression-evaluation scratch space.
    pub fn persist_values(&mut self) {}

    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, &PropertyValue)> {
        self.0
            .iter()
            .flat_map(|attrs| attrs.iter())
            .map(|a| (a.id, &a.value))
    }
}
