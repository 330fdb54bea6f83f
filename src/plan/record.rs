//! Records and their free-list pool. Grounded on spec.md §4.5's record
//! pool description: records are fixed-width slot vectors borrowed from
//! and returned to the plan that owns them.

use crate::value::{EdgeId, NodeId, PropertyValue};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Unset,
    Scalar(PropertyValue),
    Node(NodeId),
    Edge(EdgeId),
    Path(Vec<PropertyValue>),
}

impl Slot {
    /// See `AttributeSet::clone_deep`/`shallow_clone`: our values are
    /// already immutable-by-replacement, so a "deep" clone and an ordinary
    /// clone coincide here. Kept as a distinct name for parity with
    /// `DeepCloneRecord`.
    fn clone_deep(&self) -> Slot {
        self.clone()
    }
}

#[derive(Debug, Default)]
struct RecordPoolInner {
    width: usize,
    free: Vec<Vec<Slot>>,
}

/// Per-plan, not thread-safe, as spec.md §5 specifies — `Rc<RefCell<_>>`
/// rather than `Arc<Mutex<_>>` reflects that directly instead of paying
/// for synchronization nothing needs.
#[derive(Debug, Clone)]
pub struct RecordPool(Rc<RefCell<RecordPoolInner>>);

impl RecordPool {
    pub fn new() -> Self {
        RecordPool(Rc::new(RefCell::new(RecordPoolInner::default())))
    }

    /// Widens the slot vectors this pool hands out. Existing free buffers
    /// are resized lazily on next borrow rather than eagerly here.
    pub fn set_width(&self, width: usize) {
        self.0.borrow_mut().width = width;
    }

    pub fn create_record(&self) -> Record {
        let mut inner = self.0.borrow_mut();
        let mut slots = inner.free.pop().unwrap_or_default();
        // `Vec::resize` only truncates or appends; on a buffer already at
        // `width` (the common pooled case) it is a no-op and would leave
        // the previous record's slot values in place. Reset every existing
        // slot explicitly before (re)sizing to the requested width.
        slots.iter_mut().for_each(|s| *s = Slot::Unset);
        slots.resize(inner.width, Slot::Unset);
        Record { slots, pool: Rc::clone(&self.0) }
    }
}

impl Default for RecordPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed-width slot vector flowing through the operator tree. Carries a
/// non-owning back-reference to its pool so it can be cloned or released
/// without the caller threading the plan through every call site.
#[derive(Debug)]
pub struct Record {
    slots: Vec<Slot>,
    pool: Rc<RefCell<RecordPoolInner>>,
}

impl Record {
    pub fn get(&self, slot: usize) -> &Slot {
        &self.slots[slot]
    }

    pub fn set(&mut self, slot: usize, value: Slot) {
        self.slots[slot] = value;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn pool_handle(&self) -> RecordPool {
        RecordPool(Rc::clone(&self.pool))
    }

    /// Borrows a new record from this record's owner pool and copies
    /// slot-by-slot.
    pub fn clone_record(&self) -> Record {
        let mut r = self.pool_handle().create_record();
        r.slots = self.slots.clone();
        r
    }

    /// As `clone_record`, but clones heap-owning slot contents explicitly
    /// rather than relying on the implicit clone.
    pub fn deep_clone_record(&self) -> Record {
        let mut r = self.pool_handle().create_record();
        r.slots = self.slots.iter().map(Slot::clone_deep).collect();
        r
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        let slots = std::mem::take(&mut self.slots);
        self.pool.borrow_mut().free.push(slots);
    }
}
