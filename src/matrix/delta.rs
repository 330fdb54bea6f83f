//! The delta-overlay matrix: a flushed base plus a pending-insert and a
//! pending-delete overlay. Grounded on `rg_matrix/rg_add.c`'s `RG_eWiseAdd`
//! (export-only-if-dirty, write-through-to-base, zero the delta counters)
//! and on spec.md §4.2/§4.6.

use super::sparse::SparseMatrix;

/// Governs whether matrix accessors may flush pending deltas and/or resize
/// to the graph's current capacity. Carried explicitly by the caller (see
/// `graph::store::GraphStore::with_sync_policy`) rather than as ambient
/// mutable state on the graph, per spec.md §9's own redesign note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Resize to current capacity; do not flush.
    Resize,
    /// Assume dimensions and flush state are already correct; do nothing.
    Nop,
    /// May both flush and resize — the steady state for readers.
    FlushResize,
}

#[derive(Debug, Clone)]
pub struct DeltaMatrix<V> {
    base: SparseMatrix<V>,
    delta_plus: SparseMatrix<V>,
    delta_minus: SparseMatrix<()>,
}

/// A matrix that only tracks presence — label membership, adjacency.
pub type BooleanMatrix = DeltaMatrix<()>;
/// A matrix keyed by (row, col) with an associated id — relation matrices
/// keyed by edge id.
pub type IndexedMatrix = DeltaMatrix<u64>;

impl<V: Clone> DeltaMatrix<V> {
    pub fn new(nrows: u32, ncols: u32) -> Self {
        DeltaMatrix {
            base: SparseMatrix::new(nrows, ncols),
            delta_plus: SparseMatrix::new(nrows, ncols),
            delta_minus: SparseMatrix::new(nrows, ncols),
        }
    }

    pub fn nrows(&self) -> u32 {
        self.base.nrows()
    }

    pub fn ncols(&self) -> u32 {
        self.base.ncols()
    }

    /// Logical entry count: base entries not shadowed by a pending delete,
    /// plus pending inserts.
    pub fn nvals(&self) -> usize {
        self.base.nvals() - self.delta_minus.nvals() + self.delta_plus.nvals()
    }

    pub fn resize(&mut self, nrows: u32, ncols: u32) {
        self.base.resize(nrows, ncols);
        self.delta_plus.resize(nrows, ncols);
        self.delta_minus.resize(nrows, ncols);
    }

    /// Overlay update: a clear inserts into Δ-, a set after a clear
    /// cancels it, a set on an empty cell inserts into Δ+. Setting a cell
    /// already present in the base (and not pending delete) is a no-op —
    /// boolean matrices have nothing further to record, and for indexed
    /// matrices callers needing to overwrite an existing cell's value
    /// should clear then set.
    pub fn set_element(&mut self, i: u32, j: u32, value: V) {
        if self.delta_minus.remove(i, j).is_some() {
            return;
        }
        if self.base.contains(i, j) {
            return;
        }
        self.delta_plus.set(i, j, value);
    }

    pub fn clear_element(&mut self, i: u32, j: u32) {
        if self.delta_plus.remove(i, j).is_some() {
            return;
        }
        if self.base.contains(i, j) {
            self.delta_minus.set(i, j, ());
        }
    }

    /// Logical presence check: Δ- shadows the base, Δ+ shadows both.
    pub fn extract(&self, i: u32, j: u32) -> bool {
        if self.delta_minus.contains(i, j) {
            return false;
        }
        self.delta_plus.contains(i, j) || self.base.contains(i, j)
    }

    pub fn get(&self, i: u32, j: u32) -> Option<&V> {
        if self.delta_minus.contains(i, j) {
            return None;
        }
        self.delta_plus.get(i, j).or_else(|| self.base.get(i, j))
    }

    /// Materializes (M ∖ Δ-) ∪ Δ+ into a freshly allocated matrix.
    pub fn export(&self) -> SparseMatrix<V> {
        let mut out = SparseMatrix::new(self.nrows(), self.ncols());
        for ((i, j), v) in self.base.iter() {
            if !self.delta_minus.contains(i, j) {
                out.set(i, j, v.clone());
            }
        }
        for ((i, j), v) in self.delta_plus.iter() {
            out.set(i, j, v.clone());
        }
        out
    }

    /// Applies both overlays into the base and clears them.
    pub fn flush(&mut self) {
        let deletes: Vec<_> = self.delta_minus.drain().map(|(k, _)| k).collect();
        for (i, j) in deletes {
            self.base.remove(i, j);
        }
        let inserts: Vec<_> = self.delta_plus.drain().collect();
        for ((i, j), v) in inserts {
            self.base.set(i, j, v);
        }
    }

    fn has_pending_deltas(&self) -> bool {
        self.delta_plus.nvals() > 0 || self.delta_minus.nvals() > 0
    }

    fn materialized(&self) -> SparseMatrix<V> {
        if self.has_pending_deltas() {
            self.export()
        } else {
            self.base.clone()
        }
    }
}

/// C ← A ⊕ B. Exports each operand only if it carries pending deltas
/// (otherwise aliases its base directly), combines overlapping entries
/// with `combine`, writes the result into C's base, and resets C's delta
/// counters to zero — C must be treated as freshly flushed afterward.
pub fn e_wise_add<V, F>(c: &mut DeltaMatrix<V>, a: &DeltaMatrix<V>, b: &DeltaMatrix<V>, combine: F)
where
    V: Clone,
    F: Fn(&V, &V) -> V,
{
    let a_mat = a.materialized();
    let b_mat = b.materialized();

    let mut result = SparseMatrix::new(c.nrows(), c.ncols());
    for ((i, j), v) in a_mat.iter() {
        result.set(i, j, v.clone());
    }
    for ((i, j), v) in b_mat.iter() {
        if let Some(existing) = result.get(i, j) {
            let combined = combine(existing, v);
            result.set(i, j, combined);
        } else {
            result.set(i, j, v.clone());
        }
    }

    c.base = result;
    c.delta_plus.clear();
    c.delta_minus.clear();
}
