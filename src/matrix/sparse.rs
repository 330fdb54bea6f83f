//! A plain (non-delta) sparse matrix: coordinates present map to a value,
//! everything else is absent. Backs both the flushed base and the
//! temporaries produced by `DeltaMatrix::export`.

use crate::collections::FastMap;

pub type Coord = (u32, u32);

#[derive(Debug, Clone)]
pub struct SparseMatrix<V> {
    nrows: u32,
    ncols: u32,
    entries: FastMap<Coord, V>,
}

impl<V> SparseMatrix<V> {
    pub fn new(nrows: u32, ncols: u32) -> Self {
        SparseMatrix { nrows, ncols, entries: FastMap::default() }
    }

    pub fn nrows(&self) -> u32 {
        self.nrows
    }

    pub fn ncols(&self) -> u32 {
        self.ncols
    }

    pub fn nvals(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grows dimensions in place. Matrices in this system only ever grow to
    /// track an expanding graph; shrinking would silently drop entries, so
    /// it is rejected rather than performed.
    pub fn resize(&mut self, nrows: u32, ncols: u32) {
        assert!(nrows >= self.nrows && ncols >= self.ncols, "SparseMatrix::resize cannot shrink");
        self.nrows = nrows;
        self.ncols = ncols;
    }

    pub fn contains(&self, i: u32, j: u32) -> bool {
        self.entries.contains_key(&(i, j))
    }

    pub fn get(&self, i: u32, j: u32) -> Option<&V> {
        self.entries.get(&(i, j))
    }

    pub fn set(&mut self, i: u32, j: u32, value: V) {
        debug_assert!(i < self.nrows && j < self.ncols, "coordinate out of bounds");
        self.entries.insert((i, j), value);
    }

    pub fn remove(&mut self, i: u32, j: u32) -> Option<V> {
        self.entries.remove(&(i, j))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &V)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (Coord, V)> + '_ {
        self.entries.drain()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_matrix_has_no_entries() {
        let m: SparseMatrix<()> = SparseMatrix::new(4, 4);
        assert_eq!(m.nvals(), 0);
        assert!(!m.contains(0, 0));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut m = SparseMatrix::new(4, 4);
        m.set(1, 2, 7u64);
        assert_eq!(m.get(1, 2), Some(&7));
        assert_eq!(m.nvals(), 1);
    }

    #[test]
    fn remove_drops_entry() {
        let mut m = SparseMatrix::new(4, 4);
        m.set(1, 2, 7u64);
        assert_eq!(m.remove(1, 2), Some(7));
        assert!(!m.contains(1, 2));
    }

    #[test]
    #[should_panic(expected = "cannot shrink")]
    fn resize_rejects_shrinking() {
        let mut m: SparseMatrix<()> = SparseMatrix::new(4, 4);
        m.resize(2, 2);
    }
}
