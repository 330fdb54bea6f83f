mod delta;
mod sparse;

pub use delta::{e_wise_add, BooleanMatrix, DeltaMatrix, IndexedMatrix, SyncPolicy};
pub use sparse::SparseMatrix;
