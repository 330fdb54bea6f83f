//! The graph's matrix and id-allocation surface. Grounded on spec.md §6's
//! `Graph` interface (`AllocateNodes`, `AllocateEdges`,
//! `GetMatrixPolicy`/`SetMatrixPolicy`, `GetLabelMatrix`,
//! `GetNodeLabelMatrix`, `GetRelationMatrix`, `GetAdjacencyMatrix`).
//!
//! Label matrices are diagonal: membership of node `n` in label `l` is
//! recorded at `(n, n)` in label `l`'s own matrix, matching the literal
//! end-to-end scenario in spec.md §8 ("per-label matrix at (0,0)").

use crate::attribute_set::AttributeSet;
use crate::collections::FastMap;
use crate::matrix::{BooleanMatrix, DeltaMatrix, IndexedMatrix, SyncPolicy};
use crate::schema::SchemaId;
use crate::value::{EdgeId, NodeId};

pub trait GraphStore {
    fn allocate_nodes(&mut self, n: u32) -> std::ops::Range<NodeId>;
    fn allocate_edges(&mut self, n: u32) -> std::ops::Range<EdgeId>;

    fn matrix_policy(&self) -> SyncPolicy;
    fn set_matrix_policy(&mut self, policy: SyncPolicy);

    fn label_matrix(&self, schema_id: SchemaId) -> Option<&BooleanMatrix>;
    fn label_matrix_mut(&mut self, schema_id: SchemaId) -> &mut BooleanMatrix;
    /// Grows the node-label matrix's column count so column `schema_id` is
    /// addressable. Called from the commit pipeline's blueprint phase
    /// alongside `label_matrix_mut`, once per distinct label schema touched
    /// — the node-label matrix is keyed `(node id, label schema id)`, so its
    /// column count must track the highest schema id registered so far, not
    /// a fixed constant.
    fn grow_node_label_columns(&mut self, schema_id: SchemaId);
    fn node_label_matrix_mut(&mut self) -> &mut BooleanMatrix;
    fn relation_matrix(&self, schema_id: SchemaId) -> Option<&IndexedMatrix>;
    fn relation_matrix_mut(&mut self, schema_id: SchemaId) -> &mut IndexedMatrix;
    fn adjacency_matrix_mut(&mut self) -> &mut IndexedMatrix;

    fn set_node_attributes(&mut self, id: NodeId, attrs: AttributeSet);
    fn set_edge_attributes(&mut self, id: EdgeId, attrs: AttributeSet);
    fn node_attributes(&self, id: NodeId) -> Option<&AttributeSet>;
    fn edge_attributes(&self, id: EdgeId) -> Option<&AttributeSet>;
}

#[derive(Debug)]
pub struct InMemoryGraphStore {
    policy: SyncPolicy,
    node_capacity: u32,
    edge_capacity: u32,
    label_matrices: FastMap<SchemaId, BooleanMatrix>,
    node_label_matrix: BooleanMatrix,
    relation_matrices: FastMap<SchemaId, IndexedMatrix>,
    adjacency_matrix: IndexedMatrix,
    node_attrs: FastMap<NodeId, AttributeSet>,
    edge_attrs: FastMap<EdgeId, AttributeSet>,
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        InMemoryGraphStore {
            policy: SyncPolicy::FlushResize,
            node_capacity: 0,
            edge_capacity: 0,
            label_matrices: FastMap::default(),
            node_label_matrix: DeltaMatrix::new(0, 0),
            relation_matrices: FastMap::default(),
            adjacency_matrix: DeltaMatrix::new(0, 0),
            node_attrs: FastMap::default(),
            edge_attrs: FastMap::default(),
        }
    }
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows every node-dimensioned matrix to the current node capacity.
    /// Called by the commit pipeline while policy is `Resize`. Only rows
    /// grow here — the node-label matrix's column count is grown
    /// separately, by `grow_node_label_columns`, as new label schemas are
    /// registered.
    fn resize_node_dimensioned_matrices(&mut self) {
        let n = self.node_capacity;
        for matrix in self.label_matrices.values_mut() {
            matrix.resize(n, n);
        }
        let label_cols = self.node_label_matrix.ncols();
        self.node_label_matrix.resize(n, label_cols);
        for matrix in self.relation_matrices.values_mut() {
            matrix.resize(n, n);
        }
        self.adjacency_matrix.resize(n, n);
    }
}

impl GraphStore for InMemoryGraphStore {
    fn allocate_nodes(&mut self, n: u32) -> std::ops::Range<NodeId> {
        let start = self.node_capacity as NodeId;
        self.node_capacity += n;
        if matches!(self.policy, SyncPolicy::Resize | SyncPolicy::FlushResize) {
            self.resize_node_dimensioned_matrices();
        }
        start..(start + n as NodeId)
    }

    fn allocate_edges(&mut self, n: u32) -> std::ops::Range<EdgeId> {
        let start = self.edge_capacity as EdgeId;
        self.edge_capacity += n;
        start..(start + n as EdgeId)
    }

    fn matrix_policy(&self) -> SyncPolicy {
        self.policy
    }

    fn set_matrix_policy(&mut self, policy: SyncPolicy) {
        self.policy = policy;
        if matches!(policy, SyncPolicy::Resize | SyncPolicy::FlushResize) {
            self.resize_node_dimensioned_matrices();
        }
    }

    fn label_matrix(&self, schema_id: SchemaId) -> Option<&BooleanMatrix> {
        self.label_matrices.get(&schema_id)
    }

    fn label_matrix_mut(&mut self, schema_id: SchemaId) -> &mut BooleanMatrix {
        let n = self.node_capacity;
        self.label_matrices.entry(schema_id).or_insert_with(|| DeltaMatrix::new(n, n))
    }

    fn grow_node_label_columns(&mut self, schema_id: SchemaId) {
        let needed = schema_id + 1;
        if self.node_label_matrix.ncols() < needed {
            let n = self.node_capacity;
            self.node_label_matrix.resize(n, needed);
        }
    }

    fn node_label_matrix_mut(&mut self) -> &mut BooleanMatrix {
        &mut self.node_label_matrix
    }

    fn relation_matrix(&self, schema_id: SchemaId) -> Option<&IndexedMatrix> {
        self.relation_matrices.get(&schema_id)
    }

    fn relation_matrix_mut(&mut self, schema_id: SchemaId) -> &mut IndexedMatrix {
        let n = self.node_capacity;
        self.relation_matrices.entry(schema_id).or_insert_with(|| DeltaMatrix::new(n, n))
    }

    fn adjacency_matrix_mut(&mut self) -> &mut IndexedMatrix {
        &mut self.adjacency_matrix
    }

    fn set_node_attributes(&mut self, id: NodeId, attrs: AttributeSet) {
        self.node_attrs.insert(id, attrs);
    }

    fn set_edge_attributes(&mut self, id: EdgeId, attrs: AttributeSet) {
        self.edge_attrs.insert(id, attrs);
    }

    fn node_attributes(&self, id: NodeId) -> Option<&AttributeSet> {
        self.node_attrs.get(&id)
    }

    fn edge_attributes(&self, id: EdgeId) -> Option<&AttributeSet> {
        self.edge_attrs.get(&id)
    }
}
