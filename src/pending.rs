//! The write-operator staging buffer. Grounded on spec.md §3's
//! `PendingCreations` description and on `create_functions.c`'s blueprint
//! arrays (`node_labels[i]`, `node_attributes[i]`, `edge_attributes[i]`).
//!
//! Blueprints carry an already-evaluated `AttributeSet` rather than raw
//! `(key, expression)` pairs: the writer operator calls
//! [`crate::convert::convert_property_map`] against the current record
//! while pulling from its child, then stages the result here. That keeps
//! this buffer free of any borrow on the record or the expression
//! evaluator, matching its documented lifecycle — allocated per operator
//! instance, reused across rows, released at operator free.

use crate::attribute_set::AttributeSet;
use crate::schema::SchemaId;
use crate::value::{EdgeId, NodeId};
use smol_str::SmolStr;

#[derive(Debug, Clone)]
pub struct NodeBlueprint {
    pub labels: Vec<SmolStr>,
    pub attrs: AttributeSet,
}

#[derive(Debug, Clone)]
pub struct EdgeBlueprint {
    pub relation: SmolStr,
    pub src: NodeId,
    pub dst: NodeId,
    pub attrs: AttributeSet,
}

#[derive(Debug, Clone)]
pub struct CreatedNode {
    pub id: NodeId,
    pub attrs: AttributeSet,
}

#[derive(Debug, Clone)]
pub struct CreatedEdge {
    pub id: EdgeId,
    pub src: NodeId,
    pub dst: NodeId,
    pub relation: SchemaId,
    pub attrs: AttributeSet,
}

#[derive(Debug, Default)]
pub struct PendingCreations {
    pub nodes_to_create: Vec<NodeBlueprint>,
    pub created_nodes: Vec<CreatedNode>,
    /// Parallel to `nodes_to_create`: each pending node's resolved label
    /// schema ids, filled in by the commit pipeline's blueprint phase.
    pub node_labels: Vec<Vec<SchemaId>>,

    pub edges_to_create: Vec<EdgeBlueprint>,
    pub created_edges: Vec<CreatedEdge>,
}

impl PendingCreations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_node(&mut self, blueprint: NodeBlueprint) {
        self.nodes_to_create.push(blueprint);
    }

    pub fn stage_edge(&mut self, blueprint: EdgeBlueprint) {
        self.edges_to_create.push(blueprint);
    }

    pub fn has_pending_nodes(&self) -> bool {
        !self.nodes_to_create.is_empty()
    }

    pub fn has_pending_edges(&self) -> bool {
        !self.edges_to_create.is_empty()
    }

    /// Releases all staged and materialized state. Called when the owning
    /// writer operator is freed.
    pub fn clear(&mut self) {
        self.nodes_to_create.clear();
        self.created_nodes.clear();
        self.node_labels.clear();
        self.edges_to_create.clear();
        self.created_edges.clear();
    }
}
