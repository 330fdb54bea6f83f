//! Entity materialization. Grounded on spec.md §6's `GraphHub` interface
//! (`CreateNode`, `CreateEdge`) and on `create_functions.c`'s `_CommitNodes`
//! / `_CommitEdges`, which call into the equivalent of this trait once per
//! staged entity.

use super::store::GraphStore;
use crate::attribute_set::AttributeSet;
use crate::schema::SchemaId;
use crate::value::{EdgeId, NodeId};

pub trait GraphHub {
    fn create_node(&self, store: &mut dyn GraphStore, id: NodeId, labels: &[SchemaId], attrs: AttributeSet);

    fn create_edge(
        &self,
        store: &mut dyn GraphStore,
        id: EdgeId,
        src: NodeId,
        dst: NodeId,
        relation: SchemaId,
        attrs: AttributeSet,
    );
}

/// The only `GraphHub` this crate ships: plain matrix writes with no event
/// emission. A host wiring in change notifications implements the trait
/// itself rather than extending this one.
#[derive(Debug, Default)]
pub struct DefaultGraphHub;

impl GraphHub for DefaultGraphHub {
    fn create_node(&self, store: &mut dyn GraphStore, id: NodeId, labels: &[SchemaId], attrs: AttributeSet) {
        for &label in labels {
            store.label_matrix_mut(label).set_element(id as u32, id as u32, ());
            store.node_label_matrix_mut().set_element(id as u32, label as u32, ());
        }
        store.set_node_attributes(id, attrs);
    }

    fn create_edge(
        &self,
        store: &mut dyn GraphStore,
        id: EdgeId,
        src: NodeId,
        dst: NodeId,
        relation: SchemaId,
        attrs: AttributeSet,
    ) {
        store.relation_matrix_mut(relation).set_element(src as u32, dst as u32, id);
        store.adjacency_matrix_mut().set_element(src as u32, dst as u32, id);
        store.set_edge_attributes(id, attrs);
    }
}
