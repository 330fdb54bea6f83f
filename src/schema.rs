//! Label and relation-type registry. Grounded on spec.md §3's Schema
//! definition and on `create_functions.c`'s `Schema_EnforceConstraints`
//! call site, which this crate's `Constraint` trait replaces.

use crate::attribute_set::{AttributeId, AttributeSet};
use crate::graph::GraphStore;
use crate::value::NodeId;
use smol_str::SmolStr;

pub type SchemaId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Node,
    Relation,
}

/// Context threaded into a constraint check that needs to compare a
/// candidate entity against entities already materialized under the same
/// schema — e.g. uniqueness. `entity_id` is the candidate's own id; by the
/// time constraints run (see `commit.rs`) it is already installed in
/// `store`, so a scanning constraint must exclude it from its own search.
pub struct ConstraintContext<'a> {
    pub store: &'a dyn GraphStore,
    pub schema_id: SchemaId,
    pub kind: SchemaKind,
    pub entity_id: u64,
}

/// A validator attached to a schema. Returns the violation message owned
/// by the caller — no manual free needed, unlike the original's
/// caller-owned `err_msg` out-parameter.
pub trait Constraint: std::fmt::Debug {
    fn check(&self, attrs: &AttributeSet, ctx: &ConstraintContext) -> Result<(), String>;
}

/// Rejects entities missing one of the named attributes.
#[derive(Debug)]
pub struct MandatoryConstraint {
    pub attribute: AttributeId,
    pub attribute_name: SmolStr,
}

impl Constraint for MandatoryConstraint {
    fn check(&self, attrs: &AttributeSet, _ctx: &ConstraintContext) -> Result<(), String> {
        if attrs.get(self.attribute).is_some() {
            Ok(())
        } else {
            Err(format!("mandatory property \"{}\" is missing", self.attribute_name))
        }
    }
}

/// Rejects a value already held by another materialized entity of the same
/// schema. Scans the label matrix (nodes) or relation matrix (edges) via
/// `GraphStore` for already-committed entities — the same collaborator the
/// blueprint phase uses to resolve schema state, rather than a separate
/// uniqueness index.
#[derive(Debug)]
pub struct UniqueConstraint {
    pub attribute: AttributeId,
    pub attribute_name: SmolStr,
}

impl Constraint for UniqueConstraint {
    fn check(&self, attrs: &AttributeSet, ctx: &ConstraintContext) -> Result<(), String> {
        let Some(value) = attrs.get(self.attribute) else {
            return Ok(());
        };

        let duplicate = match ctx.kind {
            SchemaKind::Node => match ctx.store.label_matrix(ctx.schema_id) {
                Some(labels) => (0..labels.nrows()).any(|id| {
                    id as u64 != ctx.entity_id
                        && labels.extract(id, id)
                        && ctx.store.node_attributes(id as NodeId).and_then(|a| a.get(self.attribute)) == Some(value)
                }),
                None => false,
            },
            SchemaKind::Relation => match ctx.store.relation_matrix(ctx.schema_id) {
                Some(relation) => relation.export().iter().any(|(_, &edge_id)| {
                    edge_id != ctx.entity_id
                        && ctx.store.edge_attributes(edge_id).and_then(|a| a.get(self.attribute)) == Some(value)
                }),
                None => false,
            },
        };

        if duplicate {
            Err(format!("unique constraint violated, \"{}\" value already exists", self.attribute_name))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    id: SchemaId,
    name: SmolStr,
    kind: SchemaKind,
    constraints: Vec<Box<dyn Constraint>>,
}

impl Schema {
    pub fn new(id: SchemaId, name: impl Into<SmolStr>, kind: SchemaKind) -> Self {
        Schema { id, name: name.into(), kind, constraints: Vec::new() }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) {
        self.constraints.push(constraint);
    }

    /// Runs every constraint in registration order, returning the first
    /// violation. Mirrors spec.md §4.3: enforcement stops reporting after
    /// the first violation but does not roll back materialization.
    pub fn enforce_constraints(&self, attrs: &AttributeSet, ctx: &ConstraintContext) -> Result<(), String> {
        for constraint in &self.constraints {
            constraint.check(attrs, ctx)?;
        }
        Ok(())
    }
}
