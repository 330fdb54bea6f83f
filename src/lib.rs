//! Operator-tree execution runtime and delta sparse-matrix core for a
//! property graph. See `DESIGN.md` for the module-by-module grounding in
//! the retrieval pack this crate is generalized from.

pub mod attribute_registry;
pub mod attribute_set;
pub mod commit;
pub mod convert;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod pending;
pub mod plan;
pub mod query_ctx;
pub mod schema;
pub mod value;

mod collections;

pub use attribute_set::{AttributeId, AttributeSet, AttributeSetChange};
pub use commit::{commit, CommitReport};
pub use convert::{convert_property_map, convert_property_map_or_record_error, Expression, PropertyMap};
pub use error::{EngineError, EngineResult};
pub use pending::{CreatedEdge, CreatedNode, EdgeBlueprint, NodeBlueprint, PendingCreations};
pub use query_ctx::{DefaultErrorSink, ErrorSink, QueryCtx};
pub use schema::{Constraint, ConstraintContext, MandatoryConstraint, Schema, SchemaId, SchemaKind, UniqueConstraint};
pub use value::{EdgeId, NodeId, PropertyValue};
