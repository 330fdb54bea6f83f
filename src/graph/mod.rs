mod context;
mod hub;
mod store;

pub use context::{with_sync_policy, GraphContext, InMemorySchemaRegistry, SchemaRegistry};
pub use hub::{DefaultGraphHub, GraphHub};
pub use store::{GraphStore, InMemoryGraphStore};
