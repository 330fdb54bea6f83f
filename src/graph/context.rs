//! Schema lookup and the scoped sync-policy guard. Grounded on spec.md §6's
//! `GraphContext` interface (`GetSchema`, `GetSchemaByID`, `AddSchema`) and
//! on §9's redesign note to pass sync policy explicitly rather than as
//! ambient mutable state.

use super::store::GraphStore;
use crate::matrix::SyncPolicy;
use crate::schema::{Schema, SchemaId, SchemaKind};
use indexmap::IndexMap;
use smol_str::SmolStr;

pub trait SchemaRegistry {
    fn get_schema(&self, name: &str, kind: SchemaKind) -> Option<SchemaId>;
    fn get_schema_by_id(&self, id: SchemaId, kind: SchemaKind) -> Option<&Schema>;
    fn get_schema_by_id_mut(&mut self, id: SchemaId, kind: SchemaKind) -> Option<&mut Schema>;
    /// Creates a schema with a freshly assigned id if `name` is not
    /// already registered for `kind`; otherwise returns the existing id.
    fn get_or_add_schema(&mut self, name: &str, kind: SchemaKind) -> SchemaId;
}

/// Stable insertion-ordered id assignment, the same rationale the teacher
/// gives `circuit_indexmap.rs` for using `indexmap::IndexMap`: O(1) lookup
/// plus a dense index usable directly as a matrix dimension.
#[derive(Debug, Default)]
pub struct InMemorySchemaRegistry {
    node_schemas: IndexMap<SmolStr, Schema>,
    relation_schemas: IndexMap<SmolStr, Schema>,
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: SchemaKind) -> &IndexMap<SmolStr, Schema> {
        match kind {
            SchemaKind::Node => &self.node_schemas,
            SchemaKind::Relation => &self.relation_schemas,
        }
    }

    fn table_mut(&mut self, kind: SchemaKind) -> &mut IndexMap<SmolStr, Schema> {
        match kind {
            SchemaKind::Node => &mut self.node_schemas,
            SchemaKind::Relation => &mut self.relation_schemas,
        }
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn get_schema(&self, name: &str, kind: SchemaKind) -> Option<SchemaId> {
        self.table(kind).get(name).map(Schema::id)
    }

    fn get_schema_by_id(&self, id: SchemaId, kind: SchemaKind) -> Option<&Schema> {
        self.table(kind).values().find(|s| s.id() == id)
    }

    fn get_schema_by_id_mut(&mut self, id: SchemaId, kind: SchemaKind) -> Option<&mut Schema> {
        self.table_mut(kind).values_mut().find(|s| s.id() == id)
    }

    fn get_or_add_schema(&mut self, name: &str, kind: SchemaKind) -> SchemaId {
        if let Some(id) = self.get_schema(name, kind) {
            return id;
        }
        let id = self.table(kind).len() as SchemaId;
        let schema = Schema::new(id, name, kind);
        self.table_mut(kind).insert(SmolStr::new(name), schema);
        id
    }
}

/// Bundles the schema registry and the graph's matrix/id-allocation
/// surface behind a single handle, matching spec.md §6's description of
/// `GraphContext` as holding a shared `Graph` handle alongside schema
/// lookups. Held behind the write lock by `QueryCtx`.
pub struct GraphContext<R: SchemaRegistry, S: GraphStore> {
    pub schemas: R,
    pub store: S,
}

impl<R: SchemaRegistry, S: GraphStore> GraphContext<R, S> {
    pub fn new(schemas: R, store: S) -> Self {
        GraphContext { schemas, store }
    }
}

/// Runs `f` with the store's matrix sync policy temporarily set to
/// `policy`, restoring the previous policy on every exit path — including
/// panics, via `catch_unwind` — instead of the original's goto-cleanup.
pub fn with_sync_policy<S, R>(store: &mut S, policy: SyncPolicy, f: impl FnOnce(&mut S) -> R) -> R
where
    S: GraphStore + ?Sized,
{
    let previous = store.matrix_policy();
    store.set_matrix_policy(policy);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(store)));
    store.set_matrix_policy(previous);
    match result {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
