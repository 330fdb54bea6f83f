//! The pending-creation commit pipeline. Grounded on
//! `create_functions.c`'s `CommitNewEntities`, `_CommitNodesBlueprint` /
//! `_CommitNodes`, and `_CommitEdgesBlueprint` / `_CommitEdges`, and on
//! spec.md §4.3.
//!
//! The caller holds the graph's write lock (`QueryCtx::lock_for_commit`)
//! for the whole call; this function does not acquire or release it.

use crate::graph::{with_sync_policy, GraphContext, GraphHub, GraphStore, SchemaRegistry};
use crate::matrix::SyncPolicy;
use crate::pending::{CreatedEdge, CreatedNode, PendingCreations};
use crate::query_ctx::ErrorSink;
use crate::schema::{ConstraintContext, SchemaKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct CommitReport {
    pub nodes_created: usize,
    pub edges_created: usize,
    pub labels_added: usize,
    pub relations_added: usize,
}

/// Runs the full commit pipeline against `pending`, clearing it on return.
/// Constraint violations do not raise: the first violation's message is
/// recorded on `errors` and enforcement stops being *checked* for
/// subsequent entities in the same phase, but those entities are still
/// materialized, per spec.md §5's ordering guarantee. The caller's
/// transaction layer decides whether to roll back.
#[tracing::instrument(skip_all, fields(
    pending_nodes = pending.nodes_to_create.len(),
    pending_edges = pending.edges_to_create.len(),
))]
pub fn commit<R, S, H>(
    ctx: &mut GraphContext<R, S>,
    hub: &H,
    pending: &mut PendingCreations,
    errors: &mut dyn ErrorSink,
) -> CommitReport
where
    R: SchemaRegistry,
    S: GraphStore,
    H: GraphHub,
{
    let mut report = CommitReport::default();

    if pending.has_pending_nodes() {
        commit_nodes(ctx, hub, pending, errors, &mut report);
    }

    if pending.has_pending_edges() {
        commit_edges(ctx, hub, pending, errors, &mut report);
    }

    // Guaranteed final state: no path through this function returns early,
    // so a plain statement here satisfies the "restore on every exit path"
    // requirement without needing a Drop guard.
    ctx.store.set_matrix_policy(SyncPolicy::FlushResize);

    tracing::debug!(
        nodes_created = report.nodes_created,
        edges_created = report.edges_created,
        labels_added = report.labels_added,
        relations_added = report.relations_added,
        "commit finished"
    );

    pending.clear();
    report
}

#[tracing::instrument(skip_all, fields(count = pending.nodes_to_create.len()))]
fn commit_nodes<R, S, H>(
    ctx: &mut GraphContext<R, S>,
    hub: &H,
    pending: &mut PendingCreations,
    errors: &mut dyn ErrorSink,
    report: &mut CommitReport,
) where
    R: SchemaRegistry,
    S: GraphStore,
    H: GraphHub,
{
    let ids = ctx.store.allocate_nodes(pending.nodes_to_create.len() as u32);

    // Blueprint phase: resolve each pending node's labels to schema ids,
    // registering new schemas as needed, and touch the per-label / node
    // label matrices so they resize to the new node capacity.
    let schemas = &mut ctx.schemas;
    with_sync_policy(&mut ctx.store, SyncPolicy::Resize, |store| {
        for blueprint in &pending.nodes_to_create {
            let mut label_ids = Vec::with_capacity(blueprint.labels.len());
            for label in &blueprint.labels {
                let is_new = schemas.get_schema(label, SchemaKind::Node).is_none();
                let id = schemas.get_or_add_schema(label, SchemaKind::Node);
                if is_new {
                    report.labels_added += 1;
                }
                store.label_matrix_mut(id);
                store.grow_node_label_columns(id);
                label_ids.push(id);
            }
            store.node_label_matrix_mut();
            pending.node_labels.push(label_ids);
        }
    });

    // Materialization phase: no resize/flush work should happen while
    // inserting, since dimensions are already correct from the blueprint
    // phase above.
    ctx.store.set_matrix_policy(SyncPolicy::Nop);

    let mut violation_reported = false;
    for (i, blueprint) in pending.nodes_to_create.iter().enumerate() {
        let id = ids.start + i as u64;
        let labels = &pending.node_labels[i];
        hub.create_node(&mut ctx.store, id, labels, blueprint.attrs.clone());
        report.nodes_created += 1;
        pending.created_nodes.push(CreatedNode { id, attrs: blueprint.attrs.clone() });

        if violation_reported {
            continue;
        }
        for &label_id in labels {
            let Some(schema) = ctx.schemas.get_schema_by_id(label_id, SchemaKind::Node) else {
                continue;
            };
            let constraint_ctx =
                ConstraintContext { store: &ctx.store, schema_id: label_id, kind: SchemaKind::Node, entity_id: id };
            if let Err(message) = schema.enforce_constraints(&blueprint.attrs, &constraint_ctx) {
                tracing::debug!(node = id, %message, "constraint violation, enforcement stops for this phase");
                errors.set_error(message);
                violation_reported = true;
                break;
            }
        }
    }
}

#[tracing::instrument(skip_all, fields(count = pending.edges_to_create.len()))]
fn commit_edges<R, S, H>(
    ctx: &mut GraphContext<R, S>,
    hub: &H,
    pending: &mut PendingCreations,
    errors: &mut dyn ErrorSink,
    report: &mut CommitReport,
) where
    R: SchemaRegistry,
    S: GraphStore,
    H: GraphHub,
{
    let ids = ctx.store.allocate_edges(pending.edges_to_create.len() as u32);

    let mut relation_ids = Vec::with_capacity(pending.edges_to_create.len());
    let schemas = &mut ctx.schemas;
    with_sync_policy(&mut ctx.store, SyncPolicy::Resize, |store| {
        for blueprint in &pending.edges_to_create {
            let is_new = schemas.get_schema(&blueprint.relation, SchemaKind::Relation).is_none();
            let id = schemas.get_or_add_schema(&blueprint.relation, SchemaKind::Relation);
            if is_new {
                report.relations_added += 1;
            }
            store.relation_matrix_mut(id);
            store.adjacency_matrix_mut();
            relation_ids.push(id);
        }
    });

    ctx.store.set_matrix_policy(SyncPolicy::Nop);

    let mut violation_reported = false;
    for (i, blueprint) in pending.edges_to_create.iter().enumerate() {
        let id = ids.start + i as u64;
        let relation = relation_ids[i];
        hub.create_edge(&mut ctx.store, id, blueprint.src, blueprint.dst, relation, blueprint.attrs.clone());
        report.edges_created += 1;
        pending.created_edges.push(CreatedEdge {
            id,
            src: blueprint.src,
            dst: blueprint.dst,
            relation,
            attrs: blueprint.attrs.clone(),
        });

        if violation_reported {
            continue;
        }
        if let Some(schema) = ctx.schemas.get_schema_by_id(relation, SchemaKind::Relation) {
            let constraint_ctx =
                ConstraintContext { store: &ctx.store, schema_id: relation, kind: SchemaKind::Relation, entity_id: id };
            if let Err(message) = schema.enforce_constraints(&blueprint.attrs, &constraint_ctx) {
                tracing::debug!(edge = id, %message, "constraint violation, enforcement stops for this phase");
                errors.set_error(message);
                violation_reported = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_set::AttributeSet;
    use crate::graph::{DefaultGraphHub, InMemoryGraphStore, InMemorySchemaRegistry};
    use crate::pending::{EdgeBlueprint, NodeBlueprint};
    use crate::query_ctx::DefaultErrorSink;
    use crate::schema::MandatoryConstraint;
    use crate::value::PropertyValue;

    fn fresh_ctx() -> GraphContext<InMemorySchemaRegistry, InMemoryGraphStore> {
        GraphContext::new(InMemorySchemaRegistry::new(), InMemoryGraphStore::new())
    }

    #[test]
    fn node_create_with_one_label() {
        let mut ctx = fresh_ctx();
        let hub = DefaultGraphHub;
        let mut pending = PendingCreations::new();
        let mut errors = DefaultErrorSink::default();

        let mut attrs = AttributeSet::empty();
        attrs.add(0, PropertyValue::Str("Ada".into()));
        attrs.add(1, PropertyValue::Int64(36));
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs });

        let report = commit(&mut ctx, &hub, &mut pending, &mut errors);

        assert_eq!(report.nodes_created, 1);
        assert_eq!(report.labels_added, 1);
        let person_id = ctx.schemas.get_schema("Person", SchemaKind::Node).unwrap();
        assert_eq!(person_id, 0);
        assert!(ctx.store.label_matrix_mut(person_id).extract(0, 0));
        assert_eq!(
            ctx.store.node_attributes(0).and_then(|a| a.get(0)),
            Some(&PropertyValue::Str("Ada".into()))
        );
        assert!(!errors.encountered_error());
    }

    #[test]
    fn edge_create_between_two_preceding_nodes() {
        let mut ctx = fresh_ctx();
        let hub = DefaultGraphHub;
        let mut pending = PendingCreations::new();
        let mut errors = DefaultErrorSink::default();

        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: AttributeSet::empty() });
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: AttributeSet::empty() });
        commit(&mut ctx, &hub, &mut pending, &mut errors);

        let mut edge_attrs = AttributeSet::empty();
        edge_attrs.add(0, PropertyValue::Int64(2020));
        pending.stage_edge(EdgeBlueprint { relation: "KNOWS".into(), src: 0, dst: 1, attrs: edge_attrs });
        let report = commit(&mut ctx, &hub, &mut pending, &mut errors);

        assert_eq!(report.edges_created, 1);
        assert_eq!(report.relations_added, 1);
        let knows_id = ctx.schemas.get_schema("KNOWS", SchemaKind::Relation).unwrap();
        assert_eq!(ctx.store.adjacency_matrix_mut().get(0, 1), Some(&0));
        assert_eq!(ctx.store.relation_matrix_mut(knows_id).get(0, 1), Some(&0));
        assert_eq!(
            ctx.store.edge_attributes(0).and_then(|a| a.get(0)),
            Some(&PropertyValue::Int64(2020))
        );
    }

    #[test]
    fn constraint_violation_is_reported_but_does_not_roll_back() {
        let mut ctx = fresh_ctx();
        let hub = DefaultGraphHub;
        let mut pending = PendingCreations::new();
        let mut errors = DefaultErrorSink::default();

        let email_id = 0;
        let schema_id = ctx.schemas.get_or_add_schema("Person", SchemaKind::Node);
        ctx.schemas
            .get_schema_by_id_mut(schema_id, SchemaKind::Node)
            .unwrap()
            .add_constraint(Box::new(MandatoryConstraint { attribute: email_id, attribute_name: "email".into() }));

        let mut with_email = AttributeSet::empty();
        with_email.add(email_id, PropertyValue::Str("x@y".into()));
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: with_email });
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: AttributeSet::empty() });

        let report = commit(&mut ctx, &hub, &mut pending, &mut errors);

        assert_eq!(report.nodes_created, 2, "both nodes are materialized despite the violation");
        assert!(errors.encountered_error());
        assert!(ctx.store.node_attributes(0).is_some());
        assert!(ctx.store.node_attributes(1).is_some());
    }

    #[test]
    fn duplicate_unique_value_is_reported_but_both_nodes_are_materialized() {
        use crate::schema::UniqueConstraint;

        let mut ctx = fresh_ctx();
        let hub = DefaultGraphHub;
        let mut pending = PendingCreations::new();
        let mut errors = DefaultErrorSink::default();

        let email_id = 0;
        let schema_id = ctx.schemas.get_or_add_schema("Person", SchemaKind::Node);
        ctx.schemas
            .get_schema_by_id_mut(schema_id, SchemaKind::Node)
            .unwrap()
            .add_constraint(Box::new(UniqueConstraint { attribute: email_id, attribute_name: "email".into() }));

        let mut first = AttributeSet::empty();
        first.add(email_id, PropertyValue::Str("x@y".into()));
        let mut second = AttributeSet::empty();
        second.add(email_id, PropertyValue::Str("x@y".into()));
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: first });
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: second });

        let report = commit(&mut ctx, &hub, &mut pending, &mut errors);

        assert_eq!(report.nodes_created, 2, "both nodes are materialized despite the violation");
        assert!(errors.encountered_error());
        assert!(ctx.store.node_attributes(0).is_some());
        assert!(ctx.store.node_attributes(1).is_some());
    }

    #[test]
    fn second_distinct_label_schema_does_not_panic() {
        let mut ctx = fresh_ctx();
        let hub = DefaultGraphHub;
        let mut pending = PendingCreations::new();
        let mut errors = DefaultErrorSink::default();

        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: AttributeSet::empty() });
        pending.stage_node(NodeBlueprint { labels: vec!["Company".into()], attrs: AttributeSet::empty() });

        let report = commit(&mut ctx, &hub, &mut pending, &mut errors);

        assert_eq!(report.nodes_created, 2);
        assert_eq!(report.labels_added, 2);
        assert!(!errors.encountered_error());
    }

    #[test]
    fn commit_restores_flush_resize_policy() {
        let mut ctx = fresh_ctx();
        let hub = DefaultGraphHub;
        let mut pending = PendingCreations::new();
        let mut errors = DefaultErrorSink::default();
        pending.stage_node(NodeBlueprint { labels: vec!["Person".into()], attrs: AttributeSet::empty() });
        commit(&mut ctx, &hub, &mut pending, &mut errors);
        assert_eq!(ctx.store.matrix_policy(), SyncPolicy::FlushResize);
        assert!(pending.nodes_to_create.is_empty());
    }
}
