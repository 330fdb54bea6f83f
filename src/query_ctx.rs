//! The query-scoped handle that owns the graph's write lock and the
//! cooperative-cancellation error flag. Grounded on spec.md §6's
//! `QueryCtx`/`ErrorCtx` interfaces and §5's concurrency model.

use crate::graph::{GraphContext, GraphStore, SchemaRegistry};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// `ErrorCtx`'s contract: a cooperative-cancellation flag operators
/// consult between row productions. `raise_runtime_exception` in the
/// original is a non-local exit; here callers instead return
/// `Err(EngineError::RuntimeEval(..))` and propagate with `?` — see
/// `convert::convert_property_map`.
pub trait ErrorSink {
    fn set_error(&mut self, message: String);
    fn encountered_error(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

#[derive(Debug, Default)]
pub struct DefaultErrorSink {
    message: Option<String>,
}

impl ErrorSink for DefaultErrorSink {
    fn set_error(&mut self, message: String) {
        if self.message.is_none() {
            self.message = Some(message);
        }
    }

    fn encountered_error(&self) -> bool {
        self.message.is_some()
    }

    fn error_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Bundles the schema registry and graph store behind a writer-exclusive /
/// reader-shared lock, plus the per-query error sink. `parking_lot::RwLock`
/// is used for this hot shared-state lock, the same choice the retrieval
/// pack makes for comparable client/service state elsewhere
/// (`paritytech-parity-substrate`).
pub struct QueryCtx<R: SchemaRegistry, S: GraphStore> {
    graph: RwLock<GraphContext<R, S>>,
    errors: DefaultErrorSink,
}

impl<R: SchemaRegistry, S: GraphStore> QueryCtx<R, S> {
    pub fn new(graph: GraphContext<R, S>) -> Self {
        QueryCtx { graph: RwLock::new(graph), errors: DefaultErrorSink::default() }
    }

    pub fn read_graph(&self) -> RwLockReadGuard<'_, GraphContext<R, S>> {
        self.graph.read()
    }

    /// Acquires the write lock for the duration of a bulk commit. The
    /// guard's `Drop` releases it on every exit path.
    pub fn lock_for_commit(&self) -> RwLockWriteGuard<'_, GraphContext<R, S>> {
        self.graph.write()
    }

    pub fn errors(&self) -> &dyn ErrorSink {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut dyn ErrorSink {
        &mut self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_error_keeps_the_first_message() {
        let mut sink = DefaultErrorSink::default();
        assert!(!sink.encountered_error());
        sink.set_error("first".into());
        sink.set_error("second".into());
        assert_eq!(sink.error_message(), Some("first"));
    }
}
