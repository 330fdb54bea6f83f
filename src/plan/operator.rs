//! The operator function-vector contract and reset propagation. Grounded
//! on `op.c`'s `OpBase` struct and its `PropagateReset`, with the bug
//! spec.md §9 flags (resetting the root once per writer instead of each
//! writer) deliberately not reproduced.

use super::record::Record;
use crate::error::EngineResult;
use smol_str::SmolStr;

/// A closed capability set, mapped from the original's function vector onto
/// a trait. `init`/`reset`/`is_writer`/`modifies`/`to_string_line` have
/// sensible defaults; every operator must supply `consume`, report whether
/// it is a writer via `is_writer` when it is one, and implement `clone_op`
/// itself, since only the concrete operator knows its own state. `profile`
/// (spec.md §4.5's consume wrapper that accumulates row counts and elapsed
/// time) is not a trait method — it is `ProfileStats::profile` below, a
/// free-standing wrapper over any `&mut dyn Operator`, the same shape as
/// `propagate_reset`/`children_aware`.
pub trait Operator: std::fmt::Debug {
    /// One-shot lazy initialization, run before the first `consume`.
    fn init(&mut self) {}

    /// Produces the next output record, or `None` on exhaustion.
    fn consume(&mut self) -> Option<Record>;

    /// Rewinds so a subsequent `consume` sequence re-emits from the start.
    fn reset(&mut self) -> EngineResult<()> {
        Ok(())
    }

    /// True for operators whose `consume` has a side effect on the graph
    /// (create/update/delete/merge). Determines reset ordering.
    fn is_writer(&self) -> bool {
        false
    }

    /// Aliases this operator writes into outgoing records.
    fn modifies(&self) -> &[SmolStr] {
        &[]
    }

    fn children(&self) -> &[Box<dyn Operator>];
    fn children_mut(&mut self) -> &mut Vec<Box<dyn Operator>>;

    fn to_string_line(&self) -> String {
        format!("{self:?}")
    }

    /// Structural deep copy under a new plan (spec.md §4.5's `clone(plan,
    /// op) → op'`). Each concrete operator supplies its own clone, since its
    /// operator-specific state is opaque to the trait; the copy must
    /// recursively clone `children` too.
    fn clone_op(&self) -> Box<dyn Operator>;
}

/// Row-count and elapsed-time accounting for a `consume` wrapper
/// (spec.md §4.5's `profile(op) → Record`). Accumulates across repeated
/// calls against the same operator, the way a plan's per-operator stats
/// accumulate across the whole query's execution.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileStats {
    pub rows_produced: u64,
    pub elapsed: std::time::Duration,
}

impl ProfileStats {
    /// Wraps `op.consume()`, timing the call and incrementing the row count
    /// when it yields a record.
    pub fn profile(&mut self, op: &mut dyn Operator) -> Option<Record> {
        let start = std::time::Instant::now();
        let record = op.consume();
        self.elapsed += start.elapsed();
        if record.is_some() {
            self.rows_produced += 1;
        }
        record
    }
}

/// Common bookkeeping every concrete operator embeds: whether `init` has
/// run, row/elapsed-time statistics for `profile`, and the owned child
/// list. Concrete operators hold one of these and delegate the shared
/// parts of the contract to it.
#[derive(Debug, Default)]
pub struct OperatorBase {
    pub name: SmolStr,
    pub initialized: bool,
    pub children: Vec<Box<dyn Operator>>,
    pub rows_produced: u64,
}

impl OperatorBase {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        OperatorBase { name: name.into(), initialized: false, children: Vec::new(), rows_produced: 0 }
    }
}

/// Traverses the subtree rooted at `root`, resetting every non-writer
/// immediately and every writer only after the whole traversal completes.
/// Writers may enqueue work that reads upstream state, so resetting
/// readers first guarantees writers observe freshly-reset readers. Two
/// passes rather than one deferred list: simpler than collecting raw
/// pointers into the subtree, at the cost of walking the tree twice.
pub fn propagate_reset(root: &mut dyn Operator) -> EngineResult<()> {
    reset_readers(root)?;
    reset_writers(root)
}

fn reset_readers(op: &mut dyn Operator) -> EngineResult<()> {
    for child in op.children_mut() {
        reset_readers(child.as_mut())?;
    }
    if !op.is_writer() {
        op.reset()?;
    }
    Ok(())
}

fn reset_writers(op: &mut dyn Operator) -> EngineResult<()> {
    for child in op.children_mut() {
        reset_writers(child.as_mut())?;
    }
    if op.is_writer() {
        op.reset()?;
    }
    Ok(())
}

/// True if any descendant of `op` (structurally, within the same plan)
/// declares `alias` via its `modifies` list. Distinct from
/// `ExecutionPlan::aware`, which is a plan-wide lookup rather than a
/// structural proof.
pub fn children_aware(op: &dyn Operator, alias: &str) -> bool {
    op.children().iter().any(|child| {
        child.modifies().iter().any(|m| m == alias) || children_aware(child.as_ref(), alias)
    })
}
