mod execution_plan;
mod operator;
mod record;

pub use execution_plan::{ExecutionPlan, SlotId};
pub use operator::{children_aware, propagate_reset, Operator, OperatorBase};
pub use record::{Record, RecordPool, Slot};
