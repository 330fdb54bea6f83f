//! Tagged scalar values flowing through records and attribute sets.
//!
//! `PropertyValue` is the crate's `SIValue`: a superset of what may be
//! persisted as an entity attribute. The "valid property value" subset
//! (null, bool, int, double, string, and arrays composed only of those) is
//! what `ConvertPropertyMap` and `AttributeSet::add*` accept; node/edge
//! references, paths, and maps are legitimate values elsewhere (e.g. as the
//! result of evaluating an expression) but are rejected as attributes.

use smol_str::SmolStr;
use std::sync::Arc;

pub type NodeId = u64;
pub type EdgeId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int64(i64),
    Double(f64),
    Str(SmolStr),
    Array(Arc<Vec<PropertyValue>>),
    NodeRef(NodeId),
    EdgeRef(EdgeId),
    Path(Arc<Vec<PropertyValue>>),
    Map(Arc<Vec<(SmolStr, PropertyValue)>>),
}

impl Default for PropertyValue {
    fn default() -> Self {
        PropertyValue::Null
    }
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// True for the subset of values a graph entity may carry as a
    /// property: null, bool, int64, double, string, or an array composed
    /// entirely of (recursively) valid property values.
    pub fn is_valid_property_value(&self) -> bool {
        match self {
            PropertyValue::Null
            | PropertyValue::Bool(_)
            | PropertyValue::Int64(_)
            | PropertyValue::Double(_)
            | PropertyValue::Str(_) => true,
            PropertyValue::Array(items) => items.iter().all(Self::is_valid_property_value),
            PropertyValue::NodeRef(_)
            | PropertyValue::EdgeRef(_)
            | PropertyValue::Path(_)
            | PropertyValue::Map(_) => false,
        }
    }
}
