//! Expression evaluation and property-map conversion. Grounded on
//! `create_functions.c`'s `ConvertPropertyMap` and spec.md §4.4: evaluate
//! each `(key, expression)` pair against the source record, reject
//! non-permitted value types, and resolve each key to an attribute id.

use crate::attribute_registry::AttributeRegistry;
use crate::attribute_set::AttributeSet;
use crate::error::{EngineError, EngineResult};
use crate::plan::Record;
use crate::query_ctx::ErrorSink;
use crate::value::PropertyValue;
use smol_str::SmolStr;

/// The external expression evaluator's contract (`AR_EXP_Evaluate`):
/// evaluate an opaque expression against a record, fallibly.
pub trait Expression: std::fmt::Debug {
    fn evaluate(&self, record: &Record) -> EngineResult<PropertyValue>;
}

pub type PropertyMap = Vec<(SmolStr, Box<dyn Expression>)>;

/// Evaluates every `(key, expression)` pair against `record`, building an
/// `AttributeSet` out of the results.
///
/// - A non-null result failing `is_valid_property_value` (including an
///   array containing a non-permitted element) raises `InvalidPropertyValue`.
/// - A null result raises `NullInMerge` when `fail_on_null`, otherwise the
///   pair is skipped.
/// - Any raise unwinds through `?` before an `AttributeSet` is built, so
///   partial results are simply dropped — no staged buffer to free by hand.
#[tracing::instrument(skip(registry, properties, record), fields(property_count = properties.len()))]
pub fn convert_property_map(
    registry: &mut AttributeRegistry,
    properties: &PropertyMap,
    record: &Record,
    fail_on_null: bool,
) -> EngineResult<AttributeSet> {
    let mut ids = Vec::with_capacity(properties.len());
    let mut values = Vec::with_capacity(properties.len());

    for (key, expr) in properties {
        let value = expr.evaluate(record)?;

        if value.is_null() {
            if fail_on_null {
                tracing::debug!(%key, "null property rejected, fail_on_null is set");
                return Err(EngineError::NullInMerge);
            }
            tracing::trace!(%key, "skipping null property");
            continue;
        }

        if !value.is_valid_property_value() {
            tracing::debug!(%key, "property value is not of a permitted type");
            return Err(EngineError::InvalidPropertyValue);
        }

        ids.push(registry.get_or_add(key));
        values.push(value);
    }

    let mut attrs = AttributeSet::empty();
    attrs.add_no_clone(&ids, values, false);
    Ok(attrs)
}

/// As `convert_property_map`, but downgrades a raised error into a display
/// string recorded on `errors` instead of propagating it, for callers that
/// follow the commit pipeline's "record and continue" error policy rather
/// than unwinding. `anyhow` supplies the generic "any error to a message"
/// conversion, the same role it plays at the teacher's own service
/// boundary (`service.rs`'s `anyhow::{anyhow, Result}` usage).
pub fn convert_property_map_or_record_error(
    registry: &mut AttributeRegistry,
    properties: &PropertyMap,
    record: &Record,
    fail_on_null: bool,
    errors: &mut dyn ErrorSink,
) -> Option<AttributeSet> {
    match convert_property_map(registry, properties, record, fail_on_null) {
        Ok(attrs) => Some(attrs),
        Err(err) => {
            errors.set_error(anyhow::Error::new(err).to_string());
            None
        }
    }
}
