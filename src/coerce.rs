// Outbound conversion of a single field value, shape by shape.
use tracing::warn;

use crate::field::{Field, FieldRef};
use crate::snapshot;
use crate::value::Value;

/// Converts a field into its snapshot value under annotation key `tag`.
///
/// Absent pointers become null, self converting types encode themselves
/// (degrading to null on failure), temporals pass through, records nest,
/// pointers unwrap and sequences convert element by element.
pub fn coerce(field: &dyn Field, tag: &str) -> Value {
    match field.reflect() {
        FieldRef::Pointer(None) => Value::Null,
        FieldRef::Custom(custom) => match custom.encode() {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, shape = %field.shape(), "encoder failed, storing null");
                Value::Null
            }
        },
        FieldRef::Temporal(moment) => Value::Time(moment),
        FieldRef::Record(record) => Value::Map(snapshot::map(record, tag)),
        FieldRef::Pointer(Some(pointee)) => coerce(pointee, tag),
        FieldRef::Sequence(items) => Value::Seq(
            items
                .into_iter()
                .map(|item| coerce(item, tag))
                .collect(),
        ),
        FieldRef::Scalar(value) => value,
    }
}
