//! Record to [`Mapped`] snapshots.
//!
//! All builders walk the visible fields in declaration order and skip fields
//! that are not eligible under the requested annotation key.

use tracing::trace;

use crate::coerce::coerce;
use crate::field::FieldRef;
use crate::record::Record;
use crate::value::Mapped;

/// Snapshot of `record` keyed by annotation `tag`, or by field name when
/// `tag` is empty.
pub fn map(record: &dyn Record, tag: &str) -> Mapped {
    let mut result = Mapped::default();
    for (index, descriptor) in record.descriptors().iter().enumerate() {
        let Some(key) = descriptor.resolve(tag) else {
            trace!(field = descriptor.name, tag, "not annotated, skipped");
            continue;
        };
        if let Some(field) = record.field(index) {
            result.insert(key.to_owned(), coerce(field, tag));
        }
    }
    result
}

/// Snapshot of `record` by field name.
pub fn map_fields(record: &dyn Record) -> Mapped {
    map(record, "")
}

/// Like [`map`], but a field lacking `tag` falls back to the first of
/// `fallbacks` it carries. Nested values are resolved under whichever key won.
pub fn map_with_fallback(record: &dyn Record, tag: &str, fallbacks: &[&str]) -> Mapped {
    let mut result = Mapped::default();
    for (index, descriptor) in record.descriptors().iter().enumerate() {
        let Some((key, active)) = descriptor.resolve_with_fallback(tag, fallbacks) else {
            continue;
        };
        if let Some(field) = record.field(index) {
            result.insert(key.to_owned(), coerce(field, active));
        }
    }
    result
}

/// Snapshot that inlines unannotated nested records into the same level.
///
/// A field carrying `tag` is stored under its key. A field without it whose
/// (dereferenced) value is a record has that record's flattened snapshot
/// merged in; anything else is skipped. When two inlined fields resolve to
/// the same key the one visited last wins, silently.
pub fn map_flatten(record: &dyn Record, tag: &str) -> Mapped {
    let mut result = Mapped::default();
    flatten_into(record, tag, &mut result);
    result
}

fn flatten_into(record: &dyn Record, tag: &str, result: &mut Mapped) {
    for (index, descriptor) in record.descriptors().iter().enumerate() {
        let Some(field) = record.field(index) else {
            continue;
        };
        if let Some(key) = descriptor.resolve(tag) {
            result.insert(key.to_owned(), coerce(field, tag));
            continue;
        }
        let mut view = field.reflect();
        while let FieldRef::Pointer(Some(pointee)) = view {
            view = pointee.reflect();
        }
        if let FieldRef::Record(nested) = view {
            flatten_into(nested, tag, result);
        }
    }
}
