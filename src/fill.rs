//! [`Mapped`] to record: the field setter.
//!
//! Every non-null entry is routed to the field that publishes its key and
//! reconciled with the field's declared shape. A field that cannot take its
//! value is reported and skipped; the remaining entries are still assigned,
//! and all failures come back together in one [`MappingError::Fields`].

use chrono::DateTime;
use tracing::{debug, trace};

use crate::error::{FieldError, MappingError, Result};
use crate::field::{Field, FieldMut, Shape};
use crate::record::Record;
use crate::tag::locate;
use crate::value::{Mapped, Value};

/// Fills `record` from `mapped`, matching keys to field names.
pub fn fill(record: &mut dyn Record, mapped: &Mapped) -> Result<()> {
    fill_by_key(record, mapped, "")
}

/// Fills `record` from `mapped`, matching keys to the fields' `tag`
/// annotations (field names when `tag` is empty).
pub fn fill_by_key(record: &mut dyn Record, mapped: &Mapped, tag: &str) -> Result<()> {
    let mut setter = Setter::new(tag);
    let assigned = setter.record(record, mapped, "");
    debug!(
        record = record.type_name(),
        tag,
        assigned,
        failed = setter.failures.len(),
        "filled"
    );
    setter.finish()
}

pub(crate) struct Setter<'t> {
    tag: &'t str,
    pub(crate) failures: Vec<FieldError>,
}

impl<'t> Setter<'t> {
    pub(crate) fn new(tag: &'t str) -> Self {
        Self {
            tag,
            failures: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(MappingError::Fields(self.failures))
        }
    }

    /// Assigns every entry of `mapped` that has a matching field and returns
    /// how many were assigned.
    pub(crate) fn record(&mut self, record: &mut dyn Record, mapped: &Mapped, prefix: &str) -> usize {
        // sorted so that failure reports come out in a stable order
        let mut keys: Vec<&String> = mapped.keys().collect();
        keys.sort();
        let descriptors = record.descriptors();
        let mut assigned = 0;
        for key in keys {
            let value = &mapped[key];
            if value.is_null() {
                continue;
            }
            let Some(index) = locate(descriptors, key, self.tag) else {
                trace!(key = key.as_str(), tag = self.tag, "no matching field");
                continue;
            };
            let path = join_path(prefix, key);
            if !descriptors[index].settable {
                self.failures.push(FieldError::Unsettable { field: path });
                continue;
            }
            let Some(field) = record.field_mut(index) else {
                continue;
            };
            if self.assign(field, value, &path) {
                assigned += 1;
            }
        }
        assigned
    }

    fn assign(&mut self, field: &mut dyn Field, value: &Value, path: &str) -> bool {
        let shape = field.shape();
        match (&shape, value) {
            (Shape::Custom, _) => self.decode(field, value, path),
            (Shape::Temporal, _) => self.temporal(field, value, path),
            (pointer, Value::Map(nested)) if pointer.is_pointer_to(&Shape::Record) => {
                self.nested_pointer(field, nested, path)
            }
            // nested records are rebuilt from zero, not patched
            (Shape::Record, Value::Map(nested)) => {
                if let FieldMut::Record(record) = field.reflect_mut() {
                    record.reset();
                    self.record(record, nested, path);
                }
                true
            }
            (Shape::Sequence(_), Value::Seq(items)) => self.sequence(field, items, path),
            (Shape::Pointer(_), _) => self.through_pointer(field, value, path),
            _ => self.exact(field, value, path, &shape),
        }
    }

    fn decode(&mut self, field: &mut dyn Field, value: &Value, path: &str) -> bool {
        let FieldMut::Custom(custom) = field.reflect_mut() else {
            return self.mismatch(path, value, &Shape::Custom);
        };
        match custom.decode(value) {
            Ok(()) => true,
            Err(error) => {
                self.failures.push(FieldError::Capability {
                    field: path.to_owned(),
                    message: error.to_string(),
                });
                false
            }
        }
    }

    fn temporal(&mut self, field: &mut dyn Field, value: &Value, path: &str) -> bool {
        let moment = match value {
            Value::Time(moment) => *moment,
            Value::Text(text) => match DateTime::parse_from_rfc3339(text) {
                Ok(moment) => moment,
                Err(source) => {
                    self.failures.push(FieldError::Temporal {
                        field: path.to_owned(),
                        source,
                    });
                    return false;
                }
            },
            other => return self.mismatch(path, other, &Shape::Temporal),
        };
        match field.reflect_mut() {
            FieldMut::Temporal(slot) => {
                slot.set(moment);
                true
            }
            _ => self.mismatch(path, value, &Shape::Temporal),
        }
    }

    // The pointee only stays attached if something was assigned into it.
    fn nested_pointer(&mut self, field: &mut dyn Field, nested: &Mapped, path: &str) -> bool {
        if let FieldMut::Pointer(pointer) = field.reflect_mut() {
            let assigned = match pointer.insert_zero().reflect_mut() {
                FieldMut::Record(record) => self.record(record, nested, path),
                _ => 0,
            };
            if assigned == 0 {
                pointer.clear();
            }
        }
        true
    }

    // A failed assignment leaves the pointer unset.
    fn through_pointer(&mut self, field: &mut dyn Field, value: &Value, path: &str) -> bool {
        let FieldMut::Pointer(pointer) = field.reflect_mut() else {
            return false;
        };
        let assigned = self.assign(pointer.insert_zero(), value, path);
        if !assigned {
            pointer.clear();
        }
        assigned
    }

    fn sequence(&mut self, field: &mut dyn Field, items: &[Value], path: &str) -> bool {
        let FieldMut::Sequence(sequence) = field.reflect_mut() else {
            return false;
        };
        let before = self.failures.len();
        sequence.clear();
        for (index, item) in items.iter().enumerate() {
            let element = sequence.push_zero();
            self.element(element, item, &format!("{}[{}]", path, index));
        }
        self.failures.len() == before
    }

    // Sequence elements may be null (left at zero) and numeric elements
    // widen within their family.
    fn element(&mut self, element: &mut dyn Field, item: &Value, path: &str) -> bool {
        if item.is_null() {
            return true;
        }
        let shape = element.shape();
        let scalar = match &shape {
            Shape::Scalar(_) => true,
            Shape::Pointer(pointee) => pointee.is_scalar(),
            _ => false,
        };
        if !scalar {
            return self.assign(element, item, path);
        }
        let widened = match element.reflect_mut() {
            FieldMut::Scalar(slot) => slot.set_widened(item),
            FieldMut::Pointer(pointer) => {
                let set = match pointer.insert_zero().reflect_mut() {
                    FieldMut::Scalar(slot) => slot.set_widened(item),
                    _ => false,
                };
                if !set {
                    pointer.clear();
                }
                set
            }
            _ => false,
        };
        if widened {
            true
        } else {
            self.mismatch(path, item, &shape)
        }
    }

    fn exact(&mut self, field: &mut dyn Field, value: &Value, path: &str, shape: &Shape) -> bool {
        let assigned = match field.reflect_mut() {
            FieldMut::Scalar(slot) => slot.set_exact(value),
            FieldMut::Record(record) => record.assign_same(value),
            _ => false,
        };
        if assigned {
            trace!(field = path, "assigned");
            true
        } else {
            self.mismatch(path, value, shape)
        }
    }

    fn mismatch(&mut self, path: &str, value: &Value, expected: &Shape) -> bool {
        self.failures.push(FieldError::Mismatch {
            field: path.to_owned(),
            value: format!("{} {}", value.type_name(), value),
            expected: expected.to_string(),
        });
        false
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{}.{}", prefix, key)
    }
}
