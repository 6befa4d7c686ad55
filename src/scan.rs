//! Row-scan adapter.
//!
//! Bridges a tabular row to a record: a placeholder typed after each selected
//! field is handed to the row, the row populates them in order, and the
//! scanned cells are pushed back through [`fill_by_key`](crate::fill_by_key)
//! under the same annotation key.

use tracing::debug;

use crate::capability::CapabilityError;
use crate::error::{FieldError, Result};
use crate::field::{FieldRef, Shape};
use crate::fill::Setter;
use crate::record::Record;
use crate::tag::locate;
use crate::value::{Mapped, ScalarKind, Value};

/// A source of one row of data.
///
/// Implementations must populate every placeholder, in order, or fail. The
/// slice always has exactly one placeholder per selected key.
pub trait ScanRow {
    fn scan(&self, placeholders: &mut [Placeholder]) -> Result<()>;
}

/// What a placeholder expects the row to put into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Scalar(ScalarKind),
    Temporal,
    /// Any raw cell; the field converts it itself.
    Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    target: Target,
    nullable: bool,
    cell: Value,
}

impl Placeholder {
    pub fn new(target: Target, nullable: bool) -> Self {
        Self {
            target,
            nullable,
            cell: Value::Null,
        }
    }
    /// The placeholder matching a field of `shape`.
    pub fn for_shape(shape: &Shape) -> Self {
        let nullable = matches!(shape, Shape::Pointer(_));
        let target = match shape.pointee() {
            Shape::Scalar(kind) => Target::Scalar(*kind),
            Shape::Temporal => Target::Temporal,
            _ => Target::Generic,
        };
        Self::new(target, nullable)
    }
    pub fn target(&self) -> Target {
        self.target
    }
    /// Whether the row may leave this placeholder null.
    pub fn is_nullable(&self) -> bool {
        self.nullable || self.target == Target::Generic
    }
    pub fn put(&mut self, cell: impl Into<Value>) {
        self.cell = cell.into();
    }
    pub fn cell(&self) -> &Value {
        &self.cell
    }
    pub fn into_cell(self) -> Value {
        self.cell
    }
}

/// Reads one row into `record`.
///
/// `selectors` names the keys (under `tag`) to scan, in the row's column
/// order. An empty list or a lone `"*"` selects every field visible under
/// `tag` in declaration order. A failing row read aborts immediately; field
/// level failures afterwards are collected like [`fill_by_key`](crate::fill_by_key) does.
pub fn scan_row<R>(row: &R, record: &mut dyn Record, tag: &str, selectors: &[&str]) -> Result<()>
where
    R: ScanRow + ?Sized,
{
    let keys = selected_keys(record, tag, selectors);
    let mut placeholders: Vec<Placeholder> = keys
        .iter()
        .map(|key| match shape_of(record, tag, key) {
            Some(shape) => Placeholder::for_shape(&shape),
            None => Placeholder::new(Target::Generic, true),
        })
        .collect();
    row.scan(&mut placeholders)?;

    let mut setter = Setter::new(tag);
    let mut scanned = Mapped::default();
    for (key, placeholder) in keys.into_iter().zip(placeholders) {
        match restore(record, tag, &key, placeholder) {
            Ok(value) => {
                scanned.insert(key, value);
            }
            Err(failure) => setter.failures.push(failure),
        }
    }
    let assigned = setter.record(record, &scanned, "");
    debug!(
        record = record.type_name(),
        tag,
        columns = scanned.len(),
        assigned,
        failed = setter.failures.len(),
        "scanned row"
    );
    setter.finish()
}

fn selected_keys(record: &dyn Record, tag: &str, selectors: &[&str]) -> Vec<String> {
    match selectors {
        [] | ["*"] => record
            .descriptors()
            .iter()
            .filter_map(|descriptor| descriptor.resolve(tag))
            .map(str::to_owned)
            .collect(),
        explicit => explicit.iter().map(|key| (*key).to_owned()).collect(),
    }
}

// `None` for unknown keys; they still take a generic placeholder so the
// row's column count lines up.
fn shape_of(record: &dyn Record, tag: &str, key: &str) -> Option<Shape> {
    locate(record.descriptors(), key, tag)
        .and_then(|index| record.field(index))
        .map(|field| field.shape())
}

// Inverse of the placeholder: typed cells are taken as they are, while a
// self converting field scans the raw cell into a fresh instance and
// contributes whatever that instance encodes to.
fn restore(
    record: &dyn Record,
    tag: &str,
    key: &str,
    placeholder: Placeholder,
) -> std::result::Result<Value, FieldError> {
    let cell = placeholder.into_cell();
    if cell.is_null() {
        return Ok(cell);
    }
    let Some(field) = locate(record.descriptors(), key, tag).and_then(|index| record.field(index)) else {
        return Ok(cell);
    };
    let mut view = field.reflect();
    while let FieldRef::Pointer(Some(pointee)) = view {
        view = pointee.reflect();
    }
    // an unset pointer has no instance to scan into; the raw cell goes
    // through and the fill decodes it into a fresh pointee
    let FieldRef::Custom(custom) = view else {
        return Ok(cell);
    };
    let mut fresh = custom.blank();
    let capability = |error: CapabilityError| FieldError::Capability {
        field: key.to_owned(),
        message: error.to_string(),
    };
    fresh.decode(&cell).map_err(capability)?;
    fresh.encode().map_err(capability)
}
