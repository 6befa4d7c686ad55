// used for reading rows out of SQLite
use rusqlite::Row;
use rusqlite::types::{FromSql, ValueRef};

// used for the temporal placeholders
use chrono::{DateTime, FixedOffset};

use crate::error::{MappingError, Result};
use crate::scan::{Placeholder, ScanRow, Target};
use crate::value::{ScalarKind, Value};

/// A SQLite result row populates placeholders column by column; the
/// statement must select exactly one column per placeholder.
impl ScanRow for Row<'_> {
    fn scan(&self, placeholders: &mut [Placeholder]) -> Result<()> {
        let columns = self.as_ref().column_count();
        if columns != placeholders.len() {
            return Err(MappingError::Row(format!(
                "row has {} columns but {} fields were selected",
                columns,
                placeholders.len()
            )));
        }
        for (index, placeholder) in placeholders.iter_mut().enumerate() {
            let cell = self.get_ref(index)?;
            let value = convert(cell, placeholder).map_err(|e| match e {
                MappingError::Row(message) => MappingError::Row(format!("column {}: {}", index, message)),
                other => other,
            })?;
            placeholder.put(value);
        }
        Ok(())
    }
}

fn convert(cell: ValueRef<'_>, placeholder: &Placeholder) -> Result<Value> {
    if let ValueRef::Null = cell {
        if placeholder.is_nullable() {
            return Ok(Value::Null);
        }
        return Err(MappingError::Row("NULL in a column whose field is not nullable".into()));
    }
    let value = match placeholder.target() {
        Target::Scalar(kind) => scalar(cell, kind)?,
        Target::Temporal => Value::Time(DateTime::<FixedOffset>::column_result(cell)?),
        Target::Generic => raw(cell),
    };
    Ok(value)
}

fn scalar(cell: ValueRef<'_>, kind: ScalarKind) -> Result<Value> {
    let value = match kind {
        ScalarKind::Bool => Value::Bool(cell.as_i64()? != 0),
        ScalarKind::I8 => Value::I8(integer(cell)?),
        ScalarKind::I16 => Value::I16(integer(cell)?),
        ScalarKind::I32 => Value::I32(integer(cell)?),
        ScalarKind::I64 => Value::I64(cell.as_i64()?),
        ScalarKind::U8 => Value::U8(integer(cell)?),
        ScalarKind::U16 => Value::U16(integer(cell)?),
        ScalarKind::U32 => Value::U32(integer(cell)?),
        ScalarKind::U64 => Value::U64(integer(cell)?),
        ScalarKind::F32 => Value::F32(real(cell)? as f32),
        ScalarKind::F64 => Value::F64(real(cell)?),
        ScalarKind::Text => Value::Text(cell.as_str()?.to_owned()),
        ScalarKind::Bytes => Value::Bytes(match cell {
            ValueRef::Text(text) => text.to_vec(),
            other => other.as_blob()?.to_vec(),
        }),
    };
    Ok(value)
}

fn integer<T: TryFrom<i64>>(cell: ValueRef<'_>) -> Result<T> {
    let wide = cell.as_i64()?;
    T::try_from(wide).map_err(|_| MappingError::Row(format!("integer {} out of range", wide)))
}

// SQLite happily stores whole numbers in REAL columns and vice versa.
fn real(cell: ValueRef<'_>) -> Result<f64> {
    match cell {
        ValueRef::Integer(i) => Ok(i as f64),
        other => Ok(other.as_f64()?),
    }
}

fn raw(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::I64(i),
        ValueRef::Real(f) => Value::F64(f),
        ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::Bytes(blob.to_vec()),
    }
}
