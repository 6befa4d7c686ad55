//! Declared shapes and the reflection views the mapping engine dispatches on.
//!
//! Every type that can sit in a record field implements [`Field`]. A field
//! describes its shape statically through [`Field::declared_shape`] (so an
//! unset `Option<T>` still knows what it would hold) and exposes a read view
//! ([`FieldRef`]) for snapshot building and a write view ([`FieldMut`]) for
//! filling.

use std::any::Any;
use std::fmt;
use std::ops;

use chrono::{DateTime, FixedOffset, Utc};

use crate::capability::Custom;
use crate::record::Record;
use crate::value::{ScalarKind, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Scalar(ScalarKind),
    Temporal,
    Record,
    Custom,
    Pointer(Box<Shape>),
    Sequence(Box<Shape>),
}

impl Shape {
    /// Strips any number of pointer layers.
    pub fn pointee(&self) -> &Shape {
        match self {
            Shape::Pointer(inner) => inner.pointee(),
            other => other,
        }
    }
    pub fn is_pointer_to(&self, shape: &Shape) -> bool {
        matches!(self, Shape::Pointer(inner) if **inner == *shape)
    }
    pub fn is_scalar(&self) -> bool {
        matches!(self, Shape::Scalar(_))
    }
}
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shape::Scalar(kind) => write!(f, "{}", kind),
            Shape::Temporal => write!(f, "time"),
            Shape::Record => write!(f, "record"),
            Shape::Custom => write!(f, "custom"),
            Shape::Pointer(inner) => write!(f, "ptr<{}>", inner),
            Shape::Sequence(inner) => write!(f, "seq<{}>", inner),
        }
    }
}

/// Read view over a field.
pub enum FieldRef<'a> {
    Scalar(Value),
    Temporal(DateTime<FixedOffset>),
    Custom(&'a dyn Custom),
    Record(&'a dyn Record),
    Pointer(Option<&'a dyn Field>),
    Sequence(Vec<&'a dyn Field>),
}

/// Write view over a field.
pub enum FieldMut<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Temporal(&'a mut dyn TemporalSlot),
    Custom(&'a mut dyn Custom),
    Record(&'a mut dyn Record),
    Pointer(&'a mut dyn PointerSlot),
    Sequence(&'a mut dyn SequenceSlot),
}

pub trait Field: Any {
    fn declared_shape() -> Shape
    where
        Self: Sized;
    fn shape(&self) -> Shape;
    fn reflect(&self) -> FieldRef<'_>;
    fn reflect_mut(&mut self) -> FieldMut<'_>;
}

pub trait ScalarSlot {
    fn kind(&self) -> ScalarKind;
    /// Assigns only when the value is of exactly this kind.
    fn set_exact(&mut self, value: &Value) -> bool;
    /// Assigns within the value's numeric family (int to int, float to float).
    fn set_widened(&mut self, value: &Value) -> bool;
}

pub trait TemporalSlot {
    fn set(&mut self, moment: DateTime<FixedOffset>);
}

pub trait PointerSlot {
    fn pointee_shape(&self) -> Shape;
    fn get_mut(&mut self) -> Option<&mut dyn Field>;
    /// Replaces whatever is pointed at with a zero pointee and hands it out.
    fn insert_zero(&mut self) -> &mut dyn Field;
    fn clear(&mut self);
}

pub trait SequenceSlot {
    fn element_shape(&self) -> Shape;
    fn clear(&mut self);
    fn push_zero(&mut self) -> &mut dyn Field;
}

// ------------- Scalars -------------
macro_rules! integer_field {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl Field for $ty {
                fn declared_shape() -> Shape {
                    Shape::Scalar(ScalarKind::$variant)
                }
                fn shape(&self) -> Shape {
                    Self::declared_shape()
                }
                fn reflect(&self) -> FieldRef<'_> {
                    FieldRef::Scalar(Value::$variant(*self))
                }
                fn reflect_mut(&mut self) -> FieldMut<'_> {
                    FieldMut::Scalar(self)
                }
            }
            impl ScalarSlot for $ty {
                fn kind(&self) -> ScalarKind {
                    ScalarKind::$variant
                }
                fn set_exact(&mut self, value: &Value) -> bool {
                    match value {
                        Value::$variant(v) => {
                            *self = *v;
                            true
                        }
                        _ => false,
                    }
                }
                fn set_widened(&mut self, value: &Value) -> bool {
                    match value.as_integer().map(<$ty>::try_from) {
                        Some(Ok(v)) => {
                            *self = v;
                            true
                        }
                        _ => false,
                    }
                }
            }
        )*
    };
}
integer_field!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64
);

macro_rules! float_field {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl Field for $ty {
                fn declared_shape() -> Shape {
                    Shape::Scalar(ScalarKind::$variant)
                }
                fn shape(&self) -> Shape {
                    Self::declared_shape()
                }
                fn reflect(&self) -> FieldRef<'_> {
                    FieldRef::Scalar(Value::$variant(*self))
                }
                fn reflect_mut(&mut self) -> FieldMut<'_> {
                    FieldMut::Scalar(self)
                }
            }
            impl ScalarSlot for $ty {
                fn kind(&self) -> ScalarKind {
                    ScalarKind::$variant
                }
                fn set_exact(&mut self, value: &Value) -> bool {
                    match value {
                        Value::$variant(v) => {
                            *self = *v;
                            true
                        }
                        _ => false,
                    }
                }
                fn set_widened(&mut self, value: &Value) -> bool {
                    match value.as_float() {
                        Some(v) => {
                            *self = v as $ty;
                            true
                        }
                        None => false,
                    }
                }
            }
        )*
    };
}
float_field!(f32 => F32, f64 => F64);

// Bool, text and bytes have no family to widen within.
macro_rules! plain_field {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl Field for $ty {
                fn declared_shape() -> Shape {
                    Shape::Scalar(ScalarKind::$variant)
                }
                fn shape(&self) -> Shape {
                    Self::declared_shape()
                }
                fn reflect(&self) -> FieldRef<'_> {
                    FieldRef::Scalar(Value::$variant(self.clone().into()))
                }
                fn reflect_mut(&mut self) -> FieldMut<'_> {
                    FieldMut::Scalar(self)
                }
            }
            impl ScalarSlot for $ty {
                fn kind(&self) -> ScalarKind {
                    ScalarKind::$variant
                }
                fn set_exact(&mut self, value: &Value) -> bool {
                    match value {
                        Value::$variant(v) => {
                            *self = v.clone().into();
                            true
                        }
                        _ => false,
                    }
                }
                fn set_widened(&mut self, value: &Value) -> bool {
                    self.set_exact(value)
                }
            }
        )*
    };
}
plain_field!(bool => Bool, String => Text, Bytes => Bytes);

/// A byte sequence treated as one scalar, the way a blob column is.
///
/// `Vec<u8>` is a sequence of `u8` scalars; wrap it in `Bytes` to have it
/// mapped and scanned as a single value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Bytes {
        Bytes(v)
    }
}
impl From<Bytes> for Vec<u8> {
    fn from(b: Bytes) -> Vec<u8> {
        b.0
    }
}
impl ops::Deref for Bytes {
    type Target = Vec<u8>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ------------- Temporal -------------
impl Field for DateTime<FixedOffset> {
    fn declared_shape() -> Shape {
        Shape::Temporal
    }
    fn shape(&self) -> Shape {
        Shape::Temporal
    }
    fn reflect(&self) -> FieldRef<'_> {
        FieldRef::Temporal(*self)
    }
    fn reflect_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Temporal(self)
    }
}
impl TemporalSlot for DateTime<FixedOffset> {
    fn set(&mut self, moment: DateTime<FixedOffset>) {
        *self = moment;
    }
}

impl Field for DateTime<Utc> {
    fn declared_shape() -> Shape {
        Shape::Temporal
    }
    fn shape(&self) -> Shape {
        Shape::Temporal
    }
    fn reflect(&self) -> FieldRef<'_> {
        FieldRef::Temporal(self.fixed_offset())
    }
    fn reflect_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Temporal(self)
    }
}
impl TemporalSlot for DateTime<Utc> {
    fn set(&mut self, moment: DateTime<FixedOffset>) {
        *self = moment.with_timezone(&Utc);
    }
}

// ------------- Pointers -------------
// `Option<T>` is the nullable pointer; `Box<T>` is plain indirection and
// behaves exactly like the boxed field.
impl<T: Field + Default> Field for Option<T> {
    fn declared_shape() -> Shape {
        Shape::Pointer(Box::new(T::declared_shape()))
    }
    fn shape(&self) -> Shape {
        Self::declared_shape()
    }
    fn reflect(&self) -> FieldRef<'_> {
        FieldRef::Pointer(self.as_ref().map(|inner| inner as &dyn Field))
    }
    fn reflect_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Pointer(self)
    }
}
impl<T: Field + Default> PointerSlot for Option<T> {
    fn pointee_shape(&self) -> Shape {
        T::declared_shape()
    }
    fn get_mut(&mut self) -> Option<&mut dyn Field> {
        self.as_mut().map(|inner| inner as &mut dyn Field)
    }
    fn insert_zero(&mut self) -> &mut dyn Field {
        self.insert(T::default())
    }
    fn clear(&mut self) {
        *self = None;
    }
}

impl<T: Field> Field for Box<T> {
    fn declared_shape() -> Shape {
        T::declared_shape()
    }
    fn shape(&self) -> Shape {
        (**self).shape()
    }
    fn reflect(&self) -> FieldRef<'_> {
        (**self).reflect()
    }
    fn reflect_mut(&mut self) -> FieldMut<'_> {
        (**self).reflect_mut()
    }
}

// ------------- Sequences -------------
impl<T: Field + Default> Field for Vec<T> {
    fn declared_shape() -> Shape {
        Shape::Sequence(Box::new(T::declared_shape()))
    }
    fn shape(&self) -> Shape {
        Self::declared_shape()
    }
    fn reflect(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(|item| item as &dyn Field).collect())
    }
    fn reflect_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Sequence(self)
    }
}
impl<T: Field + Default> SequenceSlot for Vec<T> {
    fn element_shape(&self) -> Shape {
        T::declared_shape()
    }
    fn clear(&mut self) {
        Vec::clear(self);
    }
    fn push_zero(&mut self) -> &mut dyn Field {
        self.push(T::default());
        let last = self.len() - 1;
        &mut self[last]
    }
}
