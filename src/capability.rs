//! Opt-out hooks for types that convert themselves.
//!
//! A field type implementing [`Encoder`] and [`Decoder`] is never traversed
//! structurally; the mapping engine hands it the whole value instead. Wire it
//! in with [`custom_field!`](crate::custom_field!).

use std::fmt;

use thiserror::Error;

use crate::value::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self(message.to_string())
    }
}
impl From<String> for CapabilityError {
    fn from(message: String) -> Self {
        Self(message)
    }
}
impl From<&str> for CapabilityError {
    fn from(message: &str) -> Self {
        Self(message.to_owned())
    }
}

pub trait Encoder {
    fn encode(&self) -> Result<Value, CapabilityError>;
}

pub trait Decoder {
    fn decode(&mut self, value: &Value) -> Result<(), CapabilityError>;
}

/// A self converting field type.
pub trait Custom: Encoder + Decoder {
    /// A fresh zero instance of the same type, used as a scan target.
    fn blank(&self) -> Box<dyn Custom>;
}

/// Registers a `Default` type implementing [`Encoder`] and [`Decoder`] as a
/// field type.
#[macro_export]
macro_rules! custom_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Custom for $ty {
                fn blank(&self) -> ::std::boxed::Box<dyn $crate::Custom> {
                    ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
                }
            }
            impl $crate::Field for $ty {
                fn declared_shape() -> $crate::Shape {
                    $crate::Shape::Custom
                }
                fn shape(&self) -> $crate::Shape {
                    $crate::Shape::Custom
                }
                fn reflect(&self) -> $crate::FieldRef<'_> {
                    $crate::FieldRef::Custom(self)
                }
                fn reflect_mut(&mut self) -> $crate::FieldMut<'_> {
                    $crate::FieldMut::Custom(self)
                }
            }
        )+
    };
}

/// Stores the raw value untouched; handy for fields that just need to carry
/// whatever the other side produced (a JSON column, say).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Raw(pub Value);

impl Encoder for Raw {
    fn encode(&self) -> Result<Value, CapabilityError> {
        Ok(self.0.clone())
    }
}
impl Decoder for Raw {
    fn decode(&mut self, value: &Value) -> Result<(), CapabilityError> {
        self.0 = value.clone();
        Ok(())
    }
}
crate::custom_field!(Raw);
