use crate::field::Field;
use crate::value::Value;

/// Static metadata about one visible field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// `(annotation key, annotation value)` pairs, e.g. `("json", "label,omitempty")`.
    pub tags: &'static [(&'static str, &'static str)],
    pub settable: bool,
}

impl FieldDescriptor {
    pub const fn new(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        settable: bool,
    ) -> Self {
        Self {
            name,
            tags,
            settable,
        }
    }
}

/// A structured value with a fixed, statically known set of named fields.
///
/// Implemented through the [`record!`](crate::record!) macro, which builds
/// the descriptor table once per type. Field `i` of [`field`](Record::field)
/// always corresponds to `descriptors()[i]`.
pub trait Record: Field {
    fn descriptors(&self) -> &'static [FieldDescriptor];
    fn field(&self, index: usize) -> Option<&dyn Field>;
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Field>;
    /// Overwrites `self` from an opaque value holding this very record type.
    fn assign_same(&mut self, value: &Value) -> bool;
    /// Puts every field back to its zero value.
    fn reset(&mut self);
    fn type_name(&self) -> &'static str;
}

/// Describes a record type to the mapping engine.
///
/// Only listed fields are visible. Annotations follow the field name inside
/// braces; `#[readonly]` keeps a field visible to snapshots but refuses to
/// fill it.
///
/// ```
/// use tagmap::record;
///
/// #[derive(Debug, Default, Clone)]
/// pub struct Source {
///     pub label: String,
///     pub version: i64,
///     pub secret: String, // not listed, never mapped
/// }
///
/// record!(Source {
///     label { json: "label", api: "general_label" },
///     #[readonly] version { json: "version,omitempty" },
/// });
///
/// let snapshot = tagmap::map(&Source { label: "x".into(), ..Default::default() }, "api");
/// assert_eq!(snapshot.len(), 1);
/// ```
#[macro_export]
macro_rules! record {
    (@settable) => { true };
    (@settable readonly $($rest:ident)*) => { false };
    (@settable $other:ident $($rest:ident)*) => { $crate::record!(@settable $($rest)*) };

    ($ty:ty {
        $(
            $(#[$flag:ident])*
            $field:ident $({ $($tag:ident : $value:literal),* $(,)? })?
        ),* $(,)?
    }) => {
        impl $crate::Record for $ty {
            fn descriptors(&self) -> &'static [$crate::FieldDescriptor] {
                const DESCRIPTORS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::FieldDescriptor::new(
                            stringify!($field),
                            &[$($( (stringify!($tag), $value) ),*)?],
                            $crate::record!(@settable $($flag)*),
                        )
                    ),*
                ];
                DESCRIPTORS
            }
            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field(&self, index: usize) -> Option<&dyn $crate::Field> {
                let mut at = 0usize;
                $(
                    if index == at {
                        return Some(&self.$field);
                    }
                    at += 1;
                )*
                None
            }
            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_mut(&mut self, index: usize) -> Option<&mut dyn $crate::Field> {
                let mut at = 0usize;
                $(
                    if index == at {
                        return Some(&mut self.$field);
                    }
                    at += 1;
                )*
                None
            }
            fn assign_same(&mut self, value: &$crate::Value) -> bool {
                match value {
                    $crate::Value::Opaque(opaque) => match opaque.downcast_ref::<$ty>() {
                        Some(same) => {
                            *self = ::std::clone::Clone::clone(same);
                            true
                        }
                        None => false,
                    },
                    _ => false,
                }
            }
            fn reset(&mut self) {
                *self = <$ty as ::std::default::Default>::default();
            }
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }
        }
        impl $crate::Field for $ty {
            fn declared_shape() -> $crate::Shape {
                $crate::Shape::Record
            }
            fn shape(&self) -> $crate::Shape {
                $crate::Shape::Record
            }
            fn reflect(&self) -> $crate::FieldRef<'_> {
                $crate::FieldRef::Record(self)
            }
            fn reflect_mut(&mut self) -> $crate::FieldMut<'_> {
                $crate::FieldMut::Record(self)
            }
        }
    };
}
