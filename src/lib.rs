//! Tagmap – converts between typed records and untyped, string keyed snapshots.
//!
//! A *record* is a struct whose visible fields are described once, at compile
//! time, by the [`record!`] macro. Each field may carry annotations such as
//! `json: "label,omitempty"`; the first comma separated segment is the key the
//! field is published under for that annotation key.
//!
//! ## Operations
//! * [`map`] / [`map_fields`] – record to [`Mapped`] snapshot.
//! * [`map_with_fallback`] – like `map`, trying fallback annotation keys.
//! * [`map_flatten`] – inlines unannotated nested records into one level.
//! * [`fill`] / [`fill_by_key`] – writes a snapshot back into a record,
//!   collecting every field that could not be assigned into one error.
//! * [`scan_row`] – reads one row from a [`ScanRow`] (a `rusqlite::Row`, for
//!   instance) into a record.
//!
//! ## Shapes
//! Fields are plain scalars, temporals (`chrono::DateTime`), nested records,
//! pointers (`Option<T>`, `Box<T>`), sequences (`Vec<T>`) or self converting
//! types implementing [`Encoder`] and [`Decoder`] (see [`custom_field!`]).
//!
//! ## Quick Start
//! ```
//! use tagmap::{record, map, fill_by_key};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! pub struct Source {
//!     pub label: String,
//!     pub version: i64,
//! }
//! record!(Source {
//!     label { json: "label" },
//!     version { json: "version,omitempty" },
//! });
//!
//! let source = Source { label: "origin".into(), version: 1 };
//! let snapshot = map(&source, "json");
//! let mut sink = Source::default();
//! fill_by_key(&mut sink, &snapshot, "json").unwrap();
//! assert_eq!(sink, source);
//! ```
//!
//! Records are owned exclusively by the caller for the duration of a call;
//! nothing is shared or retained between calls.

pub mod capability;
pub mod coerce;
pub mod error;
pub mod field;
pub mod fill;
pub mod json;
pub mod record;
pub mod scan;
pub mod settings;
pub mod snapshot;
pub mod sqlite;
pub mod tag;
pub mod value;

pub use capability::{CapabilityError, Custom, Decoder, Encoder, Raw};
pub use error::{FieldError, MappingError, Result};
pub use field::{
    Bytes, Field, FieldMut, FieldRef, PointerSlot, ScalarSlot, SequenceSlot, Shape, TemporalSlot,
};
pub use fill::{fill, fill_by_key};
pub use record::{FieldDescriptor, Record};
pub use scan::{Placeholder, ScanRow, Target, scan_row};
pub use settings::{Mapper, Settings};
pub use snapshot::{map, map_fields, map_flatten, map_with_fallback};
pub use tag::tag_head;
pub use value::{Mapped, Opaque, ScalarKind, Value};
