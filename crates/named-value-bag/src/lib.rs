//! # named-value-bag
//!
//! A typed, named-value container that carries one object's serializable state
//! between the object and a serialization formatter, independent of the wire
//! format the formatter eventually produces.
//!
//! An object lists its fields into a [`NamedValueBag`] (name, value, declared
//! type); a reader later pulls them back by name with exact-type accessors.
//! Duplicate names, missing names, and type mismatches fail loudly.
//!
//! ## Quick start
//!
//! ```rust
//! use named_value_bag::{NamedValueBag, RejectingConverter, TypeTag};
//!
//! struct Point;
//!
//! let mut bag = NamedValueBag::new(TypeTag::named::<Point>(), &RejectingConverter).unwrap();
//! bag.add("x", 3i32).unwrap();
//! bag.add("label", "origin").unwrap();
//!
//! assert_eq!(bag.get_i32("x").unwrap(), 3);
//! assert_eq!(bag.get_string("label").unwrap(), "origin");
//! assert!(bag.add("x", 4i32).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`bag`] — the container, its entries and enumeration
//! - [`converter`] — the pluggable coercion collaborator
//! - [`object`] — `Serializable` / `Deserializable` and the streaming context
//! - [`type_tag`] — opaque, comparable type tags
//! - [`value`] — stored values, including the 96-bit `Decimal`
//! - [`error`] — error types

pub mod bag;
pub mod converter;
pub mod error;
pub mod object;
pub mod type_tag;
pub mod value;

pub use bag::{Entries, Entry, NamedValueBag};
pub use converter::{FormatterConverter, Primitive, RejectingConverter};
pub use error::{ConvertError, Result, SerializationError};
pub use object::{collect, collect_nested, ContextStates, Deserializable, Serializable, StreamingContext};
pub use type_tag::{NamedType, TypeTag};
pub use value::{Decimal, ObjectValue, Value};
