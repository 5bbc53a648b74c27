//! Opaque, comparable type tags.
//!
//! A bag never looks inside the types it carries. Every member records a
//! [`TypeTag`] supplied (or derived) at insertion time, and retrieval compares
//! tags by equality. User types are identified purely by name through
//! [`NamedType`].

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// The declared type of a member or of a bag's subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    String,
    DateTime,
    /// Ordered list of values of any type.
    Array,
    /// Root type: every value is assignable to it.
    Any,
    /// A user-defined type, identified by name only.
    Named(NamedType),
}

/// Textual identity of a user-defined type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamedType {
    full_name: Cow<'static, str>,
    assembly: Cow<'static, str>,
}

impl NamedType {
    pub fn new(
        full_name: impl Into<Cow<'static, str>>,
        assembly: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            assembly: assembly.into(),
        }
    }

    /// Identity of `T` taken from its Rust type path.
    ///
    /// The full name is [`std::any::type_name`]; the assembly is the leading
    /// crate segment of that path (`core` for paths without one).
    pub fn of<T: ?Sized>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self::new(full_name, crate_segment(full_name))
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn assembly(&self) -> &str {
        &self.assembly
    }
}

fn crate_segment(path: &'static str) -> &'static str {
    // Generic arguments may themselves contain `::`, so cut them off first.
    let head = path.split('<').next().unwrap_or(path);
    match head.split_once("::") {
        Some((krate, _)) if !krate.is_empty() => krate,
        _ => "core",
    }
}

impl TypeTag {
    /// Shorthand for `TypeTag::Named(NamedType::of::<T>())`.
    pub fn named<T: ?Sized>() -> Self {
        TypeTag::Named(NamedType::of::<T>())
    }

    /// True for the fixed-width scalar kinds, text, decimal and date/time.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeTag::Array | TypeTag::Any | TypeTag::Named(_))
    }

    /// Whether a value of type `other` may be handed out as `self` unchanged.
    pub fn is_assignable_from(&self, other: &TypeTag) -> bool {
        self == other || *self == TypeTag::Any
    }

    /// Whether a member declared with this tag may hold a null value.
    pub fn accepts_null(&self) -> bool {
        matches!(
            self,
            TypeTag::String | TypeTag::Array | TypeTag::Any | TypeTag::Named(_)
        )
    }

    /// Fully qualified textual name of the type.
    pub fn full_name(&self) -> &str {
        match self {
            TypeTag::Named(named) => named.full_name(),
            other => other.builtin_identity().0,
        }
    }

    /// Name of the crate that defines the type.
    pub fn assembly_name(&self) -> &str {
        match self {
            TypeTag::Named(named) => named.assembly(),
            other => other.builtin_identity().1,
        }
    }

    fn builtin_identity(&self) -> (&'static str, &'static str) {
        match self {
            TypeTag::Bool => ("bool", "core"),
            TypeTag::Char => ("char", "core"),
            TypeTag::I8 => ("i8", "core"),
            TypeTag::U8 => ("u8", "core"),
            TypeTag::I16 => ("i16", "core"),
            TypeTag::U16 => ("u16", "core"),
            TypeTag::I32 => ("i32", "core"),
            TypeTag::U32 => ("u32", "core"),
            TypeTag::I64 => ("i64", "core"),
            TypeTag::U64 => ("u64", "core"),
            TypeTag::F32 => ("f32", "core"),
            TypeTag::F64 => ("f64", "core"),
            TypeTag::Decimal => ("named_value_bag::Decimal", "named_value_bag"),
            TypeTag::String => ("alloc::string::String", "alloc"),
            TypeTag::DateTime => ("chrono::NaiveDateTime", "chrono"),
            TypeTag::Array => ("alloc::vec::Vec", "alloc"),
            TypeTag::Any => ("core::any::Any", "core"),
            TypeTag::Named(_) => ("", ""),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Decimal => f.write_str("Decimal"),
            TypeTag::String => f.write_str("String"),
            TypeTag::DateTime => f.write_str("DateTime"),
            TypeTag::Array => f.write_str("Array"),
            TypeTag::Any => f.write_str("Any"),
            other => f.write_str(other.full_name()),
        }
    }
}

impl From<NamedType> for TypeTag {
    fn from(named: NamedType) -> Self {
        TypeTag::Named(named)
    }
}
