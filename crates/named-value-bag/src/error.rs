//! Error types for bag insertion, retrieval, and value conversion.

use thiserror::Error;

use crate::type_tag::TypeTag;

/// Errors raised by a [`NamedValueBag`](crate::NamedValueBag).
///
/// Every error is reported at the offending call. A failed call never leaves a
/// partially registered member behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializationError {
    /// A required input was missing or empty (subject type, member name, type name).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A member with this name is already present in the bag.
    #[error("Cannot add the same member twice to a NamedValueBag (member '{name}').")]
    DuplicateMember { name: String },

    /// No member with this name was ever added.
    #[error("Member '{name}' was not found.")]
    MemberNotFound { name: String },

    /// The stored value cannot be produced as the requested type.
    #[error("Invalid cast of member '{name}' from {from} to {to}")]
    InvalidCast {
        name: String,
        from: TypeTag,
        to: TypeTag,
    },

    /// Failure reported by the converter, passed through as-is.
    #[error(transparent)]
    Conversion(#[from] ConvertError),
}

/// Failures a [`FormatterConverter`](crate::FormatterConverter) may report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The converter has no coercion from `from` to `to`.
    #[error("Conversion from {from} to {to} is not supported")]
    Unsupported { from: TypeTag, to: TypeTag },

    /// The value does not fit in the target type.
    #[error("Value {value} is out of range for {to}")]
    Overflow { value: String, to: TypeTag },

    /// Textual input could not be parsed as the target type.
    #[error("Cannot parse '{value}' as {to}: {reason}")]
    Format {
        value: String,
        to: TypeTag,
        reason: String,
    },
}

/// Convenience alias used throughout named-value-bag.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Result of a single converter call.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
