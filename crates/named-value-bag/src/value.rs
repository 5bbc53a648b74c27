//! Stored member values.
//!
//! Values mirror the primitive kinds of [`TypeTag`] and add two composite
//! shapes: arrays and nested objects. Objects keep their fields as
//! `Vec<(String, Value)>` so field order survives without a map type.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::type_tag::{NamedType, TypeTag};

/// A value held by a bag member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    String(String),
    DateTime(NaiveDateTime),
    Array(Vec<Value>),
    Object(ObjectValue),
}

impl Value {
    /// Runtime type of this value. `Null` has no type of its own and reports
    /// [`TypeTag::Any`].
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Any,
            Value::Bool(_) => TypeTag::Bool,
            Value::Char(_) => TypeTag::Char,
            Value::I8(_) => TypeTag::I8,
            Value::U8(_) => TypeTag::U8,
            Value::I16(_) => TypeTag::I16,
            Value::U16(_) => TypeTag::U16,
            Value::I32(_) => TypeTag::I32,
            Value::U32(_) => TypeTag::U32,
            Value::I64(_) => TypeTag::I64,
            Value::U64(_) => TypeTag::U64,
            Value::F32(_) => TypeTag::F32,
            Value::F64(_) => TypeTag::F64,
            Value::Decimal(_) => TypeTag::Decimal,
            Value::String(_) => TypeTag::String,
            Value::DateTime(_) => TypeTag::DateTime,
            Value::Array(_) => TypeTag::Array,
            Value::Object(object) => TypeTag::Named(object.type_tag.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// The collected state of a nested object: its type identity plus its fields
/// in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub type_tag: NamedType,
    pub fields: Vec<(String, Value)>,
}

impl ObjectValue {
    pub fn new(type_tag: NamedType) -> Self {
        Self {
            type_tag,
            fields: Vec::new(),
        }
    }

    /// First field with the given name, if any.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for ObjectValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Decimal
// ============================================================================

/// A 96-bit high-precision decimal: `mantissa / 10^scale`.
///
/// The mantissa magnitude is limited to `2^96 - 1` and the scale to `0..=28`.
/// Equality compares the representation, so `1.0` and `1.00` differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

impl Decimal {
    pub const MAX_MANTISSA: i128 = (1i128 << 96) - 1;
    pub const MAX_SCALE: u8 = 28;

    pub const MAX: Decimal = Decimal {
        mantissa: Self::MAX_MANTISSA,
        scale: 0,
    };
    pub const MIN: Decimal = Decimal {
        mantissa: -Self::MAX_MANTISSA,
        scale: 0,
    };
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Returns `None` when the mantissa or scale is out of range.
    pub fn new(mantissa: i128, scale: u8) -> Option<Self> {
        if mantissa.unsigned_abs() > Self::MAX_MANTISSA as u128 || scale > Self::MAX_SCALE {
            return None;
        }
        Some(Self { mantissa, scale })
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self {
            mantissa: n as i128,
            scale: 0,
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Conversions into Value
// ============================================================================

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => String,
    NaiveDateTime => DateTime,
    Vec<Value> => Array,
    ObjectValue => Object,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
