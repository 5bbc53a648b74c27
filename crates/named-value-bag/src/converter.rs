//! The value-coercion collaborator consulted during typed retrieval.
//!
//! A bag only asks its converter for help when a stored value is not already
//! of the requested type. The crate ships no coercion table of its own:
//! [`RejectingConverter`] refuses everything, and callers that need numeric or
//! textual coercions plug in their own [`FormatterConverter`].

use chrono::NaiveDateTime;

use crate::error::{ConvertError, ConvertResult};
use crate::type_tag::TypeTag;
use crate::value::{Decimal, Value};

/// Coerces stored values into requested types.
///
/// Only [`convert`](FormatterConverter::convert) is required. Each `to_*`
/// method defaults to `convert` followed by extraction of the matching
/// variant; override them individually for cheaper direct paths. Errors are
/// returned to the bag's caller untouched.
///
/// Converters are called synchronously and must not hold on to the bag.
pub trait FormatterConverter {
    fn convert(&self, value: &Value, target: &TypeTag) -> ConvertResult<Value>;

    fn to_bool(&self, value: &Value) -> ConvertResult<bool> {
        convert_primitive(self, value)
    }

    fn to_char(&self, value: &Value) -> ConvertResult<char> {
        convert_primitive(self, value)
    }

    fn to_i8(&self, value: &Value) -> ConvertResult<i8> {
        convert_primitive(self, value)
    }

    fn to_u8(&self, value: &Value) -> ConvertResult<u8> {
        convert_primitive(self, value)
    }

    fn to_i16(&self, value: &Value) -> ConvertResult<i16> {
        convert_primitive(self, value)
    }

    fn to_u16(&self, value: &Value) -> ConvertResult<u16> {
        convert_primitive(self, value)
    }

    fn to_i32(&self, value: &Value) -> ConvertResult<i32> {
        convert_primitive(self, value)
    }

    fn to_u32(&self, value: &Value) -> ConvertResult<u32> {
        convert_primitive(self, value)
    }

    fn to_i64(&self, value: &Value) -> ConvertResult<i64> {
        convert_primitive(self, value)
    }

    fn to_u64(&self, value: &Value) -> ConvertResult<u64> {
        convert_primitive(self, value)
    }

    fn to_f32(&self, value: &Value) -> ConvertResult<f32> {
        convert_primitive(self, value)
    }

    fn to_f64(&self, value: &Value) -> ConvertResult<f64> {
        convert_primitive(self, value)
    }

    fn to_decimal(&self, value: &Value) -> ConvertResult<Decimal> {
        convert_primitive(self, value)
    }

    fn to_string_value(&self, value: &Value) -> ConvertResult<String> {
        convert_primitive(self, value)
    }

    fn to_date_time(&self, value: &Value) -> ConvertResult<NaiveDateTime> {
        convert_primitive(self, value)
    }
}

fn convert_primitive<C, T>(converter: &C, value: &Value) -> ConvertResult<T>
where
    C: FormatterConverter + ?Sized,
    T: Primitive,
{
    let converted = converter.convert(value, &T::TAG)?;
    T::from_value(&converted).ok_or_else(|| ConvertError::Unsupported {
        from: value.type_tag(),
        to: T::TAG,
    })
}

/// Converter that supports no coercion at all.
///
/// Every call fails with [`ConvertError::Unsupported`], so retrieval succeeds
/// only when the requested type matches what was stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectingConverter;

impl RejectingConverter {
    pub const DEFAULT: RejectingConverter = RejectingConverter;
}

impl FormatterConverter for RejectingConverter {
    fn convert(&self, value: &Value, target: &TypeTag) -> ConvertResult<Value> {
        Err(ConvertError::Unsupported {
            from: value.type_tag(),
            to: target.clone(),
        })
    }
}

// ============================================================================
// Primitive kinds
// ============================================================================

/// A Rust type that corresponds to one primitive [`TypeTag`].
///
/// Implemented for every kind the bag has a typed accessor for. Used by
/// [`NamedValueBag::get_as`](crate::NamedValueBag::get_as) to pick the exact
/// stored variant or the matching converter method.
pub trait Primitive: Sized {
    const TAG: TypeTag;

    /// The value itself when `value` holds exactly this kind.
    fn from_value(value: &Value) -> Option<Self>;

    /// Ask `converter` for this kind.
    fn coerce(converter: &dyn FormatterConverter, value: &Value) -> ConvertResult<Self>;
}

macro_rules! primitive {
    ($($ty:ty => $variant:ident, $to:ident;)*) => {
        $(
            impl Primitive for $ty {
                const TAG: TypeTag = TypeTag::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }

                fn coerce(converter: &dyn FormatterConverter, value: &Value) -> ConvertResult<Self> {
                    converter.$to(value)
                }
            }
        )*
    };
}

primitive! {
    bool => Bool, to_bool;
    char => Char, to_char;
    i8 => I8, to_i8;
    u8 => U8, to_u8;
    i16 => I16, to_i16;
    u16 => U16, to_u16;
    i32 => I32, to_i32;
    u32 => U32, to_u32;
    i64 => I64, to_i64;
    u64 => U64, to_u64;
    f32 => F32, to_f32;
    f64 => F64, to_f64;
    Decimal => Decimal, to_decimal;
    String => String, to_string_value;
    NaiveDateTime => DateTime, to_date_time;
}
