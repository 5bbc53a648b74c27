//! The producer/consumer contract around a bag.
//!
//! A type takes part by implementing [`Serializable`] (fill a bag from
//! `&self`) and optionally [`Deserializable`] (rebuild `Self` from a bag).
//! Both receive a [`StreamingContext`], which is handed through untouched.

use crate::bag::NamedValueBag;
use crate::converter::FormatterConverter;
use crate::error::Result;
use crate::type_tag::TypeTag;
use crate::value::ObjectValue;

/// Where the serialized data is headed or came from. Flags combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextStates(u8);

impl ContextStates {
    pub const CROSS_PROCESS: ContextStates = ContextStates(1 << 0);
    pub const CROSS_MACHINE: ContextStates = ContextStates(1 << 1);
    pub const FILE: ContextStates = ContextStates(1 << 2);
    pub const PERSISTENCE: ContextStates = ContextStates(1 << 3);
    pub const REMOTING: ContextStates = ContextStates(1 << 4);
    pub const OTHER: ContextStates = ContextStates(1 << 5);
    pub const CLONE: ContextStates = ContextStates(1 << 6);
    pub const ALL: ContextStates = ContextStates(0x7f);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        ContextStates(bits & Self::ALL.0)
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// True when every flag of `other` is set here.
    #[must_use]
    pub const fn contains(&self, other: ContextStates) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl Default for ContextStates {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for ContextStates {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ContextStates(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContextStates {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ContextStates(self.0 & rhs.0)
    }
}

/// Opaque hint about the serialization target. The bag never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingContext {
    pub state: ContextStates,
    pub context: Option<String>,
}

impl StreamingContext {
    pub fn new(state: ContextStates) -> Self {
        Self {
            state,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// A type that can list its own state into a bag.
pub trait Serializable {
    fn get_object_data(&self, bag: &mut NamedValueBag<'_>, ctx: &StreamingContext) -> Result<()>;
}

/// A type that can be rebuilt from a populated bag.
pub trait Deserializable: Sized {
    fn from_object_data(bag: &NamedValueBag<'_>, ctx: &StreamingContext) -> Result<Self>;
}

/// Create a bag for `T` and run its collection method.
///
/// # Errors
/// Whatever `T::get_object_data` returns.
pub fn collect<'c, T: Serializable>(
    value: &T,
    converter: &'c dyn FormatterConverter,
    ctx: &StreamingContext,
) -> Result<NamedValueBag<'c>> {
    let mut bag = NamedValueBag::new(TypeTag::named::<T>(), converter)?;
    value.get_object_data(&mut bag, ctx)?;
    tracing::trace!(subject = bag.full_type_name(), members = bag.len(), "collected");
    Ok(bag)
}

/// Collect `value` and flatten the bag into a nested [`ObjectValue`], ready to
/// be stored as a member of an enclosing bag.
///
/// # Errors
/// Whatever `T::get_object_data` returns.
pub fn collect_nested<T: Serializable>(
    value: &T,
    converter: &dyn FormatterConverter,
    ctx: &StreamingContext,
) -> Result<ObjectValue> {
    Ok(collect(value, converter, ctx)?.to_object_value())
}
