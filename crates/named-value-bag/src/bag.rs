//! `NamedValueBag`: the insertion-ordered member container.
//!
//! A bag is created for one object, filled once by that object's collection
//! method, then read by typed accessors or enumerated by a formatter. Members
//! are never removed or renamed.
//!
//! A bag is not synchronized. Inserting from one thread while another thread
//! enumerates is the caller's problem; `&mut self` on insertion already rules
//! it out in safe code.

use std::collections::HashMap;
use std::fmt;
use std::slice;

use chrono::NaiveDateTime;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::converter::{FormatterConverter, Primitive};
use crate::error::{Result, SerializationError};
use crate::type_tag::{NamedType, TypeTag};
use crate::value::{Decimal, ObjectValue, Value};

/// One named member: its value and the type it was declared with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    name: String,
    value: Value,
    declared_type: TypeTag,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The type tag supplied (or derived) when the member was added.
    pub fn object_type(&self) -> &TypeTag {
        &self.declared_type
    }
}

/// Named, typed members of one object's serialized state.
pub struct NamedValueBag<'c> {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    subject_type: TypeTag,
    full_type_name: String,
    assembly_name: String,
    full_type_name_explicit: bool,
    assembly_name_explicit: bool,
    converter: &'c dyn FormatterConverter,
}

impl<'c> NamedValueBag<'c> {
    /// Create an empty bag for an object of type `subject`.
    ///
    /// # Errors
    /// Returns `SerializationError::InvalidArgument` if `subject` is a named
    /// type with an empty name.
    pub fn new(subject: TypeTag, converter: &'c dyn FormatterConverter) -> Result<Self> {
        if subject.full_name().is_empty() {
            return Err(SerializationError::InvalidArgument(
                "subject type must have a name".to_string(),
            ));
        }
        Ok(Self {
            entries: Vec::new(),
            index: HashMap::new(),
            full_type_name: subject.full_name().to_string(),
            assembly_name: subject.assembly_name().to_string(),
            subject_type: subject,
            full_type_name_explicit: false,
            assembly_name_explicit: false,
            converter,
        })
    }

    // ------------------------------------------------------------------------
    // Subject metadata
    // ------------------------------------------------------------------------

    pub fn subject_type(&self) -> &TypeTag {
        &self.subject_type
    }

    /// Replace the subject type. Derived names follow the new type unless
    /// they were set explicitly.
    ///
    /// # Errors
    /// Returns `SerializationError::InvalidArgument` if `subject` is a named
    /// type with an empty name; the bag is left unchanged.
    pub fn set_subject_type(&mut self, subject: TypeTag) -> Result<()> {
        if subject.full_name().is_empty() {
            return Err(SerializationError::InvalidArgument(
                "subject type must have a name".to_string(),
            ));
        }
        if !self.full_type_name_explicit {
            self.full_type_name = subject.full_name().to_string();
        }
        if !self.assembly_name_explicit {
            self.assembly_name = subject.assembly_name().to_string();
        }
        self.subject_type = subject;
        Ok(())
    }

    pub fn full_type_name(&self) -> &str {
        &self.full_type_name
    }

    /// Override the subject's full type name, e.g. to keep an old name after
    /// a type was renamed.
    pub fn set_full_type_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = non_empty(name.into(), "full type name")?;
        self.full_type_name = name;
        self.full_type_name_explicit = true;
        Ok(())
    }

    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    pub fn set_assembly_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = non_empty(name.into(), "assembly name")?;
        self.assembly_name = name;
        self.assembly_name_explicit = true;
        Ok(())
    }

    pub fn is_full_type_name_set_explicit(&self) -> bool {
        self.full_type_name_explicit
    }

    pub fn is_assembly_name_set_explicit(&self) -> bool {
        self.assembly_name_explicit
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Add a member whose declared type is the value's own type.
    ///
    /// # Errors
    /// See [`add_with_type`](Self::add_with_type).
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let declared = value.type_tag();
        self.add_with_type(name, value, declared)
    }

    /// Add a member with an explicit declared type.
    ///
    /// # Errors
    /// - `InvalidArgument` if `name` is empty or `declared` cannot hold `value`.
    /// - `DuplicateMember` if a member called `name` already exists.
    ///
    /// On error the bag is unchanged.
    pub fn add_with_type(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        declared: TypeTag,
    ) -> Result<()> {
        let name = non_empty(name.into(), "member name")?;
        let value = value.into();

        let holds = if value.is_null() {
            declared.accepts_null()
        } else {
            declared.is_assignable_from(&value.type_tag())
        };
        if !holds {
            return Err(SerializationError::InvalidArgument(format!(
                "member '{}' declared as {} cannot hold a value of type {}",
                name,
                declared,
                value.type_tag()
            )));
        }

        if self.index.contains_key(&name) {
            tracing::debug!(member = %name, "rejecting duplicate member");
            return Err(SerializationError::DuplicateMember { name });
        }

        tracing::trace!(member = %name, declared = %declared, "adding member");
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(Entry {
            name,
            value,
            declared_type: declared,
        });
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lookup and retrieval
    // ------------------------------------------------------------------------

    /// Number of members added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    fn entry(&self, name: &str) -> Result<&Entry> {
        self.find(name).ok_or_else(|| {
            tracing::debug!(member = name, "member not found");
            SerializationError::MemberNotFound {
                name: name.to_string(),
            }
        })
    }

    /// Retrieve a member as the primitive kind `T`.
    ///
    /// A value stored as exactly `T` is returned directly. Anything else goes
    /// through the bag's converter, whose error is returned unchanged.
    ///
    /// # Errors
    /// - `MemberNotFound` if no member called `name` exists.
    /// - `Conversion` if the converter cannot produce a `T`.
    pub fn get_as<T: Primitive>(&self, name: &str) -> Result<T> {
        let entry = self.entry(name)?;
        if let Some(v) = T::from_value(&entry.value) {
            tracing::trace!(member = name, "typed read");
            return Ok(v);
        }
        tracing::debug!(
            member = name,
            from = %entry.value.type_tag(),
            to = %T::TAG,
            "delegating to converter"
        );
        Ok(T::coerce(self.converter, &entry.value)?)
    }

    /// Retrieve a member as an arbitrary type.
    ///
    /// Resolution order: a value already assignable to `expected` is cloned;
    /// a null value is returned when `expected` accepts null; anything else
    /// is handed to the converter, whose answer must fit `expected`.
    ///
    /// # Errors
    /// - `MemberNotFound` if no member called `name` exists.
    /// - `Conversion` if the converter fails.
    /// - `InvalidCast` if the converter answered with a value of the wrong type.
    pub fn get(&self, name: &str, expected: &TypeTag) -> Result<Value> {
        let entry = self.entry(name)?;
        let value = &entry.value;
        let stored = value.type_tag();

        if value.is_null() {
            if expected.accepts_null() {
                return Ok(Value::Null);
            }
        } else if expected.is_assignable_from(&stored) {
            tracing::trace!(member = name, "generic read");
            return Ok(value.clone());
        }

        tracing::debug!(
            member = name,
            from = %stored,
            to = %expected,
            "delegating to converter"
        );
        let converted = self.converter.convert(value, expected)?;
        let fits = if converted.is_null() {
            expected.accepts_null()
        } else {
            expected.is_assignable_from(&converted.type_tag())
        };
        if fits {
            return Ok(converted);
        }

        Err(SerializationError::InvalidCast {
            name: name.to_string(),
            from: stored,
            to: expected.clone(),
        })
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get_as(name)
    }

    pub fn get_char(&self, name: &str) -> Result<char> {
        self.get_as(name)
    }

    pub fn get_i8(&self, name: &str) -> Result<i8> {
        self.get_as(name)
    }

    pub fn get_u8(&self, name: &str) -> Result<u8> {
        self.get_as(name)
    }

    pub fn get_i16(&self, name: &str) -> Result<i16> {
        self.get_as(name)
    }

    pub fn get_u16(&self, name: &str) -> Result<u16> {
        self.get_as(name)
    }

    pub fn get_i32(&self, name: &str) -> Result<i32> {
        self.get_as(name)
    }

    pub fn get_u32(&self, name: &str) -> Result<u32> {
        self.get_as(name)
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get_as(name)
    }

    pub fn get_u64(&self, name: &str) -> Result<u64> {
        self.get_as(name)
    }

    pub fn get_f32(&self, name: &str) -> Result<f32> {
        self.get_as(name)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.get_as(name)
    }

    pub fn get_decimal(&self, name: &str) -> Result<Decimal> {
        self.get_as(name)
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        self.get_as(name)
    }

    pub fn get_date_time(&self, name: &str) -> Result<NaiveDateTime> {
        self.get_as(name)
    }

    // ------------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------------

    /// Members in insertion order. Each call starts a fresh pass.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    /// Snapshot of the bag as a nested object value, named with the bag's
    /// (possibly overridden) full type name and assembly.
    pub fn to_object_value(&self) -> ObjectValue {
        ObjectValue {
            type_tag: NamedType::new(self.full_type_name.clone(), self.assembly_name.clone()),
            fields: self
                .entries
                .iter()
                .map(|e| (e.name.clone(), e.value.clone()))
                .collect(),
        }
    }
}

fn non_empty(s: String, what: &str) -> Result<String> {
    if s.is_empty() {
        return Err(SerializationError::InvalidArgument(format!(
            "{} must not be empty",
            what
        )));
    }
    Ok(s)
}

impl fmt::Debug for NamedValueBag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedValueBag")
            .field("subject_type", &self.subject_type)
            .field("full_type_name", &self.full_type_name)
            .field("assembly_name", &self.assembly_name)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Serialize for NamedValueBag<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("NamedValueBag", 3)?;
        s.serialize_field("type", &self.full_type_name)?;
        s.serialize_field("assembly", &self.assembly_name)?;
        s.serialize_field("members", &self.entries)?;
        s.end()
    }
}

/// Iterator over a bag's members in insertion order.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: slice::Iter<'a, Entry>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl<'a, 'c> IntoIterator for &'a NamedValueBag<'c> {
    type Item = &'a Entry;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
