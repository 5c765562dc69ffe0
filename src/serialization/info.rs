//! The typed, insertion-ordered member store.
//!
//! # Architecture
//!
//! Members live in three parallel vectors (names, values, declared types) that always have
//! the same length, plus a `name -> position` index. Enumeration walks the vectors in
//! insertion order; lookups go through the index. The logical capacity of the store is
//! tracked separately from the vectors and doubles from its initial value whenever an
//! insertion finds it full, saturating at [`StoreConfig::max_members`].
//!
//! Every insertion reduces to [`SerializationInfo::add_value_with_type`]; every typed read
//! reduces to a strict or lenient lookup followed by type reconciliation against the
//! declared type, with the [`FormatterConverter`] as the fallback on a mismatch.

use std::{borrow::Cow, collections::HashMap, fmt, sync::Arc};

use tracing::{debug, trace};

use crate::{
    metadata::typesystem::{CilPrimitiveKind, CilTypeRc},
    serialization::{
        FormatterConverter, Primitive, ReadPrimitive, SerializationEntry, SerializationIter,
        StoreConfig,
    },
    value::{DateTime, Decimal, Value},
    Error, Result,
};

/// Named, typed member values of one object plus the identity of its root type.
///
/// # Examples
///
/// ```rust
/// use serinfo::prelude::*;
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new();
/// let person = TypeBuilder::class("App", "Person").build(&registry);
///
/// let mut info = SerializationInfo::new(person.clone(), Arc::new(DefaultConverter));
/// info.add("name", "Ada")?;
/// info.add("age", 36i32)?;
///
/// assert_eq!(info.full_type_name(), "App.Person");
/// assert_eq!(info.get_int64("age")?, 36);
/// assert_eq!(info.get_string("name")?.as_deref(), Some("Ada"));
///
/// let names: Vec<_> = info.iter().map(|entry| entry.name()).collect();
/// assert_eq!(names, ["name", "age"]);
/// # Ok::<(), serinfo::Error>(())
/// ```
pub struct SerializationInfo {
    names: Vec<String>,
    values: Vec<Option<Value>>,
    types: Vec<CilTypeRc>,
    index: HashMap<String, usize>,
    capacity: usize,
    root_type: CilTypeRc,
    full_type_name: String,
    assembly_name: String,
    full_type_name_explicit: bool,
    assembly_name_explicit: bool,
    converter: Arc<dyn FormatterConverter>,
    config: StoreConfig,
}

impl SerializationInfo {
    /// Creates an empty store for an object of `root_type` with the default configuration
    #[must_use]
    pub fn new(root_type: CilTypeRc, converter: Arc<dyn FormatterConverter>) -> Self {
        Self::with_config(root_type, converter, StoreConfig::default())
    }

    /// Creates an empty store with an explicit [`StoreConfig`]
    #[must_use]
    pub fn with_config(
        root_type: CilTypeRc,
        converter: Arc<dyn FormatterConverter>,
        config: StoreConfig,
    ) -> Self {
        let capacity = config.effective_initial_capacity();
        let reserve = config.eager_reserve();

        SerializationInfo {
            names: Vec::with_capacity(reserve),
            values: Vec::with_capacity(reserve),
            types: Vec::with_capacity(reserve),
            index: HashMap::with_capacity(reserve),
            capacity,
            full_type_name: root_type.fullname(),
            assembly_name: root_type.assembly_name(),
            full_type_name_explicit: false,
            assembly_name_explicit: false,
            root_type,
            converter,
            config,
        }
    }

    /// Full name of the root type, or the explicit override
    #[must_use]
    pub fn full_type_name(&self) -> &str {
        &self.full_type_name
    }

    /// Override the full type name recorded for the root object
    pub fn set_full_type_name(&mut self, name: impl Into<String>) {
        self.full_type_name = name.into();
        self.full_type_name_explicit = true;
    }

    /// Display name of the assembly defining the root type, or the explicit override
    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    /// Override the assembly name recorded for the root object
    pub fn set_assembly_name(&mut self, name: impl Into<String>) {
        self.assembly_name = name.into();
        self.assembly_name_explicit = true;
    }

    /// Whether the full type name was overridden since the root type was last set
    #[must_use]
    pub fn is_full_type_name_set_explicit(&self) -> bool {
        self.full_type_name_explicit
    }

    /// Whether the assembly name was overridden since the root type was last set
    #[must_use]
    pub fn is_assembly_name_set_explicit(&self) -> bool {
        self.assembly_name_explicit
    }

    /// The root type
    #[must_use]
    pub fn object_type(&self) -> &CilTypeRc {
        &self.root_type
    }

    /// Replace the root type.
    ///
    /// Passing the current root type does nothing. Any other type re-derives the full type
    /// name and the assembly name and clears both override flags.
    pub fn set_type(&mut self, root_type: &CilTypeRc) {
        if Arc::ptr_eq(&self.root_type, root_type) {
            return;
        }

        self.root_type = root_type.clone();
        self.full_type_name = root_type.fullname();
        self.assembly_name = root_type.assembly_name();
        self.full_type_name_explicit = false;
        self.assembly_name_explicit = false;

        debug!(
            full_type_name = %self.full_type_name,
            assembly_name = %self.assembly_name,
            "root type replaced"
        );
    }

    /// Number of members
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.names.len()
    }

    /// Number of members the store can hold before it grows
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configuration this store was created with
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Insert a member with an explicit declared type.
    ///
    /// # Errors
    /// Returns [`Error::SameNameTwice`] if a member called `name` exists, or
    /// [`Error::CapacityExceeded`] if the store is full and already at its maximum size.
    /// The store is unchanged on error.
    pub fn add_value_with_type(
        &mut self,
        name: impl Into<String>,
        value: Option<Value>,
        declared_type: &CilTypeRc,
    ) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(Error::SameNameTwice(name));
        }

        if self.names.len() == self.capacity {
            self.grow()?;
        }

        let position = self.names.len();
        self.names.push(name.clone());
        self.values.push(value);
        self.types.push(declared_type.clone());
        self.index.insert(name, position);

        Ok(())
    }

    /// Insert a member, declaring its concrete runtime type, or `System.Object` when
    /// `value` is `None`.
    ///
    /// # Errors
    /// See [`SerializationInfo::add_value_with_type`].
    pub fn add_value(&mut self, name: impl Into<String>, value: Option<Value>) -> Result<()> {
        let declared_type = value
            .as_ref()
            .map_or_else(|| CilPrimitiveKind::Object.type_ref(), Value::runtime_type);
        self.add_value_with_type(name, value, &declared_type)
    }

    /// Insert a scalar under its corelib type.
    ///
    /// # Errors
    /// See [`SerializationInfo::add_value_with_type`].
    pub fn add<T: Primitive>(&mut self, name: impl Into<String>, value: T) -> Result<()> {
        self.add_value_with_type(name, Some(value.into_value()), &T::KIND.type_ref())
    }

    /// Replace the value and declared type of an existing member, or insert it.
    ///
    /// An existing member keeps its position. This is the only mutation that accepts a
    /// name that is already present, and is meant for resolving forward references while
    /// an object graph is rebuilt.
    ///
    /// # Errors
    /// Returns the insertion errors of [`SerializationInfo::add_value_with_type`] when
    /// `name` is not present yet.
    pub fn update_value(
        &mut self,
        name: impl Into<String>,
        value: Option<Value>,
        declared_type: &CilTypeRc,
    ) -> Result<()> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&position) => {
                self.values[position] = value;
                self.types[position] = declared_type.clone();
                trace!(member = %name, position, "member value replaced");
                Ok(())
            }
            None => self.add_value_with_type(name, value, declared_type),
        }
    }

    /// Position of the member called `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The member called `name`
    ///
    /// # Errors
    /// Returns [`Error::MemberNotFound`] if there is no such member.
    pub fn element(&self, name: &str) -> Result<SerializationEntry<'_>> {
        self.element_no_throw(name)
            .ok_or_else(|| Error::MemberNotFound(name.to_string()))
    }

    /// The member called `name`, if present
    #[must_use]
    pub fn element_no_throw(&self, name: &str) -> Option<SerializationEntry<'_>> {
        let position = self.find(name)?;
        Some(SerializationEntry::new(
            &self.names[position],
            self.values[position].as_ref(),
            &self.types[position],
        ))
    }

    /// Read the member called `name` as an instance of `requested_type`.
    ///
    /// The stored value is borrowed when its declared type is `requested_type` or assignable
    /// to it, and when it is absent. Any other case is handed to the converter.
    ///
    /// # Errors
    /// Returns [`Error::NotRuntimeType`] for generic parameters and unresolved types,
    /// [`Error::MemberNotFound`] if there is no such member, or the converter's error.
    pub fn get_value(
        &self,
        name: &str,
        requested_type: &CilTypeRc,
    ) -> Result<Option<Cow<'_, Value>>> {
        self.check_runtime_type(requested_type)?;
        let entry = self.element(name)?;
        self.reconcile(&entry, requested_type)
    }

    /// [`SerializationInfo::get_value`] that reports a missing member as `Ok(None)`.
    ///
    /// Reconciliation and conversion behave exactly as in the strict read.
    ///
    /// # Errors
    /// Returns [`Error::NotRuntimeType`] for generic parameters and unresolved types, or
    /// the converter's error.
    pub fn try_get_value(
        &self,
        name: &str,
        requested_type: &CilTypeRc,
    ) -> Result<Option<Cow<'_, Value>>> {
        self.check_runtime_type(requested_type)?;
        match self.element_no_throw(name) {
            Some(entry) => self.reconcile(&entry, requested_type),
            None => Ok(None),
        }
    }

    /// Read a scalar member
    ///
    /// If the member was declared with exactly `T`'s corelib type the stored value is
    /// returned without consulting the converter.
    ///
    /// # Errors
    /// Returns [`Error::MemberNotFound`] if there is no such member, [`Error::InvalidCast`]
    /// if the declared type is `T`'s but the stored payload is not, or the converter's error.
    pub fn get<T: ReadPrimitive>(&self, name: &str) -> Result<T> {
        let entry = self.element(name)?;
        if Arc::ptr_eq(entry.object_type(), &T::KIND.type_ref()) {
            if let Some(value) = entry.value() {
                return T::from_value(value).ok_or_else(|| Error::InvalidCast {
                    from: value.type_name(),
                    to: T::KIND.clr_full_name().to_string(),
                });
            }
        }

        T::coerce(self.converter.as_ref(), entry.value())
    }

    /// Read a `System.Boolean` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_boolean(&self, name: &str) -> Result<bool> {
        self.get(name)
    }

    /// Read a `System.Char` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_char(&self, name: &str) -> Result<char> {
        self.get(name)
    }

    /// Read a `System.SByte` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_sbyte(&self, name: &str) -> Result<i8> {
        self.get(name)
    }

    /// Read a `System.Byte` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_byte(&self, name: &str) -> Result<u8> {
        self.get(name)
    }

    /// Read a `System.Int16` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_int16(&self, name: &str) -> Result<i16> {
        self.get(name)
    }

    /// Read a `System.UInt16` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_uint16(&self, name: &str) -> Result<u16> {
        self.get(name)
    }

    /// Read a `System.Int32` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_int32(&self, name: &str) -> Result<i32> {
        self.get(name)
    }

    /// Read a `System.UInt32` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_uint32(&self, name: &str) -> Result<u32> {
        self.get(name)
    }

    /// Read a `System.Int64` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_int64(&self, name: &str) -> Result<i64> {
        self.get(name)
    }

    /// Read a `System.UInt64` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_uint64(&self, name: &str) -> Result<u64> {
        self.get(name)
    }

    /// Read a `System.Single` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_single(&self, name: &str) -> Result<f32> {
        self.get(name)
    }

    /// Read a `System.Double` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_double(&self, name: &str) -> Result<f64> {
        self.get(name)
    }

    /// Read a `System.Decimal` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_decimal(&self, name: &str) -> Result<Decimal> {
        self.get(name)
    }

    /// Read a `System.DateTime` member
    ///
    /// # Errors
    /// See [`SerializationInfo::get`].
    pub fn get_date_time(&self, name: &str) -> Result<DateTime> {
        self.get(name)
    }

    /// Read a `System.String` member.
    ///
    /// The stored string is returned as is when the member was declared as `System.String`,
    /// and `None` when it has no value. Anything else is rendered by the converter.
    ///
    /// # Errors
    /// Returns [`Error::MemberNotFound`] if there is no such member, or the converter's
    /// error.
    pub fn get_string(&self, name: &str) -> Result<Option<String>> {
        let entry = self.element(name)?;
        let Some(value) = entry.value() else {
            return Ok(None);
        };

        if Arc::ptr_eq(entry.object_type(), &CilPrimitiveKind::String.type_ref()) {
            return value
                .as_str()
                .map(|text| Some(text.to_string()))
                .ok_or_else(|| Error::InvalidCast {
                    from: value.type_name(),
                    to: CilPrimitiveKind::String.clr_full_name().to_string(),
                });
        }

        self.converter.to_string(value).map(Some)
    }

    /// Iterate over the members in insertion order
    #[must_use]
    pub fn iter(&self) -> SerializationIter<'_> {
        SerializationIter::new(&self.names, &self.values, &self.types)
    }

    fn grow(&mut self) -> Result<()> {
        let limit = self.config.member_limit();
        if self.capacity >= limit {
            return Err(Error::CapacityExceeded(limit));
        }

        let new_capacity = self
            .capacity
            .checked_mul(2)
            .map_or(limit, |doubled| doubled.min(limit));
        let additional = new_capacity - self.names.len();

        self.names.reserve_exact(additional);
        self.values.reserve_exact(additional);
        self.types.reserve_exact(additional);
        self.index.reserve(additional);

        trace!(old = self.capacity, new = new_capacity, "member storage grown");
        self.capacity = new_capacity;
        Ok(())
    }

    fn check_runtime_type(&self, requested_type: &CilTypeRc) -> Result<()> {
        if self.config.require_runtime_types && !requested_type.is_runtime_type() {
            return Err(Error::NotRuntimeType(requested_type.fullname()));
        }
        Ok(())
    }

    fn reconcile<'a>(
        &self,
        entry: &SerializationEntry<'a>,
        requested_type: &CilTypeRc,
    ) -> Result<Option<Cow<'a, Value>>> {
        let Some(value) = entry.value() else {
            return Ok(None);
        };

        let declared_type = entry.object_type();
        if Arc::ptr_eq(declared_type, requested_type)
            || requested_type.is_assignable_from(declared_type)
        {
            return Ok(Some(Cow::Borrowed(value)));
        }

        self.converter
            .convert(value, requested_type)
            .map(|converted| Some(Cow::Owned(converted)))
    }
}

impl fmt::Debug for SerializationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationInfo")
            .field("full_type_name", &self.full_type_name)
            .field("assembly_name", &self.assembly_name)
            .field("member_count", &self.names.len())
            .field("capacity", &self.capacity)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a SerializationInfo {
    type Item = SerializationEntry<'a>;
    type IntoIter = SerializationIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
