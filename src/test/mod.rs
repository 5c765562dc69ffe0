use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    metadata::typesystem::{CilTypeRc, TypeBuilder, TypeRegistry},
    serialization::{DefaultConverter, FormatterConverter},
    value::{DateTime, Decimal, Value},
    Result,
};

/// A small class hierarchy: `Zoo.Cat : Zoo.Animal, Zoo.IPet` and an unrelated `Zoo.Rock`
pub struct SampleTypes {
    pub registry: TypeRegistry,
    pub animal: CilTypeRc,
    pub pet: CilTypeRc,
    pub cat: CilTypeRc,
    pub rock: CilTypeRc,
}

impl SampleTypes {
    pub fn new() -> Self {
        let registry = TypeRegistry::new();
        let animal = TypeBuilder::class("Zoo", "Animal").build(&registry);
        let pet = TypeBuilder::interface("Zoo", "IPet").build(&registry);
        let cat = TypeBuilder::class("Zoo", "Cat")
            .extends(&animal)
            .implements(&pet)
            .build(&registry);
        let rock = TypeBuilder::class("Zoo", "Rock").build(&registry);

        SampleTypes {
            registry,
            animal,
            pet,
            cat,
            rock,
        }
    }
}

/// Converter that records every call and forwards to [`DefaultConverter`].
///
/// Clones share their counters, so a test can keep one handle and give the other to a store.
#[derive(Clone, Default)]
pub struct CountingConverter {
    calls: Arc<DashMap<&'static str, usize>>,
}

impl CountingConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of calls across all operations
    pub fn calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls.get(operation).map_or(0, |count| *count)
    }

    fn record(&self, operation: &'static str) {
        *self.calls.entry(operation).or_insert(0) += 1;
    }
}

impl FormatterConverter for CountingConverter {
    fn convert(&self, value: &Value, target: &CilTypeRc) -> Result<Value> {
        self.record("convert");
        DefaultConverter.convert(value, target)
    }

    fn to_boolean(&self, value: Option<&Value>) -> Result<bool> {
        self.record("to_boolean");
        DefaultConverter.to_boolean(value)
    }

    fn to_char(&self, value: Option<&Value>) -> Result<char> {
        self.record("to_char");
        DefaultConverter.to_char(value)
    }

    fn to_sbyte(&self, value: Option<&Value>) -> Result<i8> {
        self.record("to_sbyte");
        DefaultConverter.to_sbyte(value)
    }

    fn to_byte(&self, value: Option<&Value>) -> Result<u8> {
        self.record("to_byte");
        DefaultConverter.to_byte(value)
    }

    fn to_int16(&self, value: Option<&Value>) -> Result<i16> {
        self.record("to_int16");
        DefaultConverter.to_int16(value)
    }

    fn to_uint16(&self, value: Option<&Value>) -> Result<u16> {
        self.record("to_uint16");
        DefaultConverter.to_uint16(value)
    }

    fn to_int32(&self, value: Option<&Value>) -> Result<i32> {
        self.record("to_int32");
        DefaultConverter.to_int32(value)
    }

    fn to_uint32(&self, value: Option<&Value>) -> Result<u32> {
        self.record("to_uint32");
        DefaultConverter.to_uint32(value)
    }

    fn to_int64(&self, value: Option<&Value>) -> Result<i64> {
        self.record("to_int64");
        DefaultConverter.to_int64(value)
    }

    fn to_uint64(&self, value: Option<&Value>) -> Result<u64> {
        self.record("to_uint64");
        DefaultConverter.to_uint64(value)
    }

    fn to_single(&self, value: Option<&Value>) -> Result<f32> {
        self.record("to_single");
        DefaultConverter.to_single(value)
    }

    fn to_double(&self, value: Option<&Value>) -> Result<f64> {
        self.record("to_double");
        DefaultConverter.to_double(value)
    }

    fn to_decimal(&self, value: Option<&Value>) -> Result<Decimal> {
        self.record("to_decimal");
        DefaultConverter.to_decimal(value)
    }

    fn to_date_time(&self, value: Option<&Value>) -> Result<DateTime> {
        self.record("to_date_time");
        DefaultConverter.to_date_time(value)
    }

    fn to_string(&self, value: &Value) -> Result<String> {
        self.record("to_string");
        FormatterConverter::to_string(&DefaultConverter, value)
    }
}
