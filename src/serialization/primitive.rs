//! Mapping between Rust scalars and corelib primitive kinds.

use crate::{
    metadata::typesystem::CilPrimitiveKind,
    serialization::FormatterConverter,
    value::{DateTime, Decimal, Value},
    Result,
};

/// A Rust scalar that can be added to a store under its corelib type
pub trait Primitive {
    /// The corelib type recorded as the declared type of the member
    const KIND: CilPrimitiveKind;

    /// Wrap into a [`Value`]
    fn into_value(self) -> Value;
}

/// A [`Primitive`] that can also be read back out of a store.
///
/// `from_value` is the fast path taken when the declared type of a member is exactly
/// [`Primitive::KIND`]; `coerce` routes every other case to the matching named operation
/// of the store's [`FormatterConverter`].
///
/// Strings are write-only here. Read them with
/// [`SerializationInfo::get_string`](crate::serialization::SerializationInfo::get_string),
/// which keeps an absent member distinct from a failed conversion.
pub trait ReadPrimitive: Primitive + Sized {
    /// Extract the payload if `value` holds this exact kind
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert a raw stored value through `converter`
    ///
    /// # Errors
    /// Returns whatever the converter reports.
    fn coerce(converter: &dyn FormatterConverter, value: Option<&Value>) -> Result<Self>;
}

macro_rules! primitive {
    ($($ty:ty => $kind:ident, $variant:ident, $convert:ident);* $(;)?) => {
        $(
            impl Primitive for $ty {
                const KIND: CilPrimitiveKind = CilPrimitiveKind::$kind;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl ReadPrimitive for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(*inner),
                        _ => None,
                    }
                }

                fn coerce(
                    converter: &dyn FormatterConverter,
                    value: Option<&Value>,
                ) -> Result<Self> {
                    converter.$convert(value)
                }
            }
        )*
    };
}

primitive!(
    bool => Boolean, Boolean, to_boolean;
    char => Char, Char, to_char;
    i8 => I1, SByte, to_sbyte;
    u8 => U1, Byte, to_byte;
    i16 => I2, Int16, to_int16;
    u16 => U2, UInt16, to_uint16;
    i32 => I4, Int32, to_int32;
    u32 => U4, UInt32, to_uint32;
    i64 => I8, Int64, to_int64;
    u64 => U8, UInt64, to_uint64;
    f32 => R4, Single, to_single;
    f64 => R8, Double, to_double;
    Decimal => Decimal, Decimal, to_decimal;
    DateTime => DateTime, DateTime, to_date_time;
);

impl Primitive for String {
    const KIND: CilPrimitiveKind = CilPrimitiveKind::String;

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl Primitive for &str {
    const KIND: CilPrimitiveKind = CilPrimitiveKind::String;

    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::DefaultConverter;

    #[test]
    fn test_kinds() {
        assert_eq!(<bool as Primitive>::KIND, CilPrimitiveKind::Boolean);
        assert_eq!(<u16 as Primitive>::KIND, CilPrimitiveKind::U2);
        assert_eq!(<f32 as Primitive>::KIND, CilPrimitiveKind::R4);
        assert_eq!(<Decimal as Primitive>::KIND, CilPrimitiveKind::Decimal);
        assert_eq!(<&str as Primitive>::KIND, CilPrimitiveKind::String);
        assert_eq!(<String as Primitive>::KIND, CilPrimitiveKind::String);
    }

    #[test]
    fn test_values_report_their_kind() {
        assert_eq!(7i64.into_value().kind(), i64::KIND);
        assert_eq!('c'.into_value().kind(), char::KIND);
        assert_eq!("str".into_value().kind(), String::KIND);
        assert_eq!(DateTime::MIN.into_value().kind(), DateTime::KIND);
    }

    #[test]
    fn test_from_value_exact_only() {
        assert_eq!(i32::from_value(&Value::Int32(5)), Some(5));
        assert_eq!(i32::from_value(&Value::Int64(5)), None);
        assert_eq!(char::from_value(&Value::Char('a')), Some('a'));
        assert_eq!(char::from_value(&Value::from("a")), None);
    }

    #[test]
    fn test_coerce_uses_converter() {
        let converter = DefaultConverter;
        assert_eq!(i64::coerce(&converter, Some(&Value::Int32(5))).unwrap(), 5);
        assert_eq!(
            char::coerce(&converter, Some(&Value::UInt16(65))).unwrap(),
            'A'
        );
        assert_eq!(
            i32::coerce(&converter, None),
            Err(crate::Error::ArgumentNull("value"))
        );
    }
}
