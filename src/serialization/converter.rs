//! Value coercion used when a stored type does not match the requested one.
//!
//! A [`crate::serialization::SerializationInfo`] only calls into its converter on a type
//! mismatch: a typed read whose declared type is neither identical to nor assignable to
//! the requested type. [`FormatterConverter`] is the seam; [`DefaultConverter`] implements
//! it with invariant-culture `System.Convert` rules.
//!
//! # Conversion Rules
//!
//! | From \ To      | Integers          | Boolean   | Char          | Single/Double | Decimal     | DateTime |
//! |----------------|-------------------|-----------|---------------|---------------|-------------|----------|
//! | Integers       | range checked     | non-zero  | range checked | exact/nearest | exact       | invalid  |
//! | Single/Double  | round half even   | non-zero  | invalid       | nearest       | shortest text | invalid |
//! | Decimal        | round half even   | non-zero  | invalid       | nearest       | identity    | invalid  |
//! | Boolean        | 0 / 1             | identity  | invalid       | 0 / 1         | 0 / 1       | invalid  |
//! | Char           | code point        | invalid   | identity      | invalid       | invalid     | invalid  |
//! | String         | parse             | "true"/"false" | one char | parse         | parse       | parse    |
//! | DateTime       | invalid           | invalid   | invalid       | invalid       | invalid     | identity |
//!
//! Every kind converts to a string through its invariant [`std::fmt::Display`] form.

use std::num::IntErrorKind;

use crate::{
    metadata::typesystem::{CilPrimitiveKind, CilTypeRc},
    value::{DateTime, Decimal, Value},
    Error, Result,
};

/// Coerces stored values into requested types.
///
/// Implementations must be shareable across threads; a store holds its converter as an
/// `Arc<dyn FormatterConverter>` and never mutates it. Each `to_*` operation receives the
/// raw stored value, `None` when the member was added without a value.
pub trait FormatterConverter: Send + Sync {
    /// Convert `value` into an instance of `target`
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidCast`] if there is no conversion path, or the error
    /// of the underlying `to_*` operation.
    fn convert(&self, value: &Value, target: &CilTypeRc) -> Result<Value>;

    /// Coerce to `System.Boolean`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_boolean(&self, value: Option<&Value>) -> Result<bool>;

    /// Coerce to `System.Char`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_char(&self, value: Option<&Value>) -> Result<char>;

    /// Coerce to `System.SByte`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_sbyte(&self, value: Option<&Value>) -> Result<i8>;

    /// Coerce to `System.Byte`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_byte(&self, value: Option<&Value>) -> Result<u8>;

    /// Coerce to `System.Int16`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_int16(&self, value: Option<&Value>) -> Result<i16>;

    /// Coerce to `System.UInt16`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_uint16(&self, value: Option<&Value>) -> Result<u16>;

    /// Coerce to `System.Int32`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_int32(&self, value: Option<&Value>) -> Result<i32>;

    /// Coerce to `System.UInt32`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_uint32(&self, value: Option<&Value>) -> Result<u32>;

    /// Coerce to `System.Int64`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_int64(&self, value: Option<&Value>) -> Result<i64>;

    /// Coerce to `System.UInt64`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_uint64(&self, value: Option<&Value>) -> Result<u64>;

    /// Coerce to `System.Single`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_single(&self, value: Option<&Value>) -> Result<f32>;

    /// Coerce to `System.Double`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_double(&self, value: Option<&Value>) -> Result<f64>;

    /// Coerce to `System.Decimal`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_decimal(&self, value: Option<&Value>) -> Result<Decimal>;

    /// Coerce to `System.DateTime`
    ///
    /// # Errors
    /// Returns an error if the value is absent or cannot be converted.
    fn to_date_time(&self, value: Option<&Value>) -> Result<DateTime>;

    /// Render as `System.String`
    ///
    /// # Errors
    /// Returns an error if the value cannot be rendered.
    fn to_string(&self, value: &Value) -> Result<String>;
}

/// Invariant-culture converter modeled on `System.Convert`.
///
/// ```rust
/// use serinfo::serialization::{DefaultConverter, FormatterConverter};
/// use serinfo::value::Value;
///
/// let converter = DefaultConverter;
/// assert_eq!(converter.to_int32(Some(&Value::Double(2.5)))?, 2);
/// assert_eq!(converter.to_int32(Some(&Value::Double(3.5)))?, 4);
/// assert!(converter.to_byte(Some(&Value::Int32(300))).is_err());
/// assert!(converter.to_boolean(None).is_err());
/// # Ok::<(), serinfo::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultConverter;

enum Numeric {
    Integer(i128),
    Float(f64),
    Decimal(Decimal),
}

fn present(value: Option<&Value>) -> Result<&Value> {
    value.ok_or(Error::ArgumentNull("value"))
}

fn invalid_cast(value: &Value, target: CilPrimitiveKind) -> Error {
    Error::InvalidCast {
        from: value.type_name(),
        to: target.clr_full_name().to_string(),
    }
}

fn overflow(value: impl ToString, target: CilPrimitiveKind) -> Error {
    Error::Overflow {
        value: value.to_string(),
        target: target.clr_full_name().to_string(),
    }
}

/// Numeric view of the kinds every integer target accepts
fn integral_source(value: &Value, target: CilPrimitiveKind) -> Result<Numeric> {
    Ok(match value {
        Value::Boolean(v) => Numeric::Integer(i128::from(*v)),
        Value::Char(v) => Numeric::Integer(i128::from(u32::from(*v))),
        Value::SByte(v) => Numeric::Integer(i128::from(*v)),
        Value::Byte(v) => Numeric::Integer(i128::from(*v)),
        Value::Int16(v) => Numeric::Integer(i128::from(*v)),
        Value::UInt16(v) => Numeric::Integer(i128::from(*v)),
        Value::Int32(v) => Numeric::Integer(i128::from(*v)),
        Value::UInt32(v) => Numeric::Integer(i128::from(*v)),
        Value::Int64(v) => Numeric::Integer(i128::from(*v)),
        Value::UInt64(v) => Numeric::Integer(i128::from(*v)),
        Value::Single(v) => Numeric::Float(f64::from(*v)),
        Value::Double(v) => Numeric::Float(*v),
        Value::Decimal(v) => Numeric::Decimal(*v),
        Value::String(text) => match text.trim().parse::<i128>() {
            Ok(v) => Numeric::Integer(v),
            Err(error) => {
                return Err(match error.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        overflow(text.trim(), target)
                    }
                    _ => Error::Format(format!(
                        "'{text}' is not a valid {}",
                        target.clr_full_name()
                    )),
                })
            }
        },
        Value::DateTime(_) | Value::Object(_) => return Err(invalid_cast(value, target)),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn to_integer<T>(value: Option<&Value>, target: CilPrimitiveKind) -> Result<T>
where
    T: TryFrom<i128>,
{
    let value = present(value)?;
    let integer = match integral_source(value, target)? {
        Numeric::Integer(v) => v,
        Numeric::Float(v) => {
            let rounded = v.round_ties_even();
            // Beyond this bound the value overflows every integer target anyway
            if !rounded.is_finite() || rounded.abs() >= 1e38 {
                return Err(overflow(value, target));
            }
            rounded as i128
        }
        Numeric::Decimal(v) => v.round_to_integer(),
    };

    T::try_from(integer).map_err(|_| overflow(value, target))
}

fn to_float(value: Option<&Value>, target: CilPrimitiveKind) -> Result<f64> {
    let value = present(value)?;
    #[allow(clippy::cast_precision_loss)]
    let result = match value {
        Value::Boolean(v) => f64::from(u8::from(*v)),
        Value::SByte(v) => f64::from(*v),
        Value::Byte(v) => f64::from(*v),
        Value::Int16(v) => f64::from(*v),
        Value::UInt16(v) => f64::from(*v),
        Value::Int32(v) => f64::from(*v),
        Value::UInt32(v) => f64::from(*v),
        Value::Int64(v) => *v as f64,
        Value::UInt64(v) => *v as f64,
        Value::Single(v) => f64::from(*v),
        Value::Double(v) => *v,
        Value::Decimal(v) => v.to_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Format(format!("'{text}' is not a valid {}", target)))?,
        Value::Char(_) | Value::DateTime(_) | Value::Object(_) => {
            return Err(invalid_cast(value, target))
        }
    };

    Ok(result)
}

impl FormatterConverter for DefaultConverter {
    fn convert(&self, value: &Value, target: &CilTypeRc) -> Result<Value> {
        let Some(kind) = target.primitive_kind() else {
            if target.is_assignable_from(&value.runtime_type()) {
                return Ok(value.clone());
            }
            return Err(Error::InvalidCast {
                from: value.type_name(),
                to: target.fullname(),
            });
        };

        let value = Some(value);
        Ok(match kind {
            CilPrimitiveKind::Object => present(value)?.clone(),
            CilPrimitiveKind::ValueType => {
                let value = present(value)?;
                if !value.kind().is_value_type() {
                    return Err(invalid_cast(value, kind));
                }
                value.clone()
            }
            CilPrimitiveKind::Boolean => Value::Boolean(self.to_boolean(value)?),
            CilPrimitiveKind::Char => Value::Char(self.to_char(value)?),
            CilPrimitiveKind::I1 => Value::SByte(self.to_sbyte(value)?),
            CilPrimitiveKind::U1 => Value::Byte(self.to_byte(value)?),
            CilPrimitiveKind::I2 => Value::Int16(self.to_int16(value)?),
            CilPrimitiveKind::U2 => Value::UInt16(self.to_uint16(value)?),
            CilPrimitiveKind::I4 => Value::Int32(self.to_int32(value)?),
            CilPrimitiveKind::U4 => Value::UInt32(self.to_uint32(value)?),
            CilPrimitiveKind::I8 => Value::Int64(self.to_int64(value)?),
            CilPrimitiveKind::U8 => Value::UInt64(self.to_uint64(value)?),
            CilPrimitiveKind::R4 => Value::Single(self.to_single(value)?),
            CilPrimitiveKind::R8 => Value::Double(self.to_double(value)?),
            CilPrimitiveKind::Decimal => Value::Decimal(self.to_decimal(value)?),
            CilPrimitiveKind::DateTime => Value::DateTime(self.to_date_time(value)?),
            CilPrimitiveKind::String => Value::String(self.to_string(present(value)?)?),
        })
    }

    fn to_boolean(&self, value: Option<&Value>) -> Result<bool> {
        let value = present(value)?;
        match value {
            Value::Boolean(v) => Ok(*v),
            Value::Single(v) => Ok(*v != 0.0),
            Value::Double(v) => Ok(*v != 0.0),
            Value::Decimal(v) => Ok(!v.is_zero()),
            Value::String(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(Error::Format(format!(
                        "'{text}' is not a valid System.Boolean"
                    )))
                }
            }
            Value::Char(_) | Value::DateTime(_) | Value::Object(_) => {
                Err(invalid_cast(value, CilPrimitiveKind::Boolean))
            }
            integer => match integral_source(integer, CilPrimitiveKind::Boolean)? {
                Numeric::Integer(v) => Ok(v != 0),
                _ => Err(invalid_cast(value, CilPrimitiveKind::Boolean)),
            },
        }
    }

    fn to_char(&self, value: Option<&Value>) -> Result<char> {
        let value = present(value)?;
        match value {
            Value::Char(v) => Ok(*v),
            Value::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(Error::Format(format!(
                        "'{text}' must be exactly one character long"
                    ))),
                }
            }
            Value::SByte(_)
            | Value::Byte(_)
            | Value::Int16(_)
            | Value::UInt16(_)
            | Value::Int32(_)
            | Value::UInt32(_)
            | Value::Int64(_)
            | Value::UInt64(_) => {
                let code: u16 = to_integer(Some(value), CilPrimitiveKind::Char)?;
                char::from_u32(u32::from(code))
                    .ok_or_else(|| invalid_cast(value, CilPrimitiveKind::Char))
            }
            _ => Err(invalid_cast(value, CilPrimitiveKind::Char)),
        }
    }

    fn to_sbyte(&self, value: Option<&Value>) -> Result<i8> {
        to_integer(value, CilPrimitiveKind::I1)
    }

    fn to_byte(&self, value: Option<&Value>) -> Result<u8> {
        to_integer(value, CilPrimitiveKind::U1)
    }

    fn to_int16(&self, value: Option<&Value>) -> Result<i16> {
        to_integer(value, CilPrimitiveKind::I2)
    }

    fn to_uint16(&self, value: Option<&Value>) -> Result<u16> {
        to_integer(value, CilPrimitiveKind::U2)
    }

    fn to_int32(&self, value: Option<&Value>) -> Result<i32> {
        to_integer(value, CilPrimitiveKind::I4)
    }

    fn to_uint32(&self, value: Option<&Value>) -> Result<u32> {
        to_integer(value, CilPrimitiveKind::U4)
    }

    fn to_int64(&self, value: Option<&Value>) -> Result<i64> {
        to_integer(value, CilPrimitiveKind::I8)
    }

    fn to_uint64(&self, value: Option<&Value>) -> Result<u64> {
        to_integer(value, CilPrimitiveKind::U8)
    }

    fn to_single(&self, value: Option<&Value>) -> Result<f32> {
        match present(value)? {
            Value::Single(v) => Ok(*v),
            Value::String(text) => text.trim().parse::<f32>().map_err(|_| {
                Error::Format(format!("'{text}' is not a valid System.Single"))
            }),
            other => {
                #[allow(clippy::cast_possible_truncation)]
                let single = to_float(Some(other), CilPrimitiveKind::R4)? as f32;
                Ok(single)
            }
        }
    }

    fn to_double(&self, value: Option<&Value>) -> Result<f64> {
        to_float(value, CilPrimitiveKind::R8)
    }

    fn to_decimal(&self, value: Option<&Value>) -> Result<Decimal> {
        let value = present(value)?;
        match value {
            Value::Decimal(v) => Ok(*v),
            Value::Single(v) => Decimal::from_f32(*v),
            Value::Double(v) => Decimal::from_f64(*v),
            Value::String(text) => text.parse(),
            Value::Char(_) | Value::DateTime(_) | Value::Object(_) => {
                Err(invalid_cast(value, CilPrimitiveKind::Decimal))
            }
            integer => match integral_source(integer, CilPrimitiveKind::Decimal)? {
                Numeric::Integer(v) => Decimal::new(v, 0),
                _ => Err(invalid_cast(value, CilPrimitiveKind::Decimal)),
            },
        }
    }

    fn to_date_time(&self, value: Option<&Value>) -> Result<DateTime> {
        match present(value)? {
            Value::DateTime(v) => Ok(*v),
            Value::String(text) => DateTime::parse(text),
            other => Err(invalid_cast(other, CilPrimitiveKind::DateTime)),
        }
    }

    fn to_string(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeBuilder, TypeRegistry};
    use crate::value::{DateTimeKind, ObjectRef};

    const C: DefaultConverter = DefaultConverter;

    #[test]
    fn test_absent_value_is_argument_null() {
        assert_eq!(C.to_int32(None), Err(Error::ArgumentNull("value")));
        assert_eq!(C.to_boolean(None), Err(Error::ArgumentNull("value")));
        assert_eq!(C.to_char(None), Err(Error::ArgumentNull("value")));
        assert_eq!(C.to_double(None), Err(Error::ArgumentNull("value")));
        assert_eq!(C.to_decimal(None), Err(Error::ArgumentNull("value")));
        assert_eq!(C.to_date_time(None), Err(Error::ArgumentNull("value")));
    }

    #[test]
    fn test_integer_range_checks() {
        assert_eq!(C.to_int64(Some(&Value::Int32(5))).unwrap(), 5);
        assert_eq!(C.to_byte(Some(&Value::Int64(255))).unwrap(), 255);
        assert!(matches!(
            C.to_byte(Some(&Value::Int32(256))),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            C.to_uint32(Some(&Value::SByte(-1))),
            Err(Error::Overflow { .. })
        ));
        assert_eq!(C.to_int16(Some(&Value::Boolean(true))).unwrap(), 1);
        assert_eq!(C.to_int32(Some(&Value::Char('A'))).unwrap(), 65);
        assert_eq!(
            C.to_uint64(Some(&Value::UInt64(u64::MAX))).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn test_integer_rounding() {
        assert_eq!(C.to_int32(Some(&Value::Double(2.5))).unwrap(), 2);
        assert_eq!(C.to_int32(Some(&Value::Double(-3.5))).unwrap(), -4);
        assert_eq!(C.to_int32(Some(&Value::Single(7.6))).unwrap(), 8);
        assert_eq!(
            C.to_int64(Some(&Value::Decimal("10.5".parse().unwrap())))
                .unwrap(),
            10
        );
        assert!(matches!(
            C.to_int32(Some(&Value::Double(2_147_483_647.5))),
            Err(Error::Overflow { .. })
        ));
        assert_eq!(
            C.to_int32(Some(&Value::Double(-2_147_483_648.5))).unwrap(),
            i32::MIN
        );
        assert!(matches!(
            C.to_int64(Some(&Value::Double(f64::NAN))),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            C.to_uint64(Some(&Value::Double(1e300))),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_integer_from_string() {
        assert_eq!(C.to_int32(Some(&Value::from(" -17 "))).unwrap(), -17);
        assert_eq!(C.to_uint16(Some(&Value::from("+8"))).unwrap(), 8);
        assert!(matches!(
            C.to_int32(Some(&Value::from("1.5"))),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            C.to_int32(Some(&Value::from("abc"))),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            C.to_byte(Some(&Value::from("999"))),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            C.to_int64(Some(&Value::from("9".repeat(50).as_str()))),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_invalid_casts() {
        let date = Value::DateTime(DateTime::new(0, DateTimeKind::Utc).unwrap());
        assert!(matches!(
            C.to_int32(Some(&date)),
            Err(Error::InvalidCast { .. })
        ));
        assert!(matches!(
            C.to_boolean(Some(&Value::Char('x'))),
            Err(Error::InvalidCast { .. })
        ));
        assert!(matches!(
            C.to_double(Some(&Value::Char('x'))),
            Err(Error::InvalidCast { .. })
        ));
        assert!(matches!(
            C.to_char(Some(&Value::Double(65.0))),
            Err(Error::InvalidCast { .. })
        ));
        assert!(matches!(
            C.to_date_time(Some(&Value::Int64(0))),
            Err(Error::InvalidCast { .. })
        ));

        match C.to_decimal(Some(&Value::Boolean(true))) {
            Ok(v) => assert_eq!(v, Decimal::from(1)),
            Err(e) => panic!("unexpected {e}"),
        }
    }

    #[test]
    fn test_boolean_rules() {
        assert!(C.to_boolean(Some(&Value::Int64(-3))).unwrap());
        assert!(!C.to_boolean(Some(&Value::Byte(0))).unwrap());
        assert!(C.to_boolean(Some(&Value::Double(0.1))).unwrap());
        assert!(C.to_boolean(Some(&Value::from(" TRUE "))).unwrap());
        assert!(!C.to_boolean(Some(&Value::from("false"))).unwrap());
        assert!(matches!(
            C.to_boolean(Some(&Value::from("yes"))),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_char_rules() {
        assert_eq!(C.to_char(Some(&Value::Int32(0x41))).unwrap(), 'A');
        assert_eq!(C.to_char(Some(&Value::from("é"))).unwrap(), 'é');
        assert!(matches!(
            C.to_char(Some(&Value::Int32(0x1_0000))),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            C.to_char(Some(&Value::Int32(0xD800))),
            Err(Error::InvalidCast { .. })
        ));
        assert!(matches!(
            C.to_char(Some(&Value::from("ab"))),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_float_and_decimal_rules() {
        assert_eq!(C.to_double(Some(&Value::Int32(3))).unwrap(), 3.0);
        assert_eq!(C.to_double(Some(&Value::from("1e3"))).unwrap(), 1000.0);
        assert_eq!(C.to_single(Some(&Value::Double(0.5))).unwrap(), 0.5);
        assert_eq!(C.to_single(Some(&Value::from("0.25"))).unwrap(), 0.25);
        assert_eq!(
            C.to_double(Some(&Value::Decimal("1.25".parse().unwrap())))
                .unwrap(),
            1.25
        );
        assert_eq!(
            C.to_decimal(Some(&Value::Double(0.1))).unwrap().to_string(),
            "0.1"
        );
        assert_eq!(
            C.to_decimal(Some(&Value::Int64(i64::MIN))).unwrap(),
            Decimal::from(i64::MIN)
        );
        assert!(matches!(
            C.to_decimal(Some(&Value::Double(f64::INFINITY))),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_date_time_rules() {
        let parsed = C
            .to_date_time(Some(&Value::from("2026-10-14T00:00:00Z")))
            .unwrap();
        assert_eq!(parsed.kind(), DateTimeKind::Utc);
        assert!(matches!(
            C.to_date_time(Some(&Value::from("not a date"))),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(C.to_string(&Value::Int32(42)).unwrap(), "42");
        assert_eq!(C.to_string(&Value::Boolean(true)).unwrap(), "True");
        assert_eq!(C.to_string(&Value::Double(2.5)).unwrap(), "2.5");
    }

    #[test]
    fn test_convert_dispatch() {
        let int64 = CilPrimitiveKind::I8.type_ref();
        assert_eq!(
            C.convert(&Value::Int32(9), &int64).unwrap(),
            Value::Int64(9)
        );
        assert_eq!(
            C.convert(&Value::Int32(9), &CilPrimitiveKind::String.type_ref())
                .unwrap(),
            Value::from("9")
        );
        assert_eq!(
            C.convert(&Value::from("x"), &CilPrimitiveKind::Object.type_ref())
                .unwrap(),
            Value::from("x")
        );
        assert_eq!(
            C.convert(&Value::Int16(1), &CilPrimitiveKind::ValueType.type_ref())
                .unwrap(),
            Value::Int16(1)
        );
        assert!(C
            .convert(&Value::from("x"), &CilPrimitiveKind::ValueType.type_ref())
            .is_err());
    }

    #[test]
    fn test_convert_user_types() {
        let registry = TypeRegistry::new();
        let animal = TypeBuilder::class("Zoo", "Animal").build(&registry);
        let cat = TypeBuilder::class("Zoo", "Cat").extends(&animal).build(&registry);
        let rock = TypeBuilder::class("Zoo", "Rock").build(&registry);

        let value = Value::Object(ObjectRef::new(1, &cat));
        assert_eq!(C.convert(&value, &animal).unwrap(), value);

        match C.convert(&value, &rock) {
            Err(Error::InvalidCast { from, to }) => {
                assert_eq!(from, "Zoo.Cat");
                assert_eq!(to, "Zoo.Rock");
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            C.convert(&Value::Int32(1), &rock),
            Err(Error::InvalidCast { .. })
        ));
    }
}
