//! Values that can be stored in a serialization store.
//!
//! [`Value`] is the closed set of kinds a member can hold: the corelib scalars, plus
//! [`ObjectRef`], a handle to another object of the graph being serialized. Each variant
//! knows its concrete runtime type, which is what
//! [`crate::serialization::SerializationInfo::add_value`] records as the declared type.
//!
//! # Display
//!
//! The [`std::fmt::Display`] form of a value follows invariant-culture `ToString`
//! conventions: `True`/`False` for booleans, `E+XX` exponents for very large or small
//! floating point numbers, `MM/dd/yyyy HH:mm:ss` for dates, and the full type name for
//! object references.

mod datetime;
mod decimal;

use std::{fmt, sync::Arc};

pub use datetime::{DateTime, DateTimeKind, MAX_TICKS, TICKS_PER_DAY, TICKS_PER_SECOND};
pub use decimal::Decimal;

use crate::metadata::typesystem::{CilPrimitiveKind, CilTypeRc};

/// Reference to another object of the graph.
///
/// During deserialization a member may first hold a placeholder reference that a later
/// fixup replaces with the resolved object.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    /// Identifier of the referenced object within its graph
    pub id: u64,
    /// Concrete type of the referenced object
    pub ty: CilTypeRc,
}

impl ObjectRef {
    /// Create a reference to object `id` of type `ty`
    pub fn new(id: u64, ty: &CilTypeRc) -> Self {
        ObjectRef { id, ty: ty.clone() }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.ty, &other.ty)
    }
}

/// A single stored value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// System.Boolean
    Boolean(bool),
    /// System.Char
    Char(char),
    /// System.SByte
    SByte(i8),
    /// System.Byte
    Byte(u8),
    /// System.Int16
    Int16(i16),
    /// System.UInt16
    UInt16(u16),
    /// System.Int32
    Int32(i32),
    /// System.UInt32
    UInt32(u32),
    /// System.Int64
    Int64(i64),
    /// System.UInt64
    UInt64(u64),
    /// System.Single
    Single(f32),
    /// System.Double
    Double(f64),
    /// System.Decimal
    Decimal(Decimal),
    /// System.DateTime
    DateTime(DateTime),
    /// System.String
    String(String),
    /// Any other object of the graph
    Object(ObjectRef),
}

impl Value {
    /// The corelib kind of this value; object references report [`CilPrimitiveKind::Object`]
    #[must_use]
    pub fn kind(&self) -> CilPrimitiveKind {
        match self {
            Value::Boolean(_) => CilPrimitiveKind::Boolean,
            Value::Char(_) => CilPrimitiveKind::Char,
            Value::SByte(_) => CilPrimitiveKind::I1,
            Value::Byte(_) => CilPrimitiveKind::U1,
            Value::Int16(_) => CilPrimitiveKind::I2,
            Value::UInt16(_) => CilPrimitiveKind::U2,
            Value::Int32(_) => CilPrimitiveKind::I4,
            Value::UInt32(_) => CilPrimitiveKind::U4,
            Value::Int64(_) => CilPrimitiveKind::I8,
            Value::UInt64(_) => CilPrimitiveKind::U8,
            Value::Single(_) => CilPrimitiveKind::R4,
            Value::Double(_) => CilPrimitiveKind::R8,
            Value::Decimal(_) => CilPrimitiveKind::Decimal,
            Value::DateTime(_) => CilPrimitiveKind::DateTime,
            Value::String(_) => CilPrimitiveKind::String,
            Value::Object(_) => CilPrimitiveKind::Object,
        }
    }

    /// The concrete type of this value
    #[must_use]
    pub fn runtime_type(&self) -> CilTypeRc {
        match self {
            Value::Object(object) => object.ty.clone(),
            other => other.kind().type_ref(),
        }
    }

    /// Full name of the concrete type of this value
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Value::Object(object) => object.ty.fullname(),
            other => other.kind().clr_full_name().to_string(),
        }
    }

    /// Borrow the string payload, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
            Value::Char(value) => write!(f, "{value}"),
            Value::SByte(value) => write!(f, "{value}"),
            Value::Byte(value) => write!(f, "{value}"),
            Value::Int16(value) => write!(f, "{value}"),
            Value::UInt16(value) => write!(f, "{value}"),
            Value::Int32(value) => write!(f, "{value}"),
            Value::UInt32(value) => write!(f, "{value}"),
            Value::Int64(value) => write!(f, "{value}"),
            Value::UInt64(value) => write!(f, "{value}"),
            Value::Single(value) => {
                f.write_str(&format_float(f64::from(*value), format!("{value:e}"), 7))
            }
            Value::Double(value) => f.write_str(&format_float(*value, format!("{value:e}"), 15)),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Object(object) => f.write_str(&object.ty.fullname()),
        }
    }
}

/// Format a float from its shortest scientific form (`1.5e-7`) the way invariant culture
/// `ToString` does: positional when the exponent lies in `-5..precision`, otherwise
/// `d.dddE+XX`.
fn format_float(value: f64, scientific: String, precision: i32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let (mantissa, exponent) = scientific
        .split_once('e')
        .map_or((scientific.as_str(), 0), |(mantissa, exponent)| {
            (mantissa, exponent.parse::<i32>().unwrap_or(0))
        });
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let sign = if negative && digits != "0" { "-" } else { "" };

    if (-5..precision).contains(&exponent) {
        #[allow(clippy::cast_sign_loss)]
        let body = if exponent < 0 {
            format!("0.{}{digits}", "0".repeat((-exponent - 1) as usize))
        } else {
            let int_len = exponent as usize + 1;
            if digits.len() > int_len {
                format!("{}.{}", &digits[..int_len], &digits[int_len..])
            } else {
                format!("{digits}{}", "0".repeat(int_len - digits.len()))
            }
        };
        return format!("{sign}{body}");
    }

    let (first, rest) = digits.split_at(1);
    let fraction = if rest.is_empty() {
        String::new()
    } else {
        format!(".{rest}")
    };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{first}{fraction}E{exp_sign}{:02}", exponent.abs())
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from!(
    bool => Boolean,
    char => Char,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    DateTime => DateTime,
    String => String,
    ObjectRef => Object,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeBuilder, TypeRegistry};

    #[test]
    fn test_kind_and_runtime_type() {
        assert_eq!(Value::from(7u16).kind(), CilPrimitiveKind::U2);
        assert_eq!(Value::from("x").kind(), CilPrimitiveKind::String);
        assert!(Arc::ptr_eq(
            &Value::from(1.5f64).runtime_type(),
            &CilPrimitiveKind::R8.type_ref()
        ));

        let registry = TypeRegistry::new();
        let node = TypeBuilder::class("Graph", "Node").build(&registry);
        let reference = Value::from(ObjectRef::new(3, &node));
        assert_eq!(reference.kind(), CilPrimitiveKind::Object);
        assert!(Arc::ptr_eq(&reference.runtime_type(), &node));
        assert_eq!(reference.type_name(), "Graph.Node");
        assert_eq!(reference.to_string(), "Graph.Node");
    }

    #[test]
    fn test_object_ref_equality() {
        let registry = TypeRegistry::new();
        let a = TypeBuilder::class("N", "A").build(&registry);
        let b = TypeBuilder::class("N", "B").build(&registry);

        assert_eq!(ObjectRef::new(1, &a), ObjectRef::new(1, &a));
        assert_ne!(ObjectRef::new(1, &a), ObjectRef::new(2, &a));
        assert_ne!(ObjectRef::new(1, &a), ObjectRef::new(1, &b));
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Boolean(true).to_string(), "True");
        assert_eq!(Value::Boolean(false).to_string(), "False");
        assert_eq!(Value::Char('Z').to_string(), "Z");
        assert_eq!(Value::Int64(-42).to_string(), "-42");
        assert_eq!(Value::from("plain").to_string(), "plain");
    }

    #[test]
    fn test_display_floats() {
        assert_eq!(Value::Double(1.0).to_string(), "1");
        assert_eq!(Value::Double(-0.5).to_string(), "-0.5");
        assert_eq!(Value::Double(0.1).to_string(), "0.1");
        assert_eq!(Value::Double(123_456.789).to_string(), "123456.789");
        assert_eq!(Value::Double(1e15).to_string(), "1E+15");
        assert_eq!(Value::Double(1e14).to_string(), "100000000000000");
        assert_eq!(Value::Double(1.5e-7).to_string(), "1.5E-07");
        assert_eq!(Value::Double(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Double(0.0).to_string(), "0");
        assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Single(3.25).to_string(), "3.25");
        assert_eq!(Value::Single(1e7).to_string(), "1E+07");
        assert_eq!(Value::Single(0.1).to_string(), "0.1");
    }
}
