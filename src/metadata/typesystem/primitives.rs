use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::metadata::{
    identity::AssemblyIdentity,
    token::Token,
    typesystem::{CilFlavor, CilType, CilTypeRc, TypeAttributes},
};

/// Represents the built-in corelib types a serialization store knows how to read natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum CilPrimitiveKind {
    /// System.Object - base class for all reference types
    Object,
    /// System.ValueType - base class for value types
    ValueType,
    /// System.Boolean - true/false value
    Boolean,
    /// System.Char - Unicode 16-bit character
    Char,
    /// System.SByte - signed 8-bit integer
    I1,
    /// System.Byte - unsigned 8-bit integer
    U1,
    /// System.Int16 - signed 16-bit integer
    I2,
    /// System.UInt16 - unsigned 16-bit integer
    U2,
    /// System.Int32 - signed 32-bit integer
    I4,
    /// System.UInt32 - unsigned 32-bit integer
    U4,
    /// System.Int64 - signed 64-bit integer
    I8,
    /// System.UInt64 - unsigned 64-bit integer
    U8,
    /// System.Single - 32-bit floating point
    R4,
    /// System.Double - 64-bit floating point
    R8,
    /// System.Decimal - 96-bit scaled decimal
    Decimal,
    /// System.DateTime - 100ns ticks since 0001-01-01
    DateTime,
    /// System.String - immutable string of Unicode characters
    String,
}

impl CilPrimitiveKind {
    /// Get the token for this type
    #[must_use]
    pub fn token(&self) -> Token {
        Token::new(match self {
            CilPrimitiveKind::Boolean => 0xF000_0002,
            CilPrimitiveKind::Char => 0xF000_0003,
            CilPrimitiveKind::I1 => 0xF000_0004,
            CilPrimitiveKind::U1 => 0xF000_0005,
            CilPrimitiveKind::I2 => 0xF000_0006,
            CilPrimitiveKind::U2 => 0xF000_0007,
            CilPrimitiveKind::I4 => 0xF000_0008,
            CilPrimitiveKind::U4 => 0xF000_0009,
            CilPrimitiveKind::I8 => 0xF000_000A,
            CilPrimitiveKind::U8 => 0xF000_000B,
            CilPrimitiveKind::R4 => 0xF000_000C,
            CilPrimitiveKind::R8 => 0xF000_000D,
            CilPrimitiveKind::Object => 0xF000_0010,
            CilPrimitiveKind::String => 0xF000_0011,
            CilPrimitiveKind::ValueType => 0xF000_0013,
            CilPrimitiveKind::Decimal => 0xF000_0018,
            CilPrimitiveKind::DateTime => 0xF000_0019,
        })
    }

    /// Get the short name (without namespace)
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Object => "Object",
            CilPrimitiveKind::ValueType => "ValueType",
            CilPrimitiveKind::Boolean => "Boolean",
            CilPrimitiveKind::Char => "Char",
            CilPrimitiveKind::I1 => "SByte",
            CilPrimitiveKind::U1 => "Byte",
            CilPrimitiveKind::I2 => "Int16",
            CilPrimitiveKind::U2 => "UInt16",
            CilPrimitiveKind::I4 => "Int32",
            CilPrimitiveKind::U4 => "UInt32",
            CilPrimitiveKind::I8 => "Int64",
            CilPrimitiveKind::U8 => "UInt64",
            CilPrimitiveKind::R4 => "Single",
            CilPrimitiveKind::R8 => "Double",
            CilPrimitiveKind::Decimal => "Decimal",
            CilPrimitiveKind::DateTime => "DateTime",
            CilPrimitiveKind::String => "String",
        }
    }

    /// Get the namespace of this type
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        "System"
    }

    /// Get the full CLR name, e.g. `System.Int32`
    #[must_use]
    pub fn clr_full_name(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Object => "System.Object",
            CilPrimitiveKind::ValueType => "System.ValueType",
            CilPrimitiveKind::Boolean => "System.Boolean",
            CilPrimitiveKind::Char => "System.Char",
            CilPrimitiveKind::I1 => "System.SByte",
            CilPrimitiveKind::U1 => "System.Byte",
            CilPrimitiveKind::I2 => "System.Int16",
            CilPrimitiveKind::U2 => "System.UInt16",
            CilPrimitiveKind::I4 => "System.Int32",
            CilPrimitiveKind::U4 => "System.UInt32",
            CilPrimitiveKind::I8 => "System.Int64",
            CilPrimitiveKind::U8 => "System.UInt64",
            CilPrimitiveKind::R4 => "System.Single",
            CilPrimitiveKind::R8 => "System.Double",
            CilPrimitiveKind::Decimal => "System.Decimal",
            CilPrimitiveKind::DateTime => "System.DateTime",
            CilPrimitiveKind::String => "System.String",
        }
    }

    /// Look up a primitive by its full CLR name
    #[must_use]
    pub fn from_clr_full_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.clr_full_name() == name)
    }

    /// Check if instances of this type are stored by value
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            CilPrimitiveKind::Object | CilPrimitiveKind::ValueType | CilPrimitiveKind::String
        )
    }

    /// Check if this is an integral type (excluding Boolean and Char)
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            CilPrimitiveKind::I1
                | CilPrimitiveKind::U1
                | CilPrimitiveKind::I2
                | CilPrimitiveKind::U2
                | CilPrimitiveKind::I4
                | CilPrimitiveKind::U4
                | CilPrimitiveKind::I8
                | CilPrimitiveKind::U8
        )
    }

    /// Check if this is any numeric type, integral, floating point or decimal
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                CilPrimitiveKind::R4 | CilPrimitiveKind::R8 | CilPrimitiveKind::Decimal
            )
    }

    /// The shared corelib type for this primitive.
    ///
    /// Every call returns the same allocation, so results can be compared with
    /// [`Arc::ptr_eq`].
    #[must_use]
    pub fn type_ref(self) -> CilTypeRc {
        corelib_types()[self as usize].clone()
    }
}

impl fmt::Display for CilPrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.clr_full_name())
    }
}

/// Corelib singletons, indexed by discriminant
fn corelib_types() -> &'static [CilTypeRc] {
    static TYPES: OnceLock<Vec<CilTypeRc>> = OnceLock::new();
    TYPES.get_or_init(|| {
        let corelib = AssemblyIdentity::corelib();
        let create = |kind: CilPrimitiveKind| {
            let mut flags = TypeAttributes::PUBLIC | TypeAttributes::SERIALIZABLE;
            match kind {
                CilPrimitiveKind::Object => {}
                CilPrimitiveKind::ValueType => flags |= TypeAttributes::ABSTRACT,
                _ => flags |= TypeAttributes::SEALED,
            }

            Arc::new(CilType::new(
                kind.token(),
                CilFlavor::Primitive(kind),
                kind.namespace(),
                kind.name(),
                flags,
                corelib.clone(),
            ))
        };

        let object = create(CilPrimitiveKind::Object);
        let value_type = create(CilPrimitiveKind::ValueType);
        value_type.set_base(&object);

        let mut types = Vec::with_capacity(CilPrimitiveKind::COUNT);
        for kind in CilPrimitiveKind::iter() {
            let ty = match kind {
                CilPrimitiveKind::Object => object.clone(),
                CilPrimitiveKind::ValueType => value_type.clone(),
                CilPrimitiveKind::String => {
                    let ty = create(kind);
                    ty.set_base(&object);
                    ty
                }
                _ => {
                    let ty = create(kind);
                    ty.set_base(&value_type);
                    ty
                }
            };
            types.push(ty);
        }

        types
    })
}
