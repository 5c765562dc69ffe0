use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::metadata::{
    token::Token,
    typesystem::{CilPrimitiveKind, CilType, CilTypeRc},
};

/// A vector that holds a list of weak type references
pub type CilTypeRefList = Arc<boxcar::Vec<CilTypeRef>>;

/// A weak reference to a `CilType`, used for base, enclosing and interface links so that
/// type graphs do not keep each other alive.
#[derive(Clone, Debug)]
pub struct CilTypeRef {
    weak_ref: Weak<CilType>,
}

impl CilTypeRef {
    /// Create a new `CilTypeRef` from a strong reference
    pub fn new(strong_ref: &CilTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<CilTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the full name of the referenced type (if still alive)
    #[must_use]
    pub fn fullname(&self) -> Option<String> {
        self.upgrade().map(|t| t.fullname())
    }
}

impl From<CilTypeRc> for CilTypeRef {
    fn from(strong_ref: CilTypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// Category of a [`CilType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CilFlavor {
    /// One of the built-in corelib types
    Primitive(CilPrimitiveKind),
    /// A reference type
    Class,
    /// A user defined struct
    ValueType,
    /// An interface
    Interface,
    /// An enumeration
    Enum,
    /// An open generic parameter (`T`, `!!0`)
    GenericParameter {
        /// Index in the generic parameters list
        index: u32,
        /// Whether it's a method parameter (true) or type parameter (false)
        method: bool,
    },
    /// A reference that could not be bound to a definition
    Unresolved,
}

impl CilFlavor {
    /// Check if this is a corelib primitive
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, CilFlavor::Primitive(_))
    }

    /// Check if instances of this flavor are stored by value
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            CilFlavor::Primitive(kind) => kind.is_value_type(),
            CilFlavor::ValueType | CilFlavor::Enum => true,
            _ => false,
        }
    }

    /// Check if this is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self, CilFlavor::Interface)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Type attribute flags as stored in `TypeDef.Flags` (§II.23.1.15)
    pub struct TypeAttributes: u32 {
        /// Type is public
        const PUBLIC = 0x0000_0001;
        /// Nested type with public visibility
        const NESTED_PUBLIC = 0x0000_0002;
        /// Nested type with private visibility
        const NESTED_PRIVATE = 0x0000_0003;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type is abstract
        const ABSTRACT = 0x0000_0080;
        /// Type cannot be derived from
        const SEALED = 0x0000_0100;
        /// Type name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Type can be serialized
        const SERIALIZABLE = 0x0000_2000;
        /// Static initializer runs lazily
        const BEFORE_FIELD_INIT = 0x0010_0000;
    }
}

impl TypeAttributes {
    /// Visibility bits of raw type flags
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;

    /// Whether the visibility bits mark a nested type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.bits() & Self::VISIBILITY_MASK > Self::PUBLIC.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_predicates() {
        assert!(CilFlavor::Primitive(CilPrimitiveKind::I4).is_primitive());
        assert!(CilFlavor::Primitive(CilPrimitiveKind::I4).is_value_type());
        assert!(!CilFlavor::Primitive(CilPrimitiveKind::String).is_value_type());
        assert!(CilFlavor::Enum.is_value_type());
        assert!(!CilFlavor::Class.is_value_type());
        assert!(CilFlavor::Interface.is_interface());
    }

    #[test]
    fn type_attributes_visibility() {
        assert!(!TypeAttributes::PUBLIC.is_nested());
        assert!(TypeAttributes::NESTED_PUBLIC.is_nested());
        assert!((TypeAttributes::NESTED_PRIVATE | TypeAttributes::SEALED).is_nested());
        assert!(!(TypeAttributes::PUBLIC | TypeAttributes::SERIALIZABLE).is_nested());
    }

    #[test]
    fn weak_reference_lifetime() {
        let ty = CilPrimitiveKind::I4.type_ref();
        let weak = CilTypeRef::new(&ty);
        assert!(weak.is_valid());
        assert_eq!(weak.fullname().as_deref(), Some("System.Int32"));
        assert_eq!(weak.token(), Some(CilPrimitiveKind::I4.token()));
    }
}
