//! Host type system consumed by the serialization store.
//!
//! A [`crate::serialization::SerializationInfo`] does not reason about types itself. It asks
//! the types it is handed for their identity, their assignability and their names. This
//! module provides those answers through a small .NET-shaped type model.
//!
//! # Key Components
//!
//! - [`CilType`]: A type definition with name, flavor, assembly and inheritance links
//! - [`TypeRegistry`]: Central registry that owns types and indexes them by token and name
//! - [`TypeBuilder`]: Builder pattern for constructing user defined types
//! - [`CilPrimitiveKind`]: Built-in corelib types (Int32, String, Object, ...)
//!
//! # Type Identity
//!
//! Types are shared as [`CilTypeRc`]. Two handles describe the same type exactly when they
//! point at the same allocation ([`Arc::ptr_eq`]). The corelib primitives are process-wide
//! singletons, so `CilPrimitiveKind::I4.type_ref()` is identical no matter where it is
//! obtained from.
//!
//! # Examples
//!
//! ```rust
//! use serinfo::metadata::typesystem::{CilPrimitiveKind, TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let shape = TypeBuilder::class("Geometry", "Shape").build(&registry);
//! let circle = TypeBuilder::class("Geometry", "Circle")
//!     .extends(&shape)
//!     .build(&registry);
//!
//! assert!(shape.is_assignable_from(&circle));
//! assert!(!circle.is_assignable_from(&shape));
//! assert!(CilPrimitiveKind::Object.type_ref().is_assignable_from(&circle));
//! ```

mod base;
mod builder;
mod primitives;
mod registry;

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

pub use base::{CilFlavor, CilTypeRef, CilTypeRefList, TypeAttributes};
pub use builder::TypeBuilder;
pub use primitives::CilPrimitiveKind;
pub use registry::TypeRegistry;

use crate::metadata::{identity::AssemblyIdentity, token::Token};

/// Reference to a `CilType`
pub type CilTypeRc = Arc<CilType>;

/// Upper bound on inheritance chains walked by assignability checks
const MAX_INHERITANCE_DEPTH: usize = 256;

/// A type definition, either one of the corelib primitives or a user defined type.
///
/// Links to other types (base, enclosing type, interfaces) are weak; the owning
/// [`TypeRegistry`] keeps the graph alive.
pub struct CilType {
    /// Token
    pub token: Token,
    /// The `TypeFlavor`
    pub flavor: CilFlavor,
    /// `TypeNamespace` (empty for nested types and the global namespace)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// Type attribute flags
    pub flags: TypeAttributes,
    /// The assembly this type is declared in
    pub assembly: Arc<AssemblyIdentity>,
    /// All interfaces this type implements directly
    pub interfaces: CilTypeRefList,
    /// All types that are 'contained' in this type
    pub nested_types: CilTypeRefList,
    base: OnceLock<CilTypeRef>,
    enclosing_type: OnceLock<CilTypeRef>,
}

impl CilType {
    /// Create a new instance of a `CilType` without base, enclosing type or interfaces
    pub fn new(
        token: Token,
        flavor: CilFlavor,
        namespace: impl Into<String>,
        name: impl Into<String>,
        flags: TypeAttributes,
        assembly: Arc<AssemblyIdentity>,
    ) -> Self {
        CilType {
            token,
            flavor,
            namespace: namespace.into(),
            name: name.into(),
            flags,
            assembly,
            interfaces: Arc::new(boxcar::Vec::new()),
            nested_types: Arc::new(boxcar::Vec::new()),
            base: OnceLock::new(),
            enclosing_type: OnceLock::new(),
        }
    }

    /// Access the base type of this type, if it exists
    pub fn base(&self) -> Option<CilTypeRc> {
        self.base.get().and_then(CilTypeRef::upgrade)
    }

    /// Set the base type; returns `false` if a base was already set
    pub fn set_base(&self, base: &CilTypeRc) -> bool {
        self.base.set(CilTypeRef::new(base)).is_ok()
    }

    /// Access the type this type is nested in, if any
    pub fn enclosing_type(&self) -> Option<CilTypeRc> {
        self.enclosing_type.get().and_then(CilTypeRef::upgrade)
    }

    /// Set the enclosing type; returns `false` if one was already set
    pub fn set_enclosing_type(&self, enclosing: &CilTypeRc) -> bool {
        self.enclosing_type.set(CilTypeRef::new(enclosing)).is_ok()
    }

    /// Record that this type implements `interface`
    pub fn add_interface(&self, interface: &CilTypeRc) {
        self.interfaces.push(CilTypeRef::new(interface));
    }

    /// Returns the full name of the type.
    ///
    /// Top-level types render as `Namespace.Name`, nested types as `Outer+Inner`.
    pub fn fullname(&self) -> String {
        if let Some(enclosing) = self.enclosing_type() {
            return format!("{}+{}", enclosing.fullname(), self.name);
        }

        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Display name of the assembly this type is declared in
    pub fn assembly_name(&self) -> String {
        self.assembly.display_name()
    }

    /// The corelib primitive this type stands for, if it is one
    pub fn primitive_kind(&self) -> Option<CilPrimitiveKind> {
        match self.flavor {
            CilFlavor::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether this type can describe a live value.
    ///
    /// Open generic parameters and unresolved references can not.
    pub fn is_runtime_type(&self) -> bool {
        !matches!(
            self.flavor,
            CilFlavor::GenericParameter { .. } | CilFlavor::Unresolved
        )
    }

    /// Whether a value of type `other` can be used where `self` is expected.
    ///
    /// True for identical types, for any base type of `other`, for any interface `other`
    /// or one of its bases implements, and for `System.Object` against every runtime
    /// type. Primitive widening (Int32 to Int64) is a conversion, not an assignment.
    pub fn is_assignable_from(&self, other: &CilType) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        if !self.is_runtime_type() || !other.is_runtime_type() {
            return false;
        }

        if self.primitive_kind() == Some(CilPrimitiveKind::Object) {
            return true;
        }

        if self.flavor.is_interface() {
            return other.implements(self);
        }

        other.is_subclass_of(self)
    }

    /// Whether `ancestor` appears in the base chain of this type
    pub fn is_subclass_of(&self, ancestor: &CilType) -> bool {
        let mut current = self.base();
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(ty) = current else {
                return false;
            };
            if std::ptr::eq(ty.as_ref(), ancestor) {
                return true;
            }
            current = ty.base();
        }

        false
    }

    /// Whether this type or one of its bases implements `interface`, directly or through
    /// interface inheritance
    pub fn implements(&self, interface: &CilType) -> bool {
        self.implements_at(interface, 0)
    }

    fn implements_at(&self, interface: &CilType, depth: usize) -> bool {
        if depth >= MAX_INHERITANCE_DEPTH {
            return false;
        }

        let direct = self.interfaces.iter().any(|(_, iface)| {
            iface.upgrade().is_some_and(|iface| {
                std::ptr::eq(iface.as_ref(), interface) || iface.implements_at(interface, depth + 1)
            })
        });
        if direct {
            return true;
        }

        self.base()
            .is_some_and(|base| base.implements_at(interface, depth + 1))
    }
}

impl fmt::Debug for CilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CilType")
            .field("token", &self.token)
            .field("fullname", &self.fullname())
            .field("flavor", &self.flavor)
            .field("assembly", &self.assembly.name)
            .finish()
    }
}

impl fmt::Display for CilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullname_formats() {
        let registry = TypeRegistry::new();
        let outer = TypeBuilder::class("Company.App", "Outer").build(&registry);
        let inner = TypeBuilder::class("", "Inner")
            .nested_in(&outer)
            .build(&registry);
        let global = TypeBuilder::class("", "<Module>").build(&registry);

        assert_eq!(outer.fullname(), "Company.App.Outer");
        assert_eq!(inner.fullname(), "Company.App.Outer+Inner");
        assert_eq!(global.fullname(), "<Module>");
        assert_eq!(outer.nested_types.count(), 1);
    }

    #[test]
    fn assignability_through_bases_and_interfaces() {
        let registry = TypeRegistry::new();
        let disposable = TypeBuilder::interface("System", "IDisposable").build(&registry);
        let stream_like = TypeBuilder::interface("IO", "IStream")
            .implements(&disposable)
            .build(&registry);
        let base = TypeBuilder::class("IO", "StreamBase")
            .implements(&stream_like)
            .build(&registry);
        let file = TypeBuilder::class("IO", "FileStream")
            .extends(&base)
            .build(&registry);
        let unrelated = TypeBuilder::class("IO", "Path").build(&registry);

        assert!(base.is_assignable_from(&file));
        assert!(stream_like.is_assignable_from(&file));
        assert!(disposable.is_assignable_from(&file));
        assert!(!file.is_assignable_from(&base));
        assert!(!disposable.is_assignable_from(&unrelated));
        assert!(CilPrimitiveKind::Object
            .type_ref()
            .is_assignable_from(&disposable));
    }

    #[test]
    fn primitives_do_not_widen() {
        let int32 = CilPrimitiveKind::I4.type_ref();
        let int64 = CilPrimitiveKind::I8.type_ref();
        let value_type = CilPrimitiveKind::ValueType.type_ref();

        assert!(int32.is_assignable_from(&int32));
        assert!(!int64.is_assignable_from(&int32));
        assert!(value_type.is_assignable_from(&int32));
        assert!(!value_type.is_assignable_from(&CilPrimitiveKind::String.type_ref()));
    }

    #[test]
    fn non_runtime_types() {
        let registry = TypeRegistry::new();
        let param = TypeBuilder::generic_parameter("T", 0).build(&registry);
        let unresolved = TypeBuilder::unresolved("Missing", "Type").build(&registry);
        let object = CilPrimitiveKind::Object.type_ref();

        assert!(!param.is_runtime_type());
        assert!(!unresolved.is_runtime_type());
        assert!(object.is_runtime_type());
        assert!(!object.is_assignable_from(&param));
        assert!(param.is_assignable_from(&param));
    }

    #[test]
    fn base_is_set_once() {
        let registry = TypeRegistry::new();
        let a = TypeBuilder::class("N", "A").build(&registry);
        let b = TypeBuilder::class("N", "B").build(&registry);
        let c = TypeBuilder::class("N", "C").extends(&a).build(&registry);

        assert!(!c.set_base(&b));
        assert!(Arc::ptr_eq(&c.base().unwrap(), &a));
    }

    #[test]
    fn inheritance_cycle_terminates() {
        let registry = TypeRegistry::new();
        let a = TypeBuilder::class("N", "A").build(&registry);
        let b = TypeBuilder::class("N", "B").extends(&a).build(&registry);
        a.set_base(&b);
        let other = TypeBuilder::class("N", "Other").build(&registry);

        assert!(!other.is_assignable_from(&a));
        assert!(a.is_subclass_of(&b));
    }
}
