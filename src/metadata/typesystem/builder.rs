//! Builder for user defined types.
//!
//! [`TypeBuilder`] offers a fluent API for constructing classes, value types, interfaces,
//! enums, generic parameters and unresolved references, and registers the result in a
//! [`TypeRegistry`] which keeps it alive.
//!
//! # Example
//!
//! ```rust
//! use serinfo::metadata::typesystem::{TypeAttributes, TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let comparable = TypeBuilder::interface("System", "IComparable").build(&registry);
//! let money = TypeBuilder::value_type("Finance", "Money")
//!     .implements(&comparable)
//!     .flags(TypeAttributes::PUBLIC | TypeAttributes::SERIALIZABLE)
//!     .build(&registry);
//!
//! assert_eq!(money.fullname(), "Finance.Money");
//! assert!(comparable.is_assignable_from(&money));
//! ```

use std::sync::Arc;

use crate::metadata::{
    identity::AssemblyIdentity,
    token::Token,
    typesystem::{CilFlavor, CilPrimitiveKind, CilType, CilTypeRc, TypeAttributes, TypeRegistry},
};

/// Provides a fluent API for building type definitions
pub struct TypeBuilder {
    flavor: CilFlavor,
    namespace: String,
    name: String,
    flags: Option<TypeAttributes>,
    base: Option<CilTypeRc>,
    interfaces: Vec<CilTypeRc>,
    enclosing: Option<CilTypeRc>,
    assembly: Option<Arc<AssemblyIdentity>>,
    token: Option<Token>,
}

impl TypeBuilder {
    fn new(flavor: CilFlavor, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeBuilder {
            flavor,
            namespace: namespace.into(),
            name: name.into(),
            flags: None,
            base: None,
            interfaces: Vec::new(),
            enclosing: None,
            assembly: None,
            token: None,
        }
    }

    /// Start building a reference type; its base defaults to `System.Object`
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(CilFlavor::Class, namespace, name)
    }

    /// Start building a struct; its base defaults to `System.ValueType`
    pub fn value_type(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(CilFlavor::ValueType, namespace, name)
    }

    /// Start building an interface
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(CilFlavor::Interface, namespace, name)
    }

    /// Start building an enumeration; its base defaults to `System.ValueType`
    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(CilFlavor::Enum, namespace, name)
    }

    /// Start building an open generic type parameter
    pub fn generic_parameter(name: impl Into<String>, index: u32) -> Self {
        Self::new(
            CilFlavor::GenericParameter {
                index,
                method: false,
            },
            "",
            name,
        )
    }

    /// Start building a reference that could not be bound to a definition
    pub fn unresolved(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(CilFlavor::Unresolved, namespace, name)
    }

    /// Set the base type
    #[must_use]
    pub fn extends(mut self, base: &CilTypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Add an implemented interface
    #[must_use]
    pub fn implements(mut self, interface: &CilTypeRc) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Nest the type inside `enclosing`; it inherits the enclosing type's assembly
    #[must_use]
    pub fn nested_in(mut self, enclosing: &CilTypeRc) -> Self {
        self.enclosing = Some(enclosing.clone());
        self
    }

    /// Override the type attribute flags
    #[must_use]
    pub fn flags(mut self, flags: TypeAttributes) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Declare the type in `assembly` instead of the registry's assembly
    #[must_use]
    pub fn assembly(mut self, assembly: Arc<AssemblyIdentity>) -> Self {
        self.assembly = Some(assembly);
        self
    }

    /// Use a fixed token instead of allocating one from the registry
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Create the type and register it in `registry`
    pub fn build(self, registry: &TypeRegistry) -> CilTypeRc {
        let table = match self.flavor {
            CilFlavor::GenericParameter { .. } => Token::TABLE_GENERIC_PARAM,
            CilFlavor::Unresolved => Token::TABLE_TYPE_REF,
            _ => Token::TABLE_TYPE_DEF,
        };
        let token = self.token.unwrap_or_else(|| registry.next_token(table));

        let assembly = self
            .assembly
            .or_else(|| self.enclosing.as_ref().map(|outer| outer.assembly.clone()))
            .unwrap_or_else(|| registry.current_assembly());

        let flags = self.flags.unwrap_or_else(|| {
            let mut flags = if self.enclosing.is_some() {
                TypeAttributes::NESTED_PUBLIC
            } else {
                TypeAttributes::PUBLIC
            };
            match self.flavor {
                CilFlavor::Interface => flags |= TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
                CilFlavor::ValueType | CilFlavor::Enum => flags |= TypeAttributes::SEALED,
                _ => {}
            }
            flags
        });

        let new_type = Arc::new(CilType::new(
            token,
            self.flavor,
            self.namespace,
            self.name,
            flags,
            assembly,
        ));

        let base = self.base.or_else(|| match self.flavor {
            CilFlavor::Class => Some(CilPrimitiveKind::Object.type_ref()),
            CilFlavor::ValueType | CilFlavor::Enum => Some(CilPrimitiveKind::ValueType.type_ref()),
            _ => None,
        });
        if let Some(base) = base {
            new_type.set_base(&base);
        }

        for interface in &self.interfaces {
            new_type.add_interface(interface);
        }

        if let Some(enclosing) = &self.enclosing {
            new_type.set_enclosing_type(enclosing);
            enclosing.nested_types.push(new_type.clone().into());
        }

        registry.insert(&new_type);
        new_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::identity::AssemblyVersion;

    #[test]
    fn test_default_bases() {
        let registry = TypeRegistry::new();
        let class = TypeBuilder::class("N", "C").build(&registry);
        let value = TypeBuilder::value_type("N", "V").build(&registry);
        let color = TypeBuilder::enumeration("N", "Color").build(&registry);
        let iface = TypeBuilder::interface("N", "I").build(&registry);

        assert!(Arc::ptr_eq(
            &class.base().unwrap(),
            &CilPrimitiveKind::Object.type_ref()
        ));
        assert!(Arc::ptr_eq(
            &value.base().unwrap(),
            &CilPrimitiveKind::ValueType.type_ref()
        ));
        assert!(color.flavor.is_value_type());
        assert!(iface.base().is_none());
        assert!(iface.flags.contains(TypeAttributes::INTERFACE));
    }

    #[test]
    fn test_tokens_by_flavor() {
        let registry = TypeRegistry::new();
        let class = TypeBuilder::class("N", "C").build(&registry);
        let param = TypeBuilder::generic_parameter("T", 0).build(&registry);
        let missing = TypeBuilder::unresolved("N", "Missing").build(&registry);
        let fixed = TypeBuilder::class("N", "Fixed")
            .token(Token::type_def(0x42))
            .build(&registry);

        assert_eq!(class.token.table(), Token::TABLE_TYPE_DEF);
        assert_eq!(param.token.table(), Token::TABLE_GENERIC_PARAM);
        assert_eq!(missing.token.table(), Token::TABLE_TYPE_REF);
        assert_eq!(fixed.token, Token::type_def(0x42));
        assert!(registry.get(&Token::type_def(0x42)).is_some());
    }

    #[test]
    fn test_assembly_inheritance() {
        let registry = TypeRegistry::new();
        let library = Arc::new(AssemblyIdentity::new(
            "Library",
            AssemblyVersion::new(2, 1, 0, 0),
            None,
            None,
            None,
        ));
        let outer = TypeBuilder::class("Lib", "Outer")
            .assembly(library.clone())
            .build(&registry);
        let inner = TypeBuilder::class("", "Inner")
            .nested_in(&outer)
            .build(&registry);
        let local = TypeBuilder::class("App", "Local").build(&registry);

        assert_eq!(
            inner.assembly_name(),
            "Library, Version=2.1.0.0, Culture=neutral, PublicKeyToken=null"
        );
        assert!(inner.flags.is_nested());
        assert_eq!(local.assembly.name, "Dynamic");
    }

    #[test]
    fn test_flags_override() {
        let registry = TypeRegistry::new();
        let sealed = TypeBuilder::class("N", "S")
            .flags(TypeAttributes::PUBLIC | TypeAttributes::SEALED)
            .build(&registry);
        assert_eq!(sealed.flags, TypeAttributes::PUBLIC | TypeAttributes::SEALED);
    }
}
