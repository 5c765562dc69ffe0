//! Central type registry.
//!
//! The [`TypeRegistry`] owns every user defined type and keeps the weak links between
//! them (base types, interfaces, enclosing types) alive. The corelib primitives are
//! pre-registered under their reserved `0xF0` tokens.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary index using tokens (`SkipMap`, ordered)
//! - **Name-based lookup**: Secondary indices for full names, simple names, and namespaces
//!   (`DashMap`)
//!
//! # Thread Safety
//!
//! Registration and lookup are lock-free and can happen from several threads at once.
//! Types outlive any single serialization store, so a registry is typically shared behind
//! an [`Arc`].
//!
//! # Examples
//!
//! ```rust
//! use serinfo::metadata::typesystem::{CilPrimitiveKind, TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let point = TypeBuilder::value_type("Geometry", "Point").build(&registry);
//!
//! let found = registry.get_by_fullname("Geometry.Point").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&found, &point));
//! assert!(registry.get_by_fullname("System.Int32").is_some());
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use strum::IntoEnumIterator;

use crate::metadata::{
    identity::{AssemblyIdentity, AssemblyVersion},
    token::Token,
    typesystem::{CilPrimitiveKind, CilTypeRc},
};

/// Thread-safe registry of all types known to a set of serialization stores.
///
/// # Performance Characteristics
///
/// - **Token lookup**: O(log n) using skip list
/// - **Name lookup**: O(1) average using hash indices
/// - **Registration**: O(log n) + O(1) for indexing
pub struct TypeRegistry {
    /// Primary type storage indexed by tokens
    types: SkipMap<Token, CilTypeRc>,
    /// Atomic counter handing out rows for newly built types
    next_row: AtomicU32,
    /// Assembly that types built against this registry belong to by default
    current_assembly: Arc<AssemblyIdentity>,
    /// Secondary index: types indexed by full name (namespace.name, Outer+Inner)
    types_by_fullname: DashMap<String, Vec<Token>>,
    /// Secondary index: types indexed by simple name (may have duplicates)
    types_by_name: DashMap<String, Vec<Token>>,
    /// Secondary index: types grouped by namespace
    types_by_namespace: DashMap<String, Vec<Token>>,
}

impl TypeRegistry {
    /// Create a registry for types of a dynamic, weakly named assembly.
    ///
    /// All corelib primitives are registered.
    #[must_use]
    pub fn new() -> Self {
        Self::with_assembly(AssemblyIdentity::new(
            "Dynamic",
            AssemblyVersion::new(0, 0, 0, 0),
            None,
            None,
            None,
        ))
    }

    /// Create a registry whose types belong to `assembly_identity` by default
    #[must_use]
    pub fn with_assembly(assembly_identity: AssemblyIdentity) -> Self {
        let registry = TypeRegistry {
            types: SkipMap::new(),
            next_row: AtomicU32::new(1),
            current_assembly: Arc::new(assembly_identity),
            types_by_fullname: DashMap::new(),
            types_by_name: DashMap::new(),
            types_by_namespace: DashMap::new(),
        };

        for kind in CilPrimitiveKind::iter() {
            registry.insert(&kind.type_ref());
        }

        registry
    }

    /// Get the default assembly identity of new types
    pub fn current_assembly(&self) -> Arc<AssemblyIdentity> {
        self.current_assembly.clone()
    }

    /// Allocate a fresh token in `table`
    pub fn next_token(&self, table: u8) -> Token {
        Token::from_parts(table, self.next_row.fetch_add(1, Ordering::Relaxed))
    }

    /// Insert a `CilType` into the registry
    ///
    /// Re-inserting a token replaces the primary entry; the name indices keep pointing at
    /// the token.
    ///
    /// ## Arguments
    /// * '`new_type`' - The type to register
    pub fn insert(&self, new_type: &CilTypeRc) {
        let token = new_type.token;
        if self.types.contains_key(&token) {
            self.types.insert(token, new_type.clone());
            return;
        }

        self.types.insert(token, new_type.clone());

        if !new_type.namespace.is_empty() {
            self.types_by_namespace
                .entry(new_type.namespace.clone())
                .or_default()
                .push(token);
        }

        self.types_by_name
            .entry(new_type.name.clone())
            .or_default()
            .push(token);

        self.types_by_fullname
            .entry(new_type.fullname())
            .or_default()
            .push(token);
    }

    /// Get a primitive type by its kind
    ///
    /// ## Arguments
    /// * 'primitive' - The kind of primitive to look up
    pub fn get_primitive(&self, primitive: CilPrimitiveKind) -> CilTypeRc {
        self.get(&primitive.token())
            .unwrap_or_else(|| primitive.type_ref())
    }

    /// Look up a type by its token.
    pub fn get(&self, token: &Token) -> Option<CilTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up the first registered type with the given full name
    pub fn get_by_fullname(&self, fullname: &str) -> Option<CilTypeRc> {
        self.get_by_fullname_list(fullname).into_iter().next()
    }

    /// Get all types registered under the given full name, in registration order
    pub fn get_by_fullname_list(&self, fullname: &str) -> Vec<CilTypeRc> {
        self.resolve_index(&self.types_by_fullname, fullname)
    }

    /// Get all types with the given simple name
    pub fn get_by_name(&self, name: &str) -> Vec<CilTypeRc> {
        self.resolve_index(&self.types_by_name, name)
    }

    /// Get all types declared in `namespace`
    pub fn get_by_namespace(&self, namespace: &str) -> Vec<CilTypeRc> {
        self.resolve_index(&self.types_by_namespace, namespace)
    }

    fn resolve_index(&self, index: &DashMap<String, Vec<Token>>, key: &str) -> Vec<CilTypeRc> {
        index
            .get(key)
            .map(|tokens| tokens.iter().filter_map(|token| self.get(token)).collect())
            .unwrap_or_default()
    }

    /// Count of types in the registry
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all types in the registry, ordered by token
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, CilTypeRc> {
        self.types.iter()
    }

    /// Get all types in the registry
    pub fn all_types(&self) -> Vec<CilTypeRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = crossbeam_skiplist::map::Entry<'a, Token, CilTypeRc>;
    type IntoIter = crossbeam_skiplist::map::Iter<'a, Token, CilTypeRc>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
