//! # serinfo Prelude
//!
//! The most commonly used types and traits for populating and reading member stores.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all serinfo operations
pub use crate::Error;

/// The result type used throughout serinfo
pub use crate::Result;

// ================================================================================================
// Member Store
// ================================================================================================

/// The store, its views and its configuration
pub use crate::serialization::{
    SerializationEntry, SerializationInfo, SerializationIter, StoreConfig,
};

/// Conversion seam and its default implementation
pub use crate::serialization::{DefaultConverter, FormatterConverter};

/// Typed insertion and retrieval of scalars
pub use crate::serialization::{Primitive, ReadPrimitive};

// ================================================================================================
// Values
// ================================================================================================

/// Member values
pub use crate::value::{DateTime, DateTimeKind, Decimal, ObjectRef, Value};

// ================================================================================================
// Type System
// ================================================================================================

/// Metadata token type
pub use crate::metadata::token::Token;

/// Core type system components
pub use crate::metadata::typesystem::{
    CilFlavor, CilPrimitiveKind, CilType, CilTypeRc, CilTypeRef, TypeAttributes, TypeBuilder,
    TypeRegistry,
};

/// Assembly identities
pub use crate::metadata::identity::{AssemblyIdentity, AssemblyVersion};
