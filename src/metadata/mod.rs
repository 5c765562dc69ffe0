//! Type metadata consumed by the serialization store.
//!
//! # Key Components
//!
//! - [`token`] - Table/row references identifying types
//! - [`typesystem`] - Type handles with identity, assignability and name derivation
//! - [`identity`] - Assembly identities and their display names
//!
//! # Examples
//!
//! ```rust
//! use serinfo::metadata::typesystem::{TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let person = TypeBuilder::class("App.Model", "Person").build(&registry);
//!
//! assert_eq!(person.fullname(), "App.Model.Person");
//! assert_eq!(
//!     person.assembly_name(),
//!     "Dynamic, Version=0.0.0.0, Culture=neutral, PublicKeyToken=null"
//! );
//! ```

/// Assembly identities and strong name tokens
pub mod identity;
/// Commonly used metadata token type
pub mod token;
/// Implementation of the host type system
pub mod typesystem;
