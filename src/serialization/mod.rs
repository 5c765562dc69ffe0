//! Member storage for objects taking part in graph serialization.
//!
//! A formatter that serializes an object asks it to describe itself as a set of named,
//! typed members; the deserializing side reads those members back, possibly under a
//! different type than they were written with. [`SerializationInfo`] is the store both
//! sides share.
//!
//! # Key Components
//!
//! - [`SerializationInfo`] - The member store with its root type descriptor
//! - [`SerializationEntry`] / [`SerializationIter`] - Borrowed, insertion-ordered views
//! - [`FormatterConverter`] - Fallback conversion on a type mismatch
//! - [`DefaultConverter`] - Invariant-culture `System.Convert` rules
//! - [`Primitive`] / [`ReadPrimitive`] - Typed insertion and retrieval of scalars
//! - [`StoreConfig`] - Capacity and type checking knobs
//!
//! # Examples
//!
//! ## Writing and reading members
//!
//! ```rust
//! use serinfo::prelude::*;
//! use std::sync::Arc;
//!
//! let mut info = SerializationInfo::new(
//!     CilPrimitiveKind::Object.type_ref(),
//!     Arc::new(DefaultConverter),
//! );
//! info.add("count", 5i32)?;
//! info.add("label", "five")?;
//!
//! // declared as Int32, read as Int64 through the converter
//! assert_eq!(info.get_int64("count")?, 5);
//! assert_eq!(info.get::<i32>("count")?, 5);
//! # Ok::<(), serinfo::Error>(())
//! ```
//!
//! ## Resolving forward references
//!
//! ```rust
//! use serinfo::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = TypeRegistry::new();
//! let node = TypeBuilder::class("Graph", "Node").build(&registry);
//!
//! let mut info = SerializationInfo::new(node.clone(), Arc::new(DefaultConverter));
//! info.add_value_with_type("next", None, &node)?;
//!
//! // the referenced object has been materialized
//! info.update_value("next", Some(Value::Object(ObjectRef::new(2, &node))), &node)?;
//! assert_eq!(info.member_count(), 1);
//! assert!(info.get_value("next", &node)?.is_some());
//! # Ok::<(), serinfo::Error>(())
//! ```

mod config;
mod converter;
mod entry;
mod info;
mod primitive;

pub use config::{
    StoreConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_MEMBERS, MAX_EAGER_RESERVE,
};
pub use converter::{DefaultConverter, FormatterConverter};
pub use entry::{SerializationEntry, SerializationIter};
pub use info::SerializationInfo;
pub use primitive::{Primitive, ReadPrimitive};
