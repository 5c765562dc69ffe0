// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # serinfo
//!
//! [![Crates.io](https://img.shields.io/crates/v/serinfo.svg)](https://crates.io/crates/serinfo)
//! [![Documentation](https://docs.rs/serinfo/badge.svg)](https://docs.rs/serinfo)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/serinfo/blob/main/LICENSE-APACHE)
//!
//! A typed, insertion-ordered member store for .NET-style object graph serialization.
//! `serinfo` models the `SerializationInfo` contract that graph formatters rely on: an
//! object describes itself as named members with declared types, and the reading side
//! retrieves them under the same or a compatible type, falling back to a pluggable
//! converter when the types differ.
//!
//! ## Features
//!
//! - **Write-once members** - Duplicate names are rejected, fixups go through an explicit update
//! - **Ordered and indexed** - Enumeration in insertion order, O(1) average lookup by name
//! - **Typed reads** - Identity and assignability checks against a host type system
//! - **Pluggable conversion** - `System.Convert` compatible defaults, replaceable per store
//! - **.NET value model** - `Decimal` and `DateTime` with the runtime's binary layout
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serinfo = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use serinfo::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = TypeRegistry::new();
//! let point = TypeBuilder::value_type("Geometry", "Point").build(&registry);
//!
//! let mut info = SerializationInfo::new(point, Arc::new(DefaultConverter));
//! info.add("x", 3i32)?;
//! info.add("y", 4i32)?;
//!
//! assert_eq!(info.full_type_name(), "Geometry.Point");
//! assert_eq!(info.get_double("x")?, 3.0);
//! # Ok::<(), serinfo::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`serialization`] - The member store, its converter seam and configuration
//! - [`value`] - The closed set of values a member can hold
//! - [`metadata`] - Type handles, the type registry and assembly identities
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The store emits `tracing` events at `trace` and `debug` level when it grows, when a fixup
//! replaces a member and when the root type changes. No subscriber is installed.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use serinfo::prelude::*;
/// use std::sync::Arc;
///
/// let info = SerializationInfo::new(CilPrimitiveKind::Object.type_ref(), Arc::new(DefaultConverter));
/// assert_eq!(info.member_count(), 0);
/// ```
pub mod prelude;

/// Type handles, the type registry, tokens and assembly identities.
///
/// The store consumes a narrow slice of a type system: identity of type handles,
/// assignability, and the names used to describe a root object. This module provides
/// exactly that, with the corelib primitives available as process-wide singletons.
///
/// # Key Components
///
/// - [`metadata::typesystem::CilType`] - A type handle
/// - [`metadata::typesystem::TypeRegistry`] - Token and name indexed type storage
/// - [`metadata::typesystem::TypeBuilder`] - Fluent type construction
/// - [`metadata::identity::AssemblyIdentity`] - Assembly names and strong-name tokens
pub mod metadata;

/// Values that can be stored in a member.
pub mod value;

/// The member store.
///
/// See [`serialization::SerializationInfo`] for the main entry point.
pub mod serialization;

/// `serinfo` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `serinfo` Error type
///
/// # Examples
///
/// ```rust
/// use serinfo::prelude::*;
/// use std::sync::Arc;
///
/// let info = SerializationInfo::new(CilPrimitiveKind::Object.type_ref(), Arc::new(DefaultConverter));
/// match info.get_int32("missing") {
///     Err(Error::MemberNotFound(name)) => assert_eq!(name, "missing"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub use error::Error;

pub use serialization::{DefaultConverter, FormatterConverter, SerializationInfo, StoreConfig};
