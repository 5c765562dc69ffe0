//! Assembly identity for the types recorded in a serialization store.
//!
//! Every [`crate::serialization::SerializationInfo`] carries the display name of the
//! assembly its root type originates from. This module provides the pieces that name is
//! derived from.
//!
//! # ECMA-335 References
//!
//! - **Section II.6.2.1**: Assembly versioning - four-part version number semantics
//! - **Section II.6.2.1.3**: Public key and token - strong name identity format
//! - **Section II.22.2**: Assembly.HashAlgId - supported hash algorithm identifiers
//!
//! See: <https://ecma-international.org/publications-and-standards/standards/ecma-335/>
//!
//! # Key Components
//!
//! - [`AssemblyIdentity`] - Name, version, culture and strong name of an assembly
//! - [`AssemblyVersion`] - Four-part version numbering (major.minor.build.revision)
//! - [`Identity`] - Public key or public key token of a strong-named assembly
//! - [`AssemblyHashAlgorithm`] - Hash algorithm identifiers used for token computation
//! - [`ProcessorArchitecture`] - Target architecture of platform-specific assemblies
//!
//! # Examples
//!
//! ```rust
//! use serinfo::metadata::identity::{AssemblyIdentity, AssemblyVersion};
//!
//! let identity = AssemblyIdentity::parse(
//!     "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
//! )?;
//! assert_eq!(identity.version, AssemblyVersion::new(4, 0, 0, 0));
//! assert_eq!(
//!     identity.display_name(),
//!     "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
//! );
//! # Ok::<(), serinfo::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All types in this module contain only owned data and are [`Send`] and [`Sync`].

pub use assembly::{AssemblyIdentity, AssemblyVersion, ProcessorArchitecture};
pub use cryptographic::{AssemblyHashAlgorithm, Identity};

mod assembly;
mod cryptographic;
