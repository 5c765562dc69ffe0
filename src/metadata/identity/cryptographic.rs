//! Strong name identity and public key token computation.
//!
//! A strong-named assembly is identified either by its full public key or by the compact
//! 8-byte token derived from it. The token is what shows up in assembly display names
//! (`PublicKeyToken=...`), so a [`crate::serialization::SerializationInfo`] whose root type
//! comes from a strong-named assembly needs this to produce its assembly name.
//!
//! # Token Generation
//!
//! 1. Hash the complete public key using the assembly's hash algorithm
//! 2. Take the last 8 bytes of the hash
//! 3. Interpret them as a little-endian 64-bit unsigned integer

use md5::Md5;
use sha1::{Digest, Sha1};

use crate::{Error::OutOfBounds, Result};

/// Hash algorithm identifiers as stored in `Assembly.HashAlgId` (§II.23.1.1).
#[allow(non_snake_case, missing_docs)]
pub mod AssemblyHashAlgorithm {
    pub const NONE: u32 = 0x0000;
    pub const MD5: u32 = 0x8003;
    pub const SHA1: u32 = 0x8004;
}

/// Cryptographic identity of a strong-named assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Complete public key blob as stored in the assembly manifest
    PubKey(Vec<u8>),
    /// 8-byte public key token, little-endian
    Token(u64),
    /// 16-byte ECMA standard key used by framework assemblies
    EcmaKey(Vec<u8>),
}

impl Identity {
    /// Create an [`Identity`] from raw key or token bytes.
    ///
    /// With `is_pub` set, 16-byte blobs are treated as an ECMA key and anything else as a full
    /// public key. Without it, the first 8 bytes are read as a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if a token is requested from fewer than 8 bytes.
    pub fn from(data: &[u8], is_pub: bool) -> Result<Self> {
        if is_pub {
            return Ok(match data.len() {
                16 => Identity::EcmaKey(data.to_vec()),
                _ => Identity::PubKey(data.to_vec()),
            });
        }

        Ok(Identity::Token(read_u64_le(data)?))
    }

    /// Compute the public key token of this identity.
    ///
    /// Token identities return their stored value regardless of `algo`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `algo` is neither MD5 nor SHA1.
    pub fn to_token(&self, algo: u32) -> Result<u64> {
        let data = match self {
            Identity::Token(token) => return Ok(*token),
            Identity::PubKey(data) | Identity::EcmaKey(data) => data,
        };

        let hash = match algo {
            AssemblyHashAlgorithm::MD5 => Md5::digest(data).to_vec(),
            AssemblyHashAlgorithm::SHA1 => Sha1::digest(data).to_vec(),
            _ => {
                return Err(malformed_error!(
                    "Unsupported hash algorithm: 0x{:08X}",
                    algo
                ))
            }
        };

        read_u64_le(&hash[hash.len() - 8..])
    }
}

fn read_u64_le(data: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = data
        .get(..8)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(OutOfBounds)?;

    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_from_bytes() {
        let key: Vec<u8> = (1..=20).collect();
        assert_eq!(
            Identity::from(&key, true).unwrap(),
            Identity::PubKey(key.clone())
        );

        let ecma = [0u8; 16];
        assert!(matches!(
            Identity::from(&ecma, true).unwrap(),
            Identity::EcmaKey(_)
        ));

        let token = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        assert_eq!(
            Identity::from(&token, false).unwrap(),
            Identity::Token(0xF0DE_BC9A_7856_3412)
        );

        assert_eq!(Identity::from(&[1, 2, 3], false), Err(OutOfBounds));
    }

    #[test]
    fn token_is_last_eight_bytes_of_hash() {
        let key = vec![0xAA; 32];
        let identity = Identity::PubKey(key.clone());

        let sha1 = Sha1::digest(&key);
        let expected = u64::from_le_bytes(sha1[12..20].try_into().unwrap());
        assert_eq!(
            identity.to_token(AssemblyHashAlgorithm::SHA1).unwrap(),
            expected
        );

        let md5 = Md5::digest(&key);
        let expected = u64::from_le_bytes(md5[8..16].try_into().unwrap());
        assert_eq!(
            identity.to_token(AssemblyHashAlgorithm::MD5).unwrap(),
            expected
        );
    }

    #[test]
    fn token_identity_ignores_algorithm() {
        let identity = Identity::Token(42);
        assert_eq!(identity.to_token(AssemblyHashAlgorithm::MD5).unwrap(), 42);
        assert_eq!(identity.to_token(0x1234).unwrap(), 42);
    }

    #[test]
    fn unsupported_algorithm() {
        let identity = Identity::PubKey(vec![1, 2, 3]);
        assert!(matches!(
            identity.to_token(AssemblyHashAlgorithm::NONE),
            Err(crate::Error::Malformed { .. })
        ));
    }
}
