//! Assembly display names and four-part versions.
//!
//! The root descriptor of a [`crate::serialization::SerializationInfo`] records the
//! assembly of its root type as a display name string. [`AssemblyIdentity`] produces that
//! string and can parse it back.
//!
//! # Format
//!
//! ```text
//! Name[, Version=Major.Minor.Build.Revision][, Culture=culture][, PublicKeyToken=token][, ProcessorArchitecture=arch]
//! ```

use std::{
    fmt,
    fmt::Write as _,
    str::FromStr,
    sync::{Arc, OnceLock},
};

use crate::{
    metadata::identity::cryptographic::{AssemblyHashAlgorithm, Identity},
    Error, Result,
};

/// Identity of the assembly a type was declared in.
///
/// Equality and hashing ignore [`AssemblyIdentity::strong_name`], so an identity carrying a
/// full public key equals one carrying only the derived token.
#[derive(Debug, Clone)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g. "mscorlib", "System.Private.CoreLib")
    pub name: String,
    /// Four-part assembly version
    pub version: AssemblyVersion,
    /// Culture of a satellite assembly, `None` for culture-neutral assemblies
    pub culture: Option<String>,
    /// Strong name key or token, `None` for weakly named assemblies
    pub strong_name: Option<Identity>,
    /// Target architecture, only present for platform-specific assemblies
    pub processor_architecture: Option<ProcessorArchitecture>,
}

impl PartialEq for AssemblyIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.culture == other.culture
            && self.processor_architecture == other.processor_architecture
    }
}

impl Eq for AssemblyIdentity {}

impl std::hash::Hash for AssemblyIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
        self.culture.hash(state);
        self.processor_architecture.hash(state);
    }
}

/// Four-part version number, ordered component-wise.
///
/// ```rust
/// use serinfo::metadata::identity::AssemblyVersion;
///
/// let parsed = AssemblyVersion::parse("2.0")?;
/// assert_eq!(parsed.to_string(), "2.0.0.0");
/// assert!(parsed > AssemblyVersion::new(1, 9, 9, 9));
/// # Ok::<(), serinfo::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssemblyVersion {
    /// Major version component
    pub major: u16,
    /// Minor version component
    pub minor: u16,
    /// Build version component
    pub build: u16,
    /// Revision version component
    pub revision: u16,
}

/// Processor architecture of a platform-specific assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorArchitecture {
    /// Architecture neutral managed code
    MSIL,
    /// 32-bit x86
    X86,
    /// Intel Itanium
    IA64,
    /// x86-64, also parsed from "x64"
    AMD64,
    /// 32-bit ARM
    ARM,
    /// 64-bit ARM
    ARM64,
}

impl AssemblyIdentity {
    /// Create a new identity from its components.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: AssemblyVersion,
        culture: Option<String>,
        strong_name: Option<Identity>,
        processor_architecture: Option<ProcessorArchitecture>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            culture,
            strong_name,
            processor_architecture,
        }
    }

    /// The core library every primitive type lives in.
    ///
    /// Returns the same shared instance on each call.
    pub fn corelib() -> Arc<AssemblyIdentity> {
        static CORELIB: OnceLock<Arc<AssemblyIdentity>> = OnceLock::new();
        let corelib = CORELIB.get_or_init(|| {
            Arc::new(AssemblyIdentity {
                name: "System.Private.CoreLib".to_string(),
                version: AssemblyVersion::new(8, 0, 0, 0),
                culture: None,
                strong_name: Some(Identity::Token(u64::from_le_bytes([
                    0x7c, 0xec, 0x85, 0xd7, 0xbe, 0xa7, 0x79, 0x8e,
                ]))),
                processor_architecture: None,
            })
        });

        corelib.clone()
    }

    /// Parse an assembly display name.
    ///
    /// Unknown `Key=Value` components are skipped. `Culture=neutral` and
    /// `PublicKeyToken=null` map to `None`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an empty name, an invalid version, a token that
    /// is not 16 hex digits, or an unknown processor architecture.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(malformed_error!("Assembly name cannot be empty"));
        }

        let mut identity = Self::new(name, AssemblyVersion::default(), None, None, None);
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key.trim() {
                "Version" => identity.version = AssemblyVersion::parse(value.trim())?,
                "Culture" => {
                    let value = value.trim();
                    if !value.eq_ignore_ascii_case("neutral") && !value.is_empty() {
                        identity.culture = Some(value.to_string());
                    }
                }
                "PublicKeyToken" => {
                    let value = value.trim();
                    if !value.eq_ignore_ascii_case("null") && !value.is_empty() {
                        identity.strong_name = Some(Identity::Token(parse_token(value)?));
                    }
                }
                "ProcessorArchitecture" => {
                    identity.processor_architecture = Some(ProcessorArchitecture::parse(value)?);
                }
                _ => {}
            }
        }

        Ok(identity)
    }

    /// Display name of this assembly, in the format accepted by [`AssemblyIdentity::parse`].
    ///
    /// Full public keys are reduced to their SHA1 token.
    ///
    /// ```rust
    /// use serinfo::metadata::identity::{AssemblyIdentity, AssemblyVersion};
    ///
    /// let identity = AssemblyIdentity::new(
    ///     "MyLibrary",
    ///     AssemblyVersion::new(1, 2, 3, 4),
    ///     Some("en-US".to_string()),
    ///     None,
    ///     None,
    /// );
    /// assert_eq!(
    ///     identity.display_name(),
    ///     "MyLibrary, Version=1.2.3.4, Culture=en-US, PublicKeyToken=null"
    /// );
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut result = String::with_capacity(self.name.len() + 80);
        result.push_str(&self.name);

        let _ = write!(
            result,
            ", Version={}, Culture={}, PublicKeyToken=",
            self.version,
            self.culture.as_deref().unwrap_or("neutral")
        );

        let token = self
            .strong_name
            .as_ref()
            .and_then(|identity| identity.to_token(AssemblyHashAlgorithm::SHA1).ok());
        match token {
            // Tokens are displayed in byte order of their little-endian representation
            Some(token) => {
                for byte in token.to_le_bytes() {
                    let _ = write!(result, "{:02x}", byte);
                }
            }
            None => result.push_str("null"),
        }

        if let Some(arch) = &self.processor_architecture {
            let _ = write!(result, ", ProcessorArchitecture={}", arch);
        }

        result
    }

    /// Whether this assembly carries a strong name.
    #[must_use]
    pub fn is_strong_named(&self) -> bool {
        self.strong_name.is_some()
    }

    /// Whether this assembly is culture-neutral.
    #[must_use]
    pub fn is_culture_neutral(&self) -> bool {
        self.culture.is_none()
    }
}

fn parse_token(value: &str) -> Result<u64> {
    let bytes = hex::decode(value)
        .map_err(|e| malformed_error!("Invalid hex in PublicKeyToken '{}': {}", value, e))?;

    let token: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
        malformed_error!(
            "PublicKeyToken must be exactly 8 bytes (16 hex characters), got {} bytes from '{}'",
            bytes.len(),
            value
        )
    })?;

    Ok(u64::from_le_bytes(token))
}

impl AssemblyVersion {
    /// Create a version from its four components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parse a dotted version with one to four components; missing ones are zero.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for more than four components or a component that
    /// is not a `u16`.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();
        if parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];
        for (component, part) in components.iter_mut().zip(&parts) {
            *component = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        let [major, minor, build, revision] = components;
        Ok(Self::new(major, minor, build, revision))
    }
}

impl Default for AssemblyVersion {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl ProcessorArchitecture {
    /// Parse an architecture name, case-insensitive.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the name is not recognized.
    pub fn parse(arch_str: &str) -> Result<Self> {
        match arch_str.trim().to_ascii_lowercase().as_str() {
            "msil" => Ok(Self::MSIL),
            "x86" => Ok(Self::X86),
            "ia64" => Ok(Self::IA64),
            "amd64" | "x64" => Ok(Self::AMD64),
            "arm" => Ok(Self::ARM),
            "arm64" => Ok(Self::ARM64),
            _ => Err(malformed_error!(
                "Unknown processor architecture: '{}'",
                arch_str.trim()
            )),
        }
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for ProcessorArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MSIL => "MSIL",
            Self::X86 => "x86",
            Self::IA64 => "IA64",
            Self::AMD64 => "AMD64",
            Self::ARM => "ARM",
            Self::ARM64 => "ARM64",
        })
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for AssemblyIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
