use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is local and immediate: the operation that returns an error leaves the
/// [`crate::serialization::SerializationInfo`] it was invoked on unmodified.
///
/// # Error Categories
///
/// ## Contract Violations
/// - [`Error::ArgumentNull`] - A required value was absent
/// - [`Error::Argument`] - An argument was present but unusable
/// - [`Error::NotRuntimeType`] - A type handle that cannot describe a live value was supplied
///
/// ## Member Store Errors
/// - [`Error::SameNameTwice`] - A member name was inserted twice
/// - [`Error::MemberNotFound`] - A strict lookup found no member with the requested name
/// - [`Error::CapacityExceeded`] - The store cannot grow any further
///
/// ## Conversion Errors
/// - [`Error::InvalidCast`] - No conversion path exists between two types
/// - [`Error::Overflow`] - The value does not fit into the target type
/// - [`Error::Format`] - A string could not be parsed into the target type
///
/// ## Identity Parsing Errors
/// - [`Error::Malformed`] - An assembly display name or version string is invalid
/// - [`Error::OutOfBounds`] - Not enough bytes to decode a value
///
/// # Examples
///
/// ```rust
/// use serinfo::prelude::*;
/// use std::sync::Arc;
///
/// let mut info = SerializationInfo::new(
///     CilPrimitiveKind::Object.type_ref(),
///     Arc::new(DefaultConverter),
/// );
/// info.add("age", 30i32)?;
///
/// match info.add("age", 31i32) {
///     Err(Error::SameNameTwice(name)) => assert_eq!(name, "age"),
///     other => panic!("unexpected result: {:?}", other),
/// }
/// # Ok::<(), serinfo::Error>(())
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required argument was absent.
    ///
    /// Raised by [`crate::serialization::FormatterConverter`] implementations when they are
    /// asked to coerce a member whose stored value is `None`. The associated value names the
    /// parameter that was missing.
    #[error("Value cannot be null - {0}")]
    ArgumentNull(&'static str),

    /// An argument was supplied but cannot be used.
    #[error("{0}")]
    Argument(String),

    /// The requested type is not a concrete runtime type.
    ///
    /// Open generic parameters and unresolved type references can not describe a value
    /// that lives in a store, so typed reads reject them before any lookup happens.
    #[error("Type must be a runtime type - {0}")]
    NotRuntimeType(String),

    /// A member with the same name was already added.
    ///
    /// Insertion never overwrites; use
    /// [`crate::serialization::SerializationInfo::update_value`] to replace a fixup
    /// placeholder.
    #[error("Cannot add the same member twice to a SerializationInfo object - {0}")]
    SameNameTwice(String),

    /// No member with the given name exists.
    #[error("Member '{0}' was not found")]
    MemberNotFound(String),

    /// The store reached its configured maximum member count.
    #[error("SerializationInfo can not hold more than {0} members")]
    CapacityExceeded(usize),

    /// There is no conversion path between the two types.
    #[error("Invalid cast from '{from}' to '{to}'")]
    InvalidCast {
        /// Full name of the source type
        from: String,
        /// Full name of the target type
        to: String,
    },

    /// The value is outside of the range the target type can represent.
    #[error("Value '{value}' was either too large or too small for '{target}'")]
    Overflow {
        /// Textual form of the value that failed to convert
        value: String,
        /// Full name of the target type
        target: String,
    },

    /// A string was not in a format the target type accepts.
    #[error("Input string was not in a correct format - {0}")]
    Format(String),

    /// The input is damaged and could not be parsed.
    ///
    /// This error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding bytes.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,
}
