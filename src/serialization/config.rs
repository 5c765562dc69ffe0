//! Store configuration
//!
//! Controls how much a [`crate::serialization::SerializationInfo`] reserves up front, how
//! far it may grow, and how strictly typed reads check the requested type.

/// Default number of member slots reserved by a new store
pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

/// Largest member count a store can hold, matching the 32-bit signed limit of .NET arrays
#[allow(clippy::cast_sign_loss)]
pub const DEFAULT_MAX_MEMBERS: usize = i32::MAX as usize;

/// Most member slots allocated at construction, whatever the configured initial capacity
///
/// Storage past this point is allocated as members arrive.
pub const MAX_EAGER_RESERVE: usize = 1024;

/// Configuration for a [`crate::serialization::SerializationInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Starting capacity of the store (default: 4)
    /// Clamped to `1..=max_members`; at most [`MAX_EAGER_RESERVE`] slots are allocated
    /// up front
    pub initial_capacity: usize,

    /// Upper bound on the member count; capacity doubling saturates here (default: `i32::MAX`)
    pub max_members: usize,

    /// Reject open generic parameters and unresolved references passed to `get_value`
    /// and `try_get_value` (default: true)
    pub require_runtime_types: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_members: DEFAULT_MAX_MEMBERS,
            require_runtime_types: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration starting at `initial_capacity`
    ///
    /// Useful when the member count of the object being serialized is known. Only the
    /// first [`MAX_EAGER_RESERVE`] slots are allocated at construction, so a large
    /// capacity does not allocate memory for members that never arrive.
    #[must_use]
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Creates a configuration that skips the runtime type check on typed reads
    ///
    /// Requests for non-runtime types then fall through to the assignability check and the
    /// converter like any other type.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            require_runtime_types: false,
            ..Self::default()
        }
    }

    /// Upper bound on the member count, never zero
    #[must_use]
    pub fn member_limit(&self) -> usize {
        self.max_members.max(1)
    }

    /// Capacity a new store starts with
    #[must_use]
    pub fn effective_initial_capacity(&self) -> usize {
        self.initial_capacity.clamp(1, self.member_limit())
    }

    /// Member slots allocated at construction
    #[must_use]
    pub fn eager_reserve(&self) -> usize {
        self.effective_initial_capacity().min(MAX_EAGER_RESERVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_presets() {
        let default = StoreConfig::default();
        assert_eq!(default.initial_capacity, 4);
        assert_eq!(default.max_members, 2_147_483_647);
        assert!(default.require_runtime_types);

        let sized = StoreConfig::with_capacity(64);
        assert_eq!(sized.initial_capacity, 64);
        assert_eq!(sized.max_members, default.max_members);
        assert!(sized.require_runtime_types);

        let permissive = StoreConfig::permissive();
        assert!(!permissive.require_runtime_types);
        assert_eq!(permissive.initial_capacity, 4);
    }

    #[test]
    fn test_capacity_clamping() {
        assert_eq!(StoreConfig::with_capacity(0).effective_initial_capacity(), 1);

        let tight = StoreConfig {
            initial_capacity: 100,
            max_members: 10,
            require_runtime_types: true,
        };
        assert_eq!(tight.effective_initial_capacity(), 10);

        let zero = StoreConfig {
            max_members: 0,
            ..StoreConfig::default()
        };
        assert_eq!(zero.member_limit(), 1);
        assert_eq!(zero.effective_initial_capacity(), 1);
    }

    #[test]
    fn test_eager_reserve_is_bounded() {
        assert_eq!(StoreConfig::default().eager_reserve(), 4);
        assert_eq!(StoreConfig::with_capacity(0).eager_reserve(), 1);

        let huge = StoreConfig::with_capacity(usize::MAX);
        assert_eq!(huge.effective_initial_capacity(), DEFAULT_MAX_MEMBERS);
        assert_eq!(huge.eager_reserve(), MAX_EAGER_RESERVE);
    }
}
