//! Error types for the pagesim library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned by `check_invariants` when an engine's index
//!   and ordered structure disagree.
//! - [`ConfigError`]: Returned when simulator configuration is invalid
//!   (e.g. an unknown policy name).
//!
//! Lookups themselves never fail: every key and loader is assumed valid, and a
//! capacity of zero is a legal degenerate configuration.
//!
//! ## Example Usage
//!
//! ```
//! use pagesim::builder::CachePolicy;
//! use pagesim::error::ConfigError;
//!
//! let policy: Result<CachePolicy, ConfigError> = "lfu".parse();
//! assert_eq!(policy, Ok(CachePolicy::Lfu));
//!
//! let bad = "arc".parse::<CachePolicy>();
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on every engine
/// (e.g. [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when simulator configuration is invalid.
///
/// Produced at the configuration edge, such as parsing a
/// [`CachePolicy`](crate::builder::CachePolicy) from a string.
///
/// # Example
///
/// ```
/// use pagesim::builder::CachePolicy;
///
/// let err = "mru".parse::<CachePolicy>().unwrap_err();
/// assert!(err.to_string().contains("mru"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
