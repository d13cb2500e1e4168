//! Notification stream identification and sequencing types.
//!
//! This module defines strong types for naming a notification stream
//! (`StreamId`) and ordering notifications within one (`Sequence`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for `StreamId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid stream ID: {0}")]
pub struct ParseStreamIdError(String);

/// Unique identifier for a notification stream.
///
/// Each hub and each ticket ledger publishes to its own stream. For
/// example:
/// - `"hub"`
/// - `"ledger-<event-uuid>"`
///
/// # Design
///
/// `StreamId` is a newtype wrapper around `String` that provides:
/// - Type safety (can't accidentally use a regular string)
/// - Clear intent in function signatures
/// - Serialization support for bus metadata
///
/// # Validation
///
/// - `FromStr::from_str()`: Validates input (rejects empty strings)
/// - `From::from()` and `new()`: No validation (for internal use with trusted input)
///
/// Use `FromStr` when parsing external input. Use `new()` or `From` when
/// constructing stream IDs from application-controlled data.
///
/// # Examples
///
/// ```
/// use tickethub_core::stream::StreamId;
///
/// let stream_id = StreamId::new("hub");
/// assert_eq!(stream_id.as_str(), "hub");
///
/// let parsed: StreamId = "ledger-abc".parse().unwrap();
/// assert_eq!(parsed, StreamId::new("ledger-abc"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(String);

impl StreamId {
    /// Create a new `StreamId` from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickethub_core::stream::StreamId;
    ///
    /// let id = StreamId::new("hub");
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the stream ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `StreamId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StreamId {
    type Err = ParseStreamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseStreamIdError("Stream ID cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for StreamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for StreamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Position of a notification within its stream.
///
/// Sequences start at 0 and increment by 1 for each notification
/// published on a stream. Together with the [`StreamId`], the sequence
/// number is the identity subscribers use to deduplicate at-least-once
/// deliveries and to observe per-instance ordering.
///
/// # Design
///
/// `Sequence` is a newtype wrapper around `u64` that provides:
/// - Type safety (can't accidentally use a plain integer)
/// - Clear intent in function signatures
/// - Arithmetic operations (+1, etc.)
///
/// # Examples
///
/// ```
/// use tickethub_core::stream::Sequence;
///
/// let s0 = Sequence::new(0);
/// let s1 = s0.next();
/// assert_eq!(s1, Sequence::new(1));
///
/// let s5 = Sequence::new(5);
/// assert_eq!(s5.value(), 5);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence(u64);

impl Sequence {
    /// The initial sequence (0) for a new stream.
    pub const INITIAL: Self = Self(0);

    /// Create a new `Sequence` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next sequence (current + 1).
    ///
    /// # Overflow Behavior
    ///
    /// Reaching `u64::MAX` notifications on one stream is not a realistic
    /// concern, so plain addition is used.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Check if this is the initial sequence (0).
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Sequence {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Sequence> for u64 {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}
