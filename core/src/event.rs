//! Notification trait and wire type.
//!
//! Every successful mutation of a registry or ledger produces a typed
//! notification describing the fact that happened. Notifications are
//! immutable, serialized with `bincode`, and handed to the outbound
//! notification bus for the presentation layer to drain.
//!
//! # Design
//!
//! Notifications are serialized to a compact binary payload rather than
//! JSON: the bus and its subscribers are all Rust, and the binary format
//! keeps the hot purchase path cheap. The human-facing name travels
//! alongside the payload in [`SerializedNotification::event_type`].

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;

/// Error types for notification serialization.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Failed to serialize a notification to bytes.
    #[error("failed to serialize notification: {0}")]
    SerializationError(String),

    /// Failed to deserialize a notification from bytes.
    #[error("failed to deserialize notification: {0}")]
    DeserializationError(String),
}

/// A typed fact emitted by a state machine after a successful mutation.
///
/// # Naming convention
///
/// [`event_type`](Notification::event_type) returns a stable, versioned
/// identifier (`"SellerApproved.v1"`) so subscribers can route payloads
/// and schemas can evolve without breaking old consumers.
pub trait Notification: Send + Sync + 'static {
    /// Returns the stable type identifier for this notification.
    fn event_type(&self) -> &'static str;

    /// Serialize this notification to bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::SerializationError`] if the value
    /// cannot be serialized, which is rare with bincode.
    fn to_bytes(&self) -> Result<Vec<u8>, NotificationError>
    where
        Self: Serialize,
    {
        bincode::serialize(self).map_err(|e| NotificationError::SerializationError(e.to_string()))
    }

    /// Deserialize a notification from bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::DeserializationError`] if the bytes
    /// do not decode into this notification type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, NotificationError>
    where
        Self: DeserializeOwned + Sized,
    {
        bincode::deserialize(bytes)
            .map_err(|e| NotificationError::DeserializationError(e.to_string()))
    }
}

/// A serialized notification ready for the bus.
///
/// Carries the type name, the bincode payload, and the delivery metadata
/// the runtime stamps at publish time.
#[derive(Clone, Debug)]
pub struct SerializedNotification {
    /// The notification type identifier (e.g., `"TicketSold.v1"`).
    pub event_type: String,

    /// The bincode-serialized payload.
    pub data: Vec<u8>,

    /// Delivery metadata stamped by the publisher.
    ///
    /// The runtime records:
    /// - `stream`: which instance emitted the notification
    /// - `sequence`: per-instance position; together with `stream` this
    ///   is the identity subscribers deduplicate on
    /// - `recorded_at`: publish timestamp (ISO 8601)
    pub metadata: Option<serde_json::Value>,
}

impl SerializedNotification {
    /// Create a serialized notification from raw parts.
    #[must_use]
    pub const fn new(
        event_type: String,
        data: Vec<u8>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_type,
            data,
            metadata,
        }
    }

    /// Serialize a [`Notification`] into its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::SerializationError`] if the payload
    /// cannot be serialized.
    pub fn from_notification<N: Notification + Serialize>(
        notification: &N,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, NotificationError> {
        Ok(Self {
            event_type: notification.event_type().to_string(),
            data: notification.to_bytes()?,
            metadata,
        })
    }
}

impl fmt::Display for SerializedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializedNotification {{ type: {}, size: {} bytes }}",
            self.event_type,
            self.data.len()
        )
    }
}
