//! Outbound notification bus.
//!
//! Every successful mutation of the hub or of a ticket ledger is written
//! to the bus as a [`SerializedNotification`]; the presentation layer
//! subscribes and drains it to update incrementally. The core state
//! machines never touch the bus themselves: the runtime handles publish
//! after each mutation commits, while still holding that instance's
//! write lock, so the bus observes notifications in mutation order.
//!
//! # Delivery semantics
//!
//! - **At-least-once**: subscribers may see a notification more than
//!   once and must deduplicate by the `(stream, sequence)` pair in the
//!   metadata.
//! - **Ordered within a stream**: notifications from one hub or ledger
//!   instance arrive in the order their mutations committed. There is no
//!   ordering across instances.
//!
//! # Topic naming convention
//!
//! Topics are stream ids: `hub` for the registry, `ledger-{event-id}`
//! for each ticket ledger.

use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tickethub_core::event::SerializedNotification;
use tokio::sync::broadcast;

/// Errors that can occur during notification bus operations.
#[derive(Error, Debug, Clone)]
pub enum NotificationBusError {
    /// Failed to publish a notification to a topic
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Failed to subscribe to topics
    #[error("Subscription failed for topics {topics:?}: {reason}")]
    SubscriptionFailed {
        /// The topics that failed to subscribe
        topics: Vec<String>,
        /// The reason for failure
        reason: String,
    },

    /// A subscriber fell behind and missed notifications
    ///
    /// `missed` is counted before topic filtering, so it may include
    /// notifications from topics the subscriber was not subscribed to.
    /// Treat it as "a gap happened here", not as an exact per-topic
    /// loss count; the `(stream, sequence)` metadata identifies what
    /// was actually lost.
    #[error("Subscriber lagged, {missed} notifications were dropped")]
    Lagged {
        /// How many notifications the subscriber missed
        missed: u64,
    },

    /// Failed to serialize a notification for publishing
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

/// Stream of notifications from subscriptions.
///
/// Each item is a `Result`: a notification, or a bus error such as
/// [`NotificationBusError::Lagged`] when the subscriber fell behind.
/// The stream keeps yielding after a lag error; only the missed
/// notifications are gone.
pub type NotificationStream =
    Pin<Box<dyn Stream<Item = Result<SerializedNotification, NotificationBusError>> + Send>>;

/// Trait for notification bus implementations.
///
/// # Design Principles
///
/// - **Async-first**: all operations are async for non-blocking I/O
/// - **Ordered within a topic**: one topic per instance, mutation order
///   preserved
/// - **At-least-once**: subscribers must deduplicate by
///   `(stream, sequence)` metadata
///
/// # Dyn Compatibility
///
/// Uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// to enable trait object usage (`Arc<dyn NotificationBus>`): the hub
/// and every ledger handle share one bus behind a trait object.
pub trait NotificationBus: Send + Sync {
    /// Publish a notification to a topic.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationBusError::PublishFailed`] if the publish
    /// operation fails.
    fn publish(
        &self,
        topic: &str,
        notification: &SerializedNotification,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotificationBusError>> + Send + '_>>;

    /// Subscribe to one or more topics and receive a stream of
    /// notifications.
    ///
    /// Only notifications published after the subscription is
    /// established are delivered.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationBusError::SubscriptionFailed`] if the
    /// subscription cannot be established.
    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<NotificationStream, NotificationBusError>> + Send + '_>>;
}

/// In-process notification bus backed by a tokio broadcast channel.
///
/// Suitable for single-process deployments and tests. Notifications
/// published while no subscriber exists are dropped silently; a
/// subscriber that falls more than the channel capacity behind receives
/// a [`NotificationBusError::Lagged`] item and then resumes with the
/// oldest retained notification, which preserves the at-least-once
/// contract (dedup keys make the gap detectable).
///
/// All topics are multiplexed over one channel and topic filtering
/// happens on the subscriber side, so a subscriber of a quiet topic can
/// still lag behind heavy traffic on other topics and its `Lagged`
/// count includes notifications it would have filtered out.
pub struct BroadcastBus {
    sender: broadcast::Sender<(Arc<str>, SerializedNotification)>,
}

impl BroadcastBus {
    /// Default capacity of the underlying broadcast channel.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a bus with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a bus that retains up to `capacity` undelivered
    /// notifications per subscriber before lagging them.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus for BroadcastBus {
    fn publish(
        &self,
        topic: &str,
        notification: &SerializedNotification,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotificationBusError>> + Send + '_>> {
        let entry = (Arc::<str>::from(topic), notification.clone());
        Box::pin(async move {
            // A send error only means there are no subscribers right now.
            match self.sender.send(entry) {
                Ok(receivers) => {
                    tracing::trace!(receivers, "Published notification");
                },
                Err(_) => {
                    tracing::trace!("Published notification with no subscribers");
                },
            }
            metrics::counter!("bus.notifications.published").increment(1);
            Ok(())
        })
    }

    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<NotificationStream, NotificationBusError>> + Send + '_>>
    {
        let wanted: Vec<String> = topics.iter().map(ToString::to_string).collect();
        let mut receiver = self.sender.subscribe();
        Box::pin(async move {
            let stream = async_stream::stream! {
                loop {
                    match receiver.recv().await {
                        Ok((topic, notification)) => {
                            if wanted.iter().any(|t| t.as_str() == topic.as_ref()) {
                                yield Ok(notification);
                            }
                        },
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            metrics::counter!("bus.notifications.lagged").increment(missed);
                            yield Err(NotificationBusError::Lagged { missed });
                        },
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            };
            Ok(Box::pin(stream) as NotificationStream)
        })
    }
}
