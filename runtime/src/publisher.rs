//! Internal publish path shared by the hub and ledger handles.

use crate::bus::NotificationBus;
use serde::Serialize;
use std::sync::Arc;
use tickethub_core::environment::Clock;
use tickethub_core::event::{Notification, SerializedNotification};
use tickethub_core::stream::{Sequence, StreamId};

/// Publishes notifications for one instance's stream, stamping each with
/// the delivery metadata subscribers deduplicate on.
///
/// Callers must hold the instance's write lock across the mutation and
/// the publish so the sequence numbers match mutation order.
pub(crate) struct Publisher {
    bus: Arc<dyn NotificationBus>,
    clock: Arc<dyn Clock>,
    stream: StreamId,
}

impl Publisher {
    pub(crate) fn new(
        bus: Arc<dyn NotificationBus>,
        clock: Arc<dyn Clock>,
        stream: StreamId,
    ) -> Self {
        Self { bus, clock, stream }
    }

    pub(crate) const fn stream(&self) -> &StreamId {
        &self.stream
    }

    /// Serialize and publish `notification`, then advance the sequence.
    ///
    /// The sequence advances even when publishing fails so a
    /// `(stream, sequence)` pair is never reused; gaps are visible to
    /// subscribers the same way lag drops are.
    pub(crate) async fn publish<N: Notification + Serialize>(
        &self,
        sequence: &mut Sequence,
        notification: &N,
    ) {
        let metadata = serde_json::json!({
            "stream": self.stream.as_str(),
            "sequence": sequence.value(),
            "recorded_at": self.clock.now().to_rfc3339(),
        });

        match SerializedNotification::from_notification(notification, Some(metadata)) {
            Ok(serialized) => {
                if let Err(error) = self.bus.publish(self.stream.as_str(), &serialized).await {
                    tracing::error!(
                        %error,
                        stream = %self.stream,
                        event_type = serialized.event_type,
                        "Failed to publish notification"
                    );
                    metrics::counter!("publisher.failures").increment(1);
                }
            },
            Err(error) => {
                tracing::error!(%error, stream = %self.stream, "Failed to serialize notification");
                metrics::counter!("publisher.serialization_failures").increment(1);
            },
        }

        *sequence = sequence.next();
    }
}
