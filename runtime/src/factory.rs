//! Ledger instantiation.
//!
//! The registry never builds ledgers itself; it delegates to a factory
//! collaborator. The factory is synchronous and fails only on a
//! malformed configuration.

use thiserror::Error;
use tickethub_core::ledger::TicketLedger;
use tickethub_core::types::{Address, EventConfig, EventId};

/// Errors a factory can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The configuration cannot back a ledger
    #[error("invalid event configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it
        reason: String,
    },
}

/// Produces a fresh ticket ledger for an approved seller.
///
/// Implementations must be cheap and synchronous: the hub calls the
/// factory while holding its own write lock so that event creation is
/// atomic with recording the listing.
pub trait EventFactory: Send + Sync {
    /// Build a new ledger owned by `owner` with the given sale
    /// parameters, returning it together with its fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidConfig`] if the configuration is
    /// malformed.
    fn create(
        &self,
        owner: Address,
        config: EventConfig,
    ) -> Result<(EventId, TicketLedger), FactoryError>;
}

/// Factory that instantiates ledgers in the current process.
#[derive(Clone, Copy, Debug, Default)]
pub struct InProcessFactory;

impl EventFactory for InProcessFactory {
    fn create(
        &self,
        owner: Address,
        config: EventConfig,
    ) -> Result<(EventId, TicketLedger), FactoryError> {
        if !config.is_valid() {
            return Err(FactoryError::InvalidConfig {
                reason: "total tickets must be greater than zero".to_string(),
            });
        }

        let event_id = EventId::new();
        let ledger = TicketLedger::new(owner, config);
        tracing::debug!(%event_id, %owner, "Instantiated ticket ledger");
        Ok((event_id, ledger))
    }
}
