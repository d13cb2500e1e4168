//! Linearizable handle for one ticket ledger.
//!
//! Wraps the pure [`TicketLedger`] state machine behind a `tokio`
//! `RwLock`: every mutating call takes the write lock, applies the
//! mutation in full, and publishes the resulting notification before
//! releasing it. Mutations against one ledger are therefore totally
//! ordered and never observed half-applied; reads share the read lock
//! and see every write that completed before them. Different ledgers
//! hold different locks and proceed independently.

use crate::bus::NotificationBus;
use crate::publisher::Publisher;
use std::sync::Arc;
use tickethub_core::environment::Clock;
use tickethub_core::error::LedgerError;
use tickethub_core::ledger::TicketLedger;
use tickethub_core::stream::{Sequence, StreamId};
use tickethub_core::types::{Address, EventConfig, EventId, Money, QrData, TicketId};
use tokio::sync::RwLock;

struct LedgerState {
    machine: TicketLedger,
    sequence: Sequence,
}

/// Shared, linearizable handle to one event's ticket ledger.
///
/// Cheap to clone; all clones drive the same instance. Ticket
/// operations go through this handle directly, bypassing the hub.
#[derive(Clone)]
pub struct Ledger {
    event_id: EventId,
    state: Arc<RwLock<LedgerState>>,
    publisher: Arc<Publisher>,
}

impl Ledger {
    pub(crate) fn new(
        event_id: EventId,
        machine: TicketLedger,
        bus: Arc<dyn NotificationBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let stream = StreamId::new(format!("ledger-{event_id}"));
        Self {
            event_id,
            state: Arc::new(RwLock::new(LedgerState {
                machine,
                sequence: Sequence::INITIAL,
            })),
            publisher: Arc::new(Publisher::new(bus, clock, stream)),
        }
    }

    /// Identifier of the event this ledger belongs to.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// The notification stream this ledger publishes on.
    #[must_use]
    pub fn stream(&self) -> &StreamId {
        self.publisher.stream()
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Sell one ticket to `buyer` for exactly the ticket price.
    ///
    /// Returns the freshly assigned ticket id and publishes
    /// `TicketSold.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IncorrectPayment`] or
    /// [`LedgerError::SoldOut`]; nothing changes on failure.
    #[tracing::instrument(skip(self, qr_data), name = "ledger_buy_ticket")]
    pub async fn buy_ticket(
        &self,
        buyer: Address,
        qr_data: QrData,
        amount_paid: Money,
    ) -> Result<TicketId, LedgerError> {
        let mut state = self.state.write().await;
        metrics::counter!("ledger.commands.total").increment(1);

        let (ticket_id, event) = state.machine.buy_ticket(buyer, qr_data, amount_paid)?;

        metrics::counter!("ledger.tickets.sold").increment(1);
        tracing::debug!(%buyer, %ticket_id, "Ticket sold");

        let LedgerState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(ticket_id)
    }

    /// Flag a ticket for refund on behalf of its owner.
    ///
    /// Publishes `RefundRequested.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] or
    /// [`LedgerError::NotTicketOwner`].
    #[tracing::instrument(skip(self), name = "ledger_request_refund")]
    pub async fn request_refund(
        &self,
        caller: Address,
        ticket_id: TicketId,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        metrics::counter!("ledger.commands.total").increment(1);

        let event = state.machine.request_refund(caller, ticket_id)?;
        tracing::debug!(%caller, %ticket_id, "Refund requested");

        let LedgerState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    /// Grant a requested refund, destroying the ticket and restocking.
    ///
    /// Publishes `RefundApproved.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotAuthorized`],
    /// [`LedgerError::UnknownTicket`], or
    /// [`LedgerError::RefundNotRequested`].
    #[tracing::instrument(skip(self), name = "ledger_approve_refund")]
    pub async fn approve_refund(
        &self,
        caller: Address,
        ticket_id: TicketId,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        metrics::counter!("ledger.commands.total").increment(1);

        let event = state.machine.approve_refund(caller, ticket_id)?;
        metrics::counter!("ledger.tickets.refunded").increment(1);
        tracing::debug!(%ticket_id, "Refund approved, ticket retired");

        let LedgerState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    /// Designate `transferee` as allowed to take `ticket_id`.
    ///
    /// Publishes `TransferApproved.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] or
    /// [`LedgerError::NotTicketOwner`].
    #[tracing::instrument(skip(self), name = "ledger_approve_transfer")]
    pub async fn approve_transfer(
        &self,
        caller: Address,
        transferee: Address,
        ticket_id: TicketId,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        metrics::counter!("ledger.commands.total").increment(1);

        let event = state.machine.approve_transfer(caller, transferee, ticket_id)?;
        tracing::debug!(%caller, %transferee, %ticket_id, "Transfer approved");

        let LedgerState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    /// Take ownership of a ticket previously approved for `caller`.
    ///
    /// Publishes `OwnershipTaken.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] or
    /// [`LedgerError::NotApproved`].
    #[tracing::instrument(skip(self), name = "ledger_take_ownership")]
    pub async fn take_ownership(
        &self,
        caller: Address,
        ticket_id: TicketId,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        metrics::counter!("ledger.commands.total").increment(1);

        let event = state.machine.take_ownership(caller, ticket_id)?;
        metrics::counter!("ledger.tickets.transferred").increment(1);
        tracing::debug!(%caller, %ticket_id, "Ownership taken");

        let LedgerState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The seller who owns this event.
    pub async fn owner(&self) -> Address {
        self.state.read().await.machine.owner()
    }

    /// The sale parameters this ledger was created with.
    pub async fn config(&self) -> EventConfig {
        self.state.read().await.machine.config().clone()
    }

    /// Fixed price of one ticket.
    pub async fn ticket_price(&self) -> Money {
        self.state.read().await.machine.ticket_price()
    }

    /// Unsold inventory currently available for purchase.
    pub async fn total_supply(&self) -> u32 {
        self.state.read().await.machine.total_supply()
    }

    /// Lifetime count of successful sales.
    pub async fn total_sold(&self) -> u64 {
        self.state.read().await.machine.total_sold()
    }

    /// Number of live tickets `address` owns.
    pub async fn balance_of(&self, address: Address) -> usize {
        self.state.read().await.machine.balance_of(address)
    }

    /// Ids of the live tickets `address` owns, in swap-and-remove order.
    pub async fn tickets_of(&self, address: Address) -> Vec<TicketId> {
        self.state.read().await.machine.tickets_of(address).to_vec()
    }

    /// Current owner of a live ticket.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub async fn owner_of(&self, ticket_id: TicketId) -> Result<Address, LedgerError> {
        self.state.read().await.machine.owner_of(ticket_id)
    }

    /// The proof-of-purchase token stored at sale time.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub async fn qr_data(&self, ticket_id: TicketId) -> Result<QrData, LedgerError> {
        self.state.read().await.machine.qr_data(ticket_id)
    }

    /// Whether a refund has been requested for a live ticket.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub async fn is_refund_requested(&self, ticket_id: TicketId) -> Result<bool, LedgerError> {
        self.state.read().await.machine.is_refund_requested(ticket_id)
    }

    /// The address currently allowed to take the ticket, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub async fn approved_transferee(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Address>, LedgerError> {
        self.state.read().await.machine.approved_transferee(ticket_id)
    }
}
