//! Per-event ticket ledger state machine.
//!
//! One ledger instance exists per created event. It owns the ticket
//! records, the per-owner id lists, the refund workflow, the two-phase
//! transfer workflow, and the supply accounting.
//!
//! # Accounting invariants
//!
//! - `tickets_remaining == total_tickets - (issued - refunded)` after
//!   every operation; refunds restock inventory.
//! - Ticket ids are assigned from a monotonic counter and never reused,
//!   even after the ticket they named was refunded. A refunded ticket is
//!   therefore distinguishable from any future ticket forever.
//! - `total_sold` counts lifetime sales and never decreases.
//!
//! # List maintenance
//!
//! Removing an id from an owner's list uses swap-and-remove: the removed
//! slot is overwritten by the last element and the list shrinks by one.
//! This is O(1) but reorders the list, so the per-owner id list reflects
//! removal history, not purchase order. Callers must not read purchase
//! chronology out of it.

use crate::error::LedgerError;
use crate::event::Notification;
use crate::types::{Address, EventConfig, Money, QrData, Ticket, TicketId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Notifications
// ============================================================================

/// Typed facts emitted by a ledger after successful mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A ticket was sold
    TicketSold {
        /// The purchasing address
        buyer: Address,
        /// The freshly assigned ticket id
        ticket_id: TicketId,
    },

    /// A ticket owner asked for their money back
    RefundRequested {
        /// The requesting owner
        requester: Address,
        /// The ticket in question
        ticket_id: TicketId,
    },

    /// The event owner granted a refund; the ticket is destroyed
    RefundApproved {
        /// The retired ticket id
        ticket_id: TicketId,
    },

    /// A ticket owner designated a transferee
    TransferApproved {
        /// The current ticket owner
        owner: Address,
        /// The address allowed to take the ticket
        transferee: Address,
        /// The ticket in question
        ticket_id: TicketId,
    },

    /// An approved transferee took ownership of a ticket
    OwnershipTaken {
        /// The outgoing owner
        previous_owner: Address,
        /// The incoming owner
        new_owner: Address,
        /// The transferred ticket
        ticket_id: TicketId,
    },
}

impl Notification for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::TicketSold { .. } => "TicketSold.v1",
            LedgerEvent::RefundRequested { .. } => "RefundRequested.v1",
            LedgerEvent::RefundApproved { .. } => "RefundApproved.v1",
            LedgerEvent::TransferApproved { .. } => "TransferApproved.v1",
            LedgerEvent::OwnershipTaken { .. } => "OwnershipTaken.v1",
        }
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Ticket inventory and ownership state for one event.
///
/// All mutating operations are all-or-nothing: a typed rejection leaves
/// every field untouched.
#[derive(Clone, Debug)]
pub struct TicketLedger {
    owner: Address,
    config: EventConfig,
    tickets_remaining: u32,
    next_ticket_id: TicketId,
    total_sold: u64,
    tickets: HashMap<TicketId, Ticket>,
    owner_ticket_ids: HashMap<Address, Vec<TicketId>>,
}

impl TicketLedger {
    /// Create a ledger for `owner` with the full inventory unsold.
    ///
    /// The configuration is assumed valid; the registry checks it before
    /// the factory instantiates the ledger.
    #[must_use]
    pub fn new(owner: Address, config: EventConfig) -> Self {
        let tickets_remaining = config.total_tickets;
        Self {
            owner,
            config,
            tickets_remaining,
            next_ticket_id: TicketId::FIRST,
            total_sold: 0,
            tickets: HashMap::new(),
            owner_ticket_ids: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Sell one ticket to `buyer`.
    ///
    /// Payment must match the ticket price exactly, not merely cover it.
    /// The supplied `qr_data` is stored verbatim as the ticket's
    /// proof-of-purchase token; the ledger does not check it for
    /// uniqueness. Returns the assigned id together with the emitted
    /// event.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IncorrectPayment`] if `amount_paid` differs
    /// from the ticket price, or [`LedgerError::SoldOut`] if no inventory
    /// remains.
    pub fn buy_ticket(
        &mut self,
        buyer: Address,
        qr_data: QrData,
        amount_paid: Money,
    ) -> Result<(TicketId, LedgerEvent), LedgerError> {
        if amount_paid != self.config.ticket_price {
            return Err(LedgerError::IncorrectPayment {
                expected: self.config.ticket_price,
                paid: amount_paid,
            });
        }
        if self.tickets_remaining == 0 {
            return Err(LedgerError::SoldOut);
        }

        let ticket_id = self.next_ticket_id;
        self.next_ticket_id = ticket_id.next();
        self.tickets_remaining -= 1;
        self.total_sold += 1;
        self.tickets.insert(ticket_id, Ticket::new(buyer, qr_data));
        self.owner_ticket_ids.entry(buyer).or_default().push(ticket_id);

        Ok((ticket_id, LedgerEvent::TicketSold { buyer, ticket_id }))
    }

    /// Flag a ticket for refund.
    ///
    /// Only flags; the ticket stays live and owned until the event owner
    /// approves. Requesting twice just re-sets the flag.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id was never issued
    /// or already refunded, or [`LedgerError::NotTicketOwner`] if
    /// `caller` does not own the ticket.
    pub fn request_refund(
        &mut self,
        caller: Address,
        ticket_id: TicketId,
    ) -> Result<LedgerEvent, LedgerError> {
        let ticket = self
            .tickets
            .get_mut(&ticket_id)
            .ok_or(LedgerError::UnknownTicket(ticket_id))?;
        if ticket.owner != caller {
            return Err(LedgerError::NotTicketOwner { caller, ticket_id });
        }

        ticket.refund_requested = true;
        Ok(LedgerEvent::RefundRequested {
            requester: caller,
            ticket_id,
        })
    }

    /// Grant a requested refund, destroying the ticket.
    ///
    /// The id is removed from its owner's list by swap-and-remove, the
    /// record is erased, and the inventory is restocked by one. The id
    /// itself is retired and will never be assigned again. `total_sold`
    /// is deliberately left alone: it is a lifetime sale counter.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotAuthorized`] if `caller` is not the
    /// event owner, [`LedgerError::UnknownTicket`] if the id is not
    /// live, or [`LedgerError::RefundNotRequested`] if no refund was
    /// requested for it.
    pub fn approve_refund(
        &mut self,
        caller: Address,
        ticket_id: TicketId,
    ) -> Result<LedgerEvent, LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::NotAuthorized { caller });
        }
        let ticket = self
            .tickets
            .get(&ticket_id)
            .ok_or(LedgerError::UnknownTicket(ticket_id))?;
        if !ticket.refund_requested {
            return Err(LedgerError::RefundNotRequested(ticket_id));
        }

        let holder = ticket.owner;
        self.remove_from_owner_list(holder, ticket_id);
        self.tickets.remove(&ticket_id);
        self.tickets_remaining += 1;

        Ok(LedgerEvent::RefundApproved { ticket_id })
    }

    /// Designate `transferee` as allowed to take `ticket_id`.
    ///
    /// First half of the two-phase transfer: this sets intent,
    /// [`take_ownership`](Self::take_ownership) consumes it. A later
    /// approval overwrites any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live, or
    /// [`LedgerError::NotTicketOwner`] if `caller` does not own the
    /// ticket.
    pub fn approve_transfer(
        &mut self,
        caller: Address,
        transferee: Address,
        ticket_id: TicketId,
    ) -> Result<LedgerEvent, LedgerError> {
        let ticket = self
            .tickets
            .get_mut(&ticket_id)
            .ok_or(LedgerError::UnknownTicket(ticket_id))?;
        if ticket.owner != caller {
            return Err(LedgerError::NotTicketOwner { caller, ticket_id });
        }

        ticket.approved_transferee = Some(transferee);
        Ok(LedgerEvent::TransferApproved {
            owner: caller,
            transferee,
            ticket_id,
        })
    }

    /// Take ownership of a ticket previously approved for `caller`.
    ///
    /// Second half of the two-phase transfer. The approval is consumed:
    /// a second take by any party fails until the new owner approves
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live, or
    /// [`LedgerError::NotApproved`] if `caller` is not the approved
    /// transferee.
    pub fn take_ownership(
        &mut self,
        caller: Address,
        ticket_id: TicketId,
    ) -> Result<LedgerEvent, LedgerError> {
        let ticket = self
            .tickets
            .get(&ticket_id)
            .ok_or(LedgerError::UnknownTicket(ticket_id))?;
        if ticket.approved_transferee != Some(caller) {
            return Err(LedgerError::NotApproved { caller, ticket_id });
        }

        let previous_owner = ticket.owner;
        self.remove_from_owner_list(previous_owner, ticket_id);
        if let Some(ticket) = self.tickets.get_mut(&ticket_id) {
            ticket.owner = caller;
            ticket.approved_transferee = None;
        }
        self.owner_ticket_ids.entry(caller).or_default().push(ticket_id);

        Ok(LedgerEvent::OwnershipTaken {
            previous_owner,
            new_owner: caller,
            ticket_id,
        })
    }

    /// Remove `ticket_id` from `holder`'s list with swap-and-remove:
    /// the slot is overwritten by the last element, then the last slot
    /// is dropped. O(1), but reorders the list.
    fn remove_from_owner_list(&mut self, holder: Address, ticket_id: TicketId) {
        if let Some(ids) = self.owner_ticket_ids.get_mut(&holder) {
            if let Some(position) = ids.iter().position(|id| *id == ticket_id) {
                ids.swap_remove(position);
            }
            if ids.is_empty() {
                self.owner_ticket_ids.remove(&holder);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The seller who created this event.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// The sale parameters this ledger was created with.
    #[must_use]
    pub const fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Fixed price of one ticket.
    #[must_use]
    pub const fn ticket_price(&self) -> Money {
        self.config.ticket_price
    }

    /// Unsold inventory currently available for purchase.
    #[must_use]
    pub const fn total_supply(&self) -> u32 {
        self.tickets_remaining
    }

    /// Lifetime count of successful sales. Never decremented.
    #[must_use]
    pub const fn total_sold(&self) -> u64 {
        self.total_sold
    }

    /// Number of live tickets `address` owns.
    #[must_use]
    pub fn balance_of(&self, address: Address) -> usize {
        self.owner_ticket_ids.get(&address).map_or(0, Vec::len)
    }

    /// Ids of the live tickets `address` owns.
    ///
    /// Unordered: the order reflects swap-and-remove history, not
    /// purchase order.
    #[must_use]
    pub fn tickets_of(&self, address: Address) -> &[TicketId] {
        self.owner_ticket_ids
            .get(&address)
            .map_or(&[], Vec::as_slice)
    }

    /// Current owner of a live ticket.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub fn owner_of(&self, ticket_id: TicketId) -> Result<Address, LedgerError> {
        self.ticket(ticket_id).map(|ticket| ticket.owner)
    }

    /// The proof-of-purchase token stored at sale time.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub fn qr_data(&self, ticket_id: TicketId) -> Result<QrData, LedgerError> {
        self.ticket(ticket_id).map(|ticket| ticket.qr_data)
    }

    /// Whether a refund has been requested for a live ticket.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub fn is_refund_requested(&self, ticket_id: TicketId) -> Result<bool, LedgerError> {
        self.ticket(ticket_id).map(|ticket| ticket.refund_requested)
    }

    /// The address approved to take a live ticket, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTicket`] if the id is not live.
    pub fn approved_transferee(&self, ticket_id: TicketId) -> Result<Option<Address>, LedgerError> {
        self.ticket(ticket_id).map(|ticket| ticket.approved_transferee)
    }

    fn ticket(&self, ticket_id: TicketId) -> Result<&Ticket, LedgerError> {
        self.tickets
            .get(&ticket_id)
            .ok_or(LedgerError::UnknownTicket(ticket_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE: Money = Money::from_cents(500);

    fn qr(tag: u8) -> QrData {
        QrData::new([tag; 32])
    }

    fn ledger_with(total: u32) -> (TicketLedger, Address) {
        let seller = Address::new();
        let config = EventConfig {
            name: "FIFA World Cup Final".to_string(),
            location: "Moscow".to_string(),
            symbol: "FIFA18".to_string(),
            total_tickets: total,
            ticket_price: PRICE,
        };
        (TicketLedger::new(seller, config), seller)
    }

    mod purchases {
        use super::*;

        #[test]
        fn first_sale_gets_id_zero() {
            let (mut ledger, _) = ledger_with(5000);
            let buyer = Address::new();

            let sale = ledger.buy_ticket(buyer, qr(1), PRICE);

            assert_eq!(
                sale,
                Ok((
                    TicketId::new(0),
                    LedgerEvent::TicketSold {
                        buyer,
                        ticket_id: TicketId::new(0),
                    },
                ))
            );
            assert_eq!(ledger.total_supply(), 4999);
            assert_eq!(ledger.total_sold(), 1);
            assert_eq!(ledger.balance_of(buyer), 1);
        }

        #[test]
        fn ids_are_assigned_in_order() {
            let (mut ledger, _) = ledger_with(5000);
            let buyer = Address::new();

            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            let second = ledger.buy_ticket(buyer, qr(2), PRICE);

            assert_eq!(
                second,
                Ok((
                    TicketId::new(1),
                    LedgerEvent::TicketSold {
                        buyer,
                        ticket_id: TicketId::new(1),
                    },
                ))
            );
            assert_eq!(ledger.total_supply(), 4998);
            assert_eq!(ledger.total_sold(), 2);
            assert_eq!(
                ledger.tickets_of(buyer),
                &[TicketId::new(0), TicketId::new(1)]
            );
        }

        #[test]
        fn qr_data_is_stored_verbatim() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();

            ledger.buy_ticket(buyer, qr(7), PRICE).ok();

            assert_eq!(ledger.qr_data(TicketId::new(0)), Ok(qr(7)));
        }

        #[test]
        fn underpayment_fails_and_changes_nothing() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();

            let outcome = ledger.buy_ticket(buyer, qr(1), Money::from_cents(499));

            assert_eq!(
                outcome,
                Err(LedgerError::IncorrectPayment {
                    expected: PRICE,
                    paid: Money::from_cents(499),
                })
            );
            assert_eq!(ledger.total_supply(), 10);
            assert_eq!(ledger.total_sold(), 0);
            assert_eq!(ledger.balance_of(buyer), 0);
        }

        #[test]
        fn overpayment_is_rejected_too() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();

            let outcome = ledger.buy_ticket(buyer, qr(1), Money::from_cents(501));

            assert!(matches!(
                outcome,
                Err(LedgerError::IncorrectPayment { .. })
            ));
            assert_eq!(ledger.total_sold(), 0);
        }

        #[test]
        fn sold_out_event_rejects_purchases() {
            let (mut ledger, _) = ledger_with(1);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();

            let outcome = ledger.buy_ticket(buyer, qr(2), PRICE);

            assert_eq!(outcome, Err(LedgerError::SoldOut));
            assert_eq!(ledger.total_sold(), 1);
        }

        #[test]
        fn free_events_sell_for_zero() {
            let seller = Address::new();
            let config = EventConfig {
                name: "Open Day".to_string(),
                location: "Park".to_string(),
                symbol: "FREE".to_string(),
                total_tickets: 100,
                ticket_price: Money::ZERO,
            };
            let mut ledger = TicketLedger::new(seller, config);
            let buyer = Address::new();

            let outcome = ledger.buy_ticket(buyer, qr(1), Money::ZERO);

            assert!(outcome.is_ok());
            assert_eq!(ledger.total_supply(), 99);
        }

        #[test]
        fn duplicate_qr_data_is_permitted() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();

            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            let second = ledger.buy_ticket(buyer, qr(1), PRICE);

            assert!(second.is_ok());
            assert_eq!(ledger.qr_data(TicketId::new(0)), Ok(qr(1)));
            assert_eq!(ledger.qr_data(TicketId::new(1)), Ok(qr(1)));
        }
    }

    mod refunds {
        use super::*;

        #[test]
        fn request_flags_the_ticket() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();

            let event = ledger.request_refund(buyer, TicketId::new(0));

            assert_eq!(
                event,
                Ok(LedgerEvent::RefundRequested {
                    requester: buyer,
                    ticket_id: TicketId::new(0),
                })
            );
            assert_eq!(ledger.is_refund_requested(TicketId::new(0)), Ok(true));
            // Only flagged: still owned, still off the shelf.
            assert_eq!(ledger.balance_of(buyer), 1);
            assert_eq!(ledger.total_supply(), 9);
        }

        #[test]
        fn request_is_idempotent() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();

            ledger.request_refund(buyer, TicketId::new(0)).ok();
            let second = ledger.request_refund(buyer, TicketId::new(0));

            assert!(second.is_ok());
            assert_eq!(ledger.is_refund_requested(TicketId::new(0)), Ok(true));
        }

        #[test]
        fn only_the_ticket_owner_can_request() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();
            let stranger = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();

            let event = ledger.request_refund(stranger, TicketId::new(0));

            assert_eq!(
                event,
                Err(LedgerError::NotTicketOwner {
                    caller: stranger,
                    ticket_id: TicketId::new(0),
                })
            );
            assert_eq!(ledger.is_refund_requested(TicketId::new(0)), Ok(false));
        }

        #[test]
        fn approval_destroys_the_ticket_and_restocks() {
            let (mut ledger, seller) = ledger_with(5000);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            ledger.buy_ticket(buyer, qr(2), PRICE).ok();
            ledger.request_refund(buyer, TicketId::new(0)).ok();

            let event = ledger.approve_refund(seller, TicketId::new(0));

            assert_eq!(
                event,
                Ok(LedgerEvent::RefundApproved {
                    ticket_id: TicketId::new(0),
                })
            );
            assert_eq!(ledger.total_supply(), 4999);
            assert_eq!(ledger.tickets_of(buyer), &[TicketId::new(1)]);
            assert_eq!(ledger.qr_data(TicketId::new(1)), Ok(qr(2)));
            assert_eq!(
                ledger.owner_of(TicketId::new(0)),
                Err(LedgerError::UnknownTicket(TicketId::new(0)))
            );
        }

        #[test]
        fn total_sold_survives_refunds() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            ledger.request_refund(buyer, TicketId::new(0)).ok();
            ledger.approve_refund(seller, TicketId::new(0)).ok();

            assert_eq!(ledger.total_sold(), 1);
            assert_eq!(ledger.total_supply(), 10);
        }

        #[test]
        fn approval_requires_the_event_owner() {
            let (mut ledger, _) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            ledger.request_refund(buyer, TicketId::new(0)).ok();

            let event = ledger.approve_refund(buyer, TicketId::new(0));

            assert_eq!(event, Err(LedgerError::NotAuthorized { caller: buyer }));
            assert_eq!(ledger.balance_of(buyer), 1);
        }

        #[test]
        fn approval_without_request_fails() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();

            let event = ledger.approve_refund(seller, TicketId::new(0));

            assert_eq!(
                event,
                Err(LedgerError::RefundNotRequested(TicketId::new(0)))
            );
        }

        #[test]
        fn retired_ids_are_never_reissued() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            ledger.request_refund(buyer, TicketId::new(0)).ok();
            ledger.approve_refund(seller, TicketId::new(0)).ok();

            let sale = ledger.buy_ticket(buyer, qr(2), PRICE);

            assert_eq!(
                sale,
                Ok((
                    TicketId::new(1),
                    LedgerEvent::TicketSold {
                        buyer,
                        ticket_id: TicketId::new(1),
                    },
                ))
            );
        }
    }

    mod swap_and_remove {
        use super::*;

        #[test]
        fn middle_removal_is_filled_by_last_element() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(0), PRICE).ok();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();
            ledger.buy_ticket(buyer, qr(2), PRICE).ok();
            let before = ledger.total_supply();

            ledger.request_refund(buyer, TicketId::new(1)).ok();
            ledger.approve_refund(seller, TicketId::new(1)).ok();

            // Position 1 now holds the former last element.
            assert_eq!(
                ledger.tickets_of(buyer),
                &[TicketId::new(0), TicketId::new(2)]
            );
            assert_eq!(ledger.total_supply(), before + 1);
        }

        #[test]
        fn last_removal_just_shrinks() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            ledger.buy_ticket(buyer, qr(0), PRICE).ok();
            ledger.buy_ticket(buyer, qr(1), PRICE).ok();

            ledger.request_refund(buyer, TicketId::new(1)).ok();
            ledger.approve_refund(seller, TicketId::new(1)).ok();

            assert_eq!(ledger.tickets_of(buyer), &[TicketId::new(0)]);
        }

        #[test]
        fn first_removal_from_larger_list() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            for tag in 0..4 {
                ledger.buy_ticket(buyer, qr(tag), PRICE).ok();
            }

            ledger.request_refund(buyer, TicketId::new(0)).ok();
            ledger.approve_refund(seller, TicketId::new(0)).ok();

            // Position 0 now holds the former last element.
            assert_eq!(
                ledger.tickets_of(buyer),
                &[TicketId::new(3), TicketId::new(1), TicketId::new(2)]
            );
        }
    }

    mod transfers {
        use super::*;

        #[test]
        fn approve_then_take_moves_ownership() {
            let (mut ledger, _) = ledger_with(10);
            let alice = Address::new();
            let bob = Address::new();
            ledger.buy_ticket(alice, qr(1), PRICE).ok();

            let approved = ledger.approve_transfer(alice, bob, TicketId::new(0));
            assert_eq!(
                approved,
                Ok(LedgerEvent::TransferApproved {
                    owner: alice,
                    transferee: bob,
                    ticket_id: TicketId::new(0),
                })
            );

            let taken = ledger.take_ownership(bob, TicketId::new(0));
            assert_eq!(
                taken,
                Ok(LedgerEvent::OwnershipTaken {
                    previous_owner: alice,
                    new_owner: bob,
                    ticket_id: TicketId::new(0),
                })
            );

            assert_eq!(ledger.owner_of(TicketId::new(0)), Ok(bob));
            assert_eq!(ledger.balance_of(alice), 0);
            assert_eq!(ledger.tickets_of(bob), &[TicketId::new(0)]);
        }

        #[test]
        fn approval_is_consumed_by_take() {
            let (mut ledger, _) = ledger_with(10);
            let alice = Address::new();
            let bob = Address::new();
            ledger.buy_ticket(alice, qr(1), PRICE).ok();
            ledger.approve_transfer(alice, bob, TicketId::new(0)).ok();
            ledger.take_ownership(bob, TicketId::new(0)).ok();

            let second = ledger.take_ownership(bob, TicketId::new(0));

            assert_eq!(
                second,
                Err(LedgerError::NotApproved {
                    caller: bob,
                    ticket_id: TicketId::new(0),
                })
            );
            assert_eq!(ledger.approved_transferee(TicketId::new(0)), Ok(None));
        }

        #[test]
        fn only_the_approved_address_can_take() {
            let (mut ledger, _) = ledger_with(10);
            let alice = Address::new();
            let bob = Address::new();
            let mallory = Address::new();
            ledger.buy_ticket(alice, qr(1), PRICE).ok();
            ledger.approve_transfer(alice, bob, TicketId::new(0)).ok();

            let event = ledger.take_ownership(mallory, TicketId::new(0));

            assert_eq!(
                event,
                Err(LedgerError::NotApproved {
                    caller: mallory,
                    ticket_id: TicketId::new(0),
                })
            );
            assert_eq!(ledger.owner_of(TicketId::new(0)), Ok(alice));
        }

        #[test]
        fn later_approval_overwrites_earlier_one() {
            let (mut ledger, _) = ledger_with(10);
            let alice = Address::new();
            let bob = Address::new();
            let carol = Address::new();
            ledger.buy_ticket(alice, qr(1), PRICE).ok();

            ledger.approve_transfer(alice, bob, TicketId::new(0)).ok();
            ledger.approve_transfer(alice, carol, TicketId::new(0)).ok();

            assert_eq!(
                ledger.approved_transferee(TicketId::new(0)),
                Ok(Some(carol))
            );
            assert!(ledger.take_ownership(bob, TicketId::new(0)).is_err());
            assert!(ledger.take_ownership(carol, TicketId::new(0)).is_ok());
        }

        #[test]
        fn only_the_ticket_owner_can_approve() {
            let (mut ledger, _) = ledger_with(10);
            let alice = Address::new();
            let mallory = Address::new();
            ledger.buy_ticket(alice, qr(1), PRICE).ok();

            let event = ledger.approve_transfer(mallory, mallory, TicketId::new(0));

            assert_eq!(
                event,
                Err(LedgerError::NotTicketOwner {
                    caller: mallory,
                    ticket_id: TicketId::new(0),
                })
            );
        }
    }

    mod unknown_tickets {
        use super::*;

        #[test]
        fn every_operation_rejects_unissued_ids() {
            let (mut ledger, seller) = ledger_with(10);
            let buyer = Address::new();
            let missing = TicketId::new(42);

            assert_eq!(
                ledger.request_refund(buyer, missing),
                Err(LedgerError::UnknownTicket(missing))
            );
            assert_eq!(
                ledger.approve_refund(seller, missing),
                Err(LedgerError::UnknownTicket(missing))
            );
            assert_eq!(
                ledger.approve_transfer(buyer, seller, missing),
                Err(LedgerError::UnknownTicket(missing))
            );
            assert_eq!(
                ledger.take_ownership(buyer, missing),
                Err(LedgerError::UnknownTicket(missing))
            );
            assert_eq!(
                ledger.owner_of(missing),
                Err(LedgerError::UnknownTicket(missing))
            );
            assert_eq!(
                ledger.qr_data(missing),
                Err(LedgerError::UnknownTicket(missing))
            );
        }
    }

    mod notifications {
        use super::*;

        #[test]
        fn event_types_are_versioned() {
            let buyer = Address::new();
            assert_eq!(
                LedgerEvent::TicketSold {
                    buyer,
                    ticket_id: TicketId::new(0),
                }
                .event_type(),
                "TicketSold.v1"
            );
            assert_eq!(
                LedgerEvent::RefundApproved {
                    ticket_id: TicketId::new(0),
                }
                .event_type(),
                "RefundApproved.v1"
            );
        }
    }
}
