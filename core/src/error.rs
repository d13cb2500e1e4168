//! Typed rejection errors for the registry and ledger state machines.
//!
//! Every failure is a local, synchronous rejection: the operation either
//! completes in full or returns one of these errors with zero state
//! change. Nothing is retried and nothing is recovered silently;
//! surfacing messages to end users is the presentation layer's job.

use crate::types::{Address, Money, TicketId};
use thiserror::Error;

/// Rejections raised by the seller registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// Caller is not the registry administrator
    #[error("caller {caller} is not the registry owner")]
    NotAuthorized {
        /// The address that attempted the operation
        caller: Address,
    },

    /// Address re-requested seller status while already pending or approved
    #[error("address {address} is already pending or approved")]
    AlreadyPendingOrApproved {
        /// The address that re-requested
        address: Address,
    },

    /// Approval or rejection named an address with no pending request
    #[error("address {address} has no pending seller request")]
    NotPending {
        /// The address named by the administrator
        address: Address,
    },

    /// Event creation was attempted by an address that is not approved
    #[error("caller {caller} is not an approved seller")]
    NotAnApprovedSeller {
        /// The address that attempted event creation
        caller: Address,
    },

    /// Event configuration cannot back a ledger
    #[error("invalid event configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: String,
    },
}

/// Rejections raised by a ticket ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the seller who owns this ledger
    #[error("caller {caller} is not the event owner")]
    NotAuthorized {
        /// The address that attempted the operation
        caller: Address,
    },

    /// Payment did not match the ticket price exactly
    #[error("incorrect payment: ticket costs {expected}, received {paid}")]
    IncorrectPayment {
        /// The fixed ticket price
        expected: Money,
        /// What the buyer actually paid
        paid: Money,
    },

    /// No unsold inventory remains
    #[error("event is sold out")]
    SoldOut,

    /// Referenced ticket id was never issued, or was already refunded
    #[error("unknown ticket {0}")]
    UnknownTicket(TicketId),

    /// Caller does not own the referenced ticket
    #[error("caller {caller} does not own ticket {ticket_id}")]
    NotTicketOwner {
        /// The address that attempted the operation
        caller: Address,
        /// The ticket it tried to operate on
        ticket_id: TicketId,
    },

    /// Refund approval for a ticket whose owner never requested one
    #[error("no refund was requested for ticket {0}")]
    RefundNotRequested(TicketId),

    /// Ownership take-over by an address that is not the approved transferee
    #[error("caller {caller} is not approved to take ticket {ticket_id}")]
    NotApproved {
        /// The address that attempted the take-over
        caller: Address,
        /// The ticket it tried to take
        ticket_id: TicketId,
    },
}
