//! # Tickethub Core
//!
//! Pure state machines for a ticket-sale ledger.
//!
//! This crate holds the two authoritative state machines of the system
//! and nothing else: no I/O, no locking, no clock reads. Every mutating
//! operation takes the authenticated caller address explicitly, applies
//! all of its effects or none of them, and returns either a typed
//! notification describing what happened or a typed rejection.
//!
//! ## Components
//!
//! - [`hub::SellerRegistry`]: seller authorization and event discovery.
//!   Addresses request seller status, the administrator approves or
//!   rejects, approved sellers create events.
//! - [`ledger::TicketLedger`]: per-event ticket inventory and ownership.
//!   Exact-payment sales, flag-then-approve refunds with inventory
//!   restock, and two-phase (approve, then take) ownership transfers.
//!
//! The runtime crate wraps these machines in linearizable async handles
//! and publishes their notifications on a bus; the testing crate drives
//! them deterministically.
//!
//! ## Example
//!
//! ```
//! use tickethub_core::hub::SellerRegistry;
//! use tickethub_core::types::Address;
//!
//! let admin = Address::new();
//! let seller = Address::new();
//! let mut registry = SellerRegistry::new(admin);
//!
//! registry.request_seller_status(seller)?;
//! registry.approve_seller(admin, seller)?;
//! assert!(registry.is_approved_seller(seller));
//! # Ok::<(), tickethub_core::error::HubError>(())
//! ```

pub mod environment;
pub mod error;
pub mod event;
pub mod hub;
pub mod ledger;
pub mod stream;
pub mod types;

pub use error::{HubError, LedgerError};
pub use event::{Notification, NotificationError, SerializedNotification};
pub use hub::{HubEvent, SellerRegistry};
pub use ledger::{LedgerEvent, TicketLedger};
pub use stream::{Sequence, StreamId};
pub use types::{
    Address, EventConfig, EventId, EventListing, Money, QrData, Role, Ticket, TicketId,
};
