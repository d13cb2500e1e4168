//! Domain types for the ticket-sale ledger.
//!
//! Value objects shared by the seller registry and the per-event ticket
//! ledger: caller identity, ticket/event identifiers, money, the opaque
//! proof-of-purchase token, and the sale configuration a seller supplies
//! when creating an event.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Authenticated caller identity.
///
/// Every mutating operation receives the caller's address from the
/// execution environment; the core never authenticates an address, it
/// only authorizes based on the one it is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(Uuid);

impl Address {
    /// Creates a new random `Address`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `Address` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a ticketed event (one ledger per event)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a ticket within one ledger.
///
/// Ticket ids come from a monotonic counter: the first ticket sold is
/// id 0, and a retired id is never assigned again, even after a refund
/// frees its inventory slot. That makes a refunded ticket permanently
/// distinguishable from any ticket sold later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(u64);

impl TicketId {
    /// The first ticket id assigned by a fresh ledger.
    pub const FIRST: Self = Self(0);

    /// Create a `TicketId` with the given value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the id as a number
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The id the counter hands out after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TicketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount (free events are allowed)
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Proof-of-purchase token
// ============================================================================

/// Opaque proof-of-purchase token attached to a ticket at sale time.
///
/// The ledger stores the token verbatim and returns it unchanged by
/// ticket id. It is not validated for uniqueness: two tickets may carry
/// the same token; only the ticket id is unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QrData([u8; 32]);

impl QrData {
    /// Create a token from a 32-byte hash
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw token bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for QrData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for QrData {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// ============================================================================
// Event configuration and discovery listing
// ============================================================================

/// Sale parameters a seller supplies when creating an event.
///
/// All fields are fixed for the lifetime of the ledger they configure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Human-readable event name
    pub name: String,
    /// Where the event takes place
    pub location: String,
    /// Short ticker-style symbol for the event
    pub symbol: String,
    /// Number of tickets available at creation
    pub total_tickets: u32,
    /// Fixed price of one ticket; a purchase must pay exactly this
    pub ticket_price: Money,
}

impl EventConfig {
    /// Whether this configuration can back a ledger.
    ///
    /// An event needs at least one ticket to sell. Any price is valid,
    /// including zero (free events).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.total_tickets > 0
    }
}

/// Discovery record the registry appends for every created event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListing {
    /// Identifier of the created ledger
    pub event_id: EventId,
    /// The approved seller who owns the ledger
    pub seller: Address,
    /// The sale parameters the ledger was created with
    pub config: EventConfig,
}

// ============================================================================
// Ticket record
// ============================================================================

/// A live ticket: one uniquely numbered ownership record.
///
/// Created only by a sale, destroyed only by an approved refund.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Current owner of the ticket
    pub owner: Address,
    /// Opaque proof-of-purchase token, stored verbatim
    pub qr_data: QrData,
    /// Address allowed to take ownership, if any (two-phase transfer)
    pub approved_transferee: Option<Address>,
    /// Whether the owner has asked for a refund
    pub refund_requested: bool,
}

impl Ticket {
    /// A freshly sold ticket: owned by the buyer, no approval, no
    /// refund request.
    #[must_use]
    pub const fn new(owner: Address, qr_data: QrData) -> Self {
        Self {
            owner,
            qr_data,
            approved_transferee: None,
            refund_requested: false,
        }
    }
}

// ============================================================================
// Caller roles
// ============================================================================

/// Role of an address as seen by the registry.
///
/// Derived, not stored: the registry owner is the manager, approved
/// sellers are sellers, everyone else is a buyer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The registry administrator
    Manager,
    /// An approved ticket seller
    Seller,
    /// Any other address
    Buyer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::Seller => write!(f, "seller"),
            Self::Buyer => write!(f, "buyer"),
        }
    }
}
