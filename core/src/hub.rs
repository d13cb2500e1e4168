//! Seller registry state machine (the "hub").
//!
//! The registry owns the set of pending seller requests and approved
//! sellers, and gatekeeps event creation. It never implements ledger
//! logic itself: once a seller is approved and an event is created,
//! ticket operations go directly to that event's ledger.
//!
//! Every mutating operation takes the authenticated caller address as an
//! explicit argument and returns either the typed notification describing
//! what happened or a typed rejection. Failed operations change nothing.

use crate::error::HubError;
use crate::event::Notification;
use crate::types::{Address, EventConfig, EventListing, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Notifications
// ============================================================================

/// Typed facts emitted by the registry after successful mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubEvent {
    /// An address asked for seller status
    SellerRequested {
        /// The requesting address
        requester: Address,
    },

    /// The administrator granted seller status
    SellerApproved {
        /// The newly approved seller
        candidate: Address,
    },

    /// The administrator declined a pending request
    SellerRejected {
        /// The rejected address
        candidate: Address,
    },

    /// An approved seller created a new event
    EventCreated {
        /// The discovery record for the new ledger
        listing: EventListing,
    },

    /// The registry changed administrators
    OwnershipTransferred {
        /// The outgoing administrator
        previous_owner: Address,
        /// The incoming administrator
        new_owner: Address,
    },
}

impl Notification for HubEvent {
    fn event_type(&self) -> &'static str {
        match self {
            HubEvent::SellerRequested { .. } => "SellerRequested.v1",
            HubEvent::SellerApproved { .. } => "SellerApproved.v1",
            HubEvent::SellerRejected { .. } => "SellerRejected.v1",
            HubEvent::EventCreated { .. } => "EventCreated.v1",
            HubEvent::OwnershipTransferred { .. } => "OwnershipTransferred.v1",
        }
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Seller-authorization and event-discovery state.
///
/// An address is never simultaneously pending and approved: request
/// checks both sets, approval and rejection both drain the pending set.
/// The event listing sequence is append-only.
#[derive(Clone, Debug)]
pub struct SellerRegistry {
    owner: Address,
    pending_requesters: HashSet<Address>,
    approved_sellers: HashSet<Address>,
    events: Vec<EventListing>,
}

impl SellerRegistry {
    /// Create a registry administered by `owner`, with no pending
    /// requests, no approved sellers, and no events.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            pending_requesters: HashSet::new(),
            approved_sellers: HashSet::new(),
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Ask for seller status.
    ///
    /// Re-requesting while already pending does not duplicate the entry
    /// or inflate the pending count; it is rejected instead, as is a
    /// request from an already approved seller.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AlreadyPendingOrApproved`] if `caller` is
    /// already pending or already an approved seller.
    pub fn request_seller_status(&mut self, caller: Address) -> Result<HubEvent, HubError> {
        if self.pending_requesters.contains(&caller) || self.approved_sellers.contains(&caller) {
            return Err(HubError::AlreadyPendingOrApproved { address: caller });
        }

        self.pending_requesters.insert(caller);
        Ok(HubEvent::SellerRequested { requester: caller })
    }

    /// Grant seller status to a pending requester.
    ///
    /// Moves `candidate` from the pending set to the approved set.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAuthorized`] if `admin` is not the registry
    /// owner, or [`HubError::NotPending`] if `candidate` has no pending
    /// request.
    pub fn approve_seller(
        &mut self,
        admin: Address,
        candidate: Address,
    ) -> Result<HubEvent, HubError> {
        self.require_owner(admin)?;
        if !self.pending_requesters.remove(&candidate) {
            return Err(HubError::NotPending { address: candidate });
        }

        self.approved_sellers.insert(candidate);
        Ok(HubEvent::SellerApproved { candidate })
    }

    /// Decline a pending seller request.
    ///
    /// Removes `candidate` from the pending set without granting
    /// approval. The candidate may request again later.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAuthorized`] if `admin` is not the registry
    /// owner, or [`HubError::NotPending`] if `candidate` has no pending
    /// request.
    pub fn reject_seller(
        &mut self,
        admin: Address,
        candidate: Address,
    ) -> Result<HubEvent, HubError> {
        self.require_owner(admin)?;
        if !self.pending_requesters.remove(&candidate) {
            return Err(HubError::NotPending { address: candidate });
        }

        Ok(HubEvent::SellerRejected { candidate })
    }

    /// Check that `caller` may create an event with `config`.
    ///
    /// Event creation is split in two: this authorization check runs
    /// before the factory instantiates the ledger, and
    /// [`record_event`](Self::record_event) appends the listing after.
    /// Both must run under the same exclusive section so the approval
    /// cannot be revoked in between.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAnApprovedSeller`] if `caller` is not
    /// approved, or [`HubError::InvalidConfig`] if the configuration has
    /// no tickets to sell.
    pub fn authorize_event_creation(
        &self,
        caller: Address,
        config: &EventConfig,
    ) -> Result<(), HubError> {
        if !self.approved_sellers.contains(&caller) {
            return Err(HubError::NotAnApprovedSeller { caller });
        }
        if !config.is_valid() {
            return Err(HubError::InvalidConfig {
                reason: "total tickets must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Append the discovery record for a freshly created ledger.
    ///
    /// Call only after [`authorize_event_creation`](Self::authorize_event_creation)
    /// succeeded and the factory produced the ledger, within the same
    /// exclusive section.
    pub fn record_event(&mut self, listing: EventListing) -> HubEvent {
        self.events.push(listing.clone());
        HubEvent::EventCreated { listing }
    }

    /// Hand the registry to a new administrator.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAuthorized`] if `caller` is not the current
    /// owner.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<HubEvent, HubError> {
        self.require_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        Ok(HubEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }

    fn require_owner(&self, caller: Address) -> Result<(), HubError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(HubError::NotAuthorized { caller })
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The current administrator.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Number of addresses with an open seller request.
    #[must_use]
    pub fn count_pending(&self) -> usize {
        self.pending_requesters.len()
    }

    /// Whether `address` has an open seller request.
    #[must_use]
    pub fn is_pending(&self, address: Address) -> bool {
        self.pending_requesters.contains(&address)
    }

    /// Whether `address` is authorized to create events.
    #[must_use]
    pub fn is_approved_seller(&self, address: Address) -> bool {
        self.approved_sellers.contains(&address)
    }

    /// The role of an address as the registry sees it.
    #[must_use]
    pub fn role_of(&self, address: Address) -> Role {
        if address == self.owner {
            Role::Manager
        } else if self.approved_sellers.contains(&address) {
            Role::Seller
        } else {
            Role::Buyer
        }
    }

    /// All created events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventListing] {
        &self.events
    }
}
