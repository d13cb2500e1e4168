//! Linearizable handle for the seller registry.
//!
//! Wraps the pure [`SellerRegistry`] state machine behind a `tokio`
//! `RwLock` and owns the map of created ledgers. Mutations take the
//! write lock, apply in full, and publish on the `hub` stream before
//! releasing it; event creation additionally calls the factory inside
//! the same critical section so an approval cannot be revoked between
//! the check and the recording.

use crate::bus::NotificationBus;
use crate::factory::{EventFactory, FactoryError};
use crate::ledger::Ledger;
use crate::publisher::Publisher;
use std::collections::HashMap;
use std::sync::Arc;
use tickethub_core::environment::{Clock, SystemClock};
use tickethub_core::error::HubError;
use tickethub_core::hub::SellerRegistry;
use tickethub_core::stream::{Sequence, StreamId};
use tickethub_core::types::{Address, EventConfig, EventId, EventListing, Role};
use tokio::sync::RwLock;

/// The notification stream the registry publishes on.
pub const HUB_STREAM: &str = "hub";

struct HubState {
    registry: SellerRegistry,
    sequence: Sequence,
    ledgers: HashMap<EventId, Ledger>,
}

/// Shared, linearizable handle to the seller registry.
///
/// Cheap to clone; all clones drive the same instance. Created ledgers
/// are reachable through [`ledger`](Hub::ledger) and operate
/// independently of the hub afterwards.
#[derive(Clone)]
pub struct Hub {
    state: Arc<RwLock<HubState>>,
    publisher: Arc<Publisher>,
    bus: Arc<dyn NotificationBus>,
    clock: Arc<dyn Clock>,
    factory: Arc<dyn EventFactory>,
}

impl Hub {
    /// Create a hub administered by `admin`, publishing on `bus` and
    /// delegating ledger instantiation to `factory`.
    #[must_use]
    pub fn new(
        admin: Address,
        factory: Arc<dyn EventFactory>,
        bus: Arc<dyn NotificationBus>,
    ) -> Self {
        Self::with_clock(admin, factory, bus, Arc::new(SystemClock))
    }

    /// Like [`new`](Hub::new), with an injected clock for deterministic
    /// notification timestamps.
    #[must_use]
    pub fn with_clock(
        admin: Address,
        factory: Arc<dyn EventFactory>,
        bus: Arc<dyn NotificationBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let publisher = Publisher::new(
            Arc::clone(&bus),
            Arc::clone(&clock),
            StreamId::new(HUB_STREAM),
        );
        Self {
            state: Arc::new(RwLock::new(HubState {
                registry: SellerRegistry::new(admin),
                sequence: Sequence::INITIAL,
                ledgers: HashMap::new(),
            })),
            publisher: Arc::new(publisher),
            bus,
            clock,
            factory,
        }
    }

    /// The bus this hub and its ledgers publish to.
    #[must_use]
    pub fn bus(&self) -> Arc<dyn NotificationBus> {
        Arc::clone(&self.bus)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Ask for seller status on behalf of `caller`.
    ///
    /// Publishes `SellerRequested.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AlreadyPendingOrApproved`] if `caller` is
    /// already pending or approved.
    #[tracing::instrument(skip(self), name = "hub_request_seller_status")]
    pub async fn request_seller_status(&self, caller: Address) -> Result<(), HubError> {
        let mut state = self.state.write().await;
        metrics::counter!("hub.commands.total").increment(1);

        let event = state.registry.request_seller_status(caller)?;
        tracing::debug!(%caller, "Seller status requested");

        let HubState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    /// Grant seller status to a pending requester.
    ///
    /// Publishes `SellerApproved.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAuthorized`] or [`HubError::NotPending`].
    #[tracing::instrument(skip(self), name = "hub_approve_seller")]
    pub async fn approve_seller(&self, admin: Address, candidate: Address) -> Result<(), HubError> {
        let mut state = self.state.write().await;
        metrics::counter!("hub.commands.total").increment(1);

        let event = state.registry.approve_seller(admin, candidate)?;
        metrics::counter!("hub.sellers.approved").increment(1);
        tracing::info!(%candidate, "Seller approved");

        let HubState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    /// Decline a pending seller request.
    ///
    /// Publishes `SellerRejected.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAuthorized`] or [`HubError::NotPending`].
    #[tracing::instrument(skip(self), name = "hub_reject_seller")]
    pub async fn reject_seller(&self, admin: Address, candidate: Address) -> Result<(), HubError> {
        let mut state = self.state.write().await;
        metrics::counter!("hub.commands.total").increment(1);

        let event = state.registry.reject_seller(admin, candidate)?;
        tracing::info!(%candidate, "Seller rejected");

        let HubState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    /// Create a new event for an approved seller.
    ///
    /// Authorizes the caller, has the factory instantiate the ledger,
    /// records the listing, and publishes `EventCreated.v1`, all within
    /// one critical section. Returns the new event's identifier; the
    /// ledger handle is available via [`ledger`](Hub::ledger).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAnApprovedSeller`] or
    /// [`HubError::InvalidConfig`].
    #[tracing::instrument(skip(self, config), name = "hub_create_event")]
    pub async fn create_event(
        &self,
        caller: Address,
        config: EventConfig,
    ) -> Result<EventId, HubError> {
        let mut state = self.state.write().await;
        metrics::counter!("hub.commands.total").increment(1);

        state.registry.authorize_event_creation(caller, &config)?;
        let (event_id, machine) = self
            .factory
            .create(caller, config.clone())
            .map_err(|FactoryError::InvalidConfig { reason }| HubError::InvalidConfig { reason })?;

        let ledger = Ledger::new(
            event_id,
            machine,
            Arc::clone(&self.bus),
            Arc::clone(&self.clock),
        );
        state.ledgers.insert(event_id, ledger);

        let listing = EventListing {
            event_id,
            seller: caller,
            config,
        };
        let event = state.registry.record_event(listing);
        metrics::counter!("hub.events.created").increment(1);
        tracing::info!(%event_id, seller = %caller, "Event created");

        let HubState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(event_id)
    }

    /// Hand the registry to a new administrator.
    ///
    /// Publishes `OwnershipTransferred.v1`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotAuthorized`] if `caller` is not the
    /// current owner.
    #[tracing::instrument(skip(self), name = "hub_transfer_ownership")]
    pub async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), HubError> {
        let mut state = self.state.write().await;
        metrics::counter!("hub.commands.total").increment(1);

        let event = state.registry.transfer_ownership(caller, new_owner)?;
        tracing::info!(%new_owner, "Registry ownership transferred");

        let HubState { sequence, .. } = &mut *state;
        self.publisher.publish(sequence, &event).await;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The current administrator.
    pub async fn owner(&self) -> Address {
        self.state.read().await.registry.owner()
    }

    /// Number of addresses with an open seller request.
    pub async fn count_pending(&self) -> usize {
        self.state.read().await.registry.count_pending()
    }

    /// Whether `address` has an open seller request.
    pub async fn is_pending(&self, address: Address) -> bool {
        self.state.read().await.registry.is_pending(address)
    }

    /// Whether `address` is authorized to create events.
    pub async fn is_approved_seller(&self, address: Address) -> bool {
        self.state.read().await.registry.is_approved_seller(address)
    }

    /// The role of an address as the registry sees it.
    pub async fn role_of(&self, address: Address) -> Role {
        self.state.read().await.registry.role_of(address)
    }

    /// All created events, oldest first.
    pub async fn events(&self) -> Vec<EventListing> {
        self.state.read().await.registry.events().to_vec()
    }

    /// Handle to a created ledger, if the event exists.
    pub async fn ledger(&self, event_id: EventId) -> Option<Ledger> {
        self.state.read().await.ledgers.get(&event_id).cloned()
    }
}
