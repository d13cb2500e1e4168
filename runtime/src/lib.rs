//! # Tickethub Runtime
//!
//! Linearizable async handles around the Tickethub state machines, plus
//! the outbound notification bus the presentation layer subscribes to.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   request/approve/create   ┌───────────────┐
//! │  Caller  │ ─────────────────────────► │  Hub handle   │
//! └──────────┘                            │ (RwLock'd     │
//!      │                                  │  registry)    │
//!      │  buy/refund/transfer             └──────┬────────┘
//!      │                                         │ creates
//!      ▼                                         ▼
//! ┌───────────────┐                       ┌───────────────┐
//! │ Ledger handle │ ◄──────────────────── │ EventFactory  │
//! │ (RwLock'd     │                       └───────────────┘
//! │  ledger)      │
//! └──────┬────────┘
//!        │ publishes (stream, sequence, recorded_at)
//!        ▼
//! ┌───────────────┐   subscribe    ┌──────────────┐
//! │ Notification  │ ─────────────► │ Presentation │
//! │     bus       │                │    layer     │
//! └───────────────┘                └──────────────┘
//! ```
//!
//! Every mutating call on a handle takes that instance's write lock,
//! applies the mutation in full or not at all, and publishes the
//! resulting notification before releasing the lock. Calls against one
//! instance are therefore linearizable; different ledgers are fully
//! independent. There is no retry or backoff: callers see an immediate
//! typed success or an immediate typed failure.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tickethub_core::types::{Address, EventConfig, Money, QrData};
//! use tickethub_runtime::{BroadcastBus, Hub, InProcessFactory};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let admin = Address::new();
//! let seller = Address::new();
//! let buyer = Address::new();
//!
//! let hub = Hub::new(admin, Arc::new(InProcessFactory), Arc::new(BroadcastBus::new()));
//! hub.request_seller_status(seller).await?;
//! hub.approve_seller(admin, seller).await?;
//!
//! let event_id = hub
//!     .create_event(seller, EventConfig {
//!         name: "FIFA World Cup Final".to_string(),
//!         location: "Moscow".to_string(),
//!         symbol: "FIFA18".to_string(),
//!         total_tickets: 5000,
//!         ticket_price: Money::from_cents(500),
//!     })
//!     .await?;
//!
//! let ledger = hub.ledger(event_id).await.ok_or("missing ledger")?;
//! let ticket = ledger
//!     .buy_ticket(buyer, QrData::new([7; 32]), Money::from_cents(500))
//!     .await?;
//! assert_eq!(ticket.value(), 0);
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod config;
pub mod factory;
pub mod hub;
pub mod ledger;

mod publisher;

pub use bus::{BroadcastBus, NotificationBus, NotificationBusError, NotificationStream};
pub use config::{Config, init_tracing};
pub use factory::{EventFactory, FactoryError, InProcessFactory};
pub use hub::{HUB_STREAM, Hub};
pub use ledger::Ledger;
