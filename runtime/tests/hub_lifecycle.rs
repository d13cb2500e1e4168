//! Seller onboarding and event creation through the hub handle.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use tickethub_core::error::HubError;
use tickethub_core::types::{Address, EventId, Role};
use tickethub_runtime::{BroadcastBus, Hub, InProcessFactory};
use tickethub_testing::fixtures::event_config;

fn hub(admin: Address) -> Hub {
    Hub::new(admin, Arc::new(InProcessFactory), Arc::new(BroadcastBus::new()))
}

#[tokio::test]
async fn request_then_approve_drains_pending() {
    let admin = Address::new();
    let seller = Address::new();
    let hub = hub(admin);

    hub.request_seller_status(seller).await.unwrap();
    assert_eq!(hub.count_pending().await, 1);

    hub.approve_seller(admin, seller).await.unwrap();
    assert_eq!(hub.count_pending().await, 0);
    assert!(hub.is_approved_seller(seller).await);
}

#[tokio::test]
async fn request_then_reject_drains_pending() {
    let admin = Address::new();
    let seller = Address::new();
    let hub = hub(admin);

    hub.request_seller_status(seller).await.unwrap();
    hub.reject_seller(admin, seller).await.unwrap();

    assert_eq!(hub.count_pending().await, 0);
    assert!(!hub.is_approved_seller(seller).await);
}

#[tokio::test]
async fn non_admin_cannot_approve() {
    let admin = Address::new();
    let seller = Address::new();
    let stranger = Address::new();
    let hub = hub(admin);

    hub.request_seller_status(seller).await.unwrap();
    let result = hub.approve_seller(stranger, seller).await;

    assert_eq!(result, Err(HubError::NotAuthorized { caller: stranger }));
    assert_eq!(hub.count_pending().await, 1);
}

#[tokio::test]
async fn created_event_is_listed_with_its_metadata() {
    let admin = Address::new();
    let seller = Address::new();
    let hub = hub(admin);
    hub.request_seller_status(seller).await.unwrap();
    hub.approve_seller(admin, seller).await.unwrap();

    let event_id = hub
        .create_event(seller, event_config(5000, 500))
        .await
        .unwrap();

    let events = hub.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_id, event_id);
    assert_eq!(events[0].seller, seller);
    assert_eq!(events[0].config.name, "FIFA World Cup Final");
    assert_eq!(events[0].config.location, "Moscow");
    assert_eq!(events[0].config.symbol, "FIFA18");
    assert_eq!(events[0].config.total_tickets, 5000);
    assert_eq!(events[0].config.ticket_price.cents(), 500);

    let ledger = hub.ledger(event_id).await.expect("ledger exists");
    assert_eq!(ledger.owner().await, seller);
    assert_eq!(ledger.total_supply().await, 5000);
}

#[tokio::test]
async fn unapproved_caller_cannot_create_events() {
    let admin = Address::new();
    let stranger = Address::new();
    let hub = hub(admin);

    let result = hub.create_event(stranger, event_config(100, 500)).await;

    assert_eq!(
        result,
        Err(HubError::NotAnApprovedSeller { caller: stranger })
    );
    assert!(hub.events().await.is_empty());
}

#[tokio::test]
async fn zero_ticket_config_is_rejected() {
    let admin = Address::new();
    let seller = Address::new();
    let hub = hub(admin);
    hub.request_seller_status(seller).await.unwrap();
    hub.approve_seller(admin, seller).await.unwrap();

    let result = hub.create_event(seller, event_config(0, 500)).await;

    assert!(matches!(result, Err(HubError::InvalidConfig { .. })));
    assert!(hub.events().await.is_empty());
}

#[tokio::test]
async fn unknown_event_id_has_no_ledger() {
    let hub = hub(Address::new());
    assert!(hub.ledger(EventId::new()).await.is_none());
}

#[tokio::test]
async fn roles_follow_registry_state() {
    let admin = Address::new();
    let seller = Address::new();
    let buyer = Address::new();
    let hub = hub(admin);
    hub.request_seller_status(seller).await.unwrap();
    hub.approve_seller(admin, seller).await.unwrap();

    assert_eq!(hub.role_of(admin).await, Role::Manager);
    assert_eq!(hub.role_of(seller).await, Role::Seller);
    assert_eq!(hub.role_of(buyer).await, Role::Buyer);
}

#[tokio::test]
async fn ownership_transfer_moves_admin_rights() {
    let admin = Address::new();
    let successor = Address::new();
    let seller = Address::new();
    let hub = hub(admin);

    hub.transfer_ownership(admin, successor).await.unwrap();
    assert_eq!(hub.owner().await, successor);

    hub.request_seller_status(seller).await.unwrap();
    assert_eq!(
        hub.approve_seller(admin, seller).await,
        Err(HubError::NotAuthorized { caller: admin })
    );
    hub.approve_seller(successor, seller).await.unwrap();
    assert!(hub.is_approved_seller(seller).await);
}
