//! # Tickethub Testing
//!
//! Testing utilities and helpers for the Tickethub ledger.
//!
//! This crate provides:
//! - Mock implementations of environment traits
//! - A fluent Given-When-Then harness for the state machines
//! - Builders for common test fixtures
//!
//! ## Example
//!
//! ```
//! use tickethub_core::hub::{HubEvent, SellerRegistry};
//! use tickethub_core::types::Address;
//! use tickethub_testing::MachineTest;
//!
//! let admin = Address::new();
//! let seller = Address::new();
//!
//! MachineTest::given(SellerRegistry::new(admin))
//!     .when(|registry| registry.request_seller_status(seller))
//!     .then_event(HubEvent::SellerRequested { requester: seller })
//!     .then_state(|registry| {
//!         assert_eq!(registry.count_pending(), 1);
//!     })
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tickethub_core::environment::Clock;


/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tickethub_testing::mocks::FixedClock;
    /// use tickethub_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Builders for common test fixtures.
pub mod fixtures {
    use tickethub_core::types::{EventConfig, Money, QrData};

    /// An event configuration with the given inventory and price.
    ///
    /// Name, location, and symbol are filled with stable placeholder
    /// values; tests that care about metadata should build their own
    /// [`EventConfig`].
    #[must_use]
    pub fn event_config(total_tickets: u32, price_cents: u64) -> EventConfig {
        EventConfig {
            name: "FIFA World Cup Final".to_string(),
            location: "Moscow".to_string(),
            symbol: "FIFA18".to_string(),
            total_tickets,
            ticket_price: Money::from_cents(price_cents),
        }
    }

    /// A recognizable proof-of-purchase token: all 32 bytes set to `tag`.
    #[must_use]
    pub fn qr(tag: u8) -> QrData {
        QrData::new([tag; 32])
    }
}

// Re-export commonly used items
pub use machine_test::MachineTest;
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_fixtures() {
        let config = fixtures::event_config(5000, 500);
        assert_eq!(config.total_tickets, 5000);
        assert_eq!(config.ticket_price.cents(), 500);
        assert_eq!(fixtures::qr(7).as_bytes(), &[7; 32]);
    }
}
