//! Payment gateway abstraction.
//!
//! The session hands a [`PendingOrder`] to a [`PaymentGateway`] and applies
//! whatever comes back. The only gateway shipped is [`SimulatedGateway`],
//! which waits a fixed delay and then approves (or declines) every order.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::store::{PaymentError, PaymentReceipt, PendingOrder};

/// Default processing delay of the simulated gateway.
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(2000);

/// Something that can take payment for an order.
///
/// Implementations must be cancel-safe: the session drops the future when the
/// checkout is abandoned.
#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug {
    /// Charge the shopper for `order`.
    async fn confirm(&self, order: &PendingOrder) -> Result<PaymentReceipt, PaymentError>;
}

/// Gateway that settles after a fixed delay without contacting anyone.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    decline: Option<String>,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKOUT_DELAY)
    }
}

impl SimulatedGateway {
    /// Approve every order after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            decline: None,
        }
    }

    /// Decline every order after `delay` with `reason`.
    #[must_use]
    pub fn declining(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            delay,
            decline: Some(reason.into()),
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    #[instrument(skip(self, order), fields(order = %order.order, total = %order.total))]
    async fn confirm(&self, order: &PendingOrder) -> Result<PaymentReceipt, PaymentError> {
        debug!(delay_ms = self.delay.as_millis(), "Simulating payment");
        tokio::time::sleep(self.delay).await;

        match &self.decline {
            Some(reason) => Err(PaymentError::Declined(reason.clone())),
            None => Ok(PaymentReceipt::for_order(order)),
        }
    }
}
