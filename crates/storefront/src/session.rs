//! The shopping session actor.
//!
//! One task owns the [`Storefront`] and processes commands strictly in
//! arrival order. Adapters talk to it through a cloneable [`SessionHandle`]:
//!
//! - `dispatch` sends a command and waits for its outcome
//! - `view` reads the latest [`StorefrontView`] without a round trip
//! - `subscribe` streams every [`Event`] the session emits
//!
//! Payment runs in a spawned task that reports back on a separate channel, so
//! the session keeps answering commands while an order is processing.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::services::PaymentGateway;
use crate::store::{
    Command, Effect, Event, OrderRef, PaymentError, PaymentReceipt, PendingOrder, StoreError,
    Storefront, StorefrontView,
};

/// Pending commands a session will queue before `dispatch` waits.
const COMMAND_QUEUE: usize = 64;

/// Events buffered per subscriber before it starts lagging.
const EVENT_BUFFER: usize = 256;

/// Default pause between a completed payment and the confirmation message.
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_millis(300);

/// Errors returned by a [`SessionHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has shut down")]
    Closed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Session timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Pause between a completed payment and the order confirmation.
    pub confirmation_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            confirmation_delay: DEFAULT_CONFIRMATION_DELAY,
        }
    }
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub events: Vec<Event>,
    pub view: StorefrontView,
}

type DispatchReply = oneshot::Sender<Result<CommandOutcome, StoreError>>;

enum Request {
    Dispatch { command: Command, reply: DispatchReply },
}

/// Results of background work, fed back into the session.
enum Settlement {
    Payment {
        order: OrderRef,
        outcome: Result<PaymentReceipt, PaymentError>,
    },
    Confirmation {
        order: OrderRef,
    },
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    events: broadcast::Sender<Event>,
    view: watch::Receiver<StorefrontView>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch { command, .. } => f.debug_tuple("Dispatch").field(command).finish(),
        }
    }
}

impl SessionHandle {
    /// Apply `command` and wait for the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the storefront rejected the command
    /// and [`SessionError::Closed`] if the session is gone.
    pub async fn dispatch(&self, command: Command) -> Result<CommandOutcome, SessionError> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(Request::Dispatch { command, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        let outcome = outcome.await.map_err(|_| SessionError::Closed)?;
        outcome.map_err(SessionError::from)
    }

    /// The most recent view.
    #[must_use]
    pub fn view(&self) -> StorefrontView {
        self.view.borrow().clone()
    }

    /// Receive the view every time it changes.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<StorefrontView> {
        self.view.clone()
    }

    /// Receive every event emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Stop the session, abandoning any payment in flight.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Whether [`shutdown`](Self::shutdown) has been requested.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

/// Start a session owning `store`.
pub fn spawn(
    store: Storefront,
    gateway: Arc<dyn PaymentGateway>,
    timing: SessionTiming,
) -> (SessionHandle, JoinHandle<()>) {
    let (requests_tx, requests) = mpsc::channel(COMMAND_QUEUE);
    let (settlements_tx, settlements) = mpsc::unbounded_channel();
    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let (view_tx, view) = watch::channel(store.view());
    let shutdown = CancellationToken::new();

    let actor = SessionActor {
        store,
        gateway,
        timing,
        requests,
        settlements_tx,
        settlements,
        events: events.clone(),
        view: view_tx,
        payment: None,
        shutdown: shutdown.clone(),
    };
    let task = tokio::spawn(actor.run().instrument(info_span!("session")));

    let handle = SessionHandle {
        requests: requests_tx,
        events,
        view,
        shutdown,
    };
    (handle, task)
}

struct InFlightPayment {
    order: OrderRef,
    cancel: CancellationToken,
}

struct SessionActor {
    store: Storefront,
    gateway: Arc<dyn PaymentGateway>,
    timing: SessionTiming,
    requests: mpsc::Receiver<Request>,
    settlements_tx: mpsc::UnboundedSender<Settlement>,
    settlements: mpsc::UnboundedReceiver<Settlement>,
    events: broadcast::Sender<Event>,
    view: watch::Sender<StorefrontView>,
    payment: Option<InFlightPayment>,
    shutdown: CancellationToken,
}

impl SessionActor {
    async fn run(mut self) {
        info!("Session started");

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                request = self.requests.recv() => match request {
                    Some(Request::Dispatch { command, reply }) => {
                        let outcome = self.apply(command);
                        // The caller may have stopped waiting.
                        let _ = reply.send(outcome);
                    }
                    None => break,
                },
                Some(settlement) = self.settlements.recv() => self.settle(settlement),
            }
        }

        if let Some(payment) = self.payment.take() {
            info!(order = %payment.order, "Abandoning payment on shutdown");
            payment.cancel.cancel();
        }
        info!("Session stopped");
    }

    fn apply(&mut self, command: Command) -> Result<CommandOutcome, StoreError> {
        match self.store.dispatch(command) {
            Ok(dispatched) => {
                match dispatched.effect {
                    Some(Effect::StartPayment(pending)) => self.start_payment(pending),
                    Some(Effect::CancelPayment(order)) => self.cancel_payment(&order),
                    None => {}
                }
                let view = self.publish(&dispatched.events);
                Ok(CommandOutcome {
                    events: dispatched.events,
                    view,
                })
            }
            Err(err) => {
                debug!(error = %err, "Command rejected");
                // A rejected wishlist move may still open the product detail.
                self.publish(&[]);
                Err(err)
            }
        }
    }

    fn start_payment(&mut self, pending: PendingOrder) {
        let order = pending.order.clone();
        let cancel = self.shutdown.child_token();
        let gateway = Arc::clone(&self.gateway);
        let settlements = self.settlements_tx.clone();
        let token = cancel.clone();
        let span = info_span!("payment", order = %order);
        let task_order = order.clone();

        tokio::spawn(
            async move {
                tokio::select! {
                    () = token.cancelled() => debug!("Payment abandoned"),
                    outcome = gateway.confirm(&pending) => {
                        let _ = settlements.send(Settlement::Payment {
                            order: task_order,
                            outcome,
                        });
                    }
                }
            }
            .instrument(span),
        );

        self.payment = Some(InFlightPayment { order, cancel });
    }

    fn cancel_payment(&mut self, order: &OrderRef) {
        match self.payment.take() {
            Some(payment) if &payment.order == order => payment.cancel.cancel(),
            other => {
                warn!(%order, "No matching payment to cancel");
                self.payment = other;
            }
        }
    }

    fn settle(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::Payment { order, outcome } => {
                if self.payment.as_ref().is_some_and(|p| p.order == order) {
                    self.payment = None;
                }
                let events = self.store.settle_checkout(&order, outcome);
                if events
                    .iter()
                    .any(|e| matches!(e, Event::CheckoutCompleted { .. }))
                {
                    self.schedule_confirmation(order);
                }
                self.publish(&events);
            }
            Settlement::Confirmation { order } => {
                let message = format!("Payment successful! Order {order} is being processed.");
                info!(%order, "Order confirmed");
                self.publish(&[Event::OrderConfirmed { order, message }]);
            }
        }
    }

    fn schedule_confirmation(&self, order: OrderRef) {
        let delay = self.timing.confirmation_delay;
        let settlements = self.settlements_tx.clone();
        let token = self.shutdown.child_token();

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let _ = settlements.send(Settlement::Confirmation { order });
                }
            }
        });
    }

    /// Broadcast `events` and refresh the shared view.
    fn publish(&self, events: &[Event]) -> StorefrontView {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event.clone());
        }
        let view = self.store.view();
        self.view.send_replace(view.clone());
        view
    }
}
