//! Scripted checkout against a local session.
//!
//! Spins up an in-process shopping session with the simulated gateway, adds
//! the requested lines, checks out and waits for the confirmation.
//!
//! # Usage
//!
//! ```bash
//! # Two Boxy Tees in M, plus one cap (its only size is implied)
//! vibe checkout --item 3:M:2 --item 6
//! ```

use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use vibe_core::{CurrencyCode, ProductId};
use vibe_storefront::catalog::Catalog;
use vibe_storefront::services::SimulatedGateway;
use vibe_storefront::session::{self, SessionError, SessionTiming};
use vibe_storefront::store::{Command, Event, StoreOptions, Storefront};

/// Errors from the checkout command.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    #[error("Product {0} not found")]
    UnknownProduct(ProductId),

    #[error("Product {id} needs a size, one of: {sizes}")]
    SizeRequired { id: ProductId, sizes: String },

    #[error("Nothing to check out")]
    EmptyCart,

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Error parsing an `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseItemError {
    #[error("invalid product ID in {0:?}")]
    ProductId(String, #[source] ParseIntError),

    #[error("invalid quantity in {0:?}")]
    Quantity(String, #[source] ParseIntError),

    #[error("quantity must be at least 1 in {0:?}")]
    ZeroQuantity(String),
}

/// A cart line requested on the command line: `id[:size[:quantity]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let id = parts.next().unwrap_or_default().trim();
        let product_id = id
            .parse::<ProductId>()
            .map_err(|e| ParseItemError::ProductId(s.to_string(), e))?;
        let size = parts
            .next()
            .map(str::trim)
            .filter(|size| !size.is_empty())
            .map(String::from);
        let quantity = match parts.next() {
            Some(quantity) => quantity
                .trim()
                .parse::<u32>()
                .map_err(|e| ParseItemError::Quantity(s.to_string(), e))?,
            None => 1,
        };
        if quantity == 0 {
            return Err(ParseItemError::ZeroQuantity(s.to_string()));
        }

        Ok(Self {
            product_id,
            size,
            quantity,
        })
    }
}

/// Turn an item spec into an add-to-cart command, filling in an implied size.
///
/// # Errors
///
/// Returns an error if the product is unknown, or has several sizes and
/// none was given.
pub fn add_command(catalog: &Catalog, item: &ItemSpec) -> Result<Command, CheckoutCommandError> {
    let product = catalog
        .get(item.product_id)
        .ok_or(CheckoutCommandError::UnknownProduct(item.product_id))?;

    let size = match (&item.size, product.implied_size()) {
        (Some(size), _) => size.clone(),
        (None, Some(implied)) => implied.to_string(),
        (None, None) => {
            return Err(CheckoutCommandError::SizeRequired {
                id: product.id,
                sizes: product.sizes.join(", "),
            });
        }
    };

    Ok(Command::AddToCart {
        product_id: item.product_id,
        size,
        quantity: item.quantity,
    })
}

/// Fill a cart with `items`, check out and wait for the confirmation.
///
/// # Errors
///
/// Returns an error if an item is rejected, the payment fails or the session
/// stops unexpectedly.
#[allow(clippy::print_stdout)]
pub async fn run(
    catalog: Catalog,
    items: &[ItemSpec],
    delay: Duration,
    currency: CurrencyCode,
) -> Result<(), CheckoutCommandError> {
    let commands = items
        .iter()
        .map(|item| add_command(&catalog, item))
        .collect::<Result<Vec<_>, _>>()?;

    let options = StoreOptions {
        currency,
        ..StoreOptions::default()
    };
    let store = Storefront::new(catalog, options);
    let (session, task) = session::spawn(
        store,
        Arc::new(SimulatedGateway::new(delay)),
        SessionTiming::default(),
    );
    let mut events = session.subscribe();

    for command in commands {
        debug!(?command, "Adding to cart");
        session.dispatch(command).await?;
    }

    let outcome = session.dispatch(Command::Checkout).await?;
    let Some(Event::CheckoutStarted {
        order,
        item_count,
        total,
    }) = outcome.events.first().cloned()
    else {
        session.shutdown();
        task.await?;
        return Err(CheckoutCommandError::EmptyCart);
    };

    for line in &outcome.view.cart.lines {
        println!(
            "{:>3} x {} ({}) {}",
            line.quantity,
            line.name,
            if line.size.is_empty() { "-" } else { line.size.as_str() },
            currency.format(line.line_total)
        );
    }
    println!("Order {order}: {item_count} items, {}", currency.format(total));
    info!(%order, delay_ms = delay.as_millis(), "Processing payment");

    let result = loop {
        match events.recv().await {
            Ok(Event::OrderConfirmed { message, .. }) => {
                println!("{message}");
                break Ok(());
            }
            Ok(Event::CheckoutFailed { reason, .. }) => {
                break Err(CheckoutCommandError::PaymentFailed(reason));
            }
            Ok(_) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => break Err(SessionError::Closed.into()),
        }
    };

    session.shutdown();
    task.await?;
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(
            "3:M:2".parse::<ItemSpec>().unwrap(),
            ItemSpec {
                product_id: ProductId::new(3),
                size: Some("M".into()),
                quantity: 2,
            }
        );
        assert_eq!(
            "6".parse::<ItemSpec>().unwrap(),
            ItemSpec {
                product_id: ProductId::new(6),
                size: None,
                quantity: 1,
            }
        );
        assert_eq!(
            "6:One Size".parse::<ItemSpec>().unwrap().size.as_deref(),
            Some("One Size")
        );
        assert_eq!("5::3".parse::<ItemSpec>().unwrap().size, None);
    }

    #[test]
    fn test_parse_item_spec_errors() {
        assert!(matches!(
            "abc".parse::<ItemSpec>(),
            Err(ParseItemError::ProductId(..))
        ));
        assert!(matches!(
            "3:M:lots".parse::<ItemSpec>(),
            Err(ParseItemError::Quantity(..))
        ));
        assert!(matches!(
            "3:M:0".parse::<ItemSpec>(),
            Err(ParseItemError::ZeroQuantity(_))
        ));
    }

    #[test]
    fn test_add_command_fills_implied_size() {
        let catalog = Catalog::builtin().unwrap();
        let command = add_command(&catalog, &"6".parse().unwrap()).unwrap();
        assert_eq!(
            command,
            Command::AddToCart {
                product_id: ProductId::new(6),
                size: "One Size".into(),
                quantity: 1,
            }
        );

        assert!(matches!(
            add_command(&catalog, &"3".parse().unwrap()),
            Err(CheckoutCommandError::SizeRequired { .. })
        ));
        assert!(matches!(
            add_command(&catalog, &"404".parse().unwrap()),
            Err(CheckoutCommandError::UnknownProduct(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes() {
        let catalog = Catalog::builtin().unwrap();
        let items = vec!["3:M:2".parse().unwrap(), "6".parse().unwrap()];
        run(catalog, &items, Duration::from_millis(2000), CurrencyCode::VND)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_rejects_unknown_size() {
        let catalog = Catalog::builtin().unwrap();
        let items = vec!["3:XXXL".parse().unwrap()];
        let err = run(catalog, &items, Duration::from_millis(10), CurrencyCode::VND)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutCommandError::Session(_)));
    }
}
