//! The storefront state owner.
//!
//! [`Storefront`] owns the cart, wishlist, listing query, overlays and
//! checkout machine. Nothing else mutates them: adapters send [`Command`]s,
//! the storefront applies them synchronously and answers with [`Event`]s and
//! a fresh [`StorefrontView`].
//!
//! Work that has to happen outside the state owner (talking to a payment
//! gateway) is returned as an [`Effect`] for the session to run.

pub mod cart;
pub mod checkout;
pub mod command;
pub mod overlay;
pub mod view;
pub mod wishlist;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use vibe_core::{CategoryFilter, CurrencyCode, ProductId, SortKey};

use crate::catalog::{Catalog, ProductQuery, TRENDING_TAGS};

pub use cart::{
    CartError, CartStore, LineItem, LineKey, ParseLineKeyError, QuantityChange, QuantityPolicy,
};
pub use checkout::{
    Checkout, CheckoutPhase, OrderRef, PaymentError, PaymentReceipt, PendingOrder,
};
pub use command::{Command, Event};
pub use overlay::{Drawer, Overlays};
pub use view::{CartLineView, CartView, SearchView, StorefrontView};
pub use wishlist::{WishlistError, WishlistStore};

/// Errors raised while applying a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    InvalidLineKey(#[from] ParseLineKeyError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Wishlist(#[from] WishlistError),
}

/// Tunable storefront behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Currency prices are displayed in.
    pub currency: CurrencyCode,
    /// What a decrement to zero does.
    pub quantity_policy: QuantityPolicy,
    /// Cancel an in-flight checkout when the cart drawer is dismissed.
    pub cancel_checkout_on_dismiss: bool,
}

/// Side effect requested by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the order to the payment gateway.
    StartPayment(PendingOrder),
    /// Abandon the gateway call for this order.
    CancelPayment(OrderRef),
}

/// Result of applying a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatched {
    pub events: Vec<Event>,
    pub effect: Option<Effect>,
}

impl Dispatched {
    fn events(events: Vec<Event>) -> Self {
        Self {
            events,
            effect: None,
        }
    }
}

/// The single owner of one shopping session's state.
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: Catalog,
    cart: CartStore,
    wishlist: WishlistStore,
    query: ProductQuery,
    overlays: Overlays,
    checkout: Checkout,
    options: StoreOptions,
}

impl Storefront {
    #[must_use]
    pub fn new(catalog: Catalog, options: StoreOptions) -> Self {
        Self {
            catalog,
            cart: CartStore::new(),
            wishlist: WishlistStore::new(),
            query: ProductQuery::default(),
            overlays: Overlays::default(),
            checkout: Checkout::new(),
            options,
        }
    }

    /// Replace the checkout machine, e.g. to pin order numbers.
    #[must_use]
    pub fn with_checkout(mut self, checkout: Checkout) -> Self {
        self.checkout = checkout;
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub const fn query(&self) -> ProductQuery {
        self.query
    }

    #[must_use]
    pub const fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    #[must_use]
    pub const fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    #[must_use]
    pub const fn options(&self) -> StoreOptions {
        self.options
    }

    /// Apply one command.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] for unknown products, malformed line keys and
    /// rejected cart or wishlist operations. A rejected command leaves the
    /// stores unchanged, except that a wishlist move needing a size opens the
    /// product detail so the shopper can pick one.
    #[instrument(skip(self), level = "debug")]
    pub fn dispatch(&mut self, command: Command) -> Result<Dispatched, StoreError> {
        match command {
            Command::SetCategory { category } => {
                self.query.category = CategoryFilter::parse_lenient(&category);
                Ok(Dispatched::events(vec![self.filters_changed()]))
            }
            Command::SetSort { sort } => {
                self.query.sort = SortKey::parse_lenient(&sort);
                Ok(Dispatched::events(vec![self.filters_changed()]))
            }
            Command::ClearFilters => {
                self.query = ProductQuery::default();
                Ok(Dispatched::events(vec![self.filters_changed()]))
            }
            Command::OpenProduct { product_id } => {
                if self.catalog.get(product_id).is_none() {
                    return Err(StoreError::UnknownProduct(product_id));
                }
                self.overlays.open_product(product_id);
                Ok(Dispatched::events(vec![Event::ProductOpened { product_id }]))
            }
            Command::CloseProduct => {
                let events = self
                    .overlays
                    .close_product()
                    .map(|_| Event::ProductClosed)
                    .into_iter()
                    .collect();
                Ok(Dispatched::events(events))
            }
            Command::OpenDrawer { drawer } => Ok(self.open_drawer(drawer)),
            Command::CloseDrawer => Ok(self.close_drawer()),
            Command::SetSearchQuery { query } => {
                // Typing implies the search drawer.
                let dispatched = self.open_drawer(Drawer::Search);
                self.overlays.set_search_query(query);
                Ok(dispatched)
            }
            Command::AddToCart {
                product_id,
                size,
                quantity,
            } => {
                let product = self
                    .catalog
                    .get(product_id)
                    .ok_or(StoreError::UnknownProduct(product_id))?;
                let line_quantity = self.cart.add(product, &size, quantity)?;
                debug!(%product_id, size = %size, line_quantity, "Added to cart");
                Ok(Dispatched::events(vec![self.cart_changed()]))
            }
            Command::RemoveFromCart { key } => {
                let key: LineKey = key.parse()?;
                let events = if self.cart.remove(&key).is_some() {
                    vec![self.cart_changed()]
                } else {
                    Vec::new()
                };
                Ok(Dispatched::events(events))
            }
            Command::UpdateQuantity { key, delta } => {
                let key: LineKey = key.parse()?;
                let change = self
                    .cart
                    .update_quantity(&key, delta, self.options.quantity_policy);
                debug!(%key, delta, ?change, "Quantity adjusted");
                let events = match change {
                    QuantityChange::Updated(_) | QuantityChange::Removed => {
                        vec![self.cart_changed()]
                    }
                    QuantityChange::Unchanged(_) | QuantityChange::Missing => Vec::new(),
                };
                Ok(Dispatched::events(events))
            }
            Command::Like { product_id } => {
                let product = self
                    .catalog
                    .get(product_id)
                    .ok_or(StoreError::UnknownProduct(product_id))?;
                let events = if self.wishlist.like(product) {
                    vec![self.wishlist_changed()]
                } else {
                    Vec::new()
                };
                Ok(Dispatched::events(events))
            }
            Command::Unlike { product_id } => {
                let events = if self.wishlist.unlike(product_id).is_some() {
                    vec![self.wishlist_changed()]
                } else {
                    Vec::new()
                };
                Ok(Dispatched::events(events))
            }
            Command::MoveToCart { product_id, size } => {
                self.move_to_cart(product_id, size.as_deref())
            }
            Command::Checkout => Ok(self.begin_checkout()),
        }
    }

    /// Apply the gateway's answer for `order`.
    ///
    /// A stale answer (the order is no longer in flight) changes nothing.
    pub fn settle_checkout(
        &mut self,
        order: &OrderRef,
        outcome: Result<PaymentReceipt, PaymentError>,
    ) -> Vec<Event> {
        if !self.checkout.settle(order) {
            warn!(%order, "Ignoring settlement for an order that is not in flight");
            return Vec::new();
        }

        match outcome {
            Ok(receipt) => {
                info!(%order, total = %receipt.total, "Checkout completed");
                self.cart.clear();
                let mut events = vec![self.cart_changed()];
                if self.overlays.drawer() == Some(Drawer::Cart) {
                    self.overlays.close_drawer();
                    events.push(Event::DrawerChanged { drawer: None });
                }
                events.push(Event::CheckoutCompleted { receipt });
                events
            }
            Err(err) => {
                warn!(%order, error = %err, "Checkout failed");
                vec![Event::CheckoutFailed {
                    order: order.clone(),
                    reason: err.to_string(),
                }]
            }
        }
    }

    /// Derive the read-only view of the current state.
    #[must_use]
    pub fn view(&self) -> StorefrontView {
        let products: Vec<_> = self
            .catalog
            .query(self.query)
            .into_iter()
            .cloned()
            .collect();
        let drawer = self.overlays.drawer();

        StorefrontView {
            currency: self.options.currency,
            query: self.query,
            product_count: products.len(),
            products,
            cart: CartView::from(&self.cart),
            wishlist: self.wishlist.entries().to_vec(),
            drawer,
            product_detail: self
                .overlays
                .product_detail()
                .and_then(|id| self.catalog.get(id))
                .cloned(),
            search: (drawer == Some(Drawer::Search)).then(|| self.search_view()),
            checkout: self.checkout.phase().clone(),
        }
    }

    fn search_view(&self) -> SearchView {
        let query = self.overlays.search_query();
        let trending = if query.trim().is_empty() {
            TRENDING_TAGS.iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };

        SearchView {
            query: query.to_string(),
            results: self.catalog.search(query).into_iter().cloned().collect(),
            trending,
        }
    }

    fn open_drawer(&mut self, drawer: Drawer) -> Dispatched {
        let previous = self.overlays.drawer();
        if !self.overlays.open_drawer(drawer) {
            return Dispatched::default();
        }

        let mut dispatched = Dispatched::events(vec![Event::DrawerChanged {
            drawer: Some(drawer),
        }]);
        if previous == Some(Drawer::Cart) {
            dispatched.effect = self.cancel_on_dismiss(&mut dispatched.events);
        }
        dispatched
    }

    fn close_drawer(&mut self) -> Dispatched {
        let Some(closed) = self.overlays.close_drawer() else {
            return Dispatched::default();
        };

        let mut dispatched = Dispatched::events(vec![Event::DrawerChanged { drawer: None }]);
        if closed == Drawer::Cart {
            dispatched.effect = self.cancel_on_dismiss(&mut dispatched.events);
        }
        dispatched
    }

    /// Abandon the in-flight checkout when the cart drawer goes away, if
    /// configured to.
    fn cancel_on_dismiss(&mut self, events: &mut Vec<Event>) -> Option<Effect> {
        if !self.options.cancel_checkout_on_dismiss {
            return None;
        }
        let order = self.checkout.in_flight()?.clone();
        self.checkout.settle(&order);
        info!(%order, "Checkout cancelled by dismissing the cart");
        events.push(Event::CheckoutCancelled {
            order: order.clone(),
        });
        Some(Effect::CancelPayment(order))
    }

    fn move_to_cart(
        &mut self,
        product_id: ProductId,
        size: Option<&str>,
    ) -> Result<Dispatched, StoreError> {
        let product = self
            .wishlist
            .get(product_id)
            .cloned()
            .ok_or(WishlistError::NotInWishlist { product_id })?;

        let size = match wishlist::resolve_move_size(&product, size) {
            Ok(size) => size,
            Err(err) => {
                self.overlays.open_product(product_id);
                return Err(err.into());
            }
        };

        self.cart.add(&product, &size, 1)?;
        self.wishlist.unlike(product_id);
        Ok(Dispatched::events(vec![
            self.cart_changed(),
            self.wishlist_changed(),
        ]))
    }

    fn begin_checkout(&mut self) -> Dispatched {
        let Some(pending) = self.checkout.begin(&self.cart) else {
            debug!(
                empty = self.cart.is_empty(),
                processing = self.checkout.is_processing(),
                "Checkout ignored"
            );
            return Dispatched::default();
        };

        info!(order = %pending.order, total = %pending.total, "Checkout started");
        Dispatched {
            events: vec![Event::CheckoutStarted {
                order: pending.order.clone(),
                item_count: pending.item_count,
                total: pending.total,
            }],
            effect: Some(Effect::StartPayment(pending)),
        }
    }

    fn filters_changed(&self) -> Event {
        Event::FiltersChanged {
            query: self.query,
            result_count: self.catalog.query(self.query).len(),
        }
    }

    fn cart_changed(&self) -> Event {
        Event::CartChanged {
            count: self.cart.count(),
            total: self.cart.total(),
        }
    }

    fn wishlist_changed(&self) -> Event {
        Event::WishlistChanged {
            count: self.wishlist.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vibe_core::{Category, Price};

    use super::*;

    fn storefront() -> Storefront {
        Storefront::new(Catalog::builtin().unwrap(), StoreOptions::default())
            .with_checkout(Checkout::starting_at(8888))
    }

    fn add(product_id: u32, size: &str, quantity: u32) -> Command {
        Command::AddToCart {
            product_id: ProductId::new(product_id),
            size: size.into(),
            quantity,
        }
    }

    #[test]
    fn test_set_category_and_sort() {
        let mut store = storefront();
        let dispatched = store
            .dispatch(Command::SetCategory {
                category: "T-Shirts".into(),
            })
            .unwrap();
        assert_eq!(
            dispatched.events,
            vec![Event::FiltersChanged {
                query: ProductQuery::new(CategoryFilter::Only(Category::TShirts), SortKey::Newest),
                result_count: 2,
            }]
        );

        store
            .dispatch(Command::SetSort {
                sort: "price-asc".into(),
            })
            .unwrap();
        let view = store.view();
        let ids: Vec<u32> = view.products.iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![9, 3]);
        assert_eq!(view.product_count, 2);
    }

    #[test]
    fn test_unknown_filters_degrade_and_clear_resets() {
        let mut store = storefront();
        store
            .dispatch(Command::SetCategory {
                category: "Swimwear".into(),
            })
            .unwrap();
        store
            .dispatch(Command::SetSort {
                sort: "best-selling".into(),
            })
            .unwrap();
        assert_eq!(store.query(), ProductQuery::default());
        assert_eq!(store.view().product_count, 10);

        store
            .dispatch(Command::SetCategory {
                category: "Footwear".into(),
            })
            .unwrap();
        store.dispatch(Command::ClearFilters).unwrap();
        assert_eq!(store.query(), ProductQuery::default());
    }

    #[test]
    fn test_add_to_cart_merges_and_totals() {
        let mut store = storefront();
        store.dispatch(add(3, "M", 2)).unwrap();
        let dispatched = store.dispatch(add(3, "M", 3)).unwrap();
        assert_eq!(
            dispatched.events,
            vec![Event::CartChanged {
                count: 5,
                total: Price::new(2_250_000),
            }]
        );

        let view = store.view();
        assert_eq!(view.cart.lines.len(), 1);
        let line = view.cart.lines.first().unwrap();
        assert_eq!(line.key.to_string(), "3-M");
        assert_eq!(line.quantity, 5);
        assert_eq!(line.line_total, Price::new(2_250_000));
    }

    #[test]
    fn test_add_to_cart_errors() {
        let mut store = storefront();
        assert_eq!(
            store.dispatch(add(99, "M", 1)),
            Err(StoreError::UnknownProduct(ProductId::new(99)))
        );
        assert!(matches!(
            store.dispatch(add(3, "", 1)),
            Err(StoreError::Cart(CartError::SizeRequired { .. }))
        ));
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_quantity_follows_policy() {
        let mut store = storefront();
        store.dispatch(add(3, "M", 1)).unwrap();
        let dispatched = store
            .dispatch(Command::UpdateQuantity {
                key: "3-M".into(),
                delta: -1,
            })
            .unwrap();
        assert!(dispatched.events.is_empty());
        assert_eq!(store.view().cart.count, 1);

        let mut store = Storefront::new(
            Catalog::builtin().unwrap(),
            StoreOptions {
                quantity_policy: QuantityPolicy::Remove,
                ..StoreOptions::default()
            },
        );
        store.dispatch(add(3, "M", 1)).unwrap();
        store
            .dispatch(Command::UpdateQuantity {
                key: "3-M".into(),
                delta: -1,
            })
            .unwrap();
        let view = store.view();
        assert_eq!(view.cart.count, 0);
        assert!(view.cart.lines.is_empty());
    }

    #[test]
    fn test_malformed_line_key() {
        let mut store = storefront();
        assert!(matches!(
            store.dispatch(Command::RemoveFromCart { key: "abc".into() }),
            Err(StoreError::InvalidLineKey(_))
        ));
    }

    #[test]
    fn test_move_to_cart_with_implied_size() {
        let mut store = storefront();
        store
            .dispatch(Command::Like {
                product_id: ProductId::new(6),
            })
            .unwrap();
        store
            .dispatch(Command::MoveToCart {
                product_id: ProductId::new(6),
                size: None,
            })
            .unwrap();

        assert!(store.wishlist().is_empty());
        let line = store.cart().lines().first().unwrap();
        assert_eq!(line.size(), "One Size");
        assert_eq!(line.quantity(), 1);
    }

    #[test]
    fn test_move_to_cart_requires_size_for_multi_size_product() {
        let mut store = storefront();
        store
            .dispatch(Command::Like {
                product_id: ProductId::new(1),
            })
            .unwrap();
        let result = store.dispatch(Command::MoveToCart {
            product_id: ProductId::new(1),
            size: None,
        });

        assert_eq!(
            result,
            Err(StoreError::Wishlist(WishlistError::SizeSelectionRequired {
                product_id: ProductId::new(1)
            }))
        );
        assert!(store.wishlist().contains(ProductId::new(1)));
        assert!(store.cart().is_empty());
        assert_eq!(
            store.view().product_detail.map(|p| p.id),
            Some(ProductId::new(1))
        );
    }

    #[test]
    fn test_move_to_cart_with_bad_size_keeps_wishlist() {
        let mut store = storefront();
        store
            .dispatch(Command::Like {
                product_id: ProductId::new(1),
            })
            .unwrap();
        let result = store.dispatch(Command::MoveToCart {
            product_id: ProductId::new(1),
            size: Some("XXL".into()),
        });
        assert!(matches!(result, Err(StoreError::Cart(CartError::UnknownSize { .. }))));
        assert_eq!(store.wishlist().len(), 1);

        assert!(matches!(
            store.dispatch(Command::MoveToCart {
                product_id: ProductId::new(2),
                size: None,
            }),
            Err(StoreError::Wishlist(WishlistError::NotInWishlist { .. }))
        ));
    }

    #[test]
    fn test_checkout_lifecycle() {
        let mut store = storefront();
        store.dispatch(add(3, "M", 2)).unwrap();
        store
            .dispatch(Command::OpenDrawer {
                drawer: Drawer::Cart,
            })
            .unwrap();

        let dispatched = store.dispatch(Command::Checkout).unwrap();
        let Some(Effect::StartPayment(pending)) = dispatched.effect else {
            panic!("expected a payment effect");
        };
        assert_eq!(pending.order.as_str(), "VIBE-8888");
        assert!(store.checkout().is_processing());

        // Repeat triggering is a no-op.
        assert_eq!(store.dispatch(Command::Checkout).unwrap(), Dispatched::default());

        let receipt = PaymentReceipt::for_order(&pending);
        let events = store.settle_checkout(&pending.order, Ok(receipt.clone()));
        assert_eq!(
            events,
            vec![
                Event::CartChanged {
                    count: 0,
                    total: Price::ZERO,
                },
                Event::DrawerChanged { drawer: None },
                Event::CheckoutCompleted { receipt },
            ]
        );

        let view = store.view();
        assert!(view.cart.lines.is_empty());
        assert_eq!(view.drawer, None);
        assert_eq!(view.checkout, CheckoutPhase::Idle);
    }

    #[test]
    fn test_checkout_on_empty_cart_is_noop() {
        let mut store = storefront();
        let dispatched = store.dispatch(Command::Checkout).unwrap();
        assert_eq!(dispatched, Dispatched::default());
        assert!(!store.checkout().is_processing());
    }

    #[test]
    fn test_failed_payment_keeps_cart() {
        let mut store = storefront();
        store.dispatch(add(3, "M", 2)).unwrap();
        let dispatched = store.dispatch(Command::Checkout).unwrap();
        let Some(Effect::StartPayment(pending)) = dispatched.effect else {
            panic!("expected a payment effect");
        };

        let events = store.settle_checkout(
            &pending.order,
            Err(PaymentError::Declined("card expired".into())),
        );
        assert!(matches!(events.as_slice(), [Event::CheckoutFailed { .. }]));
        assert_eq!(store.cart().count(), 2);
        assert!(!store.checkout().is_processing());
    }

    #[test]
    fn test_stale_settlement_is_ignored() {
        let mut store = storefront();
        store.dispatch(add(3, "M", 2)).unwrap();
        let events = store.settle_checkout(
            &OrderRef::new(1),
            Err(PaymentError::Unavailable("timeout".into())),
        );
        assert!(events.is_empty());
        assert_eq!(store.cart().count(), 2);
    }

    #[test]
    fn test_dismissing_cart_cancels_when_configured() {
        let mut store = Storefront::new(
            Catalog::builtin().unwrap(),
            StoreOptions {
                cancel_checkout_on_dismiss: true,
                ..StoreOptions::default()
            },
        )
        .with_checkout(Checkout::starting_at(100));
        store.dispatch(add(3, "M", 1)).unwrap();
        store
            .dispatch(Command::OpenDrawer {
                drawer: Drawer::Cart,
            })
            .unwrap();
        store.dispatch(Command::Checkout).unwrap();

        let dispatched = store.dispatch(Command::CloseDrawer).unwrap();
        let order = OrderRef::new(100);
        assert_eq!(dispatched.effect, Some(Effect::CancelPayment(order.clone())));
        assert!(dispatched.events.contains(&Event::CheckoutCancelled { order }));
        assert!(!store.checkout().is_processing());
        assert_eq!(store.cart().count(), 1);
    }

    #[test]
    fn test_dismissing_cart_keeps_checkout_by_default() {
        let mut store = storefront();
        store.dispatch(add(3, "M", 1)).unwrap();
        store
            .dispatch(Command::OpenDrawer {
                drawer: Drawer::Cart,
            })
            .unwrap();
        store.dispatch(Command::Checkout).unwrap();

        let dispatched = store.dispatch(Command::CloseDrawer).unwrap();
        assert_eq!(dispatched.effect, None);
        assert!(store.checkout().is_processing());
    }

    #[test]
    fn test_search_view() {
        let mut store = storefront();
        store
            .dispatch(Command::OpenDrawer {
                drawer: Drawer::Search,
            })
            .unwrap();
        let search = store.view().search.unwrap();
        assert!(search.results.is_empty());
        assert_eq!(search.trending.len(), TRENDING_TAGS.len());

        store
            .dispatch(Command::SetSearchQuery {
                query: "cargo".into(),
            })
            .unwrap();
        let search = store.view().search.unwrap();
        assert_eq!(search.results.len(), 1);
        assert!(search.trending.is_empty());

        store.dispatch(Command::CloseDrawer).unwrap();
        assert!(store.view().search.is_none());
        assert_eq!(store.overlays().search_query(), "");
    }

    #[test]
    fn test_open_unknown_product() {
        let mut store = storefront();
        assert!(matches!(
            store.dispatch(Command::OpenProduct {
                product_id: ProductId::new(42)
            }),
            Err(StoreError::UnknownProduct(_))
        ));
        store
            .dispatch(Command::OpenProduct {
                product_id: ProductId::new(4),
            })
            .unwrap();
        assert_eq!(
            store.view().product_detail.map(|p| p.name),
            Some("Techwear Vest".to_string())
        );
        let dispatched = store.dispatch(Command::CloseProduct).unwrap();
        assert_eq!(dispatched.events, vec![Event::ProductClosed]);
    }
}
