//! The composed shop store.
//!
//! `AppState` is the whole state tree. [`ShopReducer`] scopes the three slice
//! reducers onto their subtrees and runs the [`Orchestrator`] after them.

use crate::config::ShopConfig;
use crate::error::CartError;
use crate::mocks::{InMemoryOrderRepository, InMemoryProductRepository, UuidIds};
use crate::orchestrator::Orchestrator;
use crate::repository::{OrderRepository, ProductRepository};
use crate::slices::{
    CartAction, CartReducer, CartState, OrderAction, OrderReducer, OrderState, ProductAction,
    ProductReducer, ProductState,
};
use cartflow_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use cartflow_core::effect::Effects;
use cartflow_core::environment::{Clock, SystemClock};
use cartflow_core::reducer::Reducer;
use cartflow_runtime::{Store, StoreConfig};
use std::sync::Arc;

/// The whole state tree
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Catalog slice
    pub products: ProductState,
    /// Cart slice
    pub cart: CartState,
    /// Order slice
    pub order: OrderState,
}

/// Every action the store accepts
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    /// Catalog action
    Product(ProductAction),
    /// Cart action
    Cart(CartAction),
    /// Order action
    Order(OrderAction),
    /// Restore the initial state tree, order history included
    ///
    /// Results of latest-wins fetches still in flight are dropped.
    Reset,
}

impl From<ProductAction> for AppAction {
    fn from(action: ProductAction) -> Self {
        Self::Product(action)
    }
}

impl From<CartAction> for AppAction {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

impl From<OrderAction> for AppAction {
    fn from(action: OrderAction) -> Self {
        Self::Order(action)
    }
}

/// Repositories used by the orchestrator
#[derive(Clone)]
pub struct ShopEnvironment {
    /// Product catalog
    pub products: Arc<dyn ProductRepository>,
    /// Order service
    pub orders: Arc<dyn OrderRepository>,
}

impl ShopEnvironment {
    /// Creates a new `ShopEnvironment`
    #[must_use]
    pub fn new(products: Arc<dyn ProductRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { products, orders }
    }

    /// In-memory repositories sized and delayed as `config` says
    #[must_use]
    pub fn in_memory(config: &ShopConfig, clock: Arc<dyn Clock>) -> Self {
        let products = InMemoryProductRepository::generated(
            config.catalog_size,
            config.catalog_seed,
            clock.now(),
        )
        .with_latency(config.latency);
        let orders =
            InMemoryOrderRepository::new(clock, Arc::new(UuidIds)).with_latency(config.latency);

        Self::new(Arc::new(products), Arc::new(orders))
    }
}

/// Root reducer of the shop
pub struct ShopReducer {
    inner: CombinedReducer<AppState, AppAction, ShopEnvironment, CartError>,
}

impl ShopReducer {
    /// The three slices followed by the orchestrator
    #[must_use]
    pub fn new() -> Self {
        let products =
            scope_reducer::<AppState, ProductState, AppAction, ShopEnvironment, CartError, _>(
                ProductReducer,
                |state| &mut state.products,
                |action| match action {
                    AppAction::Product(action) => Some(action),
                    _ => None,
                },
                AppAction::Product,
            );
        let cart = scope_reducer::<AppState, CartState, AppAction, ShopEnvironment, CartError, _>(
            CartReducer,
            |state| &mut state.cart,
            |action| match action {
                AppAction::Cart(action) => Some(action),
                _ => None,
            },
            AppAction::Cart,
        );
        let order = scope_reducer::<AppState, OrderState, AppAction, ShopEnvironment, CartError, _>(
            OrderReducer,
            |state| &mut state.order,
            |action| match action {
                AppAction::Order(action) => Some(action),
                _ => None,
            },
            AppAction::Order,
        );

        Self {
            inner: combine_reducers(vec![
                Box::new(products),
                Box::new(cart),
                Box::new(order),
                Box::new(Orchestrator),
            ]),
        }
    }
}

impl Default for ShopReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ShopReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = ShopEnvironment;
    type Error = CartError;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &ShopEnvironment,
    ) -> Result<Effects<AppAction>, CartError> {
        if matches!(action, AppAction::Reset) {
            *state = AppState::default();
            return Ok(Orchestrator::supersede_flows());
        }
        self.inner.reduce(state, action, env)
    }
}

/// The shop store
pub type ShopStore = Store<AppState, AppAction, ShopEnvironment, ShopReducer>;

/// A store over `env` with an empty state tree
#[must_use]
pub fn build_store(env: ShopEnvironment) -> ShopStore {
    Store::new(AppState::default(), ShopReducer::new(), env)
}

/// Like [`build_store`], with explicit runtime settings
#[must_use]
pub fn build_store_with_config(env: ShopEnvironment, config: StoreConfig) -> ShopStore {
    Store::with_config(AppState::default(), ShopReducer::new(), env, config)
}

/// A store over the in-memory repositories, using the system clock
#[must_use]
pub fn in_memory_store(config: &ShopConfig) -> ShopStore {
    build_store(ShopEnvironment::in_memory(config, Arc::new(SystemClock)))
}
