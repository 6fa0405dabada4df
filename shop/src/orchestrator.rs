//! Effect orchestration: turns intent actions into repository calls.
//!
//! The orchestrator is the last reducer of the app, so it sees the state the
//! slices just produced (the product fetch reads the updated filter). It never
//! changes state and never fails; repository errors come back as result
//! actions.
//!
//! | intent                  | repository call           | flow          |
//! |-------------------------|---------------------------|---------------|
//! | `FetchProductsStart`    | `get_all`                 | latest-wins   |
//! | `FetchCategories`       | `get_categories`          | latest-wins   |
//! | `FetchProductDetails`   | `get_by_id`               | latest-wins   |
//! | `FetchFeatured`         | `get_featured_products`   | latest-wins   |
//! | `FetchOrderStart`       | `create_order`            | every request |
//! | `OpenOrder`             | `get_order_by_id`         | latest-wins   |

use crate::app::{AppAction, AppState, ShopEnvironment};
use crate::error::{CartError, RepositoryError};
use crate::slices::{OrderAction, ProductAction};
use crate::types::{OrderId, OrderRequest, ProductFilter, ProductId};
use cartflow_core::async_effect;
use cartflow_core::effect::{Effect, EffectId, Effects};
use cartflow_core::reducer::Reducer;
use cartflow_core::smallvec;
use std::sync::Arc;

/// Product listing fetches
pub const PRODUCTS_FLOW: EffectId = EffectId::new("products");
/// Category list fetches
pub const CATEGORIES_FLOW: EffectId = EffectId::new("categories");
/// Details screen fetches
pub const PRODUCT_DETAILS_FLOW: EffectId = EffectId::new("product-details");
/// Featured product fetches
pub const FEATURED_FLOW: EffectId = EffectId::new("featured");
/// Existing order lookups
pub const OPEN_ORDER_FLOW: EffectId = EffectId::new("open-order");

/// Flows whose in-flight results can be superseded
pub const LATEST_FLOWS: [EffectId; 5] = [
    PRODUCTS_FLOW,
    CATEGORIES_FLOW,
    PRODUCT_DETAILS_FLOW,
    FEATURED_FLOW,
    OPEN_ORDER_FLOW,
];

/// Fallback when the order service refuses without a reason
pub const ORDER_REFUSED: &str = "Failed to create order";
/// Fallback when a failed call carries no message
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";
/// Fallback when a product lookup fails without a reason
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
/// Answer to a lookup of an unknown order
pub const ORDER_NOT_FOUND: &str = "Order not found";

/// `message` unless it is empty
fn or_fallback(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn failure_message(error: &RepositoryError) -> String {
    or_fallback(Some(error.to_string()), UNKNOWN_ERROR)
}

/// Reducer that only produces effects
#[derive(Clone, Copy, Debug, Default)]
pub struct Orchestrator;

impl Orchestrator {
    /// A new, empty generation for each of [`LATEST_FLOWS`]
    ///
    /// Results of calls still in flight are dropped when they arrive. Order
    /// creation is not a latest-wins flow and is not affected.
    #[must_use]
    pub fn supersede_flows() -> Effects<AppAction> {
        LATEST_FLOWS.into_iter().map(|id| Effect::None.latest(id)).collect()
    }

    fn fetch_products(filter: &ProductFilter, env: &ShopEnvironment) -> Effect<AppAction> {
        let repository = Arc::clone(&env.products);
        let (page, limit, fields) = (filter.page, filter.limit, filter.fields());

        let effect = async_effect! {
            tracing::debug!(page, limit, query = %fields.search_query, "Fetching products");
            let action = match repository.get_all(page, limit, fields).await {
                Ok(response) => ProductAction::FetchProductsSuccess(response),
                Err(error) => {
                    tracing::warn!(%error, "Product fetch failed");
                    ProductAction::FetchProductsFailure(failure_message(&error))
                },
            };
            Some(AppAction::Product(action))
        };
        effect.latest(PRODUCTS_FLOW)
    }

    fn fetch_categories(env: &ShopEnvironment) -> Effect<AppAction> {
        let repository = Arc::clone(&env.products);

        let effect = async_effect! {
            tracing::debug!("Fetching categories");
            match repository.get_categories().await {
                Ok(categories) => {
                    Some(AppAction::Product(ProductAction::SetCategories(categories)))
                },
                Err(error) => {
                    tracing::error!(%error, "Failed to fetch categories");
                    None
                },
            }
        };
        effect.latest(CATEGORIES_FLOW)
    }

    fn fetch_details(id: ProductId, env: &ShopEnvironment) -> Effect<AppAction> {
        let repository = Arc::clone(&env.products);

        let effect = async_effect! {
            tracing::debug!(product_id = %id, "Fetching product details");
            let action = match repository.get_by_id(&id).await {
                Ok(response) => match response.data {
                    Some(product) if response.success => {
                        ProductAction::ProductDetailsLoaded(product)
                    },
                    _ => {
                        tracing::warn!(product_id = %id, "Product lookup refused");
                        let message = or_fallback(response.error, PRODUCT_NOT_FOUND);
                        ProductAction::ProductDetailsFailed(message)
                    },
                },
                Err(error) => {
                    tracing::warn!(product_id = %id, %error, "Product lookup failed");
                    ProductAction::ProductDetailsFailed(failure_message(&error))
                },
            };
            Some(AppAction::Product(action))
        };
        effect.latest(PRODUCT_DETAILS_FLOW)
    }

    fn fetch_featured(limit: usize, env: &ShopEnvironment) -> Effect<AppAction> {
        let repository = Arc::clone(&env.products);

        let effect = async_effect! {
            tracing::debug!(limit, "Fetching featured products");
            match repository.get_featured_products(limit).await {
                Ok(products) => Some(AppAction::Product(ProductAction::FeaturedLoaded(products))),
                Err(error) => {
                    tracing::error!(%error, "Failed to fetch featured products");
                    None
                },
            }
        };
        effect.latest(FEATURED_FLOW)
    }

    fn create_order(request: OrderRequest, env: &ShopEnvironment) -> Effect<AppAction> {
        let repository = Arc::clone(&env.orders);

        async_effect! {
            tracing::debug!(
                user_id = %request.user_id,
                total = %request.total_amount,
                "Creating order"
            );
            let action = match repository.create_order(request).await {
                Ok(response) => match response.order {
                    Some(order) if response.success => OrderAction::FetchOrderSuccess(order),
                    _ => {
                        tracing::warn!(reason = ?response.error, "Order refused");
                        OrderAction::FetchOrderFailure(or_fallback(response.error, ORDER_REFUSED))
                    },
                },
                Err(error) => {
                    tracing::warn!(%error, "Order creation failed");
                    OrderAction::FetchOrderFailure(failure_message(&error))
                },
            };
            Some(AppAction::Order(action))
        }
    }

    fn open_order(id: OrderId, env: &ShopEnvironment) -> Effect<AppAction> {
        let repository = Arc::clone(&env.orders);

        let effect = async_effect! {
            tracing::debug!(order_id = %id, "Opening order");
            let action = match repository.get_order_by_id(&id).await {
                Ok(Some(order)) => OrderAction::OrderOpened(order),
                Ok(None) => {
                    tracing::warn!(order_id = %id, "Order not found");
                    OrderAction::OpenOrderFailed(ORDER_NOT_FOUND.to_string())
                },
                Err(error) => {
                    tracing::warn!(order_id = %id, %error, "Order lookup failed");
                    OrderAction::OpenOrderFailed(failure_message(&error))
                },
            };
            Some(AppAction::Order(action))
        };
        effect.latest(OPEN_ORDER_FLOW)
    }
}

impl Reducer for Orchestrator {
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
        let effect = match action {
            AppAction::Product(ProductAction::FetchProductsStart) => {
                Self::fetch_products(&state.products.filter, env)
            },
            AppAction::Product(ProductAction::FetchCategories) => Self::fetch_categories(env),
            AppAction::Product(ProductAction::FetchProductDetails(id)) => {
                Self::fetch_details(id, env)
            },
            AppAction::Product(ProductAction::FetchFeatured { limit }) => {
                Self::fetch_featured(limit, env)
            },
            AppAction::Order(OrderAction::FetchOrderStart(request)) => {
                Self::create_order(request, env)
            },
            AppAction::Order(OrderAction::OpenOrder(id)) => Self::open_order(id, env),
            _ => return Ok(Effects::new()),
        };
        Ok(smallvec![effect])
    }
}
