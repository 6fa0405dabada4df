//! Store-level tests of the shop flows
//!
//! These drive a real [`ShopStore`] with effects running on the tokio runtime,
//! using repositories that can be slowed down or made to fail.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Tests can unwrap
#![allow(clippy::panic)] // Tests can panic

use cartflow_core::environment::Clock;
use cartflow_runtime::StoreError;
use cartflow_shop::error::{CartError, RepositoryError};
use cartflow_shop::mocks::{InMemoryOrderRepository, InMemoryProductRepository, sample_products};
use cartflow_shop::orchestrator::{ORDER_NOT_FOUND, ORDER_REFUSED, PRODUCT_NOT_FOUND};
use cartflow_shop::repository::{OrderRepository, ProductRepository};
use cartflow_shop::slices::{CartAction, OrderAction, ProductAction, ProductState, cart};
use cartflow_shop::types::{
    ApiResponse, FilterFields, Order, OrderId, OrderLine, OrderRequest, OrderResponse, OrderStatus,
    PaginatedResponse, Product, ProductFilter, ProductId, ShippingAddress, UserId,
};
use cartflow_shop::{AppAction, Money, ShopEnvironment, ShopStore, build_store};
use cartflow_testing::{SequentialIds, test_clock};
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

// ============================================================================
// Test Fixtures
// ============================================================================

/// Catalog that answers each listing page after a page-specific delay
struct ScriptedCatalog {
    inner: InMemoryProductRepository,
    delays: Vec<(u32, Duration)>,
}

impl ScriptedCatalog {
    fn delay(&self, page: u32) -> Duration {
        self.delays
            .iter()
            .find(|(p, _)| *p == page)
            .map_or(Duration::ZERO, |(_, delay)| *delay)
    }
}

impl ProductRepository for ScriptedCatalog {
    fn get_all(
        &self,
        page: u32,
        limit: u32,
        filters: FilterFields,
    ) -> BoxFuture<'_, Result<PaginatedResponse<Product>, RepositoryError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay(page)).await;
            self.inner.get_all(page, limit, filters).await
        })
    }

    fn get_by_id(
        &self,
        id: &ProductId,
    ) -> BoxFuture<'_, Result<ApiResponse<Product>, RepositoryError>> {
        self.inner.get_by_id(id)
    }

    fn get_categories(&self) -> BoxFuture<'_, Result<Vec<String>, RepositoryError>> {
        self.inner.get_categories()
    }

    fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>> {
        self.inner.search_products(filter)
    }

    fn get_featured_products(
        &self,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>> {
        self.inner.get_featured_products(limit)
    }
}

/// Catalog whose every call fails
struct Unreachable;

impl Unreachable {
    fn fail<T: Send + 'static>() -> BoxFuture<'static, Result<T, RepositoryError>> {
        Box::pin(async { Err(RepositoryError::Unavailable("catalog offline".to_string())) })
    }
}

impl ProductRepository for Unreachable {
    fn get_all(
        &self,
        _page: u32,
        _limit: u32,
        _filters: FilterFields,
    ) -> BoxFuture<'_, Result<PaginatedResponse<Product>, RepositoryError>> {
        Self::fail()
    }

    fn get_by_id(
        &self,
        _id: &ProductId,
    ) -> BoxFuture<'_, Result<ApiResponse<Product>, RepositoryError>> {
        Self::fail()
    }

    fn get_categories(&self) -> BoxFuture<'_, Result<Vec<String>, RepositoryError>> {
        Self::fail()
    }

    fn search_products(
        &self,
        _filter: &ProductFilter,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>> {
        Self::fail()
    }

    fn get_featured_products(
        &self,
        _limit: usize,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>> {
        Self::fail()
    }
}

/// Order service answering every creation with the same outcome
struct CannedOrders {
    outcome: Result<OrderResponse, RepositoryError>,
}

impl OrderRepository for CannedOrders {
    fn create_order(
        &self,
        _request: OrderRequest,
    ) -> BoxFuture<'_, Result<OrderResponse, RepositoryError>> {
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }

    fn get_order_by_id(
        &self,
        _id: &OrderId,
    ) -> BoxFuture<'_, Result<Option<Order>, RepositoryError>> {
        Box::pin(async { Ok(None) })
    }

    fn get_user_orders(
        &self,
        _user_id: &UserId,
    ) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

fn samples() -> Vec<Product> {
    sample_products(test_clock().now())
}

fn orders() -> Arc<InMemoryOrderRepository> {
    Arc::new(InMemoryOrderRepository::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIds::new()),
    ))
}

fn store_with(products: Arc<dyn ProductRepository>, orders: Arc<dyn OrderRepository>) -> ShopStore {
    build_store(ShopEnvironment::new(products, orders))
}

fn sample_store() -> ShopStore {
    store_with(Arc::new(InMemoryProductRepository::new(samples())), orders())
}

fn request() -> OrderRequest {
    let product = samples().remove(0);
    OrderRequest {
        user_id: UserId::new("user_123"),
        items: vec![OrderLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
            image: None,
        }],
        shipping_info: ShippingAddress {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Analytical Row".to_string(),
            city: "London".to_string(),
            postal_code: "N1 9GU".to_string(),
            country: "United Kingdom".to_string(),
            email: "ada@example.com".to_string(),
        },
        total_amount: product.price,
        status: OrderStatus::Processing,
    }
}

async fn settle(store: &ShopStore, action: AppAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();
}

async fn order_failure(store: &ShopStore) -> String {
    let answer = store
        .send_and_wait_for(
            OrderAction::FetchOrderStart(request()).into(),
            |action| matches!(action, AppAction::Order(OrderAction::FetchOrderFailure(_))),
            WAIT,
        )
        .await
        .unwrap();

    match answer {
        AppAction::Order(OrderAction::FetchOrderFailure(message)) => message,
        other => panic!("Expected an order failure, got {other:?}"),
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn listing_fetch_fills_products_and_pagination() {
    let store = store_with(
        Arc::new(InMemoryProductRepository::generated(25, 7, test_clock().now())),
        orders(),
    );

    settle(&store, ProductAction::FetchProductsStart.into()).await;

    let products = store.state(|s| s.products.clone()).await;
    assert!(!products.loading);
    assert_eq!(products.error, None);
    assert_eq!(products.products.len(), 10);
    assert_eq!(products.pagination.total, 25);
    assert_eq!(products.pagination.total_pages, 3);
}

#[tokio::test]
async fn only_the_latest_listing_fetch_is_applied() {
    let catalog = ScriptedCatalog {
        inner: InMemoryProductRepository::generated(25, 7, test_clock().now()),
        delays: vec![(1, Duration::from_millis(200))],
    };
    let page_two: Vec<ProductId> = catalog
        .inner
        .get_all(2, 10, ProductFilter::default().fields())
        .await
        .unwrap()
        .data
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(page_two.len(), 10);
    let store = store_with(Arc::new(catalog), orders());

    // Page 1 is slow, page 2 answers right away
    let mut slow = store.send(ProductAction::FetchProductsStart.into()).await.unwrap();
    store.send(ProductAction::SetPage(2).into()).await.unwrap();
    let mut fast = store.send(ProductAction::FetchProductsStart.into()).await.unwrap();

    fast.wait_with_timeout(WAIT).await.unwrap();
    slow.wait_with_timeout(WAIT).await.unwrap();

    let (pagination, ids) = store
        .state(|s| {
            (
                s.products.pagination,
                s.products.products.iter().map(|p| p.id.clone()).collect::<Vec<_>>(),
            )
        })
        .await;
    assert_eq!(pagination.page, 2);
    assert_eq!(ids, page_two);
}

#[tokio::test]
async fn reset_drops_listing_fetches_in_flight() {
    let catalog = ScriptedCatalog {
        inner: InMemoryProductRepository::generated(25, 7, test_clock().now()),
        delays: vec![(1, Duration::from_millis(100))],
    };
    let store = store_with(Arc::new(catalog), orders());

    let mut pending = store.send(ProductAction::FetchProductsStart.into()).await.unwrap();
    store.send(AppAction::Reset).await.unwrap();
    pending.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(store.state(|s| s.products.clone()).await, ProductState::default());
}

#[tokio::test]
async fn failed_listing_fetch_keeps_the_previous_products() {
    let store = store_with(Arc::new(Unreachable), orders());
    store
        .send(ProductAction::FetchProductsSuccess(PaginatedResponse {
            data: samples(),
            total: 5,
            page: 1,
            limit: 10,
            total_pages: 1,
        })
        .into())
        .await
        .unwrap();

    settle(&store, ProductAction::FetchProductsStart.into()).await;

    let products = store.state(|s| s.products.clone()).await;
    assert!(!products.loading);
    assert_eq!(products.error.as_deref(), Some("Service unavailable: catalog offline"));
    assert_eq!(products.products.len(), 5);
}

#[tokio::test]
async fn failed_category_fetch_changes_nothing() {
    let store = store_with(Arc::new(Unreachable), orders());

    settle(&store, ProductAction::FetchCategories.into()).await;

    let products = store.state(|s| s.products.clone()).await;
    assert!(products.categories.is_empty());
    assert_eq!(products.error, None);
}

#[tokio::test]
async fn categories_and_featured_are_loaded() {
    let store = sample_store();

    settle(&store, ProductAction::FetchCategories.into()).await;
    settle(&store, ProductAction::FetchFeatured { limit: 2 }.into()).await;

    let (categories, featured) = store
        .state(|s| {
            (
                s.products.categories.clone(),
                s.products.featured.iter().map(|p| p.id.clone()).collect::<Vec<_>>(),
            )
        })
        .await;
    assert_eq!(categories, ["Electronics", "Accessories", "Clothing", "Home"]);
    assert_eq!(featured, [ProductId::new("prod_003"), ProductId::new("prod_001")]);
}

#[tokio::test]
async fn product_details_are_loaded() {
    let store = sample_store();

    settle(&store, ProductAction::FetchProductDetails(ProductId::new("prod_004")).into()).await;

    let selected = store.state(|s| s.products.selected.clone()).await;
    assert!(!selected.loading);
    assert_eq!(selected.error, None);
    assert_eq!(selected.product.map(|p| p.name), Some("Cotton T-Shirt".to_string()));
}

#[tokio::test]
async fn unknown_product_details_report_not_found() {
    let store = sample_store();

    settle(&store, ProductAction::FetchProductDetails(ProductId::new("prod_999")).into()).await;

    let selected = store.state(|s| s.products.selected.clone()).await;
    assert!(!selected.loading);
    assert_eq!(selected.product, None);
    assert_eq!(selected.error.as_deref(), Some(PRODUCT_NOT_FOUND));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn rejected_cart_actions_leave_state_and_subscribers_alone() {
    let store = sample_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    store.subscribe(move |state| log.lock().unwrap().push(cart::total_items(&state.cart)));

    let mut sold_out = samples().remove(0);
    sold_out.stock = 0;

    store
        .send(
            CartAction::AddToCart {
                product: samples().remove(1),
                quantity: 1,
            }
            .into(),
        )
        .await
        .unwrap();
    let rejected = store
        .send(
            CartAction::AddToCart {
                product: sold_out.clone(),
                quantity: 1,
            }
            .into(),
        )
        .await;
    store.send(CartAction::ClearCart.into()).await.unwrap();

    match rejected {
        Err(StoreError::Rejected(CartError::OutOfStock { product_id })) => {
            assert_eq!(product_id, sold_out.id);
        },
        other => panic!("Expected an out of stock rejection, got {other:?}"),
    }
    assert_eq!(*seen.lock().unwrap(), [1, 0]);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn created_orders_become_current_and_join_the_history() {
    let store = sample_store();

    let answer = store
        .send_and_wait_for(
            OrderAction::FetchOrderStart(request()).into(),
            |action| matches!(action, AppAction::Order(OrderAction::FetchOrderSuccess(_))),
            WAIT,
        )
        .await
        .unwrap();

    let AppAction::Order(OrderAction::FetchOrderSuccess(order)) = answer else {
        panic!("Expected an order, got {answer:?}");
    };
    assert_eq!(order.id, OrderId::new("order_00000001"));
    assert_eq!(order.total, Money::from_cents(19_999));

    let state = store.state(|s| s.order.clone()).await;
    assert!(!state.loading);
    assert_eq!(state.current_order.as_ref(), Some(&order));
    assert_eq!(state.orders, [order]);
}

#[tokio::test]
async fn refused_orders_carry_the_service_message() {
    let store = store_with(
        Arc::new(InMemoryProductRepository::new(samples())),
        Arc::new(CannedOrders {
            outcome: Ok(OrderResponse {
                success: false,
                order: None,
                error: Some("Payment declined".to_string()),
            }),
        }),
    );

    assert_eq!(order_failure(&store).await, "Payment declined");

    let state = store.state(|s| s.order.clone()).await;
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Payment declined"));
    assert!(state.orders.is_empty());
}

#[tokio::test]
async fn refused_orders_without_a_message_use_the_fallback() {
    let store = store_with(
        Arc::new(InMemoryProductRepository::new(samples())),
        Arc::new(CannedOrders {
            outcome: Ok(OrderResponse {
                success: false,
                order: None,
                error: None,
            }),
        }),
    );

    assert_eq!(order_failure(&store).await, ORDER_REFUSED);
}

#[tokio::test]
async fn failed_order_calls_report_the_error() {
    let store = store_with(
        Arc::new(InMemoryProductRepository::new(samples())),
        Arc::new(CannedOrders {
            outcome: Err(RepositoryError::Unavailable("orders offline".to_string())),
        }),
    );

    assert_eq!(order_failure(&store).await, "Service unavailable: orders offline");
    assert_eq!(store.state(|s| s.order.current_order.clone()).await, None);
}

#[tokio::test]
async fn existing_orders_can_be_opened() {
    let repository = orders();
    let placed = repository
        .create_order(request())
        .await
        .unwrap()
        .order
        .unwrap();
    let store = store_with(Arc::new(InMemoryProductRepository::new(samples())), repository);

    settle(&store, OrderAction::OpenOrder(placed.id.clone()).into()).await;

    let state = store.state(|s| s.order.clone()).await;
    assert!(!state.loading);
    assert_eq!(state.current_order, Some(placed));
    assert!(state.orders.is_empty());
}

#[tokio::test]
async fn opening_an_unknown_order_reports_not_found() {
    let store = sample_store();

    settle(&store, OrderAction::OpenOrder(OrderId::new("order_missing")).into()).await;

    let state = store.state(|s| s.order.clone()).await;
    assert!(!state.loading);
    assert_eq!(state.current_order, None);
    assert_eq!(state.error.as_deref(), Some(ORDER_NOT_FOUND));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn shut_down_stores_refuse_actions() {
    let store = sample_store();
    store.shutdown(WAIT).await.unwrap();

    let result = store.send(ProductAction::FetchCategories.into()).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}
