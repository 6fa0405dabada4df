//! In-memory order service.

use crate::error::RepositoryError;
use crate::money::Money;
use crate::repository::OrderRepository;
use crate::types::{Order, OrderDraft, OrderId, OrderRequest, OrderResponse, UserId};
use cartflow_core::environment::{Clock, IdGenerator};
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Characters of the generated id used in an order id
const ORDER_ID_LEN: usize = 8;

/// Payment method recorded on every order
pub const PAYMENT_METHOD: &str = "card";

/// Orders kept in a private list
///
/// Created orders are retrievable by id and by user for the lifetime of the
/// repository.
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: Duration,
}

impl InMemoryOrderRepository {
    /// An empty repository stamping orders with `clock` and `ids`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            clock,
            ids,
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of orders created so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no order was created yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn next_order_id(&self) -> OrderId {
        let raw = self.ids.next_id();
        let short: String = raw.chars().take(ORDER_ID_LEN).collect();
        OrderId::new(format!("order_{short}"))
    }

    fn build(&self, request: OrderRequest) -> Order {
        let draft = OrderDraft {
            user_id: request.user_id,
            items: request.items,
            shipping_address: request.shipping_info,
            subtotal: request.total_amount,
            shipping_cost: Money::ZERO,
            tax: Money::ZERO,
            status: request.status,
            payment_method: PAYMENT_METHOD.to_string(),
        };
        Order::new(self.next_order_id(), draft, self.clock.now())
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create_order(
        &self,
        request: OrderRequest,
    ) -> BoxFuture<'_, Result<OrderResponse, RepositoryError>> {
        Box::pin(async move {
            self.simulate_latency().await;

            let order = self.build(request);
            tracing::debug!(
                order_id = %order.id,
                user_id = %order.user_id,
                total = %order.total,
                "Order stored"
            );

            self.orders
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(order.clone());
            Ok(OrderResponse::created(order))
        })
    }

    fn get_order_by_id(
        &self,
        id: &OrderId,
    ) -> BoxFuture<'_, Result<Option<Order>, RepositoryError>> {
        let id = id.clone();
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(self
                .orders
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .find(|order| order.id == id)
                .cloned())
        })
    }

    fn get_user_orders(
        &self,
        user_id: &UserId,
    ) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>> {
        let user_id = user_id.clone();
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(self
                .orders
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter(|order| order.user_id == user_id)
                .cloned()
                .collect())
        })
    }
}
