//! Order slice: order submission state and the order history.

use crate::types::{Order, OrderId, OrderRequest};
use cartflow_core::{effect::Effects, reducer::Reducer};
use std::convert::Infallible;

/// Order state
///
/// Each submission goes `idle -> loading -> success | failure`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderState {
    /// Every order placed in this session, oldest first, duplicates kept
    pub orders: Vec<Order>,
    /// Order shown on the confirmation screen
    pub current_order: Option<Order>,
    /// Whether a request is in flight
    pub loading: bool,
    /// Why the last request failed
    pub error: Option<String>,
}

/// Order actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderAction {
    /// Submit an order
    FetchOrderStart(OrderRequest),
    /// The order was created
    FetchOrderSuccess(Order),
    /// The order could not be created
    FetchOrderFailure(String),
    /// Leave the confirmation screen
    ClearOrder,
    /// Show an order without going through a request
    SetCurrentOrder(Order),
    /// Look up an existing order
    OpenOrder(OrderId),
    /// The looked-up order arrived
    OrderOpened(Order),
    /// The lookup found nothing or failed
    OpenOrderFailed(String),
}

/// Reducer for [`OrderState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderReducer;

impl Reducer for OrderReducer {
    type State = OrderState;
    type Action = OrderAction;
    type Environment = ();
    type Error = Infallible;

    fn reduce(
        &self,
        state: &mut OrderState,
        action: OrderAction,
        _env: &(),
    ) -> Result<Effects<OrderAction>, Infallible> {
        match action {
            OrderAction::FetchOrderStart(_) | OrderAction::OpenOrder(_) => {
                state.loading = true;
                state.error = None;
            },
            OrderAction::FetchOrderSuccess(order) => {
                state.loading = false;
                state.orders.push(order.clone());
                state.current_order = Some(order);
            },
            OrderAction::FetchOrderFailure(message) | OrderAction::OpenOrderFailed(message) => {
                state.loading = false;
                state.error = Some(message);
            },
            OrderAction::ClearOrder => {
                state.current_order = None;
                state.loading = false;
                state.error = None;
            },
            OrderAction::SetCurrentOrder(order) => state.current_order = Some(order),
            OrderAction::OrderOpened(order) => {
                state.loading = false;
                state.current_order = Some(order);
            },
        }
        Ok(Effects::new())
    }
}

/// Order on the confirmation screen
#[must_use]
pub const fn current_order(state: &OrderState) -> Option<&Order> {
    state.current_order.as_ref()
}

/// Whether a request is in flight
#[must_use]
pub const fn loading(state: &OrderState) -> bool {
    state.loading
}

/// Why the last request failed
#[must_use]
pub fn error(state: &OrderState) -> Option<&str> {
    state.error.as_deref()
}

/// Order history
#[must_use]
pub fn orders(state: &OrderState) -> &[Order] {
    &state.orders
}
