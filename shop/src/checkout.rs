//! Checkout: form validation, order summary and order placement.

use crate::app::{AppAction, ShopStore};
use crate::config::ShopConfig;
use crate::error::{ShopError, ValidationError};
use crate::money::Money;
use crate::slices::cart::{self, CartState};
use crate::slices::{CartAction, OrderAction};
use crate::types::{Order, OrderLine, OrderRequest, OrderStatus, ShippingAddress, UserId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").expect("hardcoded email pattern should compile")
});

/// Country preselected on the shipping form
pub const DEFAULT_COUNTRY: &str = "United States";

/// Raw shipping form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
}

impl Default for ShippingForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(value.to_string())
}

/// Check the form and turn it into a shipping address
///
/// Fields are trimmed. All of them except the country are required.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, in form order.
pub fn validate_shipping(form: &ShippingForm) -> Result<ShippingAddress, ValidationError> {
    let first_name = required(&form.first_name, "First name")?;
    let last_name = required(&form.last_name, "Last name")?;
    let email = required(&form.email, "Email")?;
    let address = required(&form.address, "Address")?;
    let city = required(&form.city, "City")?;
    let postal_code = required(&form.postal_code, "Postal code")?;

    if !EMAIL.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(ShippingAddress {
        first_name,
        last_name,
        address,
        city,
        postal_code,
        country: form.country.trim().to_string(),
        email,
    })
}

/// Amounts shown on the checkout screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Units in the cart
    pub item_count: u32,
    /// Cart total
    pub subtotal: Money,
    /// Tax on the subtotal
    pub tax: Money,
    /// Subtotal plus tax
    pub total: Money,
}

impl OrderSummary {
    /// Summary of `cart` with tax at `tax_rate_bps` basis points
    #[must_use]
    pub fn from_cart(cart: &CartState, tax_rate_bps: u32) -> Self {
        let subtotal = cart::total_price(cart);
        let tax = subtotal.basis_points(tax_rate_bps);
        Self {
            item_count: cart::total_items(cart),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Snapshot the cart into an order request
///
/// # Errors
///
/// Returns [`ValidationError::EmptyCart`] if the cart has no lines.
pub fn build_order_request(
    cart: &CartState,
    shipping_info: ShippingAddress,
    user_id: UserId,
) -> Result<OrderRequest, ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let items = cart
        .items
        .iter()
        .map(|line| OrderLine {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            price: line.product.price,
            quantity: line.quantity,
            image: line.product.thumbnail().map(str::to_string),
        })
        .collect();

    Ok(OrderRequest {
        user_id,
        items,
        shipping_info,
        total_amount: cart::total_price(cart),
        status: OrderStatus::Processing,
    })
}

/// Validate, submit and wait for the order
///
/// On success the cart is cleared and the order is the store's current order.
/// The caller must not submit twice concurrently.
///
/// # Errors
///
/// - [`ShopError::Validation`]: the form is incomplete or the cart is empty;
///   nothing was dispatched
/// - [`ShopError::OrderFailed`]: the order service refused or failed
/// - [`ShopError::Store`]: no answer within `timeout`, or the store is
///   shutting down
pub async fn place_order(
    store: &ShopStore,
    form: &ShippingForm,
    config: &ShopConfig,
    timeout: Duration,
) -> Result<Order, ShopError> {
    let address = validate_shipping(form)?;
    let request = store
        .state(|state| build_order_request(&state.cart, address, config.user_id.clone()))
        .await?;

    tracing::info!(
        user_id = %request.user_id,
        lines = request.items.len(),
        total = %request.total_amount,
        "Placing order"
    );

    let outcome = store
        .send_and_wait_for(
            OrderAction::FetchOrderStart(request).into(),
            |action| {
                matches!(
                    action,
                    AppAction::Order(
                        OrderAction::FetchOrderSuccess(_) | OrderAction::FetchOrderFailure(_)
                    )
                )
            },
            timeout,
        )
        .await?;

    match outcome {
        AppAction::Order(OrderAction::FetchOrderSuccess(order)) => {
            store.send(CartAction::ClearCart.into()).await?;
            tracing::info!(order_id = %order.id, "Order placed");
            Ok(order)
        },
        AppAction::Order(OrderAction::FetchOrderFailure(message)) => {
            tracing::warn!(%message, "Order failed");
            Err(ShopError::OrderFailed(message))
        },
        other => Err(ShopError::OrderFailed(format!("Unexpected answer: {other:?}"))),
    }
}
