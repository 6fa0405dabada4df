//! Order types: requests, placed orders and their lifecycle enums.

use crate::money::Money;
use crate::types::product::ProductId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between placing an order and its expected delivery
pub const DELIVERY_DAYS: i64 = 3;

/// Unique identifier for an order
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new `OrderId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a shopper
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchased product, copied from the cart at checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product identifier
    pub product_id: ProductId,
    /// Product name for display
    pub name: String,
    /// Unit price at checkout
    pub price: Money,
    /// Units ordered
    pub quantity: u32,
    /// Thumbnail at checkout
    pub image: Option<String>,
}

impl OrderLine {
    /// Price of the whole line
    #[must_use]
    pub const fn total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// Where and to whom an order ships
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
    /// Contact email
    pub email: String,
}

impl ShippingAddress {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fulfilment status of an order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet processed
    Pending,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Arrived
    Delivered,
    /// Cancelled before shipping
    Cancelled,
    /// Money returned
    Refunded,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Refunded => write!(f, "Refunded"),
        }
    }
}

/// Payment status of an order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet charged
    Pending,
    /// Charged
    Paid,
    /// Charge declined
    Failed,
    /// Charge returned
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Paid => write!(f, "Paid"),
            Self::Failed => write!(f, "Failed"),
            Self::Refunded => write!(f, "Refunded"),
        }
    }
}

/// A placed order
///
/// `total == subtotal + shipping_cost + tax` for every order built by
/// [`Order::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: OrderId,
    /// Shopper who placed the order
    pub user_id: UserId,
    /// Purchased lines
    pub items: Vec<OrderLine>,
    /// Delivery address
    pub shipping_address: ShippingAddress,
    /// Sum of the lines
    pub subtotal: Money,
    /// Shipping charge
    pub shipping_cost: Money,
    /// Tax charged
    pub tax: Money,
    /// Grand total
    pub total: Money,
    /// Fulfilment status
    pub status: OrderStatus,
    /// Payment method name
    pub payment_method: String,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Carrier tracking number
    pub tracking_number: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Everything [`Order::new`] needs besides the id and timestamps
#[derive(Clone, Debug)]
pub struct OrderDraft {
    /// Shopper who places the order
    pub user_id: UserId,
    /// Purchased lines
    pub items: Vec<OrderLine>,
    /// Delivery address
    pub shipping_address: ShippingAddress,
    /// Sum of the lines
    pub subtotal: Money,
    /// Shipping charge
    pub shipping_cost: Money,
    /// Tax charged
    pub tax: Money,
    /// Initial fulfilment status
    pub status: OrderStatus,
    /// Payment method name
    pub payment_method: String,
}

impl Order {
    /// Builds an order with a payment still pending
    #[must_use]
    pub fn new(id: OrderId, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            items: draft.items,
            shipping_address: draft.shipping_address,
            subtotal: draft.subtotal,
            shipping_cost: draft.shipping_cost,
            tax: draft.tax,
            total: draft.subtotal + draft.shipping_cost + draft.tax,
            status: draft.status,
            payment_method: draft.payment_method,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
            tracking_number: None,
            notes: None,
        }
    }

    /// When the order is expected to arrive
    #[must_use]
    pub fn estimated_delivery(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(DELIVERY_DAYS)
    }

    /// Units across all lines
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// What the checkout screen submits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Shopper placing the order
    pub user_id: UserId,
    /// Lines copied from the cart
    pub items: Vec<OrderLine>,
    /// Delivery address
    pub shipping_info: ShippingAddress,
    /// Cart total at checkout
    pub total_amount: Money,
    /// Requested initial status
    pub status: OrderStatus,
}

/// Result envelope of [`OrderRepository::create_order`]
///
/// [`OrderRepository::create_order`]: crate::repository::OrderRepository::create_order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Whether the order was created
    pub success: bool,
    /// The created order
    pub order: Option<Order>,
    /// Why it was not created
    pub error: Option<String>,
}

impl OrderResponse {
    /// A successful response carrying `order`
    #[must_use]
    pub const fn created(order: Order) -> Self {
        Self {
            success: true,
            order: Some(order),
            error: None,
        }
    }

    /// A refused response, with or without a reason
    #[must_use]
    pub const fn refused(error: Option<String>) -> Self {
        Self {
            success: false,
            order: None,
            error,
        }
    }
}
