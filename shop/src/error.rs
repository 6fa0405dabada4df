//! Error types for the shop.
//!
//! Synchronous errors ([`CartError`], [`ValidationError`]) are returned to the
//! caller immediately. Repository failures ([`RepositoryError`]) never reach
//! the caller of `send`; the orchestrator turns them into slice error strings.

use crate::types::ProductId;
use cartflow_runtime::StoreError;
use std::convert::Infallible;
use thiserror::Error;

/// Why the cart refused an action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product has no stock at all
    #[error("Product {product_id} is out of stock")]
    OutOfStock {
        /// Product that was added
        product_id: ProductId,
    },

    /// A quantity above the product's stock was requested
    #[error("Not enough stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product whose quantity was set
        product_id: ProductId,
        /// Stock recorded on the cart line
        available: u32,
        /// Quantity that was asked for
        requested: u32,
    },
}

impl From<Infallible> for CartError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Failure of a repository call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The requested record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The backing service could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The backing service refused the request
    #[error("{0}")]
    Rejected(String),
}

/// Checkout form problems, detected before anything is dispatched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank
    #[error("{field} is required")]
    Required {
        /// Human-readable field name
        field: &'static str,
    },

    /// The email address is not of the form `name@domain.tld`
    #[error("Invalid email address")]
    InvalidEmail,

    /// There is nothing to order
    #[error("Your cart is empty")]
    EmptyCart,
}

/// Errors surfaced by the checkout API
#[derive(Error, Debug)]
pub enum ShopError {
    /// The cart refused an action
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The shipping form is incomplete
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store could not process the request
    #[error("Store error: {0}")]
    Store(StoreError<CartError>),

    /// The order repository did not create the order
    #[error("Order failed: {0}")]
    OrderFailed(String),
}

impl From<StoreError<CartError>> for ShopError {
    fn from(error: StoreError<CartError>) -> Self {
        match error {
            StoreError::Rejected(cart) => Self::Cart(cart),
            other => Self::Store(other),
        }
    }
}

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },

    /// A value parsed but is out of range
    #[error("{0}")]
    OutOfRange(String),
}
