//! Data access contracts for the catalog and for orders.
//!
//! The orchestrator only ever talks to these traits, through
//! [`ShopEnvironment`](crate::app::ShopEnvironment). Methods return
//! `BoxFuture` instead of being `async fn` so the traits stay dyn-compatible.

use crate::error::RepositoryError;
use crate::types::{
    ApiResponse, FilterFields, Order, OrderId, OrderRequest, OrderResponse, PaginatedResponse,
    Product, ProductFilter, ProductId, UserId,
};
use futures::future::BoxFuture;

/// Page size used by [`ProductRepository::search_products`]
pub const SEARCH_PAGE_SIZE: u32 = 1000;

/// Read access to the product catalog
pub trait ProductRepository: Send + Sync {
    /// One page of products matching `filters`
    ///
    /// `page` is 1-based. The response carries the pagination metadata the
    /// product slice stores as is.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the catalog cannot be queried.
    fn get_all(
        &self,
        page: u32,
        limit: u32,
        filters: FilterFields,
    ) -> BoxFuture<'_, Result<PaginatedResponse<Product>, RepositoryError>>;

    /// A single product
    ///
    /// An unknown id is not an error: the response has `success == false`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the catalog cannot be queried.
    fn get_by_id(
        &self,
        id: &ProductId,
    ) -> BoxFuture<'_, Result<ApiResponse<Product>, RepositoryError>>;

    /// Every category name, in catalog order without duplicates
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the catalog cannot be queried.
    fn get_categories(&self) -> BoxFuture<'_, Result<Vec<String>, RepositoryError>>;

    /// First [`SEARCH_PAGE_SIZE`] products matching `filter`, ignoring its page
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the catalog cannot be queried.
    fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>>;

    /// The `limit` best-rated products
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the catalog cannot be queried.
    fn get_featured_products(
        &self,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>>;
}

/// Order creation and lookup
pub trait OrderRepository: Send + Sync {
    /// Place an order
    ///
    /// A refusal is reported in the response (`success == false`); `Err` means
    /// the call itself failed.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the order service cannot be reached.
    fn create_order(
        &self,
        request: OrderRequest,
    ) -> BoxFuture<'_, Result<OrderResponse, RepositoryError>>;

    /// A previously created order, if it exists
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the order service cannot be reached.
    fn get_order_by_id(
        &self,
        id: &OrderId,
    ) -> BoxFuture<'_, Result<Option<Order>, RepositoryError>>;

    /// Every order of `user_id`, oldest first
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the order service cannot be reached.
    fn get_user_orders(
        &self,
        user_id: &UserId,
    ) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>>;
}
