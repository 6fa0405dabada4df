//! Product slice: the catalog listing, its filter and pagination.
//!
//! Pagination is copied from the last successful fetch and never computed
//! here. Intent actions (`FetchProductsStart`, `FetchCategories`, ...) only
//! flip loading flags; the orchestrator performs the fetch.

use crate::types::{
    PaginatedResponse, Pagination, Product, ProductFilter, ProductId, SortBy, SortOrder,
};
use cartflow_core::{effect::Effects, reducer::Reducer};
use std::convert::Infallible;

/// The product shown on the details screen
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectedProduct {
    /// Product being loaded or shown
    pub id: Option<ProductId>,
    /// Loaded details
    pub product: Option<Product>,
    /// Whether the details are being fetched
    pub loading: bool,
    /// Why the last details fetch failed
    pub error: Option<String>,
}

/// Catalog state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductState {
    /// Current listing
    pub products: Vec<Product>,
    /// Whether a listing fetch is in flight
    pub loading: bool,
    /// Why the last listing fetch failed
    pub error: Option<String>,
    /// Search, category, sort and page
    pub filter: ProductFilter,
    /// Metadata of the last successful listing fetch
    pub pagination: Pagination,
    /// Category names
    pub categories: Vec<String>,
    /// Details screen
    pub selected: SelectedProduct,
    /// Best-rated products for the home screen
    pub featured: Vec<Product>,
}

/// Catalog actions
#[derive(Clone, Debug, PartialEq)]
pub enum ProductAction {
    /// Fetch the listing for the current filter
    FetchProductsStart,
    /// A listing page arrived
    FetchProductsSuccess(PaginatedResponse<Product>),
    /// The listing fetch failed
    FetchProductsFailure(String),
    /// Change the search text and go back to page 1
    SetSearchQuery(String),
    /// Change the category and go back to page 1
    SetCategory(Option<String>),
    /// Change the sort, keeping the page
    SetSort {
        /// Sort key
        sort_by: SortBy,
        /// Sort direction
        sort_order: SortOrder,
    },
    /// Go to a page
    SetPage(u32),
    /// Replace the category list
    SetCategories(Vec<String>),
    /// Restore the initial filter
    ResetFilters,
    /// Fetch the category list
    FetchCategories,
    /// Fetch one product for the details screen
    FetchProductDetails(ProductId),
    /// Details arrived
    ProductDetailsLoaded(Product),
    /// Details could not be fetched
    ProductDetailsFailed(String),
    /// Fetch the best-rated products
    FetchFeatured {
        /// How many products to fetch
        limit: usize,
    },
    /// Featured products arrived
    FeaturedLoaded(Vec<Product>),
}

/// Reducer for [`ProductState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductReducer;

impl Reducer for ProductReducer {
    type State = ProductState;
    type Action = ProductAction;
    type Environment = ();
    type Error = Infallible;

    fn reduce(
        &self,
        state: &mut ProductState,
        action: ProductAction,
        _env: &(),
    ) -> Result<Effects<ProductAction>, Infallible> {
        match action {
            ProductAction::FetchProductsStart => {
                state.loading = true;
                state.error = None;
            },
            ProductAction::FetchProductsSuccess(response) => {
                let (products, pagination) = response.into_parts();
                state.loading = false;
                state.products = products;
                state.pagination = pagination;
            },
            ProductAction::FetchProductsFailure(message) => {
                state.loading = false;
                state.error = Some(message);
            },
            ProductAction::SetSearchQuery(query) => {
                state.filter.search_query = query;
                state.filter.page = 1;
            },
            ProductAction::SetCategory(category) => {
                state.filter.category = category;
                state.filter.page = 1;
            },
            ProductAction::SetSort {
                sort_by,
                sort_order,
            } => {
                state.filter.sort_by = sort_by;
                state.filter.sort_order = sort_order;
            },
            ProductAction::SetPage(page) => state.filter.page = page.max(1),
            ProductAction::SetCategories(categories) => state.categories = categories,
            ProductAction::ResetFilters => state.filter = ProductFilter::default(),
            ProductAction::FetchProductDetails(id) => {
                state.selected.id = Some(id);
                state.selected.product = None;
                state.selected.loading = true;
                state.selected.error = None;
            },
            ProductAction::ProductDetailsLoaded(product) => {
                state.selected.id = Some(product.id.clone());
                state.selected.product = Some(product);
                state.selected.loading = false;
            },
            ProductAction::ProductDetailsFailed(message) => {
                state.selected.loading = false;
                state.selected.error = Some(message);
            },
            ProductAction::FeaturedLoaded(products) => state.featured = products,
            ProductAction::FetchCategories | ProductAction::FetchFeatured { .. } => {},
        }
        Ok(Effects::new())
    }
}

/// Current listing
#[must_use]
pub fn products(state: &ProductState) -> &[Product] {
    &state.products
}

/// Current filter
#[must_use]
pub const fn filter(state: &ProductState) -> &ProductFilter {
    &state.filter
}

/// Pagination of the last successful fetch
#[must_use]
pub const fn pagination(state: &ProductState) -> &Pagination {
    &state.pagination
}

/// Category names
#[must_use]
pub fn categories(state: &ProductState) -> &[String] {
    &state.categories
}

/// Whether a listing fetch is in flight
#[must_use]
pub const fn loading(state: &ProductState) -> bool {
    state.loading
}

/// Why the last listing fetch failed
#[must_use]
pub fn error(state: &ProductState) -> Option<&str> {
    state.error.as_deref()
}

/// Whether pages follow the one last served
#[must_use]
pub const fn has_more_pages(state: &ProductState) -> bool {
    state.pagination.page < state.pagination.total_pages
}

/// Product on the details screen, once loaded
#[must_use]
pub const fn selected_product(state: &ProductState) -> Option<&Product> {
    state.selected.product.as_ref()
}

/// Best-rated products
#[must_use]
pub fn featured(state: &ProductState) -> &[Product] {
    &state.featured
}
