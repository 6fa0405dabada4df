//! Catalog types: products, filters and paginated responses.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size used when nothing else is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Unique identifier for a product
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new `ProductId`
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

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry as served by the product repository
///
/// Treated as an immutable snapshot: the cart keeps a copy taken at add time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Long description
    pub description: String,
    /// Unit price
    pub price: Money,
    /// Average rating between 0 and 5
    pub rating: f32,
    /// Units available
    pub stock: u32,
    /// Category name
    pub category: String,
    /// Image URIs, first one is the thumbnail
    pub images: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image, if any
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether any unit can be added to a cart
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Sort key for catalog listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Unit price
    #[default]
    Price,
    /// Average rating
    Rating,
    /// Product name
    Name,
}

/// Sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

/// Search, category and sort criteria passed to [`ProductRepository::get_all`]
///
/// [`ProductRepository::get_all`]: crate::repository::ProductRepository::get_all
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFields {
    /// Word-prefix search on the product name; empty matches everything
    pub search_query: String,
    /// Exact category match; `None` matches every category
    pub category: Option<String>,
    /// Sort key
    pub sort_by: SortBy,
    /// Sort direction
    pub sort_order: SortOrder,
}

/// The catalog filter held by the product slice
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Word-prefix search on the product name
    pub search_query: String,
    /// Selected category
    pub category: Option<String>,
    /// Sort key
    pub sort_by: SortBy,
    /// Sort direction
    pub sort_order: SortOrder,
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl ProductFilter {
    /// The filter fields without pagination
    #[must_use]
    pub fn fields(&self) -> FilterFields {
        FilterFields {
            search_query: self.search_query.clone(),
            category: self.category.clone(),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            category: None,
            sort_by: SortBy::Price,
            sort_order: SortOrder::Asc,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata of the last successful fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of matching products
    pub total: u32,
    /// Page that was served
    pub page: u32,
    /// Page size that was served
    pub limit: u32,
    /// Number of pages for this filter
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total_pages: 1,
        }
    }
}

/// One page of results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Total number of matching items
    pub total: u32,
    /// Page that was served
    pub page: u32,
    /// Page size that was served
    pub limit: u32,
    /// Number of pages for this filter
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Splits the response into its items and pagination metadata
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Pagination) {
        let pagination = Pagination {
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        };
        (self.data, pagination)
    }
}

/// Envelope for single-item lookups
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the lookup succeeded
    pub success: bool,
    /// The item, on success
    pub data: Option<T>,
    /// Why the lookup failed
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed response carrying `error`
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
