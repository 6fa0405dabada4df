//! In-memory product catalog.

use crate::error::RepositoryError;
use crate::money::Money;
use crate::repository::{ProductRepository, SEARCH_PAGE_SIZE};
use crate::types::{
    ApiResponse, FilterFields, PaginatedResponse, Product, ProductFilter, ProductId, SortBy,
    SortOrder,
};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::time::Duration;

/// Categories generated products are drawn from
pub const CATEGORIES: [&str; 6] =
    ["Electronics", "Clothing", "Books", "Home", "Sports", "Accessories"];

/// The five hand-written products every catalog starts with
#[must_use]
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    let sample = |id: &str,
                  name: &str,
                  description: &str,
                  cents: i64,
                  rating: f32,
                  stock: u32,
                  category: &str,
                  image: u32| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Money::from_cents(cents),
        rating,
        stock,
        category: category.to_string(),
        images: vec![format!("https://picsum.photos/300/300?random={image}")],
        created_at: now,
        updated_at: now,
    };

    vec![
        sample(
            "prod_001",
            "Wireless Headphones",
            "High-quality wireless headphones with noise cancellation and 30-hour battery life.",
            19_999,
            4.7,
            50,
            "Electronics",
            101,
        ),
        sample(
            "prod_002",
            "Leather Wallet",
            "Genuine leather wallet with multiple card slots and RFID protection.",
            4_999,
            4.5,
            120,
            "Accessories",
            102,
        ),
        sample(
            "prod_003",
            "Smart Watch",
            "Feature-rich smartwatch with fitness tracking and heart rate monitor.",
            24_999,
            4.8,
            35,
            "Electronics",
            103,
        ),
        sample(
            "prod_004",
            "Cotton T-Shirt",
            "Comfortable 100% cotton t-shirt available in multiple colors.",
            2_499,
            4.3,
            200,
            "Clothing",
            104,
        ),
        sample(
            "prod_005",
            "Stainless Steel Water Bottle",
            "Insulated water bottle that keeps drinks cold for 24 hours or hot for 12 hours.",
            2_999,
            4.6,
            85,
            "Home",
            105,
        ),
    ]
}

/// The samples followed by generated products, `size` products in total
///
/// The same `seed` always yields the same catalog. The samples are kept even
/// when `size` is smaller than their count.
#[must_use]
pub fn generate_catalog(size: usize, seed: u64, now: DateTime<Utc>) -> Vec<Product> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut products = sample_products(now);

    for n in products.len() + 1..=size {
        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
        let id = uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid();
        let rating = f32::from(rng.gen_range(0_u8..=50)) / 10.0;

        products.push(Product {
            id: ProductId::new(id.to_string()),
            name: format!("{category} {n}"),
            description: format!(
                "This is a description for Product {n}. It's a great {} item.",
                category.to_lowercase()
            ),
            price: Money::from_dollars(rng.gen_range(10..1010)),
            rating,
            stock: rng.gen_range(0..100),
            category: category.to_string(),
            images: vec![format!("https://picsum.photos/300/300?random={}", n + 100)],
            created_at: now,
            updated_at: now,
        });
    }

    products
}

/// Any whitespace-separated word of the name starts with `query`
fn matches_query(product: &Product, query: &str) -> bool {
    query.is_empty()
        || product
            .name
            .to_lowercase()
            .split_whitespace()
            .any(|word| word.starts_with(query))
}

fn compare(a: &Product, b: &Product, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Price => a.price.cmp(&b.price),
        SortBy::Rating => a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal),
        SortBy::Name => a.name.cmp(&b.name),
    }
}

/// Catalog held in memory, with optional simulated latency
///
/// # Example
///
/// ```
/// use cartflow_shop::mocks::InMemoryProductRepository;
/// use std::time::Duration;
///
/// let repository = InMemoryProductRepository::generated(100, 7, chrono::Utc::now())
///     .with_latency(Duration::from_millis(200));
/// assert_eq!(repository.products().len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Vec<Product>,
    latency: Duration,
}

impl InMemoryProductRepository {
    /// A repository serving exactly `products`
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            latency: Duration::ZERO,
        }
    }

    /// A repository serving [`generate_catalog`]
    #[must_use]
    pub fn generated(size: usize, seed: u64, now: DateTime<Utc>) -> Self {
        Self::new(generate_catalog(size, seed, now))
    }

    /// Delay every call by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The whole catalog, in catalog order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Matching products, sorted, before pagination
    fn select(&self, filters: &FilterFields) -> Vec<Product> {
        let query = filters.search_query.trim().to_lowercase();
        let category = filters.category.as_deref().filter(|c| !c.is_empty());

        let mut selected: Vec<Product> = self
            .products
            .iter()
            .filter(|p| matches_query(p, &query))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();

        // sort_by is stable, ties keep catalog order in both directions
        match filters.sort_order {
            SortOrder::Asc => selected.sort_by(|a, b| compare(a, b, filters.sort_by)),
            SortOrder::Desc => selected.sort_by(|a, b| compare(b, a, filters.sort_by)),
        }
        selected
    }

    fn page(&self, page: u32, limit: u32, filters: &FilterFields) -> PaginatedResponse<Product> {
        let selected = self.select(filters);
        let total = u32::try_from(selected.len()).unwrap_or(u32::MAX);
        let start = page.saturating_sub(1).saturating_mul(limit) as usize;

        PaginatedResponse {
            data: selected.into_iter().skip(start).take(limit as usize).collect(),
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn get_all(
        &self,
        page: u32,
        limit: u32,
        filters: FilterFields,
    ) -> BoxFuture<'_, Result<PaginatedResponse<Product>, RepositoryError>> {
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(self.page(page, limit, &filters))
        })
    }

    fn get_by_id(
        &self,
        id: &ProductId,
    ) -> BoxFuture<'_, Result<ApiResponse<Product>, RepositoryError>> {
        let id = id.clone();
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(self
                .products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .map_or_else(|| ApiResponse::failed("Product not found"), ApiResponse::ok))
        })
    }

    fn get_categories(&self) -> BoxFuture<'_, Result<Vec<String>, RepositoryError>> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut categories: Vec<String> = Vec::new();
            for product in &self.products {
                if !categories.contains(&product.category) {
                    categories.push(product.category.clone());
                }
            }
            Ok(categories)
        })
    }

    fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>> {
        let fields = filter.fields();
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(self.page(1, SEARCH_PAGE_SIZE, &fields).data)
        })
    }

    fn get_featured_products(
        &self,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<Product>, RepositoryError>> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut featured = self.products.clone();
            featured.sort_by(|a, b| compare(b, a, SortBy::Rating));
            featured.truncate(limit);
            Ok(featured)
        })
    }
}
