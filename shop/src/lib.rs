//! # Cartflow Shop
//!
//! Client-side state for a shopping cart and checkout flow, built on a
//! cartflow [`Store`](cartflow_runtime::Store).
//!
//! - [`slices`]: catalog, cart and order state with their reducers and selectors
//! - [`orchestrator`]: turns intent actions into repository calls
//! - [`app`]: the composed state tree and store
//! - [`repository`]: data access contracts, with in-memory versions in [`mocks`]
//! - [`checkout`]: form validation and order placement
//!
//! ## Example
//!
//! ```no_run
//! use cartflow_shop::{ShopConfig, in_memory_store};
//! use cartflow_shop::slices::{CartAction, ProductAction};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = in_memory_store(&ShopConfig::default());
//!
//! let mut handle = store.send(ProductAction::FetchProductsStart.into()).await?;
//! handle.wait().await;
//!
//! let first = store.state(|s| s.products.products.first().cloned()).await;
//! if let Some(product) = first.filter(|p| p.in_stock()) {
//!     store.send(CartAction::AddToCart { product, quantity: 1 }.into()).await?;
//! }
//!
//! let items = store.state(|s| s.cart.items.len()).await;
//! println!("{items} line(s) in the cart");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod checkout;
pub mod config;
pub mod error;
pub mod mocks;
pub mod money;
pub mod orchestrator;
pub mod repository;
pub mod slices;
pub mod types;

// Re-export commonly used types
pub use app::{
    AppAction, AppState, ShopEnvironment, ShopReducer, ShopStore, build_store,
    build_store_with_config, in_memory_store,
};
pub use checkout::{OrderSummary, ShippingForm, build_order_request, place_order, validate_shipping};
pub use config::ShopConfig;
pub use error::{CartError, ConfigError, RepositoryError, ShopError, ValidationError};
pub use money::Money;
