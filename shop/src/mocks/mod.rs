//! In-memory repositories standing in for the shop backend.

pub mod orders;
pub mod products;

pub use orders::InMemoryOrderRepository;
pub use products::{InMemoryProductRepository, generate_catalog, sample_products};

use cartflow_core::environment::IdGenerator;

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}
