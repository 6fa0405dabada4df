//! Domain types shared by the slices, the repositories and checkout.

pub mod order;
pub mod product;

pub use order::{
    OrderDraft, Order, OrderId, OrderLine, OrderRequest, OrderResponse, OrderStatus,
    PaymentStatus, ShippingAddress, UserId,
};
pub use product::{
    ApiResponse, FilterFields, PaginatedResponse, Pagination, Product, ProductFilter, ProductId,
    SortBy, SortOrder,
};
