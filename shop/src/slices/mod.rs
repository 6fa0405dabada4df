//! The three state slices.
//!
//! Each slice owns a disjoint part of [`AppState`](crate::app::AppState) and
//! is environment-free: reducers only change state, selectors only read it.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{CartAction, CartLine, CartReducer, CartState};
pub use order::{OrderAction, OrderReducer, OrderState};
pub use product::{ProductAction, ProductReducer, ProductState, SelectedProduct};
