//! Cart slice: the lines the shopper intends to buy.
//!
//! Every line satisfies `1 <= quantity <= stock`, where `stock` is the stock
//! recorded on the product snapshot taken when the line was created. Adding
//! clamps to the remaining stock; setting a quantity directly is rejected
//! instead.

use crate::error::CartError;
use crate::money::Money;
use crate::types::{Product, ProductId};
use cartflow_core::{effect::Effects, reducer::Reducer};

/// A product snapshot and how many units of it are in the cart
#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    /// Product as it was when the line was created
    pub product: Product,
    /// Units in the cart, between 1 and `product.stock`
    pub quantity: u32,
}

impl CartLine {
    /// Product identifier of this line
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Price of the whole line
    #[must_use]
    pub const fn total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

/// Cart state: lines in insertion order, at most one per product
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartState {
    /// Cart lines
    pub items: Vec<CartLine>,
}

impl CartState {
    /// An empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line for `product_id`, if any
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|line| line.product_id() == product_id)
    }

    /// Whether the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart actions
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    /// Add units of a product, clamped to its remaining stock
    AddToCart {
        /// Product snapshot to add
        product: Product,
        /// Units requested
        quantity: u32,
    },
    /// Drop a line
    RemoveFromCart(ProductId),
    /// Set the units of an existing line; `0` drops it
    UpdateQuantity {
        /// Line to change
        product_id: ProductId,
        /// New number of units
        quantity: u32,
    },
    /// Drop every line
    ClearCart,
}

/// Reducer for [`CartState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    fn add(state: &mut CartState, product: Product, quantity: u32) -> Result<(), CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock {
                product_id: product.id,
            });
        }

        if let Some(line) = state.line_mut(&product.id) {
            let remaining = product.stock.saturating_sub(line.quantity);
            line.quantity += quantity.min(remaining);
        } else if quantity > 0 {
            let quantity = quantity.min(product.stock);
            state.items.push(CartLine { product, quantity });
        }
        Ok(())
    }

    fn update(
        state: &mut CartState,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        let Some(line) = state.line_mut(product_id) else {
            return Ok(());
        };

        if quantity > line.product.stock {
            return Err(CartError::InsufficientStock {
                product_id: product_id.clone(),
                available: line.product.stock,
                requested: quantity,
            });
        }

        if quantity == 0 {
            state.items.retain(|line| line.product_id() != product_id);
        } else {
            line.quantity = quantity;
        }
        Ok(())
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = ();
    type Error = CartError;

    fn reduce(
        &self,
        state: &mut CartState,
        action: CartAction,
        _env: &(),
    ) -> Result<Effects<CartAction>, CartError> {
        match action {
            CartAction::AddToCart { product, quantity } => Self::add(state, product, quantity)?,
            CartAction::RemoveFromCart(product_id) => {
                state.items.retain(|line| *line.product_id() != product_id);
            },
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => Self::update(state, &product_id, quantity)?,
            CartAction::ClearCart => state.items.clear(),
        }
        Ok(Effects::new())
    }
}

/// Every cart line
#[must_use]
pub fn cart_items(state: &CartState) -> &[CartLine] {
    &state.items
}

/// Units across all lines
#[must_use]
pub fn total_items(state: &CartState) -> u32 {
    state.items.iter().map(|line| line.quantity).sum()
}

/// Sum of `price × quantity` over all lines
#[must_use]
pub fn total_price(state: &CartState) -> Money {
    state.items.iter().map(CartLine::total).sum()
}

/// Units of `product_id` in the cart, `0` without a line
#[must_use]
pub fn line_quantity(state: &CartState, product_id: &ProductId) -> u32 {
    state.line(product_id).map_or(0, |line| line.quantity)
}
