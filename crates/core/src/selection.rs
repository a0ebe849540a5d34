//! Product Selection
//!
//! The size and quantity a customer has chosen on a product card before adding
//! it to the cart.

use crate::{
    cart::{CartError, CartStore, LineItemSnapshot},
    catalog::{Product, Size},
    pricing::{Price, PricingError, line_total},
};

/// Size and quantity picked for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSelection {
    size: Size,
    quantity: u32,
}

impl Default for ProductSelection {
    fn default() -> Self {
        Self {
            size: Size::default(),
            quantity: 1,
        }
    }
}

impl ProductSelection {
    /// A selection of the first size and a quantity of one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Selected quantity, never below 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Choose a size. The quantity is kept.
    pub fn select_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Increase the quantity by one.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Set the quantity directly, raising 0 to 1.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Decrease the quantity by one, stopping at 1.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Price of the selected size.
    pub fn unit_price(&self, product: &Product) -> Price {
        product.price(self.size)
    }

    /// Selected size price multiplied by the selected quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self, product: &Product) -> Result<Price, PricingError> {
        line_total(&self.unit_price(product), self.quantity)
    }

    /// Add the selection to the cart, then reset the quantity to 1.
    ///
    /// The size stays selected. On error the selection is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] raised by [`CartStore::add_item`].
    pub fn add_to_cart(&mut self, product: &Product, cart: &mut CartStore) -> Result<u32, CartError> {
        let line_quantity = cart.add_item(
            product.id.clone(),
            self.size,
            self.unit_price(product),
            self.quantity,
            LineItemSnapshot::from(product),
        )?;

        self.quantity = 1;

        Ok(line_quantity)
    }
}
