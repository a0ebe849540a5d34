//! Cart
//!
//! The session's cart. Line items are keyed by (product, size) and kept in
//! insertion order; item count and total are recomputed on every read.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{ProductId, Size},
    pricing::{Price, PricingError, sum},
};

mod line_item;

pub use line_item::{CartLineItem, LineItemKey, LineItemSnapshot};

/// Errors related to cart mutations or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// An add was requested with a quantity of zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The resulting quantity does not fit in a line item.
    #[error("quantity {requested} for {product_id} ({size}) is too large")]
    QuantityOverflow {
        /// Product identifier
        product_id: ProductId,
        /// Chosen size
        size: Size,
        /// Quantity the line would have had
        requested: i64,
    },

    /// A unit price's currency differs from the cart currency (product, price currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What a quantity update did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has the requested quantity.
    Updated,

    /// The requested quantity was zero or less, so the line was removed.
    Removed,

    /// No line matched; nothing changed.
    Missing,
}

/// Cart store
#[derive(Debug, Clone)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    currency: &'static Currency,
}

impl CartStore {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add `quantity` of a product in a size.
    ///
    /// If a line with the same product and size exists its quantity is
    /// increased (the original unit price and snapshot are kept), otherwise a
    /// new line is appended. Returns the line's resulting quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::CurrencyMismatch`]: `unit_price` is not in the cart currency.
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        size: Size,
        unit_price: Price,
        quantity: u32,
        snapshot: LineItemSnapshot,
    ) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if unit_price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                product_id,
                unit_price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(&product_id, size))
        {
            item.quantity =
                item.quantity
                    .checked_add(quantity)
                    .ok_or_else(|| CartError::QuantityOverflow {
                        product_id: product_id.clone(),
                        size,
                        requested: i64::from(item.quantity) + i64::from(quantity),
                    })?;

            debug!("merged {quantity} x {product_id} ({size}) into existing line");

            return Ok(item.quantity);
        }

        debug!("added {quantity} x {product_id} ({size}) as a new line");

        self.items.push(CartLineItem {
            product_id,
            size,
            snapshot,
            unit_price,
            quantity,
        });

        Ok(quantity)
    }

    /// Set the quantity of a line, removing it when `quantity <= 0`.
    ///
    /// Does nothing if no line matches.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if `quantity` does not fit in a line item.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: Size,
        quantity: i64,
    ) -> Result<QuantityChange, CartError> {
        let Some(index) = self.position(product_id, size) else {
            return Ok(QuantityChange::Missing);
        };

        if quantity <= 0 {
            self.items.remove(index);

            debug!("removed {product_id} ({size}) after quantity update to {quantity}");

            return Ok(QuantityChange::Removed);
        }

        let quantity = u32::try_from(quantity).map_err(|_err| CartError::QuantityOverflow {
            product_id: product_id.clone(),
            size,
            requested: quantity,
        })?;

        if let Some(item) = self.items.get_mut(index) {
            item.quantity = quantity;
        }

        debug!("set {product_id} ({size}) quantity to {quantity}");

        Ok(QuantityChange::Updated)
    }

    /// Remove a line, returning it if it was present.
    pub fn remove_item(&mut self, product_id: &ProductId, size: Size) -> Option<CartLineItem> {
        let index = self.position(product_id, size)?;

        debug!("removed {product_id} ({size})");

        Some(self.items.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        debug!("cleared cart with {} lines", self.items.len());

        self.items.clear();
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line for a product and size, if present.
    pub fn get(&self, product_id: &ProductId, size: Size) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.matches(product_id, size))
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Sum of `unit price x quantity` across all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Pricing`] if a subtotal overflows.
    pub fn total(&self) -> Result<Price, CartError> {
        let subtotals = self
            .items
            .iter()
            .map(CartLineItem::subtotal)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sum(subtotals, self.currency)?)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, product_id: &ProductId, size: Size) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.matches(product_id, size))
    }
}
