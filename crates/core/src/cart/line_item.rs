//! Cart Line Items

use crate::{
    catalog::{Product, ProductId, Size},
    pricing::{Price, PricingError, line_total},
};

/// Display data copied from a product when it is added to the cart.
///
/// Later catalog changes do not reach items already in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemSnapshot {
    /// Product name at add-time
    pub name: String,

    /// Image reference at add-time
    pub image: String,
}

impl From<&Product> for LineItemSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            image: product.image.clone(),
        }
    }
}

/// Identity of a line item: one product in one size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineItemKey {
    /// Product identifier
    pub product_id: ProductId,

    /// Chosen size
    pub size: Size,
}

/// One (product, size) pairing with a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    pub(super) product_id: ProductId,
    pub(super) size: Size,
    pub(super) snapshot: LineItemSnapshot,
    pub(super) unit_price: Price,
    pub(super) quantity: u32,
}

impl CartLineItem {
    /// Product identifier
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Chosen size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Product name captured at add-time
    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    /// Image reference captured at add-time
    pub fn image(&self) -> &str {
        &self.snapshot.image
    }

    /// Unit price captured at add-time
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Quantity, always at least 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Identity key of this line
    pub fn key(&self) -> LineItemKey {
        LineItemKey {
            product_id: self.product_id.clone(),
            size: self.size,
        }
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn subtotal(&self) -> Result<Price, PricingError> {
        line_total(&self.unit_price, self.quantity)
    }

    pub(super) fn matches(&self, product_id: &ProductId, size: Size) -> bool {
        self.size == size && &self.product_id == product_id
    }
}
