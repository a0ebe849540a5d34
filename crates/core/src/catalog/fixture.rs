//! Catalog Fixtures

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    catalog::{CatalogError, Category, PriceTable, Product, ProductId, Size},
    pricing::{Price, parse_amount},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code every price is given in (e.g., "SAR")
    pub currency: String,

    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Stable identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product category
    pub category: Category,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Shown in the featured selection
    #[serde(default)]
    pub featured: bool,

    /// Size -> amount (e.g., `kilo: "95"`)
    pub prices: FxHashMap<Size, String>,
}

impl ProductFixture {
    /// Build a product, requiring a parseable price for every size.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingPrice`] or [`CatalogError::InvalidPrice`].
    pub fn into_product(self, currency: &'static Currency) -> Result<Product, CatalogError> {
        let id = ProductId::new(self.id);

        let price_for = |size: Size| -> Result<Price, CatalogError> {
            let amount = self
                .prices
                .get(&size)
                .ok_or_else(|| CatalogError::MissingPrice {
                    product: id.clone(),
                    size,
                })?;

            parse_amount(amount, currency).map_err(|source| CatalogError::InvalidPrice {
                product: id.clone(),
                size,
                source,
            })
        };

        let prices = PriceTable::new(
            price_for(Size::Small)?,
            price_for(Size::HalfKilo)?,
            price_for(Size::Kilo)?,
        );

        Ok(Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            image: self.image,
            prices,
            featured: self.featured,
        })
    }
}
