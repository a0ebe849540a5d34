//! Catalog
//!
//! The static, read-only set of purchasable products. Every product carries a
//! price for every [`Size`]; this is enforced when the catalog is built, so
//! price lookups never fail afterwards.

use std::{fmt, str::FromStr};

use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::pricing::{Price, PriceParseError};

pub mod fixture;

const BUILTIN_CATALOG_YAML: &str = include_str!("../../../../fixtures/catalog/kunafa.yml");

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised while loading or building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A price entry could not be parsed.
    #[error("product {product} has an invalid {size} price: {source}")]
    InvalidPrice {
        /// Product identifier
        product: ProductId,
        /// Size whose price is invalid
        size: Size,
        /// Parse failure
        source: PriceParseError,
    },

    /// A product does not define a price for a size.
    #[error("product {product} is missing a {size} price")]
    MissingPrice {
        /// Product identifier
        product: ProductId,
        /// Size without a price
        size: Size,
    },

    /// A price is zero or negative.
    #[error("product {product} has a non-positive {size} price")]
    NonPositivePrice {
        /// Product identifier
        product: ProductId,
        /// Size with the bad price
        size: Size,
    },

    /// A product is priced in a different currency from the catalog.
    #[error("product {product} has currency {found}, but catalog has currency {expected}")]
    CurrencyMismatch {
        /// Product identifier
        product: ProductId,
        /// Currency found on the product
        found: &'static str,
        /// Catalog currency
        expected: &'static str,
    },

    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Unknown size name
    #[error("unknown size: {0}")]
    UnknownSize(String),

    /// Unknown category name
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Product size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Size {
    /// Single plate
    #[default]
    Small,

    /// Half a kilo
    HalfKilo,

    /// A full kilo
    Kilo,
}

impl Size {
    /// Every size, in display order.
    pub const ALL: [Size; 3] = [Size::Small, Size::HalfKilo, Size::Kilo];

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Size::Small => "صحن",
            Size::HalfKilo => "نصف كيلو",
            Size::Kilo => "كيلو",
        }
    }

    /// Machine name used in fixtures and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::HalfKilo => "half-kilo",
            Size::Kilo => "kilo",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Size {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.slug() == s)
            .ok_or_else(|| CatalogError::UnknownSize(s.to_string()))
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Nablusi kunafa with white cheese
    Nablusi,

    /// Kunafa filled with cream
    Cream,

    /// Chocolate kunafa
    Chocolate,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [Category::Nablusi, Category::Cream, Category::Chocolate];

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Nablusi => "كنافة نابلسية",
            Category::Cream => "كنافة بالقشطة",
            Category::Chocolate => "كنافة شوكولاتة",
        }
    }

    /// Machine name used in fixtures and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Nablusi => "nablusi",
            Category::Cream => "cream",
            Category::Chocolate => "chocolate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// Stable product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Per-size prices. One price exists for every [`Size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTable {
    small: Price,
    half_kilo: Price,
    kilo: Price,
}

impl PriceTable {
    /// Create a price table from one price per size.
    pub fn new(small: Price, half_kilo: Price, kilo: Price) -> Self {
        Self {
            small,
            half_kilo,
            kilo,
        }
    }

    /// Price for the given size.
    pub fn price(&self, size: Size) -> Price {
        match size {
            Size::Small => self.small,
            Size::HalfKilo => self.half_kilo,
            Size::Kilo => self.kilo,
        }
    }

    /// Iterate `(size, price)` pairs in size order.
    pub fn iter(&self) -> impl Iterator<Item = (Size, Price)> + '_ {
        Size::ALL.into_iter().map(|size| (size, self.price(size)))
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Stable identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Product category
    pub category: Category,

    /// Image reference
    pub image: String,

    /// Per-size prices
    pub prices: PriceTable,

    /// Shown in the featured selection
    pub featured: bool,
}

impl Product {
    /// Price for the given size.
    pub fn price(&self, size: Size) -> Price {
        self.prices.price(size)
    }
}

/// Catalog
#[derive(Debug)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    order: Vec<ProductKey>,
    keys: FxHashMap<ProductId, ProductKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            order: Vec::new(),
            keys: FxHashMap::default(),
            currency,
        }
    }

    /// The catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the embedded fixture is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG_YAML)
    }

    /// Load a catalog from YAML fixture content.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when parsing fails, the currency is unknown, a
    /// product misses a size price, a price is not positive, or ids repeat.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog_fixture: fixture::CatalogFixture = serde_norway::from_str(yaml)?;

        let currency = iso::find(&catalog_fixture.currency)
            .ok_or_else(|| CatalogError::UnknownCurrency(catalog_fixture.currency.clone()))?;

        let mut catalog = Self::new(currency);

        for product_fixture in catalog_fixture.products {
            let product = product_fixture.into_product(currency)?;

            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if the id is taken,
    /// [`CatalogError::CurrencyMismatch`] if any price is in another currency and
    /// [`CatalogError::NonPositivePrice`] for zero or negative prices.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.keys.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        for (size, price) in product.prices.iter() {
            if price.currency() != self.currency {
                return Err(CatalogError::CurrencyMismatch {
                    product: product.id.clone(),
                    found: price.currency().iso_alpha_code,
                    expected: self.currency.iso_alpha_code,
                });
            }

            if price.to_minor_units() <= 0 {
                return Err(CatalogError::NonPositivePrice {
                    product: product.id.clone(),
                    size,
                });
            }
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.order.push(key);
        self.keys.insert(id, key);

        Ok(key)
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.products.get(*key).map(|product| (*key, product)))
    }

    /// Products in one category, in catalog order.
    pub fn by_category(
        &self,
        category: Category,
    ) -> impl Iterator<Item = (ProductKey, &Product)> + '_ {
        self.iter()
            .filter(move |(_, product)| product.category == category)
    }

    /// Featured products, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = (ProductKey, &Product)> + '_ {
        self.iter().filter(|(_, product)| product.featured)
    }

    /// Categories that have at least one product, in display order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.iter().any(|(_, product)| product.category == *category))
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, SAR},
    };
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, small: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            description: String::new(),
            category: Category::Nablusi,
            image: String::new(),
            prices: PriceTable::new(
                Money::from_minor(small, SAR),
                Money::from_minor(small * 2, SAR),
                Money::from_minor(small * 4, SAR),
            ),
            featured: false,
        }
    }

    #[test]
    fn builtin_catalog_loads_every_product() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.currency(), SAR);
        assert_eq!(catalog.categories(), Category::ALL.to_vec());

        Ok(())
    }

    #[test]
    fn builtin_catalog_prices_match_fixture() -> TestResult {
        let catalog = Catalog::builtin()?;

        let nablusi = catalog
            .get(&ProductId::new("kunafa-nablusi-1"))
            .ok_or("missing kunafa-nablusi-1")?;

        assert_eq!(nablusi.price(Size::Small), Money::from_minor(2_500, SAR));
        assert_eq!(nablusi.price(Size::HalfKilo), Money::from_minor(5_000, SAR));
        assert_eq!(nablusi.price(Size::Kilo), Money::from_minor(9_500, SAR));

        Ok(())
    }

    #[test]
    fn featured_and_category_filters_keep_catalog_order() -> TestResult {
        let catalog = Catalog::builtin()?;

        let featured: Vec<&str> = catalog
            .featured()
            .map(|(_, product)| product.id.as_str())
            .collect();

        let cream: Vec<&str> = catalog
            .by_category(Category::Cream)
            .map(|(_, product)| product.id.as_str())
            .collect();

        assert_eq!(
            featured,
            [
                "kunafa-nablusi-1",
                "kunafa-nablusi-2",
                "kunafa-cream-1",
                "kunafa-chocolate-1"
            ]
        );
        assert_eq!(cream, ["kunafa-cream-1", "kunafa-cream-2"]);

        Ok(())
    }

    #[test]
    fn insert_rejects_duplicate_ids() -> TestResult {
        let mut catalog = Catalog::new(SAR);

        catalog.insert(product("a", 100))?;

        let result = catalog.insert(product("a", 200));

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id.as_str() == "a"));

        Ok(())
    }

    #[test]
    fn insert_rejects_non_positive_prices() {
        let mut catalog = Catalog::new(SAR);

        let result = catalog.insert(product("free", 0));

        assert!(matches!(
            result,
            Err(CatalogError::NonPositivePrice {
                size: Size::Small,
                ..
            })
        ));
    }

    #[test]
    fn insert_rejects_foreign_currency() {
        let mut catalog = Catalog::new(GBP);

        let result = catalog.insert(product("riyal", 100));

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch {
                found: "SAR",
                expected: "GBP",
                ..
            })
        ));
    }

    #[test]
    fn lookup_by_id_matches_inserted_key() -> TestResult {
        let mut catalog = Catalog::new(SAR);

        let key = catalog.insert(product("a", 100))?;

        assert_eq!(
            catalog.get(&ProductId::new("a")).map(|product| product.id.as_str()),
            Some("a")
        );
        assert_eq!(catalog.iter().next().map(|(first, _)| first), Some(key));
        assert!(catalog.get(&ProductId::new("missing")).is_none());

        Ok(())
    }

    #[test]
    fn size_and_category_parse_from_slugs() -> TestResult {
        assert_eq!("half-kilo".parse::<Size>()?, Size::HalfKilo);
        assert_eq!("chocolate".parse::<Category>()?, Category::Chocolate);
        assert!(matches!(
            "gallon".parse::<Size>(),
            Err(CatalogError::UnknownSize(_))
        ));

        Ok(())
    }

    #[test]
    fn default_size_is_the_first_size() {
        assert_eq!(Size::default(), Size::ALL[0]);
    }
}
