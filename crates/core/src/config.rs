//! Store configuration
//!
//! Values the storefront needs that are not part of the catalog: the store
//! name, the WhatsApp number orders and contact links go to, the delivery fee
//! and the geocoding settings used by the location picker.

use serde::Deserialize;
use thiserror::Error;

use crate::{
    location::Coordinates,
    pricing::{Price, PriceParseError, parse_price},
};

const BUILTIN_STORE_YAML: &str = include_str!("../../../fixtures/store/default.yml");

/// Store configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing error
    #[error("failed to parse store config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// IO error reading a config file
    #[error("failed to read store config: {0}")]
    Io(#[from] std::io::Error),

    /// Delivery fee could not be parsed
    #[error("invalid delivery fee: {0}")]
    DeliveryFee(#[from] PriceParseError),

    /// Delivery fee is zero or negative
    #[error("delivery fee must be positive")]
    NonPositiveDeliveryFee,

    /// Phone number contains something other than digits, spaces, dashes or a leading `+`
    #[error("invalid WhatsApp number: {0}")]
    InvalidWhatsAppNumber(String),

    /// Minimum address query length must be at least 1
    #[error("geocoding min_query_chars must be at least 1")]
    InvalidMinQueryChars,
}

/// Geocoding settings for the location picker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingSettings {
    /// Nominatim base URL, without a trailing slash
    pub base_url: String,

    /// Comma separated ISO country codes searches are limited to
    pub country_codes: String,

    /// Preferred response language
    pub language: String,

    /// Queries shorter than this are not sent
    pub min_query_chars: usize,

    /// Initial map centre
    pub default_center: Coordinates,
}

#[derive(Debug, Deserialize)]
struct StoreConfigFixture {
    name: String,
    whatsapp_number: String,
    handoff_base_url: String,
    maps_base_url: String,
    currency_label: String,
    delivery_fee: String,
    geocoding: GeocodingSettings,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Store name shown in the order summary heading
    pub name: String,

    /// WhatsApp number (digits only, with country code) for orders and contact links
    pub whatsapp_number: String,

    /// Messaging hand-off base URL; the number is appended to it
    pub handoff_base_url: String,

    /// Map link base URL; `lat,lng` is appended to it
    pub maps_base_url: String,

    /// Label printed after amounts
    pub currency_label: String,

    /// Flat fee charged for delivery
    pub delivery_fee: Price,

    /// Location picker settings
    pub geocoding: GeocodingSettings,
}

impl StoreConfig {
    /// The configuration compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the embedded configuration is invalid.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_STORE_YAML)
    }

    /// Parse and validate configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed, the delivery fee is
    /// invalid or not positive, or the WhatsApp number is not a phone number.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let fixture: StoreConfigFixture = serde_norway::from_str(yaml)?;

        let delivery_fee = parse_price(&fixture.delivery_fee)?;

        if delivery_fee.to_minor_units() <= 0 {
            return Err(ConfigError::NonPositiveDeliveryFee);
        }

        if fixture.geocoding.min_query_chars == 0 {
            return Err(ConfigError::InvalidMinQueryChars);
        }

        Ok(Self {
            name: fixture.name,
            whatsapp_number: normalize_phone_number(&fixture.whatsapp_number)?,
            handoff_base_url: fixture.handoff_base_url,
            maps_base_url: fixture.maps_base_url,
            currency_label: fixture.currency_label,
            delivery_fee,
            geocoding: fixture.geocoding,
        })
    }

    /// Read and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Replace the WhatsApp number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWhatsAppNumber`] if `number` is not a phone number.
    pub fn with_whatsapp_number(mut self, number: &str) -> Result<Self, ConfigError> {
        self.whatsapp_number = normalize_phone_number(number)?;

        Ok(self)
    }

    /// `tel:` link for the store number.
    pub fn phone_link(&self) -> String {
        format!("tel:+{}", self.whatsapp_number)
    }

    /// Chat link for the store number, without a prefilled message.
    pub fn whatsapp_contact_link(&self) -> String {
        format!("{}{}", self.handoff_base_url, self.whatsapp_number)
    }
}

/// Reduce a phone number such as `+966 53 010 5022` to its digits.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidWhatsAppNumber`] for anything other than digits
/// with optional spaces, dashes and a leading `+`.
pub fn normalize_phone_number(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let digits: String = without_plus
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidWhatsAppNumber(raw.to_string()));
    }

    Ok(digits)
}
