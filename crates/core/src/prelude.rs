//! Kunafa prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartLineItem, CartStore, LineItemKey, LineItemSnapshot, QuantityChange},
    catalog::{Catalog, CatalogError, Category, PriceTable, Product, ProductId, ProductKey, Size},
    checkout::{
        Checkout, CheckoutError, CustomerDetails, DeliveryLocation, FulfillmentMethod,
        HandoffError, OrderDraft, OrderHandoff, OrderQuote, OrderSummary, PreparedOrder,
    },
    config::{ConfigError, GeocodingSettings, StoreConfig},
    location::{
        Coordinates, Geocoder, LocationError, LocationPicker, NominatimBuildError,
        NominatimGeocoder, ResolvedLocation, SearchGenerations, SearchOutcome, SearchTicket,
    },
    pricing::{Price, PriceParseError, PricingError},
    selection::ProductSelection,
};
