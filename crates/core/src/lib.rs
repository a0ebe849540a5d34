//! Kunafa
//!
//! Storefront core for a kunafa dessert shop: the menu catalog, the session
//! cart, product selection, checkout with a WhatsApp order hand-off and the
//! delivery location picker.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod location;
pub mod prelude;
pub mod pricing;
pub mod selection;
