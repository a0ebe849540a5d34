//! Checkout
//!
//! Turns a cart and the customer's order details into a priced order summary
//! and hands it off to the store over WhatsApp. The cart is cleared only once
//! the hand-off succeeded.

use rusty_money::Money;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{CartError, CartStore},
    config::StoreConfig,
    location::{Coordinates, ResolvedLocation},
    pricing::{Price, PricingError},
};

mod handoff;
mod summary;

pub use handoff::{HandoffError, OrderHandoff, encode_uri_component, whatsapp_link};
pub use summary::OrderSummary;

/// Errors that stop an order from being submitted.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// The cart has no line items.
    #[error("the cart is empty")]
    EmptyCart,

    /// Customer name is blank.
    #[error("customer name is required")]
    MissingName,

    /// Customer phone is blank.
    #[error("customer phone is required")]
    MissingPhone,

    /// Delivery was chosen without an address.
    #[error("a delivery address is required")]
    MissingAddress,

    /// Wrapped cart error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The hand-off could not be dispatched.
    #[error(transparent)]
    Handoff(#[from] HandoffError),
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentMethod {
    /// Collected from the store; no fee.
    Pickup,

    /// Delivered to an address for the configured flat fee.
    #[default]
    Delivery,
}

impl FulfillmentMethod {
    /// Both methods, in display order.
    pub const ALL: [FulfillmentMethod; 2] = [FulfillmentMethod::Pickup, FulfillmentMethod::Delivery];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            FulfillmentMethod::Pickup => "استلام من المتجر",
            FulfillmentMethod::Delivery => "توصيل",
        }
    }

    /// Fee charged for this method: zero for pickup, the configured flat fee for delivery.
    pub fn delivery_fee(self, config: &StoreConfig) -> Price {
        match self {
            FulfillmentMethod::Pickup => Money::from_minor(0, config.delivery_fee.currency()),
            FulfillmentMethod::Delivery => config.delivery_fee,
        }
    }
}

/// Contact details of the person ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerDetails {
    /// Name (required)
    pub name: String,

    /// Phone number (required)
    pub phone: String,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

/// Where a delivery order goes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeliveryLocation {
    /// Street address
    pub address: String,

    /// Pinned coordinates, when the address came from the location picker
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl From<ResolvedLocation> for DeliveryLocation {
    fn from(location: ResolvedLocation) -> Self {
        Self {
            address: location.address,
            coordinates: Some(location.coordinates),
        }
    }
}

/// Details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderDraft {
    /// Customer contact details
    pub customer: CustomerDetails,

    /// Pickup or delivery
    #[serde(default)]
    pub fulfillment: FulfillmentMethod,

    /// Delivery address; ignored for pickup
    #[serde(default)]
    pub location: Option<DeliveryLocation>,

    /// Free-text notes for the store
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns the first missing field: name, phone, then the address for
    /// delivery orders. Blank strings count as missing.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.customer.name.trim().is_empty() {
            return Err(CheckoutError::MissingName);
        }

        if self.customer.phone.trim().is_empty() {
            return Err(CheckoutError::MissingPhone);
        }

        if self.fulfillment == FulfillmentMethod::Delivery
            && self
                .location
                .as_ref()
                .is_none_or(|location| location.address.trim().is_empty())
        {
            return Err(CheckoutError::MissingAddress);
        }

        Ok(())
    }

    /// Delivery location, only when the order is delivered.
    pub fn delivery_location(&self) -> Option<&DeliveryLocation> {
        match self.fulfillment {
            FulfillmentMethod::Delivery => self.location.as_ref(),
            FulfillmentMethod::Pickup => None,
        }
    }

    /// Email without surrounding whitespace, unless blank.
    pub fn email(&self) -> Option<&str> {
        self.customer
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Notes, unless blank.
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .filter(|notes| !notes.trim().is_empty())
    }
}

/// Amounts shown on the checkout page and in the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuote {
    /// Cart total
    pub subtotal: Price,

    /// Fee for the chosen fulfillment method
    pub delivery_fee: Price,

    /// Subtotal plus fee
    pub grand_total: Price,
}

impl OrderQuote {
    /// Price the cart for a fulfillment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart total fails or the fee is in another currency.
    pub fn new(
        cart: &CartStore,
        fulfillment: FulfillmentMethod,
        config: &StoreConfig,
    ) -> Result<Self, CheckoutError> {
        let subtotal = cart.total()?;
        let delivery_fee = fulfillment.delivery_fee(config);
        let grand_total = subtotal.add(delivery_fee).map_err(PricingError::from)?;

        Ok(Self {
            subtotal,
            delivery_fee,
            grand_total,
        })
    }
}

/// A priced order ready to hand off.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedOrder {
    /// Amounts
    pub quote: OrderQuote,

    /// Message text
    pub summary: OrderSummary,

    /// Hand-off link carrying the message
    pub link: String,
}

/// Checkout flow
#[derive(Debug)]
pub struct Checkout<'c, H> {
    config: &'c StoreConfig,
    handoff: H,
}

impl<'c, H: OrderHandoff> Checkout<'c, H> {
    /// Create a checkout for a store, dispatching orders through `handoff`.
    pub fn new(config: &'c StoreConfig, handoff: H) -> Self {
        Self { config, handoff }
    }

    /// Validate the draft, price the cart and render the summary and link.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] before looking at the draft if the
    /// cart has no items, otherwise the first validation or pricing error.
    pub fn prepare(
        &self,
        cart: &CartStore,
        draft: &OrderDraft,
    ) -> Result<PreparedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        draft.validate()?;

        let quote = OrderQuote::new(cart, draft.fulfillment, self.config)?;
        let summary = OrderSummary::render(self.config, cart, draft, &quote)?;
        let link = whatsapp_link(
            &self.config.handoff_base_url,
            &self.config.whatsapp_number,
            summary.as_str(),
        );

        Ok(PreparedOrder {
            quote,
            summary,
            link,
        })
    }

    /// Prepare the order, dispatch it and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns any [`Checkout::prepare`] error, or [`CheckoutError::Handoff`]
    /// if dispatching failed. The cart is unchanged on every error.
    pub fn submit(
        &self,
        cart: &mut CartStore,
        draft: &OrderDraft,
    ) -> Result<PreparedOrder, CheckoutError> {
        let order = self.prepare(cart, draft)?;

        if let Err(error) = self.handoff.dispatch(&order.link) {
            warn!("order hand-off failed, keeping cart for retry: {error}");

            return Err(error.into());
        }

        info!(
            "order submitted: {} line items, {} {}, {}",
            cart.len(),
            order.quote.grand_total.amount(),
            order.quote.grand_total.currency().iso_alpha_code,
            draft.fulfillment.label(),
        );

        cart.clear();

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        cart::LineItemSnapshot,
        catalog::{ProductId, Size},
    };

    use super::*;

    #[derive(Debug, Default)]
    struct CountingHandoff {
        calls: Cell<usize>,
        fail: bool,
    }

    impl OrderHandoff for CountingHandoff {
        fn dispatch(&self, _link: &str) -> Result<(), HandoffError> {
            self.calls.set(self.calls.get() + 1);

            if self.fail {
                Err(HandoffError::Blocked)
            } else {
                Ok(())
            }
        }
    }

    fn cart_with(minor: i64, quantity: u32) -> Result<CartStore, CartError> {
        let mut cart = CartStore::new(iso::SAR);

        cart.add_item(
            ProductId::new("kunafa-nablusi-1"),
            Size::Kilo,
            Money::from_minor(minor, iso::SAR),
            quantity,
            LineItemSnapshot {
                name: "كنافة نابلسية".to_string(),
                image: String::new(),
            },
        )?;

        Ok(cart)
    }

    fn draft(fulfillment: FulfillmentMethod) -> OrderDraft {
        OrderDraft {
            customer: CustomerDetails {
                name: "سارة".to_string(),
                phone: "0551234567".to_string(),
                email: None,
            },
            fulfillment,
            location: Some(DeliveryLocation {
                address: "حي العليا".to_string(),
                coordinates: None,
            }),
            notes: None,
        }
    }

    #[test]
    fn pickup_has_no_fee() -> TestResult {
        let config = StoreConfig::builtin()?;
        let quote = OrderQuote::new(&cart_with(5_000, 3)?, FulfillmentMethod::Pickup, &config)?;

        assert_eq!(quote.subtotal.to_minor_units(), 15_000);
        assert_eq!(quote.delivery_fee.to_minor_units(), 0);
        assert_eq!(quote.grand_total.to_minor_units(), 15_000);

        Ok(())
    }

    #[test]
    fn delivery_adds_flat_fee() -> TestResult {
        let config = StoreConfig::builtin()?;
        let quote = OrderQuote::new(&cart_with(5_000, 3)?, FulfillmentMethod::Delivery, &config)?;

        assert_eq!(quote.delivery_fee.to_minor_units(), 1_000);
        assert_eq!(quote.grand_total.to_minor_units(), 16_000);

        Ok(())
    }

    #[test]
    fn blank_fields_fail_validation_in_order() {
        let mut order = draft(FulfillmentMethod::Delivery);
        order.customer.name = "  ".to_string();
        order.customer.phone = String::new();

        assert_eq!(order.validate(), Err(CheckoutError::MissingName));

        order.customer.name = "سارة".to_string();

        assert_eq!(order.validate(), Err(CheckoutError::MissingPhone));
    }

    #[test]
    fn delivery_requires_address_but_pickup_does_not() {
        let mut order = draft(FulfillmentMethod::Delivery);
        order.location = Some(DeliveryLocation::default());

        assert_eq!(order.validate(), Err(CheckoutError::MissingAddress));

        order.location = None;

        assert_eq!(order.validate(), Err(CheckoutError::MissingAddress));

        order.fulfillment = FulfillmentMethod::Pickup;

        assert_eq!(order.validate(), Ok(()));
    }

    #[test]
    fn blank_notes_are_dropped() {
        let mut order = draft(FulfillmentMethod::Pickup);
        order.notes = Some(" \n".to_string());

        assert_eq!(order.notes(), None);

        order.notes = Some("بدون مكسرات".to_string());

        assert_eq!(order.notes(), Some("بدون مكسرات"));
    }

    #[test]
    fn blank_email_is_dropped() {
        let mut order = draft(FulfillmentMethod::Pickup);
        order.customer.email = Some("   ".to_string());

        assert_eq!(order.email(), None);

        order.customer.email = Some(" sara@example.com ".to_string());

        assert_eq!(order.email(), Some("sara@example.com"));
    }

    #[test]
    fn invalid_draft_is_not_dispatched() -> TestResult {
        let config = StoreConfig::builtin()?;
        let handoff = CountingHandoff::default();
        let checkout = Checkout::new(&config, &handoff);
        let mut cart = cart_with(9_500, 1)?;
        let mut order = draft(FulfillmentMethod::Delivery);
        order.customer.phone = " ".to_string();

        let result = checkout.submit(&mut cart, &order);

        assert_eq!(result, Err(CheckoutError::MissingPhone));
        assert_eq!(handoff.calls.get(), 0);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn successful_submit_clears_cart() -> TestResult {
        let config = StoreConfig::builtin()?;
        let handoff = CountingHandoff::default();
        let checkout = Checkout::new(&config, &handoff);
        let mut cart = cart_with(9_500, 1)?;

        let order = checkout.submit(&mut cart, &draft(FulfillmentMethod::Pickup))?;

        assert_eq!(handoff.calls.get(), 1);
        assert!(cart.is_empty());
        assert!(order.link.starts_with("https://wa.me/966530105022?text="));

        Ok(())
    }

    #[test]
    fn failed_handoff_keeps_cart() -> TestResult {
        let config = StoreConfig::builtin()?;
        let handoff = CountingHandoff {
            fail: true,
            ..CountingHandoff::default()
        };
        let checkout = Checkout::new(&config, &handoff);
        let mut cart = cart_with(9_500, 2)?;

        let result = checkout.submit(&mut cart, &draft(FulfillmentMethod::Delivery));

        assert_eq!(result, Err(CheckoutError::Handoff(HandoffError::Blocked)));
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }
}
