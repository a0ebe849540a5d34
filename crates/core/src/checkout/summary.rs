//! Order summary text sent through the hand-off.

use std::fmt;

use crate::{
    cart::CartStore,
    config::StoreConfig,
    pricing::{PricingError, format_fixed, format_plain},
};

use super::{FulfillmentMethod, OrderDraft, OrderQuote};

/// Human readable order message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary(String);

impl OrderSummary {
    /// Render the order message for `cart` and `draft`.
    ///
    /// Delivery orders get an address line, and a map link line when
    /// coordinates are known; pickup orders get empty lines in their place.
    /// Line subtotals and the delivery fee drop trailing zero decimals, the
    /// grand total always has two. The finished message is trimmed.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line subtotal overflows.
    pub fn render(
        config: &StoreConfig,
        cart: &CartStore,
        draft: &OrderDraft,
        quote: &OrderQuote,
    ) -> Result<Self, PricingError> {
        let label = &config.currency_label;
        let customer = &draft.customer;
        let delivery = draft.delivery_location();

        let mut lines = vec![
            format!("*طلب جديد من {}*", config.name),
            String::new(),
            "*بيانات العميل:*".to_string(),
            format!("الاسم: {}", customer.name),
            format!("الهاتف: {}", customer.phone),
            format!("البريد: {}", draft.email().unwrap_or_default()),
            String::new(),
            format!("*طريقة التسليم:* {}", draft.fulfillment.label()),
        ];

        lines.push(match (draft.fulfillment, delivery) {
            (FulfillmentMethod::Delivery, Some(location)) => {
                format!("العنوان: {}", location.address)
            }
            (FulfillmentMethod::Delivery, None) => "العنوان: ".to_string(),
            (FulfillmentMethod::Pickup, _) => String::new(),
        });

        lines.push(
            delivery
                .and_then(|location| location.coordinates)
                .map(|coordinates| {
                    format!(
                        "الموقع على الخريطة: {}",
                        coordinates.map_link(&config.maps_base_url)
                    )
                })
                .unwrap_or_default(),
        );

        lines.push(String::new());
        lines.push("*المنتجات:*".to_string());

        for item in cart.items() {
            lines.push(format!(
                "{} ({}) x{} = {} {label}",
                item.name(),
                item.size().label(),
                item.quantity(),
                format_plain(&item.subtotal()?),
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "*رسوم التوصيل:* {} {label}",
            format_plain(&quote.delivery_fee)
        ));
        lines.push(format!(
            "*الإجمالي:* {} {label}",
            format_fixed(&quote.grand_total)
        ));
        lines.push(String::new());
        lines.push(
            draft
                .notes()
                .map(|notes| format!("*ملاحظات:* {notes}"))
                .unwrap_or_default(),
        );

        Ok(Self(lines.join("\n").trim().to_string()))
    }

    /// Message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
