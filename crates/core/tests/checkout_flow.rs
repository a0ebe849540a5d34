//! Integration tests for checkout: pricing, the order message and hand-off.

use std::cell::RefCell;

use rusty_money::{Money, iso::SAR};
use testresult::TestResult;

use kunafa::{
    cart::{CartStore, LineItemSnapshot},
    catalog::{Catalog, ProductId, Size},
    checkout::{
        Checkout, CheckoutError, CustomerDetails, DeliveryLocation, FulfillmentMethod,
        HandoffError, OrderDraft, OrderHandoff, OrderQuote,
    },
    config::StoreConfig,
    location::Coordinates,
    selection::ProductSelection,
};

#[derive(Debug, Default)]
struct RecordingHandoff {
    links: RefCell<Vec<String>>,
    blocked: bool,
}

impl OrderHandoff for RecordingHandoff {
    fn dispatch(&self, link: &str) -> Result<(), HandoffError> {
        if self.blocked {
            return Err(HandoffError::Blocked);
        }

        self.links.borrow_mut().push(link.to_string());

        Ok(())
    }
}

fn sample_cart(catalog: &Catalog) -> TestResult<CartStore> {
    let mut cart = CartStore::new(catalog.currency());
    let mut selection = ProductSelection::new();

    let nablusi = catalog
        .get(&ProductId::from("kunafa-nablusi-1"))
        .ok_or("missing nablusi")?;
    selection.select_size(Size::Kilo);
    selection.add_to_cart(nablusi, &mut cart)?;

    let chocolate = catalog
        .get(&ProductId::from("kunafa-chocolate-1"))
        .ok_or("missing chocolate")?;
    selection.select_size(Size::Small);
    selection.increment();
    selection.add_to_cart(chocolate, &mut cart)?;

    Ok(cart)
}

fn delivery_draft() -> OrderDraft {
    OrderDraft {
        customer: CustomerDetails {
            name: "سارة".to_string(),
            phone: "0501234567".to_string(),
            email: Some("sara@example.com".to_string()),
        },
        fulfillment: FulfillmentMethod::Delivery,
        location: Some(DeliveryLocation {
            address: "حي العليا، الرياض".to_string(),
            coordinates: Some(Coordinates::new(24.6905, 46.6853)),
        }),
        notes: Some("بدون مكسرات".to_string()),
    }
}

fn cart_of(minor: i64) -> TestResult<CartStore> {
    let mut cart = CartStore::new(SAR);

    cart.add_item(
        ProductId::new("tray"),
        Size::Kilo,
        Money::from_minor(minor, SAR),
        1,
        LineItemSnapshot {
            name: "صينية".to_string(),
            image: String::new(),
        },
    )?;

    Ok(cart)
}

#[test]
fn subtotal_150_quotes_for_pickup_and_delivery() -> TestResult {
    let config = StoreConfig::builtin()?;
    let cart = cart_of(15_000)?;

    let pickup = OrderQuote::new(&cart, FulfillmentMethod::Pickup, &config)?;
    let delivery = OrderQuote::new(&cart, FulfillmentMethod::Delivery, &config)?;

    assert_eq!(pickup.delivery_fee.to_minor_units(), 0);
    assert_eq!(pickup.grand_total.to_minor_units(), 15_000);
    assert_eq!(delivery.delivery_fee.to_minor_units(), 1_000);
    assert_eq!(delivery.grand_total.to_minor_units(), 16_000);

    Ok(())
}

#[test]
fn empty_cart_is_rejected_without_handoff() -> TestResult {
    let config = StoreConfig::builtin()?;
    let handoff = RecordingHandoff::default();
    let checkout = Checkout::new(&config, &handoff);
    let mut cart = CartStore::new(SAR);

    let result = checkout.submit(&mut cart, &delivery_draft());

    assert_eq!(result, Err(CheckoutError::EmptyCart));
    assert!(handoff.links.borrow().is_empty());

    Ok(())
}

#[test]
fn delivery_summary_matches_message_layout() -> TestResult {
    let config = StoreConfig::builtin()?;
    let catalog = Catalog::builtin()?;
    let cart = sample_cart(&catalog)?;
    let checkout = Checkout::new(&config, RecordingHandoff::default());

    let order = checkout.prepare(&cart, &delivery_draft())?;

    let expected = "\
*طلب جديد من الطعم الراقي*

*بيانات العميل:*
الاسم: سارة
الهاتف: 0501234567
البريد: sara@example.com

*طريقة التسليم:* توصيل
العنوان: حي العليا، الرياض
الموقع على الخريطة: https://maps.google.com/?q=24.6905,46.6853

*المنتجات:*
كنافة نابلسية تقليدية (كيلو) x1 = 95 ر.س
كنافة بالشوكولاتة البلجيكية (صحن) x2 = 60 ر.س

*رسوم التوصيل:* 10 ر.س
*الإجمالي:* 165.00 ر.س

*ملاحظات:* بدون مكسرات";

    assert_eq!(order.summary.as_str(), expected);

    Ok(())
}

#[test]
fn pickup_summary_keeps_blank_location_lines_and_trims_end() -> TestResult {
    let config = StoreConfig::builtin()?;
    let cart = cart_of(2_750)?;
    let checkout = Checkout::new(&config, RecordingHandoff::default());
    let draft = OrderDraft {
        customer: CustomerDetails {
            name: "خالد".to_string(),
            phone: "0550000000".to_string(),
            email: None,
        },
        fulfillment: FulfillmentMethod::Pickup,
        location: None,
        notes: None,
    };

    let order = checkout.prepare(&cart, &draft)?;

    let expected = "\
*طلب جديد من الطعم الراقي*

*بيانات العميل:*
الاسم: خالد
الهاتف: 0550000000
البريد: 

*طريقة التسليم:* استلام من المتجر



*المنتجات:*
صينية (كيلو) x1 = 27.5 ر.س

*رسوم التوصيل:* 0 ر.س
*الإجمالي:* 27.50 ر.س";

    assert_eq!(order.summary.as_str(), expected);

    Ok(())
}

#[test]
fn delivery_without_coordinates_omits_map_link() -> TestResult {
    let config = StoreConfig::builtin()?;
    let cart = cart_of(9_500)?;
    let checkout = Checkout::new(&config, RecordingHandoff::default());
    let mut draft = delivery_draft();
    draft.location = Some(DeliveryLocation {
        address: "شارع التحلية".to_string(),
        coordinates: None,
    });

    let order = checkout.prepare(&cart, &draft)?;

    assert!(order.summary.as_str().contains("العنوان: شارع التحلية\n\n\n*المنتجات:*"));
    assert!(!order.summary.as_str().contains("maps.google.com"));

    Ok(())
}

#[test]
fn blank_email_renders_as_empty_line() -> TestResult {
    let config = StoreConfig::builtin()?;
    let cart = cart_of(9_500)?;
    let checkout = Checkout::new(&config, RecordingHandoff::default());
    let mut draft = delivery_draft();
    draft.customer.email = Some("   ".to_string());

    let order = checkout.prepare(&cart, &draft)?;

    assert!(order.summary.as_str().contains("\nالبريد: \n\n*طريقة التسليم:*"));

    draft.customer.email = Some(" sara@example.com ".to_string());

    let order = checkout.prepare(&cart, &draft)?;

    assert!(order.summary.as_str().contains("\nالبريد: sara@example.com\n"));

    Ok(())
}

#[test]
fn submit_dispatches_encoded_link_and_clears_cart() -> TestResult {
    let config = StoreConfig::builtin()?;
    let catalog = Catalog::builtin()?;
    let mut cart = sample_cart(&catalog)?;
    let handoff = RecordingHandoff::default();
    let checkout = Checkout::new(&config, &handoff);

    let order = checkout.submit(&mut cart, &delivery_draft())?;

    assert!(cart.is_empty());
    assert_eq!(handoff.links.borrow().as_slice(), [order.link.clone()]);
    assert!(
        order
            .link
            .starts_with("https://wa.me/966530105022?text=*%D8%B7%D9%84%D8%A8%20")
    );
    assert!(!order.link.contains(' '));
    assert!(!order.link.contains('\n'));

    Ok(())
}

#[test]
fn blocked_handoff_keeps_cart_for_retry() -> TestResult {
    let config = StoreConfig::builtin()?;
    let catalog = Catalog::builtin()?;
    let mut cart = sample_cart(&catalog)?;
    let blocked = RecordingHandoff {
        blocked: true,
        ..RecordingHandoff::default()
    };

    let result = Checkout::new(&config, &blocked).submit(&mut cart, &delivery_draft());

    assert_eq!(result, Err(CheckoutError::Handoff(HandoffError::Blocked)));
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 3);

    let retry = RecordingHandoff::default();
    Checkout::new(&config, &retry).submit(&mut cart, &delivery_draft())?;

    assert!(cart.is_empty());
    assert_eq!(retry.links.borrow().len(), 1);

    Ok(())
}
