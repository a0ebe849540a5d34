//! Integration tests for the cart store driven through catalog products.

use testresult::TestResult;

use kunafa::{
    cart::{CartError, CartStore, LineItemSnapshot, QuantityChange},
    catalog::{Catalog, ProductId, Size},
    selection::ProductSelection,
};

#[test]
fn add_merge_update_remove_scenario() -> TestResult {
    let catalog = Catalog::builtin()?;
    let product = catalog
        .get(&ProductId::from("kunafa-nablusi-1"))
        .ok_or("missing product")?;
    let mut cart = CartStore::new(catalog.currency());

    cart.add_item(
        product.id.clone(),
        Size::Kilo,
        product.price(Size::Kilo),
        1,
        LineItemSnapshot::from(product),
    )?;

    assert_eq!(cart.total()?.to_minor_units(), 9_500);

    cart.add_item(
        product.id.clone(),
        Size::Kilo,
        product.price(Size::Kilo),
        2,
        LineItemSnapshot::from(product),
    )?;

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total()?.to_minor_units(), 28_500);

    assert_eq!(
        cart.update_quantity(&product.id, Size::Kilo, 1)?,
        QuantityChange::Updated
    );
    assert_eq!(cart.total()?.to_minor_units(), 9_500);

    assert!(cart.remove_item(&product.id, Size::Kilo).is_some());
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
    assert_eq!(cart.total()?.to_minor_units(), 0);

    Ok(())
}

#[test]
fn sizes_of_one_product_are_separate_lines() -> TestResult {
    let catalog = Catalog::builtin()?;
    let product = catalog
        .get(&ProductId::from("kunafa-cream-1"))
        .ok_or("missing product")?;
    let mut cart = CartStore::new(catalog.currency());
    let mut selection = ProductSelection::new();

    selection.increment();
    selection.add_to_cart(product, &mut cart)?;

    selection.select_size(Size::HalfKilo);
    selection.increment();
    selection.increment();
    selection.add_to_cart(product, &mut cart)?;

    // 2 x 28 + 3 x 55
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 5);
    assert_eq!(cart.total()?.to_minor_units(), 22_100);
    assert_eq!(selection.size(), Size::HalfKilo);
    assert_eq!(selection.quantity(), 1);

    Ok(())
}

#[test]
fn non_positive_updates_remove_and_absent_keys_are_ignored() -> TestResult {
    let catalog = Catalog::builtin()?;
    let mut cart = CartStore::new(catalog.currency());
    let mut selection = ProductSelection::new();

    for (_, product) in catalog.featured() {
        selection.add_to_cart(product, &mut cart)?;
    }

    let featured = cart.len();
    let first = cart.items().first().ok_or("empty cart")?.key();
    let second = cart.items().get(1).ok_or("one line")?.key();

    assert_eq!(
        cart.update_quantity(&first.product_id, first.size, 0)?,
        QuantityChange::Removed
    );
    assert_eq!(
        cart.update_quantity(&second.product_id, second.size, -1)?,
        QuantityChange::Removed
    );
    assert_eq!(
        cart.update_quantity(&ProductId::from("kunafa-unknown"), Size::Kilo, 4)?,
        QuantityChange::Missing
    );
    assert_eq!(cart.len(), featured - 2);

    Ok(())
}

#[test]
fn zero_quantity_add_leaves_cart_untouched() -> TestResult {
    let catalog = Catalog::builtin()?;
    let product = catalog
        .get(&ProductId::from("kunafa-chocolate-2"))
        .ok_or("missing product")?;
    let mut cart = CartStore::new(catalog.currency());

    let result = cart.add_item(
        product.id.clone(),
        Size::Small,
        product.price(Size::Small),
        0,
        LineItemSnapshot::from(product),
    );

    assert_eq!(result, Err(CartError::ZeroQuantity));
    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn clear_empties_everything() -> TestResult {
    let catalog = Catalog::builtin()?;
    let mut cart = CartStore::new(catalog.currency());
    let mut selection = ProductSelection::new();

    for (_, product) in catalog.iter() {
        selection.add_to_cart(product, &mut cart)?;
    }

    assert_eq!(cart.len(), catalog.len());

    cart.clear();

    assert!(cart.items().is_empty());
    assert_eq!(cart.item_count(), 0);
    assert_eq!(cart.total()?.to_minor_units(), 0);

    Ok(())
}
