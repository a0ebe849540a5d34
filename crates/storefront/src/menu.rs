use std::sync::Arc;

use leptos::prelude::*;

use kunafa::{
    cart::CartStore,
    catalog::{Catalog, Category, Product, Size},
    config::StoreConfig,
    selection::ProductSelection,
};

use crate::{announce, format_amount};

/// Which products the menu shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum MenuFilter {
    #[default]
    All,
    Featured,
    Category(Category),
}

impl MenuFilter {
    fn label(self) -> &'static str {
        match self {
            MenuFilter::All => "الكل",
            MenuFilter::Featured => "الأكثر طلبًا",
            MenuFilter::Category(category) => category.label(),
        }
    }
}

/// Filter buttons for a catalog: all, featured, then each stocked category.
pub(crate) fn menu_filters(catalog: &Catalog) -> Vec<MenuFilter> {
    [MenuFilter::All, MenuFilter::Featured]
        .into_iter()
        .chain(catalog.categories().into_iter().map(MenuFilter::Category))
        .collect()
}

/// Products matching `filter`, in catalog order.
pub(crate) fn visible_products(catalog: &Catalog, filter: MenuFilter) -> Vec<Product> {
    match filter {
        MenuFilter::All => catalog.iter().map(|(_, product)| product.clone()).collect(),
        MenuFilter::Featured => catalog
            .featured()
            .map(|(_, product)| product.clone())
            .collect(),
        MenuFilter::Category(category) => catalog
            .by_category(category)
            .map(|(_, product)| product.clone())
            .collect(),
    }
}

#[component]
fn SizeButtons(selection: RwSignal<ProductSelection>) -> impl IntoView {
    Size::ALL
        .into_iter()
        .map(|size| {
            view! {
                <button
                    type="button"
                    class=move || {
                        if selection.with(|current| current.size() == size) {
                            "size-button size-button-active"
                        } else {
                            "size-button"
                        }
                    }
                    aria-pressed=move || selection.with(|current| current.size() == size).to_string()
                    on:click=move |_| selection.update(|current| current.select_size(size))
                >
                    {size.label()}
                </button>
            }
        })
        .collect_view()
}

#[component]
fn QuantityStepper(selection: RwSignal<ProductSelection>) -> impl IntoView {
    view! {
        <div class="quantity-stepper">
            <button
                type="button"
                aria-label="إنقاص الكمية"
                on:click=move |_| selection.update(ProductSelection::decrement)
            >
                "-"
            </button>
            <span aria-live="polite">{move || selection.with(ProductSelection::quantity)}</span>
            <button
                type="button"
                aria-label="زيادة الكمية"
                on:click=move |_| selection.update(ProductSelection::increment)
            >
                "+"
            </button>
        </div>
    }
}

#[component]
pub(crate) fn ProductCard(
    product: Product,
    currency_label: String,
    cart: RwSignal<CartStore>,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let selection = RwSignal::new(ProductSelection::new());

    let price_product = product.clone();
    let price_label = currency_label.clone();
    let total_product = product.clone();
    let total_label = currency_label;
    let add_product = product.clone();

    view! {
        <li class="product-card">
            <img src=product.image.clone() alt=product.name.clone() loading="lazy" />
            <h3 class="product-name">{product.name.clone()}</h3>
            <p class="product-description">{product.description.clone()}</p>
            <div class="size-buttons" role="group" aria-label="الحجم">
                <SizeButtons selection=selection />
            </div>
            <p class="product-price">
                {move || format_amount(&selection.get().unit_price(&price_product), &price_label)}
            </p>
            <QuantityStepper selection=selection />
            <p class="product-line-total">
                {move || {
                    selection
                        .get()
                        .line_total(&total_product)
                        .map(|total| format!("المجموع: {}", format_amount(&total, &total_label)))
                        .unwrap_or_default()
                }}
            </p>
            <button
                type="button"
                class="add-to-cart"
                on:click=move |_| {
                    let mut current = selection.get_untracked();
                    let size = current.size();
                    let result = cart.try_update(|cart| current.add_to_cart(&add_product, cart));

                    match result {
                        Some(Ok(_)) => {
                            selection.set(current);
                            announce(
                                live_message,
                                format!("تمت إضافة {} ({}) إلى السلة", add_product.name, size.label()),
                            );
                        }
                        Some(Err(error)) => {
                            announce(live_message, format!("تعذرت الإضافة إلى السلة: {error}"));
                        }
                        None => {}
                    }
                }
            >
                "أضف إلى السلة"
            </button>
        </li>
    }
}

/// Menu page with category filter and product cards.
#[component]
pub fn MenuPage(
    /// Products offered by the store.
    catalog: Arc<Catalog>,
    /// Store settings.
    config: Arc<StoreConfig>,
    /// The session cart.
    cart: RwSignal<CartStore>,
    /// Screen reader announcements.
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let filter = RwSignal::new(MenuFilter::default());
    let filters = menu_filters(&catalog);
    let currency_label = config.currency_label.clone();

    view! {
        <section class="menu-page">
            <h2>"قائمة الكنافة"</h2>
            <nav class="menu-filters" aria-label="التصنيفات">
                {filters
                    .into_iter()
                    .map(|option| {
                        view! {
                            <button
                                type="button"
                                class=move || {
                                    if filter.get() == option {
                                        "filter-button filter-button-active"
                                    } else {
                                        "filter-button"
                                    }
                                }
                                on:click=move |_| filter.set(option)
                            >
                                {option.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            <ul class="product-grid">
                {move || {
                    visible_products(&catalog, filter.get())
                        .into_iter()
                        .map(|product| {
                            view! {
                                <ProductCard
                                    product=product
                                    currency_label=currency_label.clone()
                                    cart=cart
                                    live_message=live_message
                                />
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </section>
    }
}
