use std::sync::Arc;

use leptos::prelude::*;

use kunafa::{
    cart::{CartError, CartLineItem, CartStore, LineItemKey, QuantityChange},
    config::StoreConfig,
};

use crate::{Page, announce, format_amount, format_total};

/// Change a line's quantity by `delta`. Stepping below 1 removes the line.
pub(crate) fn step_quantity(
    cart: &mut CartStore,
    key: &LineItemKey,
    delta: i64,
) -> Result<QuantityChange, CartError> {
    let Some(current) = cart.get(&key.product_id, key.size).map(CartLineItem::quantity) else {
        return Ok(QuantityChange::Missing);
    };

    cart.update_quantity(&key.product_id, key.size, i64::from(current) + delta)
}

#[component]
fn CartLine(
    item: CartLineItem,
    currency_label: String,
    cart: RwSignal<CartStore>,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let decrement_key = item.key();
    let increment_key = item.key();
    let remove_key = item.key();
    let removed_name = item.name().to_string();
    let line_total = item
        .subtotal()
        .map(|subtotal| format_amount(&subtotal, &currency_label))
        .unwrap_or_default();

    view! {
        <li class="cart-line">
            <img src=item.image().to_string() alt="" />
            <div>
                <p class="cart-line-name">{item.name().to_string()}</p>
                <p class="cart-line-size">{item.size().label()}</p>
                <p class="cart-line-price">{format_amount(&item.unit_price(), &currency_label)}</p>
            </div>
            <div class="quantity-stepper">
                <button
                    type="button"
                    aria-label="إنقاص الكمية"
                    on:click=move |_| {
                        let result = cart.try_update(|cart| step_quantity(cart, &decrement_key, -1));

                        if let Some(Err(error)) = result {
                            announce(live_message, error.to_string());
                        }
                    }
                >
                    "-"
                </button>
                <span>{item.quantity()}</span>
                <button
                    type="button"
                    aria-label="زيادة الكمية"
                    on:click=move |_| {
                        let result = cart.try_update(|cart| step_quantity(cart, &increment_key, 1));

                        if let Some(Err(error)) = result {
                            announce(live_message, error.to_string());
                        }
                    }
                >
                    "+"
                </button>
            </div>
            <p class="cart-line-total">{line_total}</p>
            <button
                type="button"
                class="cart-line-remove"
                aria-label=format!("إزالة {removed_name}")
                on:click=move |_| {
                    cart.update(|cart| {
                        cart.remove_item(&remove_key.product_id, remove_key.size);
                    });

                    announce(live_message, format!("تمت إزالة {removed_name} من السلة"));
                }
            >
                "حذف"
            </button>
        </li>
    }
}

/// Slide-over cart with line steppers, totals and the checkout button.
#[component]
pub fn CartPanel(
    /// The session cart.
    cart: RwSignal<CartStore>,
    /// Store settings.
    config: Arc<StoreConfig>,
    /// Current page.
    page: RwSignal<Page>,
    /// Whether the panel is shown.
    cart_open: RwSignal<bool>,
    /// Screen reader announcements.
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let currency_label = config.currency_label.clone();

    move || {
        if !cart_open.get() {
            return ().into_any();
        }

        let label = currency_label.clone();
        let total_label = currency_label.clone();

        let body = if cart.with(CartStore::is_empty) {
            view! { <p class="cart-empty">"السلة فارغة"</p> }.into_any()
        } else {
            view! {
                <ul class="cart-lines">
                    {move || {
                        cart.with(|cart| cart.items().to_vec())
                            .into_iter()
                            .map(|item| {
                                view! {
                                    <CartLine
                                        item=item
                                        currency_label=label.clone()
                                        cart=cart
                                        live_message=live_message
                                    />
                                }
                            })
                            .collect_view()
                    }}
                </ul>
                <p class="cart-total">
                    "الإجمالي: "
                    {move || {
                        cart.with(CartStore::total)
                            .map(|total| format_total(&total, &total_label))
                            .unwrap_or_default()
                    }}
                </p>
                <div class="cart-actions">
                    <button
                        type="button"
                        class="cart-clear"
                        on:click=move |_| {
                            cart.update(CartStore::clear);
                            announce(live_message, "تم إفراغ السلة".to_string());
                        }
                    >
                        "إفراغ السلة"
                    </button>
                    <button
                        type="button"
                        class="cart-checkout"
                        on:click=move |_| {
                            cart_open.set(false);
                            page.set(Page::Checkout);
                        }
                    >
                        "إتمام الطلب"
                    </button>
                </div>
            }
            .into_any()
        };

        view! {
            <aside class="cart-panel" aria-label="سلة التسوق">
                <div class="panel-header">
                    <h2>"سلة التسوق"</h2>
                    <span class="cart-count">{move || cart.with(CartStore::item_count)}</span>
                    <button type="button" aria-label="إغلاق" on:click=move |_| cart_open.set(false)>
                        "×"
                    </button>
                </div>
                {body}
            </aside>
        }
        .into_any()
    }
}
