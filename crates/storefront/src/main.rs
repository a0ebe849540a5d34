//! Kunafa storefront
//!
//! Browser shop front: home, menu, contact, cart panel, checkout and order
//! confirmation.

use std::sync::Arc;

use leptos::prelude::*;

use kunafa::{
    cart::CartStore,
    catalog::Catalog,
    config::StoreConfig,
    pricing::{Price, format_fixed, format_plain},
};

mod cart_panel;
mod checkout;
mod contact;
mod home;
mod menu;

/// Catalog and store settings loaded at start-up.
#[derive(Debug)]
struct StoreData {
    catalog: Arc<Catalog>,
    config: Arc<StoreConfig>,
}

impl StoreData {
    fn load() -> Result<Self, String> {
        let catalog =
            Catalog::builtin().map_err(|error| format!("Failed to load catalog: {error}"))?;
        let config = StoreConfig::builtin()
            .map_err(|error| format!("Failed to load store config: {error}"))?;

        Ok(Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        })
    }
}

/// Page currently shown in the main area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Home,
    Menu,
    Contact,
    Checkout,
    Confirmation,
}

impl Page {
    /// Pages linked from the header.
    const NAVIGATION: [Page; 3] = [Page::Home, Page::Menu, Page::Contact];

    fn nav_label(self) -> &'static str {
        match self {
            Page::Home => "الرئيسية",
            Page::Menu => "القائمة",
            Page::Contact => "تواصل معنا",
            Page::Checkout => "إكمال الطلب",
            Page::Confirmation => "تم الطلب",
        }
    }
}

/// Amount with trailing zero decimals dropped, e.g. `27.5 ر.س`.
pub(crate) fn format_amount(price: &Price, label: &str) -> String {
    format!("{} {label}", format_plain(price))
}

/// Amount with two decimals, e.g. `160.00 ر.س`.
pub(crate) fn format_total(price: &Price, label: &str) -> String {
    format!("{} {label}", format_fixed(price))
}

fn cart_button_label(item_count: u64) -> String {
    match item_count {
        0 => "السلة فارغة".to_string(),
        1 => "السلة: منتج واحد".to_string(),
        count => format!("السلة: {count} منتجات"),
    }
}

/// Main storefront shell.
#[component]
fn App() -> impl IntoView {
    match StoreData::load() {
        Ok(StoreData { catalog, config }) => {
            let cart = RwSignal::new(CartStore::new(catalog.currency()));
            let page = RwSignal::new(Page::Home);
            let cart_open = RwSignal::new(false);
            let live_message = RwSignal::new((0_u64, String::new()));

            let store_name = config.name.clone();
            let phone_link = config.phone_link();
            let whatsapp_link = config.whatsapp_contact_link();
            let page_config = Arc::clone(&config);

            view! {
                <main dir="rtl" lang="ar" class="min-h-screen bg-amber-50 text-stone-900">
                    <p class="sr-only" role="status" aria-live="polite" aria-atomic="true">
                        {move || live_message.get().1}
                    </p>
                    <header class="store-header">
                        <button type="button" class="store-title" on:click=move |_| page.set(Page::Home)>
                            <h1>{store_name}</h1>
                        </button>
                        <nav class="store-nav">
                            {Page::NAVIGATION
                                .into_iter()
                                .map(|target| {
                                    view! {
                                        <button
                                            type="button"
                                            aria-current=move || (page.get() == target).then_some("page")
                                            on:click=move |_| page.set(target)
                                        >
                                            {target.nav_label()}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </nav>
                        <button
                            type="button"
                            class="cart-toggle"
                            aria-label=move || cart_button_label(cart.with(CartStore::item_count))
                            aria-expanded=move || cart_open.get().to_string()
                            on:click=move |_| cart_open.update(|open| *open = !*open)
                        >
                            "السلة"
                            <span class="cart-badge">{move || cart.with(CartStore::item_count)}</span>
                        </button>
                    </header>
                    <cart_panel::CartPanel
                        cart=cart
                        config=Arc::clone(&config)
                        page=page
                        cart_open=cart_open
                        live_message=live_message
                    />
                    {move || match page.get() {
                        Page::Home => view! {
                            <home::HomePage
                                catalog=Arc::clone(&catalog)
                                config=Arc::clone(&page_config)
                                cart=cart
                                page=page
                                live_message=live_message
                            />
                        }
                        .into_any(),
                        Page::Contact => view! {
                            <contact::ContactPage
                                config=Arc::clone(&page_config)
                                live_message=live_message
                            />
                        }
                        .into_any(),
                        Page::Menu => view! {
                            <menu::MenuPage
                                catalog=Arc::clone(&catalog)
                                config=Arc::clone(&page_config)
                                cart=cart
                                live_message=live_message
                            />
                        }
                        .into_any(),
                        Page::Checkout => view! {
                            <checkout::CheckoutPage
                                config=Arc::clone(&page_config)
                                cart=cart
                                page=page
                                live_message=live_message
                            />
                        }
                        .into_any(),
                        Page::Confirmation => view! {
                            <section class="confirmation">
                                <h2>"تم إرسال طلبك!"</h2>
                                <p>"سيتم التواصل معك قريبًا عبر واتساب لتأكيد الطلب."</p>
                                <button type="button" on:click=move |_| page.set(Page::Menu)>
                                    "العودة إلى القائمة"
                                </button>
                            </section>
                        }
                        .into_any(),
                    }}
                    <footer class="store-footer">
                        <a href=phone_link>"اتصل بنا"</a>
                        <a href=whatsapp_link target="_blank" rel="noopener">"واتساب"</a>
                    </footer>
                </main>
            }
            .into_any()
        }
        Err(error_message) => view! {
            <main dir="rtl" lang="ar" class="min-h-screen bg-amber-50 text-stone-900">
                <div class="mx-auto max-w-3xl rounded-lg border border-red-200 bg-red-50 p-4">
                    <p class="text-sm text-red-700">{error_message}</p>
                </div>
            </main>
        }
        .into_any(),
    }
}

fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}

pub(crate) fn announce(live_message: RwSignal<(u64, String)>, message: String) {
    live_message.update(|(id, text)| {
        *id = id.saturating_add(1);
        *text = message;
    });
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::SAR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn store_data_loads_builtin_fixtures() -> TestResult {
        let data = StoreData::load()?;

        assert_eq!(data.catalog.len(), 6);
        assert_eq!(data.config.currency_label, "ر.س");

        Ok(())
    }

    #[test]
    fn amounts_use_plain_and_fixed_forms() {
        let price = Money::from_minor(2_750, SAR);

        assert_eq!(format_amount(&price, "ر.س"), "27.5 ر.س");
        assert_eq!(format_total(&price, "ر.س"), "27.50 ر.س");
    }

    #[test]
    fn cart_button_label_counts_items() {
        assert_eq!(cart_button_label(0), "السلة فارغة");
        assert_eq!(cart_button_label(1), "السلة: منتج واحد");
        assert_eq!(cart_button_label(4), "السلة: 4 منتجات");
    }

    #[test]
    fn navigation_links_home_menu_and_contact() {
        let labels: Vec<&str> = Page::NAVIGATION.into_iter().map(Page::nav_label).collect();

        assert_eq!(labels, ["الرئيسية", "القائمة", "تواصل معنا"]);
    }

    #[test]
    fn announce_bumps_message_id() {
        let live_message = RwSignal::new((0_u64, String::new()));

        announce(live_message, "first".to_string());
        announce(live_message, "first".to_string());

        assert_eq!(live_message.get_untracked(), (2, "first".to_string()));
    }
}
