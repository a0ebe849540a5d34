use std::sync::Arc;

use leptos::prelude::*;

use kunafa::{
    cart::CartStore,
    catalog::{Catalog, Product},
    config::StoreConfig,
};

use crate::{Page, menu::ProductCard};

/// How many featured products the home page shows.
pub(crate) const HOME_FEATURED_LIMIT: usize = 3;

/// The first featured products, in catalog order.
pub(crate) fn home_products(catalog: &Catalog) -> Vec<Product> {
    catalog
        .featured()
        .take(HOME_FEATURED_LIMIT)
        .map(|(_, product)| product.clone())
        .collect()
}

/// Landing page: welcome banner and a short best-seller list.
#[component]
pub fn HomePage(
    /// Products offered by the store.
    catalog: Arc<Catalog>,
    /// Store settings.
    config: Arc<StoreConfig>,
    /// The session cart.
    cart: RwSignal<CartStore>,
    /// Current page.
    page: RwSignal<Page>,
    /// Screen reader announcements.
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let currency_label = config.currency_label.clone();

    view! {
        <section class="home-page">
            <div class="home-hero">
                <h2>"الطعم الذي يستحق الذوق الراقي"</h2>
                <p>"كنافة نابلسية وحلويات شرقية مصنوعة يوميًا من أجود المكونات."</p>
                <button type="button" on:click=move |_| page.set(Page::Menu)>
                    "تصفح القائمة"
                </button>
                <a href=config.whatsapp_contact_link() target="_blank" rel="noopener">
                    "تواصل معنا"
                </a>
            </div>
            <h3>"الأكثر مبيعاً"</h3>
            <ul class="product-grid">
                {home_products(&catalog)
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
                    .collect_view()}
            </ul>
            <button type="button" class="home-full-menu" on:click=move |_| page.set(Page::Menu)>
                "عرض القائمة الكاملة"
            </button>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn home_shows_first_three_featured_products() -> TestResult {
        let catalog = Catalog::builtin()?;

        let ids: Vec<String> = home_products(&catalog)
            .into_iter()
            .map(|product| product.id.as_str().to_string())
            .collect();

        assert_eq!(catalog.featured().count(), 4);
        assert_eq!(ids, ["kunafa-nablusi-1", "kunafa-nablusi-2", "kunafa-cream-1"]);

        Ok(())
    }

    #[test]
    fn home_selection_skips_products_not_featured() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert!(home_products(&catalog).iter().all(|product| product.featured));

        Ok(())
    }
}
