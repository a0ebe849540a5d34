use std::sync::Arc;

use leptos::{ev::SubmitEvent, prelude::*, task};

use kunafa::{
    cart::CartStore,
    checkout::{
        Checkout, CheckoutError, CustomerDetails, DeliveryLocation, FulfillmentMethod,
        HandoffError, OrderDraft, OrderHandoff, OrderQuote, PreparedOrder,
    },
    config::StoreConfig,
    location::{Coordinates, LocationPicker, NominatimGeocoder, SearchOutcome},
};

use crate::{Page, announce, format_amount, format_total};

type BrowserPicker = LocationPicker<NominatimGeocoder>;

/// Opens the order link in a new browser tab.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BrowserHandoff;

impl OrderHandoff for BrowserHandoff {
    #[cfg(target_arch = "wasm32")]
    fn dispatch(&self, link: &str) -> Result<(), HandoffError> {
        let window =
            web_sys::window().ok_or_else(|| HandoffError::Open("window is unavailable".to_string()))?;

        match window.open_with_url_and_target(link, "_blank") {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(HandoffError::Blocked),
            Err(error) => Err(HandoffError::Open(
                error
                    .as_string()
                    .unwrap_or_else(|| "window.open failed".to_string()),
            )),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch(&self, _link: &str) -> Result<(), HandoffError> {
        Err(HandoffError::Open("no browser window".to_string()))
    }
}

/// Snapshot of the checkout form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
    pub fulfillment: FulfillmentMethod,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

impl CheckoutForm {
    /// Order draft for the form. Empty optional fields become `None`.
    pub(crate) fn to_draft(&self) -> OrderDraft {
        let optional = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        OrderDraft {
            customer: CustomerDetails {
                name: self.name.trim().to_string(),
                phone: self.phone.trim().to_string(),
                email: optional(&self.email),
            },
            fulfillment: self.fulfillment,
            location: optional(&self.address).map(|address| DeliveryLocation {
                address,
                coordinates: self.coordinates,
            }),
            notes: optional(&self.notes),
        }
    }
}

/// Message shown when an order could not be sent.
pub(crate) fn error_notice(error: &CheckoutError) -> String {
    match error {
        CheckoutError::EmptyCart => "السلة فارغة".to_string(),
        CheckoutError::MissingName => "يرجى إدخال الاسم".to_string(),
        CheckoutError::MissingPhone => "يرجى إدخال رقم الهاتف".to_string(),
        CheckoutError::MissingAddress => "يرجى تحديد عنوان التوصيل".to_string(),
        CheckoutError::Handoff(HandoffError::Blocked) => {
            "تعذر فتح واتساب. يرجى السماح بالنوافذ المنبثقة والمحاولة مرة أخرى.".to_string()
        }
        CheckoutError::Cart(_) | CheckoutError::Pricing(_) | CheckoutError::Handoff(_) => {
            "حدث خطأ. حاول مرة أخرى.".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FormSignals {
    name: RwSignal<String>,
    phone: RwSignal<String>,
    email: RwSignal<String>,
    notes: RwSignal<String>,
    fulfillment: RwSignal<FulfillmentMethod>,
    address: RwSignal<String>,
    coordinates: RwSignal<Option<Coordinates>>,
}

impl FormSignals {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            notes: RwSignal::new(String::new()),
            fulfillment: RwSignal::new(FulfillmentMethod::default()),
            address: RwSignal::new(String::new()),
            coordinates: RwSignal::new(None),
        }
    }

    fn snapshot(self) -> CheckoutForm {
        CheckoutForm {
            name: self.name.get_untracked(),
            phone: self.phone.get_untracked(),
            email: self.email.get_untracked(),
            notes: self.notes.get_untracked(),
            fulfillment: self.fulfillment.get_untracked(),
            address: self.address.get_untracked(),
            coordinates: self.coordinates.get_untracked(),
        }
    }

    fn clear(self) {
        self.name.set(String::new());
        self.phone.set(String::new());
        self.email.set(String::new());
        self.notes.set(String::new());
        self.fulfillment.set(FulfillmentMethod::default());
        self.address.set(String::new());
        self.coordinates.set(None);
    }

    fn apply_location(self, outcome: SearchOutcome, live_message: RwSignal<(u64, String)>) {
        if let SearchOutcome::Resolved(location) = outcome {
            self.address.set(location.address);
            self.coordinates.set(Some(location.coordinates));
            announce(live_message, "تم تحديد الموقع بنجاح!".to_string());
        }
    }
}

#[component]
fn TextField(
    label: &'static str,
    input_type: &'static str,
    value: RwSignal<String>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span>{label}</span>
            <input
                type=input_type
                required=required
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

#[component]
fn AddressSearch(
    form: FormSignals,
    picker: Option<Arc<BrowserPicker>>,
    default_center: Coordinates,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let searching = RwSignal::new(false);
    let search_picker = picker.clone();
    let pin_picker = picker;

    view! {
        <div class="address-search">
            <label class="form-field">
                <span>"ابحث عن عنوانك أو حدده من الخريطة"</span>
                <input
                    type="text"
                    prop:value=move || form.address.get()
                    on:input=move |ev| {
                        let query = event_target_value(&ev);
                        form.address.set(query.clone());
                        form.coordinates.set(None);

                        let Some(picker) = search_picker.clone() else {
                            return;
                        };

                        task::spawn_local(async move {
                            searching.set(true);
                            let outcome = picker.search(&query).await;
                            searching.set(false);
                            form.apply_location(outcome, live_message);
                        });
                    }
                />
            </label>
            <button
                type="button"
                disabled=move || searching.get()
                on:click=move |_| {
                    let Some(picker) = pin_picker.clone() else {
                        return;
                    };

                    task::spawn_local(async move {
                        let ticket = picker.generations().issue();
                        searching.set(true);
                        let location = picker.resolve(default_center).await;
                        searching.set(false);

                        if picker.generations().is_current(ticket) {
                            form.apply_location(SearchOutcome::Resolved(location), live_message);
                        }
                    });
                }
            >
                "تحديد مركز الخريطة"
            </button>
            {move || {
                form.coordinates
                    .get()
                    .map(|coordinates| {
                        view! {
                            <p class="address-coordinates">{coordinates.fallback_address()}</p>
                        }
                    })
            }}
        </div>
    }
}

#[component]
fn OrderTotals(
    config: Arc<StoreConfig>,
    cart: RwSignal<CartStore>,
    fulfillment: RwSignal<FulfillmentMethod>,
) -> impl IntoView {
    move || {
        let label = &config.currency_label;

        match cart.with(|cart| OrderQuote::new(cart, fulfillment.get(), &config)) {
            Ok(quote) => view! {
                <dl class="order-totals">
                    <dt>"المجموع الفرعي"</dt>
                    <dd>{format_amount(&quote.subtotal, label)}</dd>
                    <dt>"رسوم التوصيل"</dt>
                    <dd>{format_amount(&quote.delivery_fee, label)}</dd>
                    <dt>"الإجمالي"</dt>
                    <dd>{format_total(&quote.grand_total, label)}</dd>
                </dl>
            }
            .into_any(),
            Err(error) => view! { <p class="order-totals-error">{error_notice(&error)}</p> }.into_any(),
        }
    }
}

/// Submit `draft` against the session cart.
///
/// Cart subscribers are only notified when the order went out and the cart was
/// cleared, so a failed hand-off leaves the checkout page and its form alone.
fn submit_order<H: OrderHandoff>(
    cart: RwSignal<CartStore>,
    checkout: &Checkout<'_, H>,
    draft: &OrderDraft,
) -> Option<Result<PreparedOrder, CheckoutError>> {
    cart.try_maybe_update(|cart| {
        let result = checkout.submit(cart, draft);

        (result.is_ok(), result)
    })
}

#[component]
fn OrderForm(
    config: Arc<StoreConfig>,
    cart: RwSignal<CartStore>,
    page: RwSignal<Page>,
    form: FormSignals,
    picker: Option<Arc<BrowserPicker>>,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let default_center = config.geocoding.default_center;
    let submit_config = Arc::clone(&config);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let draft = form.snapshot().to_draft();
        let checkout = Checkout::new(&submit_config, BrowserHandoff);

        match submit_order(cart, &checkout, &draft) {
            Some(Ok(_)) => {
                form.clear();
                announce(
                    live_message,
                    "تم إرسال طلبك! سيتم التواصل معك قريبًا.".to_string(),
                );
                page.set(Page::Confirmation);
            }
            Some(Err(error)) => announce(live_message, error_notice(&error)),
            None => {}
        }
    };

    view! {
        <form class="checkout-form" on:submit=on_submit>
            <fieldset>
                <legend>"بيانات العميل"</legend>
                <TextField label="الاسم" input_type="text" value=form.name required=true />
                <TextField label="رقم الهاتف" input_type="tel" value=form.phone required=true />
                <TextField label="البريد الإلكتروني" input_type="email" value=form.email />
            </fieldset>
            <fieldset>
                <legend>"طريقة التسليم"</legend>
                {FulfillmentMethod::ALL
                    .into_iter()
                    .map(|method| {
                        view! {
                            <label class="fulfillment-option">
                                <input
                                    type="radio"
                                    name="fulfillment"
                                    prop:checked=move || form.fulfillment.get() == method
                                    on:change=move |_| form.fulfillment.set(method)
                                />
                                {method.label()}
                            </label>
                        }
                    })
                    .collect_view()}
            </fieldset>
            {move || {
                (form.fulfillment.get() == FulfillmentMethod::Delivery)
                    .then(|| {
                        view! {
                            <AddressSearch
                                form=form
                                picker=picker.clone()
                                default_center=default_center
                                live_message=live_message
                            />
                        }
                    })
            }}
            <label class="form-field">
                <span>"ملاحظات"</span>
                <textarea
                    prop:value=move || form.notes.get()
                    on:input=move |ev| form.notes.set(event_target_value(&ev))
                ></textarea>
            </label>
            <OrderTotals config=config cart=cart fulfillment=form.fulfillment />
            <button type="submit" class="checkout-submit">"إرسال الطلب عبر واتساب"</button>
        </form>
    }
}

/// Checkout page: contact form, fulfillment choice, address and totals.
#[component]
pub fn CheckoutPage(
    /// Store settings.
    config: Arc<StoreConfig>,
    /// The session cart.
    cart: RwSignal<CartStore>,
    /// Current page.
    page: RwSignal<Page>,
    /// Screen reader announcements.
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let form = FormSignals::new();
    let picker = NominatimGeocoder::new(&config.geocoding)
        .map(|geocoder| Arc::new(LocationPicker::new(geocoder, &config.geocoding)))
        .ok();
    let cart_is_empty = Memo::new(move |_| cart.with(CartStore::is_empty));

    view! {
        <section class="checkout-page">
            <h2>"إكمال الطلب"</h2>
            {move || {
                if cart_is_empty.get() {
                    view! {
                        <div class="checkout-empty">
                            <p>"السلة فارغة"</p>
                            <button type="button" on:click=move |_| page.set(Page::Menu)>
                                "تصفح القائمة"
                            </button>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <OrderForm
                            config=Arc::clone(&config)
                            cart=cart
                            page=page
                            form=form
                            picker=picker.clone()
                            live_message=live_message
                        />
                    }
                    .into_any()
                }
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use testresult::TestResult;

    use super::*;

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            name: " سارة ".to_string(),
            phone: "0501234567".to_string(),
            email: "  ".to_string(),
            notes: String::new(),
            fulfillment: FulfillmentMethod::Delivery,
            address: "حي العليا".to_string(),
            coordinates: Some(Coordinates::new(24.6905, 46.6853)),
        }
    }

    #[test]
    fn blank_optional_fields_become_none() -> TestResult {
        let draft = filled_form().to_draft();

        assert_eq!(draft.customer.name, "سارة");
        assert_eq!(draft.customer.email, None);
        assert_eq!(draft.notes, None);
        assert_eq!(
            draft.location,
            Some(DeliveryLocation {
                address: "حي العليا".to_string(),
                coordinates: Some(Coordinates::new(24.6905, 46.6853)),
            })
        );

        draft.validate()?;

        Ok(())
    }

    #[test]
    fn missing_address_fails_delivery_validation() {
        let form = CheckoutForm {
            address: String::new(),
            ..filled_form()
        };

        assert_eq!(form.to_draft().validate(), Err(CheckoutError::MissingAddress));
    }

    #[test]
    fn notices_name_the_missing_field() {
        assert_eq!(error_notice(&CheckoutError::MissingName), "يرجى إدخال الاسم");
        assert_eq!(
            error_notice(&CheckoutError::Handoff(HandoffError::Open("x".to_string()))),
            "حدث خطأ. حاول مرة أخرى."
        );
    }

    fn one_item_cart() -> TestResult<CartStore> {
        let catalog = kunafa::catalog::Catalog::builtin()?;
        let mut cart = CartStore::new(catalog.currency());
        let product = catalog.iter().next().ok_or("empty catalog")?.1;
        kunafa::selection::ProductSelection::new().add_to_cart(product, &mut cart)?;

        Ok(cart)
    }

    #[test]
    fn handoff_outside_the_browser_fails_without_clearing_cart() -> TestResult {
        let config = StoreConfig::builtin()?;
        let mut cart = one_item_cart()?;

        let result = Checkout::new(&config, BrowserHandoff).submit(&mut cart, &filled_form().to_draft());

        assert!(matches!(result, Err(CheckoutError::Handoff(HandoffError::Open(_)))));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[derive(Debug)]
    struct SentHandoff;

    impl OrderHandoff for SentHandoff {
        fn dispatch(&self, _link: &str) -> Result<(), HandoffError> {
            Ok(())
        }
    }

    fn counting_emptiness_memo(cart: RwSignal<CartStore>, runs: Arc<AtomicUsize>) -> Memo<bool> {
        Memo::new(move |_| {
            runs.fetch_add(1, Ordering::SeqCst);
            cart.with(CartStore::is_empty)
        })
    }

    #[test]
    fn failed_handoff_does_not_rerun_cart_subscribers() -> TestResult {
        let config = StoreConfig::builtin()?;
        let cart = RwSignal::new(one_item_cart()?);
        let runs = Arc::new(AtomicUsize::new(0));
        let cart_is_empty = counting_emptiness_memo(cart, Arc::clone(&runs));

        assert!(!cart_is_empty.get_untracked());
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let checkout = Checkout::new(&config, BrowserHandoff);
        let result = submit_order(cart, &checkout, &filled_form().to_draft());

        assert!(matches!(result, Some(Err(CheckoutError::Handoff(_)))));
        assert!(!cart_is_empty.get_untracked());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(cart.with_untracked(CartStore::len), 1);

        Ok(())
    }

    #[test]
    fn sent_order_clears_cart_and_notifies_subscribers() -> TestResult {
        let config = StoreConfig::builtin()?;
        let cart = RwSignal::new(one_item_cart()?);
        let runs = Arc::new(AtomicUsize::new(0));
        let cart_is_empty = counting_emptiness_memo(cart, Arc::clone(&runs));

        assert!(!cart_is_empty.get_untracked());

        let checkout = Checkout::new(&config, SentHandoff);
        let result = submit_order(cart, &checkout, &filled_form().to_draft());

        assert!(matches!(result, Some(Ok(_))));
        assert!(cart_is_empty.get_untracked());
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        Ok(())
    }
}
