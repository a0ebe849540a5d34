use std::sync::Arc;

use leptos::{ev::SubmitEvent, prelude::*, task};

use kunafa::config::StoreConfig;

use crate::announce;

/// How long sending a contact message takes.
const SEND_DELAY_MS: i32 = 1_000;

const BUSINESS_HOURS: [&str; 3] = [
    "الأحد - الخميس: 10 ص - 11 م",
    "الجمعة: 12 ظ - 11 م",
    "السبت: 10 ص - 11 م",
];

/// Contact form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Why a contact message was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContactError {
    MissingName,
    MissingEmail,
    MissingMessage,
}

impl ContactError {
    pub(crate) fn notice(self) -> &'static str {
        match self {
            ContactError::MissingName => "يرجى إدخال الاسم",
            ContactError::MissingEmail => "يرجى إدخال البريد الإلكتروني",
            ContactError::MissingMessage => "يرجى كتابة رسالتك",
        }
    }
}

impl ContactMessage {
    /// Name, email and message are required. Phone is optional.
    pub(crate) fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }

        if self.email.trim().is_empty() {
            return Err(ContactError::MissingEmail);
        }

        if self.message.trim().is_empty() {
            return Err(ContactError::MissingMessage);
        }

        Ok(())
    }
}

/// Deliver a contact message. There is no backend, so this only waits.
async fn send_message(message: ContactMessage) -> Result<(), ContactError> {
    message.validate()?;

    wait_for_timeout(SEND_DELAY_MS).await;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
async fn wait_for_timeout(delay_ms: i32) {
    use js_sys::{Function, Promise};
    use wasm_bindgen::{JsCast, JsValue, closure::Closure};
    use wasm_bindgen_futures::JsFuture;

    let mut executor = move |resolve: Function, _reject: Function| {
        let Some(window) = web_sys::window() else {
            _ = resolve.call0(&JsValue::NULL);
            return;
        };

        let callback = Closure::once_into_js(move || {
            _ = resolve.call0(&JsValue::NULL);
        });

        _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms,
        );
    };

    let promise = Promise::new(&mut executor);
    _ = JsFuture::from(promise).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn wait_for_timeout(_delay_ms: i32) {
    task::tick().await;
}

#[derive(Debug, Clone, Copy)]
struct ContactSignals {
    name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    message: RwSignal<String>,
}

impl ContactSignals {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            message: RwSignal::new(String::new()),
        }
    }

    fn snapshot(self) -> ContactMessage {
        ContactMessage {
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            phone: self.phone.get_untracked(),
            message: self.message.get_untracked(),
        }
    }

    fn clear(self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.phone.set(String::new());
        self.message.set(String::new());
    }
}

#[component]
fn ContactField(
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

/// Contact page: phone and WhatsApp links, opening hours and a message form.
#[component]
pub fn ContactPage(
    /// Store settings.
    config: Arc<StoreConfig>,
    /// Screen reader announcements.
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let form = ContactSignals::new();
    let sending = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        if sending.get_untracked() {
            return;
        }

        let message = form.snapshot();
        sending.set(true);

        task::spawn_local(async move {
            match send_message(message).await {
                Ok(()) => {
                    form.clear();
                    announce(
                        live_message,
                        "تم إرسال رسالتك بنجاح! سنرد عليك قريبًا.".to_string(),
                    );
                }
                Err(error) => announce(
                    live_message,
                    format!("حدث خطأ في إرسال الرسالة. {}", error.notice()),
                ),
            }

            sending.set(false);
        });
    };

    view! {
        <section class="contact-page">
            <h2>"تواصل معنا"</h2>
            <ul class="contact-links">
                <li>
                    <a href=config.phone_link()>"الهاتف: +" {config.whatsapp_number.clone()}</a>
                </li>
                <li>
                    <a href=config.whatsapp_contact_link() target="_blank" rel="noopener">
                        "واتس آب"
                    </a>
                </li>
            </ul>
            <div class="business-hours">
                <h3>"ساعات العمل"</h3>
                <ul>
                    {BUSINESS_HOURS.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ul>
            </div>
            <form class="contact-form" on:submit=on_submit>
                <h3>"أرسل لنا رسالة"</h3>
                <ContactField label="الاسم" input_type="text" value=form.name required=true />
                <ContactField label="البريد الإلكتروني" input_type="email" value=form.email required=true />
                <ContactField label="رقم الهاتف" input_type="tel" value=form.phone />
                <label class="form-field">
                    <span>"الرسالة"</span>
                    <textarea
                        required=true
                        rows="5"
                        prop:value=move || form.message.get()
                        on:input=move |ev| form.message.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <button type="submit" disabled=move || sending.get()>
                    {move || if sending.get() { "جاري الإرسال..." } else { "إرسال الرسالة" }}
                </button>
            </form>
        </section>
    }
}
