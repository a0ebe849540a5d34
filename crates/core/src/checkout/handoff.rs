//! Order hand-off
//!
//! Builds the messaging link for an order summary and passes it to whatever
//! opens it (a browser window, a terminal, a test recorder).

use thiserror::Error;

/// Errors raised while dispatching an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandoffError {
    /// The link could not be opened.
    #[error("failed to open order link: {0}")]
    Open(String),

    /// The environment refused to open a new window.
    #[error("opening the order link was blocked")]
    Blocked,
}

/// Something that can open an order hand-off link.
pub trait OrderHandoff {
    /// Open `link`. Completion of the conversation it starts is not observed.
    ///
    /// # Errors
    ///
    /// Returns a [`HandoffError`] if the link could not be opened.
    fn dispatch(&self, link: &str) -> Result<(), HandoffError>;
}

impl<T: OrderHandoff + ?Sized> OrderHandoff for &T {
    fn dispatch(&self, link: &str) -> Result<(), HandoffError> {
        (**self).dispatch(link)
    }
}

/// WhatsApp click-to-chat link carrying `message` as pre-filled text.
pub fn whatsapp_link(base_url: &str, number: &str, message: &str) -> String {
    format!("{base_url}{number}?text={}", encode_uri_component(message))
}

/// Percent-encodes `input` the way browsers' `encodeURIComponent` does.
///
/// ASCII letters, digits and `-_.!~*'()` are kept; every other UTF-8 byte is
/// written as `%XX` with uppercase hex digits.
pub fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());

    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    encoded
}
