//! Chat checkout link.

use mousse_melts_core::OrderMessage;

/// Deep link that opens a chat with `number` and the order text prefilled.
#[must_use]
pub fn chat_link(number: &str, message: &OrderMessage) -> String {
    format!(
        "https://wa.me/{number}?text={}",
        urlencoding::encode(message.as_str())
    )
}
