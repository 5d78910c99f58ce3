//! DOM helpers.
//!
//! Page templates differ, so every lookup is optional: a missing element is
//! logged at debug level and the caller skips its update.

use gloo_console::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlSelectElement, Window};

// ── Element ids shared by the page templates ──

pub const BTN_CONNECT: &str = "btnConnect";
pub const BTN_DISCONNECT: &str = "btnDisconnect";
pub const BTN_BALANCE: &str = "btnDisplayBalance";
pub const BTN_SUBMIT_QR: &str = "btnSubmitQr";
pub const BTN_CONVERT: &str = "btnConvert";
pub const BTN_SHOW_DONATIONS: &str = "btnShowDonations";
pub const WALLET: &str = "wallet";
pub const WALLET_INFO: &str = "walletInfo";
pub const WALLET_ADDRESS: &str = "walletAddress";
pub const TOKEN_BALANCE: &str = "token_balance";
pub const AVAILABLE_TOKENS: &str = "availableTokens";
pub const READER: &str = "reader";
pub const RESULT: &str = "result";
pub const MANUAL_QR_INPUT: &str = "manualQrInput";
pub const TOKEN_AMOUNT: &str = "tokenAmount";
pub const DONATION_OPTIONS: &str = "donation-options";
pub const NGO_SELECT: &str = "ngoSelect";
pub const DONATION_AMOUNT: &str = "donationAmount";
pub const BASE_URL: &str = "baseUrl";

pub fn window() -> Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    let found = gloo_utils::document().get_element_by_id(id);
    if found.is_none() {
        debug!(format!("#{id} not on this page"));
    }
    found
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_html(id: &str, html: &str) {
    if let Some(el) = by_id(id) {
        el.set_inner_html(html);
    }
}

pub fn set_visible(id: &str, visible: bool) {
    if let Some(el) = by_id_typed::<HtmlElement>(id) {
        let display = if visible { "block" } else { "none" };
        let _ = el.style().set_property("display", display);
    }
}

pub fn input_value(id: &str) -> Option<String> {
    by_id_typed::<HtmlInputElement>(id).map(|input| input.value().trim().to_string())
}

pub fn clear_input(id: &str) {
    if let Some(input) = by_id_typed::<HtmlInputElement>(id) {
        input.set_value("");
    }
}

pub fn select_value(id: &str) -> Option<String> {
    by_id_typed::<HtmlSelectElement>(id).map(|select| select.value())
}

/// Whole-number input; anything else reads as zero, which the client
/// rejects as an invalid amount.
pub fn amount_value(id: &str) -> Option<u64> {
    input_value(id).map(|raw| raw.parse().unwrap_or(0))
}

pub fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

pub fn reload() {
    let _ = window().location().reload();
}

/// Minimal escaping for server-provided text placed into markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("greenchain-claim-1"), "greenchain-claim-1");
    }
}
