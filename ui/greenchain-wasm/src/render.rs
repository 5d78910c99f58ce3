//! DOM renderer.
//!
//! Result panels carry `data-action` buttons; `events` routes their clicks.

use crate::dom::{self, escape};
use gc_api_types::{Ngo, WalletAddress};
use gc_client_core::{BalanceView, Notice, PageContext, Renderer, ScanView};

pub const ACTION_SCAN_AGAIN: &str = "scan-again";
pub const ACTION_GRANT_CAMERA: &str = "grant-camera";
pub const ACTION_RETRY_SCANNER: &str = "retry-scanner";
pub const ACTION_RELOAD: &str = "reload";
pub const ACTION_DONATE: &str = "donate";

pub struct DomRenderer;

fn action_button(action: &str, label: &str) -> String {
    format!(r#"<button data-action="{action}" class="btn btn-primary">{label}</button>"#)
}

fn alert_panel(kind: &str, title: &str, body: &str) -> String {
    format!(r#"<div class="alert alert-{kind}"><h3>{title}</h3>{body}</div>"#)
}

fn scan_markup(view: &ScanView) -> String {
    match view {
        ScanView::Cleared => String::new(),
        ScanView::Processing => alert_panel(
            "info",
            "Processing...",
            "<p>Validating QR code and minting tokens...</p>",
        ),
        ScanView::InvalidCode => alert_panel(
            "danger",
            "Invalid QR Code!",
            &format!(
                "<p>This QR code is not a valid GreenChain claim code.</p>{}",
                action_button(ACTION_SCAN_AGAIN, "Scan Again")
            ),
        ),
        ScanView::Minted(receipt) => alert_panel(
            "success",
            "🎉 Success!",
            &format!(
                "<p>{}</p>\
                 <p><strong>Tokens Minted:</strong> {}</p>\
                 <p><strong>New Balance:</strong> {} tokens</p>\
                 <p><strong>Transaction Hash:</strong> {}</p>{}",
                escape(&receipt.message),
                receipt.tokens_minted,
                receipt.new_balance,
                escape(&receipt.transaction_hash),
                action_button(ACTION_SCAN_AGAIN, "Scan Another QR Code"),
            ),
        ),
        ScanView::Failed(message) => alert_panel(
            "danger",
            "❌ Error",
            &format!(
                "<p>{}</p>{}",
                escape(message),
                action_button(ACTION_SCAN_AGAIN, "Try Again")
            ),
        ),
        ScanView::CameraUnavailable => alert_panel(
            "warning",
            "⚠️ Camera Not Available",
            &format!(
                "<p>No camera found. Please ensure your device has a camera and grant camera permissions.</p>{}",
                action_button(ACTION_GRANT_CAMERA, "Grant Camera Permission")
            ),
        ),
        ScanView::PermissionGranted => alert_panel(
            "success",
            "✅ Camera Permission Granted",
            "<p>Camera access granted. Initializing scanner...</p>",
        ),
        ScanView::PermissionDenied => alert_panel(
            "danger",
            "❌ Camera Permission Denied",
            &format!(
                "<p>Camera access is required to scan QR codes. Please grant camera permission and refresh the page.</p>{}",
                action_button(ACTION_RELOAD, "Refresh Page")
            ),
        ),
        ScanView::ScannerError(message) => alert_panel(
            "danger",
            "❌ Scanner Error",
            &format!(
                "<p>{}</p>{}",
                escape(message),
                action_button(ACTION_RETRY_SCANNER, "Retry")
            ),
        ),
    }
}

fn donation_markup(ngos: &[Ngo], available_credits: u64) -> String {
    let options: String = ngos
        .iter()
        .map(|ngo| {
            format!(
                r#"<option value="{addr}">{name} ({addr})</option>"#,
                addr = escape(&ngo.address),
                name = escape(&ngo.name)
            )
        })
        .collect();

    format!(
        r#"<div class="row">
  <div class="col-md-8"><div class="form-group">
    <label for="{select}">Select NGO:</label>
    <select id="{select}" class="form-control">{options}</select>
  </div></div>
  <div class="col-md-4"><div class="form-group">
    <label for="{amount}">Donation amount (credits):</label>
    <input type="number" id="{amount}" class="form-control" value="1" min="1" max="{available_credits}">
    <small class="text-muted">Available credits: {available_credits}</small>
  </div>
  <button data-action="{action}" class="btn btn-donate w-100 mt-3">Donate</button></div>
</div>"#,
        select = dom::NGO_SELECT,
        amount = dom::DONATION_AMOUNT,
        action = ACTION_DONATE,
    )
}

impl Renderer for DomRenderer {
    fn wallet(&self, page: PageContext, address: Option<&WalletAddress>) {
        let panel = match page {
            PageContext::Login => dom::WALLET,
            PageContext::Recycle | PageContext::Donation => dom::WALLET_INFO,
            PageContext::Other => return,
        };
        dom::set_visible(panel, address.is_some());
        dom::set_text(dom::WALLET_ADDRESS, address.map(|a| a.as_str()).unwrap_or_default());
    }

    fn balance(&self, view: &BalanceView) {
        match view {
            BalanceView::Ready(snapshot) => {
                dom::set_html(
                    dom::TOKEN_BALANCE,
                    &format!(
                        "<strong>Token Balance:</strong> {} tokens<br>\
                         <strong>Donation Credits:</strong> {} credits",
                        snapshot.token_balance, snapshot.donation_credits
                    ),
                );
                dom::set_text(dom::AVAILABLE_TOKENS, &snapshot.token_balance.to_string());
            }
            other => dom::set_text(dom::TOKEN_BALANCE, &other.to_string()),
        }
    }

    fn scan(&self, view: &ScanView) {
        dom::set_html(dom::RESULT, &scan_markup(view));
    }

    fn donation_options(&self, ngos: &[Ngo], available_credits: u64) {
        dom::set_html(dom::DONATION_OPTIONS, &donation_markup(ngos, available_credits));
    }

    fn notify(&self, notice: &Notice) {
        dom::alert(&notice.to_string());
    }
}
