use gc_api_types::{Ngo, WalletAddress};
use gc_client_core::{BalanceView, Notice, PageContext, Renderer, ScanView};
use std::cell::{Cell, RefCell};
use std::io::Write;

/// Line-oriented renderer. Remembers whether anything it drew was a failure
/// so the process can exit non-zero.
pub(crate) struct TerminalRenderer<W: Write> {
    out: RefCell<W>,
    failed: Cell<bool>,
}

impl TerminalRenderer<std::io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            failed: Cell::new(false),
        }
    }

    pub(crate) fn failed(&self) -> bool {
        self.failed.get()
    }

    pub(crate) fn line(&self, text: &str) {
        // A closed stdout is not worth failing the command over.
        let _ = writeln!(self.out.borrow_mut(), "{text}");
    }

    fn mark_failed(&self) {
        self.failed.set(true);
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn wallet(&self, _page: PageContext, address: Option<&WalletAddress>) {
        match address {
            Some(address) => self.line(&format!("Wallet: {address}")),
            None => self.line("Wallet not connected"),
        }
    }

    fn balance(&self, view: &BalanceView) {
        match view {
            BalanceView::Loading => {}
            BalanceView::Failed(_) => {
                self.mark_failed();
                self.line(&view.to_string());
            }
            _ => self.line(&view.to_string()),
        }
    }

    fn scan(&self, view: &ScanView) {
        match view {
            ScanView::Processing => self.line("Processing QR code..."),
            ScanView::Minted(receipt) => {
                self.line(&format!("✅ {}", receipt.message));
                self.line(&format!("Tokens minted: {}", receipt.tokens_minted));
                self.line(&format!("New balance: {}", receipt.new_balance));
                if !receipt.transaction_hash.is_empty() {
                    self.line(&format!("Transaction: {}", receipt.transaction_hash));
                }
            }
            ScanView::Failed(message) => {
                self.mark_failed();
                self.line(&format!("❌ {message}"));
            }
            ScanView::InvalidCode => {
                self.mark_failed();
                self.line("❌ Invalid QR code. Only GreenChain claim codes are accepted.");
            }
            ScanView::Cleared
            | ScanView::CameraUnavailable
            | ScanView::PermissionGranted
            | ScanView::PermissionDenied
            | ScanView::ScannerError(_) => {}
        }
    }

    fn donation_options(&self, ngos: &[Ngo], available_credits: u64) {
        if ngos.is_empty() {
            self.line("No NGOs available");
        }
        for ngo in ngos {
            self.line(&format!("{} ({})", ngo.name, ngo.address));
        }
        self.line(&format!("Available credits: {available_credits}"));
    }

    fn notify(&self, notice: &Notice) {
        if matches!(notice, Notice::Error(_)) {
            self.mark_failed();
        }
        self.line(&notice.to_string());
    }
}
