//! Page-level orchestration.
//!
//! [`GreenChainApp`] owns every component for one page load. Hosts build it
//! once, call [`GreenChainApp::boot`], and route UI events to its methods.

use crate::balance::{BalanceSync, RefreshOutcome};
use crate::error::ClientError;
use crate::page::{Capabilities, PageContext};
use crate::rewards::RewardActions;
use crate::scan::{
    ClaimCode, DecodeOutcome, MintReceipt, PERMISSION_SETTLE_DELAY, QrScanner, RECOVERY_DELAY,
    RESTART_DELAY, ScanFlow, ScanOutcome, ScanState, StartOutcome,
};
use crate::timer::Timer;
use crate::view::{BalanceView, Notice, Renderer, ScanView};
use crate::wallet::{ConnectOutcome, WalletProvider, WalletSession};
use gc_api_types::{ValidateQrRequest, WalletAddress};
use gc_backend::RewardsBackend;
use gc_session::SessionStore;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay before the donation page re-reads balances after load.
pub const BALANCE_SETTLE_DELAY: Duration = Duration::from_millis(500);

pub struct AppParts {
    pub page: PageContext,
    pub provider: Rc<dyn WalletProvider>,
    pub sessions: SessionStore,
    pub backend: Rc<dyn RewardsBackend>,
    pub scanner: Option<Rc<dyn QrScanner>>,
    pub renderer: Rc<dyn Renderer>,
    pub timer: Rc<dyn Timer>,
}

pub struct GreenChainApp {
    page: PageContext,
    caps: Capabilities,
    wallet: WalletSession,
    balance: BalanceSync,
    scan: Option<ScanFlow>,
    rewards: RewardActions,
    backend: Rc<dyn RewardsBackend>,
    renderer: Rc<dyn Renderer>,
    timer: Rc<dyn Timer>,
}

impl GreenChainApp {
    pub fn new(parts: AppParts) -> Self {
        let caps = parts.page.capabilities();
        let scan = (caps.scanner || caps.manual_entry).then(|| {
            let scanner = parts.scanner.filter(|_| caps.scanner);
            ScanFlow::new(scanner)
        });

        Self {
            page: parts.page,
            caps,
            wallet: WalletSession::new(parts.provider, parts.sessions),
            balance: BalanceSync::new(parts.backend.clone()),
            scan,
            rewards: RewardActions::new(parts.backend.clone()),
            backend: parts.backend,
            renderer: parts.renderer,
            timer: parts.timer,
        }
    }

    pub fn page(&self) -> PageContext {
        self.page
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn wallet(&self) -> &WalletSession {
        &self.wallet
    }

    pub fn balance(&self) -> &BalanceSync {
        &self.balance
    }

    pub fn scan_state(&self) -> Option<ScanState> {
        self.scan.as_ref().map(ScanFlow::state)
    }

    pub fn is_scanner_live(&self) -> bool {
        self.scan.as_ref().is_some_and(ScanFlow::is_scanner_live)
    }

    fn notify_error(&self, err: ClientError) {
        warn!("{err}");
        self.renderer.notify(&Notice::Error(err));
    }

    // ── Wallet ──

    /// Page-load sequence: restore a saved session, fall back to the
    /// provider's selected account where the page allows it, then schedule
    /// the delayed balance read on pages that want one.
    pub async fn boot(&self) {
        info!("client starting on {} page", self.page.name());

        match self.wallet.auto_connect().await {
            Ok(_) => self.after_connect().await,
            Err(ClientError::NotConnected) => debug!("no saved wallet session"),
            Err(err) => debug!("saved session not restored: {err}"),
        }

        if self.wallet.address().is_none() && self.caps.resume_from_provider {
            if let Some(selected) = self.wallet.provider().selected_address() {
                debug!("wallet exposes {selected}, connecting");
                self.connect().await;
            }
        }

        if self.caps.refresh_balance_on_load && self.wallet.address().is_some() {
            self.timer.sleep(BALANCE_SETTLE_DELAY).await;
            self.refresh_balance().await;
        }
    }

    pub async fn connect(&self) {
        match self.wallet.connect().await {
            Ok(ConnectOutcome::Connected(_)) => self.after_connect().await,
            Ok(ConnectOutcome::AlreadyConnected(address)) => {
                self.renderer.wallet(self.page, Some(&address));
            }
            Err(ClientError::ConnectionPending) => debug!("connect ignored, prompt still open"),
            Err(err) => self.notify_error(err),
        }
    }

    /// Dependent steps of a fresh connection, in order: wallet display,
    /// scanner start, balance.
    async fn after_connect(&self) {
        let address = self.wallet.address();
        self.renderer.wallet(self.page, address.as_ref());

        if let Some(flow) = &self.scan {
            if flow.has_scanner() && flow.state() == ScanState::Idle {
                self.start_scanner().await;
            }
        }

        if self.caps.balance_display {
            self.refresh_balance().await;
        }
    }

    pub fn disconnect(&self) {
        if let Some(flow) = &self.scan {
            flow.reset();
        }
        self.wallet.disconnect();
        self.renderer.wallet(self.page, None);
        self.renderer.balance(&BalanceView::ConnectFirst);
    }

    // ── Balance ──

    pub async fn refresh_balance(&self) {
        let address = self.wallet.address();
        if address.is_none() {
            self.renderer.balance(&BalanceView::ConnectFirst);
            return;
        }

        self.renderer.balance(&BalanceView::Loading);
        match self.balance.refresh(address.as_ref()).await {
            Ok(RefreshOutcome::Current(snapshot)) => {
                self.renderer.balance(&BalanceView::Ready(snapshot));
            }
            Ok(RefreshOutcome::Superseded) => {
                self.renderer.balance(&BalanceView::Ready(self.balance.snapshot()));
            }
            Err(err) => {
                warn!("balance refresh failed: {err}");
                self.renderer.balance(&BalanceView::Failed(err.to_string()));
            }
        }
    }

    // ── Scanning ──

    pub async fn start_scanner(&self) {
        let Some(flow) = &self.scan else {
            return;
        };
        match flow.start().await {
            Ok(StartOutcome::Started) => self.renderer.scan(&ScanView::Cleared),
            Ok(StartOutcome::Busy) => {}
            Err(ClientError::CameraUnavailable) => {
                self.renderer.scan(&ScanView::CameraUnavailable);
            }
            Err(err) => self.renderer.scan(&ScanView::ScannerError(err.to_string())),
        }
    }

    pub async fn on_decoded(&self, payload: &str) {
        let Some(flow) = &self.scan else {
            return;
        };
        match flow.on_decoded(payload) {
            DecodeOutcome::Ignored => {}
            DecodeOutcome::Invalid => self.renderer.scan(&ScanView::InvalidCode),
            DecodeOutcome::Submit(code) => self.submit_claim(code).await,
        }
    }

    pub async fn submit_manual(&self, raw: &str) {
        let Some(flow) = &self.scan else {
            return;
        };
        match flow.begin_manual(raw) {
            Ok(code) => self.submit_claim(code).await,
            Err(err) => self.notify_error(err),
        }
    }

    async fn submit_claim(&self, code: ClaimCode) {
        let Some(flow) = &self.scan else {
            return;
        };
        let Some(address) = self.wallet.address() else {
            flow.resolve(ScanOutcome::Failed(ClientError::NotConnected.to_string()));
            self.renderer.scan(&ScanView::Failed(ClientError::NotConnected.to_string()));
            self.notify_error(ClientError::NotConnected);
            return;
        };

        let ticket = flow.submission();
        self.renderer.scan(&ScanView::Processing);
        let reply = self
            .backend
            .validate_qr(ValidateQrRequest {
                qr_code: code.as_str().to_owned(),
                wallet_address: address.to_string(),
            })
            .await;

        let stale = !flow.is_current_submission(ticket)
            || self.wallet.address().as_ref() != Some(&address);
        if stale {
            info!("reply for claim {} dropped, flow moved on", code.as_str());
            return;
        }

        match reply {
            Ok(reply) => {
                let receipt = MintReceipt::from(reply);
                info!(
                    "minted {} tokens for {address}, tx {}",
                    receipt.tokens_minted, receipt.transaction_hash
                );
                let snapshot = self.balance.apply(Some(receipt.new_balance), None);
                flow.resolve(ScanOutcome::Minted(receipt.clone()));
                self.renderer.scan(&ScanView::Minted(receipt));
                self.renderer.balance(&BalanceView::Ready(snapshot));
            }
            Err(err) => {
                let message = ClientError::from(err).to_string();
                warn!("claim {} rejected: {message}", code.as_str());
                flow.resolve(ScanOutcome::Failed(message.clone()));
                self.renderer.scan(&ScanView::Failed(message));
            }
        }
    }

    /// "Scan again": clear the result and bring the camera back.
    pub async fn restart_scanner(&self) {
        let Some(flow) = &self.scan else {
            return;
        };
        if flow.state() == ScanState::AwaitingServerResponse {
            debug!("restart ignored while a claim is being processed");
            return;
        }
        flow.reset();
        self.renderer.scan(&ScanView::Cleared);
        self.timer.sleep(RESTART_DELAY).await;
        if flow.state() == ScanState::Idle {
            self.start_scanner().await;
        }
    }

    pub async fn on_decode_error(&self, message: &str) {
        let Some(flow) = &self.scan else {
            return;
        };
        if !flow.on_decode_error(message) {
            return;
        }
        self.timer.sleep(RECOVERY_DELAY).await;
        if flow.state() == ScanState::Idle {
            self.start_scanner().await;
        } else {
            debug!("scanner recovery skipped, flow moved on");
        }
    }

    pub async fn request_camera_permission(&self) {
        let Some(scanner) = self.scan.as_ref().and_then(ScanFlow::scanner).cloned() else {
            self.renderer.scan(&ScanView::CameraUnavailable);
            return;
        };
        match scanner.request_camera_permission().await {
            Ok(()) => {
                info!("camera permission granted");
                self.renderer.scan(&ScanView::PermissionGranted);
                self.timer.sleep(PERMISSION_SETTLE_DELAY).await;
                self.start_scanner().await;
            }
            Err(err) => {
                warn!("camera permission denied: {err}");
                self.renderer.scan(&ScanView::PermissionDenied);
            }
        }
    }

    // ── Rewards ──

    /// Renders the NGO registry. A failed load is logged and the panel is
    /// left as it was.
    pub async fn show_donation_options(&self) -> Result<(), ClientError> {
        let ngos = self.rewards.ngos().await.inspect_err(|err| {
            warn!("failed to load NGOs: {err}");
        })?;
        debug!("loaded {} NGOs", ngos.len());
        self.renderer
            .donation_options(&ngos, self.balance.snapshot().donation_credits);
        Ok(())
    }

    pub async fn convert_tokens(&self, amount: u64) {
        let address = self.wallet.address();
        match self
            .rewards
            .convert_tokens(address.as_ref(), amount, &self.balance)
            .await
        {
            Ok(receipt) => {
                self.renderer.notify(&Notice::Success(receipt.message));
                self.renderer.balance(&BalanceView::Ready(receipt.balance));
                self.show_donation_options().await.ok();
            }
            Err(err) => self.notify_error(err),
        }
    }

    pub async fn donate(&self, ngo_address: &str, amount: u64) {
        let address = self.wallet.address();
        match self
            .rewards
            .donate(address.as_ref(), ngo_address, amount, &self.balance)
            .await
        {
            Ok(receipt) => {
                self.renderer.notify(&Notice::Success(receipt.message));
                self.renderer.balance(&BalanceView::Ready(receipt.balance));
                self.show_donation_options().await.ok();
            }
            Err(err) => self.notify_error(err),
        }
    }

    pub fn address(&self) -> Option<WalletAddress> {
        self.wallet.address()
    }
}
