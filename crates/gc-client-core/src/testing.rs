//! Scripted collaborators for unit tests.

use crate::page::PageContext;
use crate::scan::{QrScanner, ScannerError};
use crate::timer::Timer;
use crate::view::{BalanceView, Notice, Renderer, ScanView};
use crate::wallet::{ProviderError, WalletProvider};
use async_trait::async_trait;
use gc_api_types::{
    BalanceResponse, ConvertTokensRequest, ConvertTokensResponse, DonateRequest, DonateResponse,
    Ngo, ValidateQrRequest, ValidateQrResponse, WalletAddress,
};
use gc_backend::{BackendError, RewardsBackend};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

// ── Wallet provider ──

pub struct FakeProvider {
    available: bool,
    accounts: Vec<String>,
    rejection: Option<String>,
    silent_query_fails: bool,
    selected: Option<String>,
    prompt_gate: Option<Gate>,
    prompts: Cell<u32>,
}

impl FakeProvider {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self {
            available: true,
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            rejection: None,
            silent_query_fails: false,
            selected: None,
            prompt_gate: None,
            prompts: Cell::new(0),
        }
    }

    pub fn with_account(account: &str) -> Self {
        Self::with_accounts(&[account])
    }

    pub fn absent() -> Self {
        Self {
            available: false,
            ..Self::with_accounts(&[])
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            rejection: Some(message.to_owned()),
            ..Self::with_accounts(&[])
        }
    }

    pub fn failing_silent_query(mut self) -> Self {
        self.silent_query_fails = true;
        self
    }

    pub fn selecting(mut self, account: &str) -> Self {
        self.selected = Some(account.to_owned());
        self
    }

    /// The authorization prompt stays open until `gate` is opened.
    pub fn holding_prompt(mut self, gate: &Gate) -> Self {
        self.prompt_gate = Some(gate.clone());
        self
    }

    pub fn prompts(&self) -> u32 {
        self.prompts.get()
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.prompts.set(self.prompts.get() + 1);
        if let Some(gate) = &self.prompt_gate {
            gate.wait().await;
        }
        match &self.rejection {
            Some(message) => Err(ProviderError(message.clone())),
            None => Ok(self.accounts.clone()),
        }
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        if self.silent_query_fails {
            return Err(ProviderError("provider disconnected".to_owned()));
        }
        Ok(self.accounts.clone())
    }

    async fn signer_address(&self) -> Result<String, ProviderError> {
        self.accounts
            .first()
            .cloned()
            .ok_or_else(|| ProviderError("no signer".to_owned()))
    }

    fn selected_address(&self) -> Option<String> {
        self.selected.clone()
    }
}

// ── Backend ──

/// Holds a scripted reply back until opened.
#[derive(Clone, Default)]
pub struct Gate(Rc<Cell<bool>>);

impl Gate {
    pub fn open(&self) {
        self.0.set(true);
    }

    async fn wait(&self) {
        while !self.0.get() {
            tokio::task::yield_now().await;
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    balances: RefCell<VecDeque<Result<BalanceResponse, BackendError>>>,
    mints: RefCell<VecDeque<Result<ValidateQrResponse, BackendError>>>,
    converts: RefCell<VecDeque<Result<ConvertTokensResponse, BackendError>>>,
    donations: RefCell<VecDeque<Result<DonateResponse, BackendError>>>,
    ngo_list: RefCell<Option<Result<Vec<Ngo>, BackendError>>>,
    balance_gate: RefCell<Option<Gate>>,
    mint_gate: RefCell<Option<Gate>>,
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn push_balance(&self, reply: Result<(u64, u64), BackendError>) {
        self.balances.borrow_mut().push_back(reply.map(|(tokens, credits)| BalanceResponse {
            token_balance: tokens,
            credits_balance: credits,
        }));
    }

    pub fn push_mint(&self, reply: Result<(u64, u64, &str), BackendError>) {
        self.mints
            .borrow_mut()
            .push_back(reply.map(|(minted, new_balance, hash)| ValidateQrResponse {
                message: format!("Minted {minted} tokens"),
                tokens_minted: minted,
                new_balance,
                transaction_hash: hash.to_owned(),
            }));
    }

    pub fn push_convert(&self, reply: Result<(&str, u64, u64), BackendError>) {
        self.converts
            .borrow_mut()
            .push_back(reply.map(|(message, tokens, credits)| ConvertTokensResponse {
                message: message.to_owned(),
                new_token_balance: tokens,
                new_credits_balance: credits,
            }));
    }

    pub fn push_donate(&self, reply: Result<(&str, u64), BackendError>) {
        self.donations
            .borrow_mut()
            .push_back(reply.map(|(message, credits)| DonateResponse {
                message: message.to_owned(),
                new_credits_balance: credits,
            }));
    }

    pub fn set_ngos(&self, reply: Result<Vec<Ngo>, BackendError>) {
        *self.ngo_list.borrow_mut() = Some(reply);
    }

    pub fn hold_next_balance(&self) -> Gate {
        let gate = Gate::default();
        *self.balance_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    pub fn hold_next_mint(&self) -> Gate {
        let gate = Gate::default();
        *self.mint_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn unscripted<T>(what: &str) -> Result<T, BackendError> {
    Err(BackendError::Transport(format!("no scripted {what} reply")))
}

#[async_trait(?Send)]
impl RewardsBackend for FakeBackend {
    async fn validate_qr(
        &self,
        req: ValidateQrRequest,
    ) -> Result<ValidateQrResponse, BackendError> {
        self.record(format!("validate-qr {} {}", req.qr_code, req.wallet_address));
        let gate = self.mint_gate.borrow_mut().take();
        let reply = self.mints.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        reply.unwrap_or_else(|| unscripted("mint"))
    }

    async fn balance(
        &self,
        wallet_address: &WalletAddress,
    ) -> Result<BalanceResponse, BackendError> {
        self.record(format!("balance {wallet_address}"));
        let gate = self.balance_gate.borrow_mut().take();
        let reply = self.balances.borrow_mut().pop_front();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        reply.unwrap_or_else(|| unscripted("balance"))
    }

    async fn ngos(&self) -> Result<Vec<Ngo>, BackendError> {
        self.record("ngos".to_owned());
        let reply = self.ngo_list.borrow().clone();
        reply.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn convert_tokens(
        &self,
        req: ConvertTokensRequest,
    ) -> Result<ConvertTokensResponse, BackendError> {
        self.record(format!("convert-tokens {} {}", req.wallet_address, req.amount));
        let reply = self.converts.borrow_mut().pop_front();
        reply.unwrap_or_else(|| unscripted("convert"))
    }

    async fn donate(&self, req: DonateRequest) -> Result<DonateResponse, BackendError> {
        self.record(format!(
            "donate {} {} {}",
            req.wallet_address, req.ngo_address, req.amount
        ));
        let reply = self.donations.borrow_mut().pop_front();
        reply.unwrap_or_else(|| unscripted("donate"))
    }
}

// ── Scanner ──

pub struct FakeScanner {
    camera: Cell<bool>,
    start_failure: Option<String>,
    grants_permission: bool,
    starts: Cell<u32>,
    stops: Cell<u32>,
    live: Cell<u32>,
}

impl FakeScanner {
    fn build(camera: bool) -> Self {
        Self {
            camera: Cell::new(camera),
            start_failure: None,
            grants_permission: true,
            starts: Cell::new(0),
            stops: Cell::new(0),
            live: Cell::new(0),
        }
    }

    pub fn with_camera() -> Self {
        Self::build(true)
    }

    pub fn without_camera() -> Self {
        Self::build(false)
    }

    pub fn failing_start(mut self, message: &str) -> Self {
        self.start_failure = Some(message.to_owned());
        self
    }

    pub fn denying_permission(mut self) -> Self {
        self.grants_permission = false;
        self
    }

    pub fn starts(&self) -> u32 {
        self.starts.get()
    }

    pub fn stops(&self) -> u32 {
        self.stops.get()
    }

    pub fn live_count(&self) -> u32 {
        self.live.get()
    }
}

#[async_trait(?Send)]
impl QrScanner for FakeScanner {
    async fn has_camera(&self) -> Result<bool, ScannerError> {
        Ok(self.camera.get())
    }

    async fn start(&self) -> Result<(), ScannerError> {
        if let Some(message) = &self.start_failure {
            return Err(ScannerError(message.clone()));
        }
        self.starts.set(self.starts.get() + 1);
        self.live.set(self.live.get() + 1);
        Ok(())
    }

    fn stop(&self) {
        self.stops.set(self.stops.get() + 1);
        self.live.set(self.live.get().saturating_sub(1));
    }

    async fn request_camera_permission(&self) -> Result<(), ScannerError> {
        if self.grants_permission {
            self.camera.set(true);
            Ok(())
        } else {
            Err(ScannerError("Permission denied".to_owned()))
        }
    }
}

// ── Renderer & timer ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Wallet(PageContext, Option<String>),
    Balance(BalanceView),
    Scan(ScanView),
    Donation(Vec<Ngo>, u64),
    Notice(Notice),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: RefCell<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<Rendered> {
        self.events.borrow().clone()
    }

    pub fn balances(&self) -> Vec<BalanceView> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Rendered::Balance(view) => Some(view.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_balance(&self) -> Option<BalanceView> {
        self.balances().pop()
    }

    pub fn last_scan(&self) -> Option<ScanView> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            Rendered::Scan(view) => Some(view.clone()),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Rendered::Notice(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn wallet(&self, page: PageContext, address: Option<&WalletAddress>) {
        self.events
            .borrow_mut()
            .push(Rendered::Wallet(page, address.map(|a| a.to_string())));
    }

    fn balance(&self, view: &BalanceView) {
        self.events.borrow_mut().push(Rendered::Balance(view.clone()));
    }

    fn scan(&self, view: &ScanView) {
        self.events.borrow_mut().push(Rendered::Scan(view.clone()));
    }

    fn donation_options(&self, ngos: &[Ngo], available_credits: u64) {
        self.events
            .borrow_mut()
            .push(Rendered::Donation(ngos.to_vec(), available_credits));
    }

    fn notify(&self, notice: &Notice) {
        self.events.borrow_mut().push(Rendered::Notice(notice.clone()));
    }
}

#[derive(Default)]
pub struct RecordingTimer {
    sleeps: RefCell<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
