//! QR capture state machine.
//!
//! `Idle` → `Scanning` → `AwaitingServerResponse` → `Resolved`, with manual
//! entry joining at `AwaitingServerResponse`. The camera scanner is the only
//! exclusive resource: at most one is live, and it is released before the
//! flow leaves `Scanning`.

use crate::error::ClientError;
use async_trait::async_trait;
use gc_api_types::ValidateQrResponse;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CLAIM_PREFIX: &str = "greenchain-claim-";

/// Canvas fault some camera stacks raise mid-scan; the scanner recovers by
/// being torn down and rebuilt.
pub const SIZING_FAULT: &str = "IndexSizeError";

pub const RESTART_DELAY: Duration = Duration::from_millis(500);
pub const RECOVERY_DELAY: Duration = Duration::from_secs(1);
pub const PERMISSION_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCode(String);

impl ClaimCode {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        if raw.starts_with(CLAIM_PREFIX) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ClientError::InvalidQrFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub message: String,
    pub tokens_minted: u64,
    pub new_balance: u64,
    pub transaction_hash: String,
}

impl From<ValidateQrResponse> for MintReceipt {
    fn from(reply: ValidateQrResponse) -> Self {
        Self {
            message: reply.message,
            tokens_minted: reply.tokens_minted,
            new_balance: reply.new_balance,
            transaction_hash: reply.transaction_hash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Invalid,
    Minted(MintReceipt),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    AwaitingServerResponse,
    Resolved(ScanOutcome),
}

impl ScanState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ScanState::Scanning | ScanState::AwaitingServerResponse)
    }

    pub fn can_restart(&self) -> bool {
        matches!(self, ScanState::Resolved(_))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ScannerError(pub String);

/// Camera-backed QR scanner. Decodes and decode errors are delivered by the
/// host back into the client.
#[async_trait(?Send)]
pub trait QrScanner {
    async fn has_camera(&self) -> Result<bool, ScannerError>;
    async fn start(&self) -> Result<(), ScannerError>;
    fn stop(&self);
    async fn request_camera_permission(&self) -> Result<(), ScannerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Another start, a scan or a submission already owns the flow.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Ignored,
    Invalid,
    Submit(ClaimCode),
}

pub struct ScanFlow {
    scanner: Option<Rc<dyn QrScanner>>,
    state: RefCell<ScanState>,
    live: Cell<bool>,
    submissions: Cell<u64>,
}

impl ScanFlow {
    pub fn new(scanner: Option<Rc<dyn QrScanner>>) -> Self {
        Self {
            scanner,
            state: RefCell::new(ScanState::Idle),
            live: Cell::new(false),
            submissions: Cell::new(0),
        }
    }

    /// Flow for hosts without a camera: claim codes arrive by manual entry.
    pub fn manual_only() -> Self {
        Self::new(None)
    }

    pub fn state(&self) -> ScanState {
        self.state.borrow().clone()
    }

    pub fn is_scanner_live(&self) -> bool {
        self.live.get()
    }

    pub fn scanner(&self) -> Option<&Rc<dyn QrScanner>> {
        self.scanner.as_ref()
    }

    pub fn has_scanner(&self) -> bool {
        self.scanner.is_some()
    }

    fn set_state(&self, state: ScanState) {
        *self.state.borrow_mut() = state;
    }

    fn still_scanning(&self) -> bool {
        *self.state.borrow() == ScanState::Scanning
    }

    fn await_server(&self) {
        self.submissions.set(self.submissions.get() + 1);
        self.set_state(ScanState::AwaitingServerResponse);
    }

    /// Stamp of the latest claim handed to the server.
    pub fn submission(&self) -> u64 {
        self.submissions.get()
    }

    /// True while `ticket` is still the claim the flow is waiting on.
    pub fn is_current_submission(&self, ticket: u64) -> bool {
        self.submissions.get() == ticket
            && *self.state.borrow() == ScanState::AwaitingServerResponse
    }

    fn release(&self) {
        if self.live.replace(false) {
            if let Some(scanner) = &self.scanner {
                scanner.stop();
            }
            debug!("scanner released");
        }
    }

    pub async fn start(&self) -> Result<StartOutcome, ClientError> {
        let Some(scanner) = self.scanner.clone() else {
            return Err(ClientError::CameraUnavailable);
        };
        {
            let mut state = self.state.borrow_mut();
            if state.is_busy() {
                debug!("scanner start ignored in state {:?}", *state);
                return Ok(StartOutcome::Busy);
            }
            *state = ScanState::Scanning;
        }
        self.release();

        match scanner.has_camera().await {
            Ok(true) => {}
            Ok(false) => {
                self.abandon_start();
                return Err(ClientError::CameraUnavailable);
            }
            Err(err) => {
                self.abandon_start();
                return Err(ClientError::Scanner(err.0));
            }
        }
        if !self.still_scanning() {
            return Ok(StartOutcome::Busy);
        }

        if let Err(err) = scanner.start().await {
            warn!("scanner failed to start: {err}");
            self.abandon_start();
            return Err(ClientError::Scanner(err.0));
        }
        self.live.set(true);

        if !self.still_scanning() {
            self.release();
            return Ok(StartOutcome::Busy);
        }
        info!("scanner started");
        Ok(StartOutcome::Started)
    }

    fn abandon_start(&self) {
        if self.still_scanning() {
            self.set_state(ScanState::Idle);
        }
    }

    /// Accepts the first decode of a scan session and releases the scanner.
    pub fn on_decoded(&self, payload: &str) -> DecodeOutcome {
        if !self.still_scanning() {
            debug!("decode ignored outside of scanning");
            return DecodeOutcome::Ignored;
        }
        self.release();

        match ClaimCode::parse(payload) {
            Ok(code) => {
                self.await_server();
                DecodeOutcome::Submit(code)
            }
            Err(_) => {
                info!("scanned payload is not a claim code");
                self.set_state(ScanState::Resolved(ScanOutcome::Invalid));
                DecodeOutcome::Invalid
            }
        }
    }

    /// Typed claim codes join the flow at the submit step.
    pub fn begin_manual(&self, raw: &str) -> Result<ClaimCode, ClientError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ClientError::MissingClaimCode);
        }
        let code = ClaimCode::parse(raw)?;
        if *self.state.borrow() == ScanState::AwaitingServerResponse {
            return Err(ClientError::SubmissionInFlight);
        }

        self.release();
        self.await_server();
        Ok(code)
    }

    pub fn resolve(&self, outcome: ScanOutcome) {
        self.release();
        self.set_state(ScanState::Resolved(outcome));
    }

    pub fn reset(&self) {
        self.release();
        self.set_state(ScanState::Idle);
    }

    /// Returns true when the error needs a scanner rebuild.
    pub fn on_decode_error(&self, message: &str) -> bool {
        debug!("scan decode error: {message}");
        if !message.contains(SIZING_FAULT) || !self.still_scanning() {
            return false;
        }
        warn!("scanner hit {SIZING_FAULT}, rebuilding");
        self.release();
        self.set_state(ScanState::Idle);
        true
    }
}
