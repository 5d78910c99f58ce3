//! Rendering seam between the client state and whatever draws it.
//!
//! Hosts implement [`Renderer`]; an element that does not exist on the
//! current page is skipped by the host, never reported as an error.

use crate::balance::BalanceSnapshot;
use crate::error::ClientError;
use crate::page::PageContext;
use crate::scan::MintReceipt;
use gc_api_types::{Ngo, WalletAddress};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceView {
    ConnectFirst,
    Loading,
    Ready(BalanceSnapshot),
    Failed(String),
}

impl fmt::Display for BalanceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceView::ConnectFirst => f.write_str("Please connect wallet first"),
            BalanceView::Loading => f.write_str("Loading..."),
            BalanceView::Ready(snapshot) => write!(
                f,
                "Token Balance: {} tokens, Donation Credits: {} credits",
                snapshot.token_balance, snapshot.donation_credits
            ),
            BalanceView::Failed(message) => write!(f, "Error - {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanView {
    Cleared,
    Processing,
    InvalidCode,
    Minted(MintReceipt),
    Failed(String),
    CameraUnavailable,
    PermissionGranted,
    PermissionDenied,
    ScannerError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(ClientError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(message) => write!(f, "✅ {message}"),
            Notice::Error(err) => write!(f, "❌ {err}"),
        }
    }
}

pub trait Renderer {
    fn wallet(&self, page: PageContext, address: Option<&WalletAddress>);
    fn balance(&self, view: &BalanceView);
    fn scan(&self, view: &ScanView);
    fn donation_options(&self, ngos: &[Ngo], available_credits: u64);
    fn notify(&self, notice: &Notice);
}
