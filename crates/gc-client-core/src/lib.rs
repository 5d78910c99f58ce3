//! Runtime-free core of the GreenChain recycling-rewards client.
//!
//! Everything that touches the outside world (wallet, backend, camera,
//! storage, rendering, timers) sits behind a trait, so the same core drives
//! the browser build and the terminal client.

pub mod app;
pub mod balance;
pub mod error;
pub mod page;
pub mod rewards;
pub mod scan;
pub mod timer;
pub mod view;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use app::{AppParts, BALANCE_SETTLE_DELAY, GreenChainApp};
pub use balance::{BalanceSnapshot, BalanceSync, RefreshOutcome};
pub use error::ClientError;
pub use page::{Capabilities, PageContext};
pub use rewards::{ActionReceipt, RewardActions};
pub use scan::{
    CLAIM_PREFIX, ClaimCode, DecodeOutcome, MintReceipt, QrScanner, ScanFlow, ScanOutcome,
    ScanState, ScannerError, StartOutcome,
};
pub use timer::Timer;
pub use view::{BalanceView, Notice, Renderer, ScanView};
pub use wallet::{ConnectOutcome, ConnectionState, ProviderError, WalletProvider, WalletSession};
