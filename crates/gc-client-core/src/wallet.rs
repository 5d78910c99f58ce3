//! Wallet session manager.
//!
//! States: `Disconnected` → `Connecting` → `Connected`.
//! A stored session is only adopted when the provider still authorizes the
//! same account.

use crate::error::ClientError;
use async_trait::async_trait;
use gc_api_types::WalletAddress;
use gc_session::SessionStore;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProviderError(pub String);

/// Injected wallet (MetaMask or compatible). Signing stays inside the wallet.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn is_available(&self) -> bool;
    /// Prompts the user for account access.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;
    /// Accounts already authorized for this origin; never prompts.
    async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError>;
    async fn signer_address(&self) -> Result<String, ProviderError>;

    /// Account the wallet currently exposes without a request, if any.
    fn selected_address(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(WalletAddress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(WalletAddress),
    AlreadyConnected(WalletAddress),
}

impl ConnectOutcome {
    pub fn address(&self) -> &WalletAddress {
        match self {
            ConnectOutcome::Connected(address) | ConnectOutcome::AlreadyConnected(address) => {
                address
            }
        }
    }
}

pub struct WalletSession {
    provider: Rc<dyn WalletProvider>,
    sessions: SessionStore,
    state: RefCell<ConnectionState>,
}

impl WalletSession {
    pub fn new(provider: Rc<dyn WalletProvider>, sessions: SessionStore) -> Self {
        Self {
            provider,
            sessions,
            state: RefCell::new(ConnectionState::Disconnected),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn address(&self) -> Option<WalletAddress> {
        match &*self.state.borrow() {
            ConnectionState::Connected(address) => Some(address.clone()),
            _ => None,
        }
    }

    pub fn provider(&self) -> &Rc<dyn WalletProvider> {
        &self.provider
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.borrow_mut() = state;
    }

    pub async fn connect(&self) -> Result<ConnectOutcome, ClientError> {
        match self.state() {
            ConnectionState::Connected(address) => {
                debug!("connect requested while connected as {address}");
                return Ok(ConnectOutcome::AlreadyConnected(address));
            }
            ConnectionState::Connecting => return Err(ClientError::ConnectionPending),
            ConnectionState::Disconnected => {}
        }

        if !self.provider.is_available() {
            warn!("connect attempted without a wallet provider");
            return Err(ClientError::ProviderUnavailable);
        }

        self.set_state(ConnectionState::Connecting);
        match self.authorize().await {
            Ok(address) => {
                self.set_state(ConnectionState::Connected(address.clone()));
                self.sessions.save(address.as_str());
                info!("wallet connected: {address}");
                Ok(ConnectOutcome::Connected(address))
            }
            Err(err) => {
                self.set_state(ConnectionState::Disconnected);
                warn!("wallet connection failed: {err}");
                Err(ClientError::ConnectionRejected(err.0))
            }
        }
    }

    async fn authorize(&self) -> Result<WalletAddress, ProviderError> {
        let granted = self.provider.request_accounts().await?;
        if granted.is_empty() {
            return Err(ProviderError("no accounts authorized".to_owned()));
        }
        let address = self.provider.signer_address().await?;
        if address.trim().is_empty() {
            return Err(ProviderError("wallet returned an empty address".to_owned()));
        }
        Ok(WalletAddress::new(address.trim()))
    }

    /// Restore a saved session without prompting the user.
    pub async fn auto_connect(&self) -> Result<WalletAddress, ClientError> {
        if let Some(address) = self.address() {
            return Ok(address);
        }

        let Some(record) = self.sessions.load() else {
            return Err(ClientError::NotConnected);
        };
        let stored = WalletAddress::new(record.address);

        if !self.provider.is_available() {
            debug!("saved session for {stored} dropped: no wallet provider");
            self.discard();
            return Err(ClientError::SessionExpiredOrMismatched);
        }

        let accounts = match self.provider.authorized_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!("auto-connect account query failed: {err}");
                self.discard();
                return Err(ClientError::SessionExpiredOrMismatched);
            }
        };

        match accounts.first() {
            Some(first) if stored.matches(first) => {
                let address = WalletAddress::new(first.trim());
                self.set_state(ConnectionState::Connected(address.clone()));
                info!("wallet session restored for {address}");
                Ok(address)
            }
            Some(first) => {
                debug!("saved session for {stored} does not match wallet account {first}");
                self.discard();
                Err(ClientError::SessionExpiredOrMismatched)
            }
            None => {
                debug!("saved session for {stored} dropped: wallet has no authorized accounts");
                self.discard();
                Err(ClientError::SessionExpiredOrMismatched)
            }
        }
    }

    pub fn disconnect(&self) {
        self.discard();
        info!("wallet disconnected");
    }

    fn discard(&self) {
        self.sessions.clear();
        self.set_state(ConnectionState::Disconnected);
    }
}
