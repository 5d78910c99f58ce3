//! Terminal implementations of the client's wallet and timer seams.

use async_trait::async_trait;
use gc_client_core::{ProviderError, Timer, WalletProvider};
use std::time::Duration;

/// Wallet backed by a configured address. Without one, the terminal behaves
/// like a browser with no wallet extension installed.
pub(crate) struct ConfiguredWallet {
    address: Option<String>,
}

impl ConfiguredWallet {
    pub(crate) fn new(address: Option<String>) -> Self {
        Self { address }
    }

    fn accounts(&self) -> Vec<String> {
        self.address.iter().cloned().collect()
    }
}

#[async_trait(?Send)]
impl WalletProvider for ConfiguredWallet {
    fn is_available(&self) -> bool {
        self.address.is_some()
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.accounts())
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.accounts())
    }

    async fn signer_address(&self) -> Result<String, ProviderError> {
        self.address
            .clone()
            .ok_or_else(|| ProviderError("GREENCHAIN_WALLET_ADDRESS is not set".to_owned()))
    }
}

pub(crate) struct TokioTimer;

#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
