//! Token conversion and NGO donation.
//!
//! The balance checks here only spare a round trip; the server decides.

use crate::balance::{BalanceSnapshot, BalanceSync};
use crate::error::ClientError;
use gc_api_types::{ConvertTokensRequest, DonateRequest, Ngo, WalletAddress};
use gc_backend::RewardsBackend;
use std::rc::Rc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    pub message: String,
    pub balance: BalanceSnapshot,
}

pub struct RewardActions {
    backend: Rc<dyn RewardsBackend>,
}

impl RewardActions {
    pub fn new(backend: Rc<dyn RewardsBackend>) -> Self {
        Self { backend }
    }

    pub async fn ngos(&self) -> Result<Vec<Ngo>, ClientError> {
        Ok(self.backend.ngos().await?)
    }

    pub async fn convert_tokens(
        &self,
        address: Option<&WalletAddress>,
        amount: u64,
        balance: &BalanceSync,
    ) -> Result<ActionReceipt, ClientError> {
        let address = address.ok_or(ClientError::NotConnected)?;
        if amount == 0 {
            return Err(ClientError::InvalidAmount);
        }
        let available = balance.snapshot().token_balance;
        if amount > available {
            return Err(ClientError::InsufficientTokens {
                requested: amount,
                available,
            });
        }

        let reply = self
            .backend
            .convert_tokens(ConvertTokensRequest {
                wallet_address: address.to_string(),
                amount,
            })
            .await?;

        info!("converted {amount} tokens for {address}");
        let snapshot = balance.apply(
            Some(reply.new_token_balance),
            Some(reply.new_credits_balance),
        );
        Ok(ActionReceipt {
            message: reply.message,
            balance: snapshot,
        })
    }

    pub async fn donate(
        &self,
        address: Option<&WalletAddress>,
        ngo_address: &str,
        amount: u64,
        balance: &BalanceSync,
    ) -> Result<ActionReceipt, ClientError> {
        let address = address.ok_or(ClientError::NotConnected)?;
        let ngo_address = ngo_address.trim();
        if ngo_address.is_empty() {
            return Err(ClientError::NoNgoSelected);
        }
        if amount == 0 {
            return Err(ClientError::InvalidAmount);
        }
        let available = balance.snapshot().donation_credits;
        if amount > available {
            return Err(ClientError::InsufficientCredits {
                requested: amount,
                available,
            });
        }

        let reply = self
            .backend
            .donate(DonateRequest {
                wallet_address: address.to_string(),
                ngo_address: ngo_address.to_owned(),
                amount,
            })
            .await?;

        info!("donated {amount} credits from {address} to {ngo_address}");
        let snapshot = balance.apply(None, Some(reply.new_credits_balance));
        Ok(ActionReceipt {
            message: reply.message,
            balance: snapshot,
        })
    }
}
