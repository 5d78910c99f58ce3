use async_trait::async_trait;
use gc_api_types::{
    BalanceResponse, ConvertTokensRequest, ConvertTokensResponse, DonateRequest, DonateResponse,
    Ngo, ReplyStatus, ValidateQrRequest, ValidateQrResponse, WalletAddress,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const VALIDATE_QR_PATH: &str = "/api/validate-qr";
pub const NGOS_PATH: &str = "/api/ngos";
pub const CONVERT_TOKENS_PATH: &str = "/api/convert-tokens";
pub const DONATE_PATH: &str = "/api/donate";

pub fn balance_path(wallet_address: &WalletAddress) -> String {
    format!("/api/balance/{}", wallet_address.as_str())
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to connect to server: {0}")]
    Transport(String),
    #[error("unexpected server reply: {0}")]
    Decode(String),
}

/// Rewards backend as seen by the client. Every business rule lives behind it.
#[async_trait(?Send)]
pub trait RewardsBackend {
    async fn validate_qr(
        &self,
        req: ValidateQrRequest,
    ) -> Result<ValidateQrResponse, BackendError>;
    async fn balance(
        &self,
        wallet_address: &WalletAddress,
    ) -> Result<BalanceResponse, BackendError>;
    async fn ngos(&self) -> Result<Vec<Ngo>, BackendError>;
    async fn convert_tokens(
        &self,
        req: ConvertTokensRequest,
    ) -> Result<ConvertTokensResponse, BackendError>;
    async fn donate(&self, req: DonateRequest) -> Result<DonateResponse, BackendError>;
}

/// Decode a backend reply, turning `{success: false, error}` into
/// [`BackendError::Rejected`]. Replies without a `success` field count as
/// successful unless they carry an `error`.
pub fn decode_reply<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, BackendError> {
    let status: ReplyStatus = serde_json::from_value(value.clone()).unwrap_or_default();

    let failed = match status.success {
        Some(success) => !success,
        None => status.error.is_some(),
    };
    if failed {
        return Err(BackendError::Rejected(
            status.error.unwrap_or_else(|| "request failed".to_owned()),
        ));
    }

    serde_json::from_value(value).map_err(|err| BackendError::Decode(err.to_string()))
}

/// Decode a raw HTTP body. Error statuses still carry JSON bodies with an
/// `error` field, so the body is inspected before the status.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, BackendError> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            if !(200..300).contains(&status) && value.get("success").is_none() {
                let error = value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                return Err(BackendError::Rejected(error));
            }
            decode_reply(value)
        }
        Err(_) => Err(BackendError::Transport(format!("HTTP {status}: {body}"))),
    }
}
