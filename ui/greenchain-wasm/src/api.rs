//! Rewards API over `fetch`.
//!
//! `base_url()` honours an optional `#baseUrl` input and otherwise talks to
//! the origin that served the page.

use crate::dom;
use async_trait::async_trait;
use gc_api_types::{
    BalanceResponse, ConvertTokensRequest, ConvertTokensResponse, DonateRequest, DonateResponse,
    Ngo, NgoListResponse, ValidateQrRequest, ValidateQrResponse, WalletAddress,
};
use gc_backend::{
    BackendError, CONVERT_TOKENS_PATH, DONATE_PATH, NGOS_PATH, RewardsBackend, VALIDATE_QR_PATH,
    balance_path, decode_body,
};
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn base_url() -> String {
    dom::input_value(dom::BASE_URL)
        .filter(|value| !value.is_empty())
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_default()
}

pub struct FetchRewardsBackend;

impl FetchRewardsBackend {
    fn url(path: &str) -> String {
        format!("{}{}", base_url(), path)
    }

    async fn get<T: DeserializeOwned>(path: &str) -> Result<T, BackendError> {
        let response = Request::get(&Self::url(path))
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Self::read(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = Request::post(&Self::url(path))
            .json(body)
            .map_err(|err| BackendError::Transport(err.to_string()))?
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        decode_body(status, &text)
    }
}

#[async_trait(?Send)]
impl RewardsBackend for FetchRewardsBackend {
    async fn validate_qr(
        &self,
        req: ValidateQrRequest,
    ) -> Result<ValidateQrResponse, BackendError> {
        Self::post(VALIDATE_QR_PATH, &req).await
    }

    async fn balance(
        &self,
        wallet_address: &WalletAddress,
    ) -> Result<BalanceResponse, BackendError> {
        Self::get(&balance_path(wallet_address)).await
    }

    async fn ngos(&self) -> Result<Vec<Ngo>, BackendError> {
        let reply: NgoListResponse = Self::get(NGOS_PATH).await?;
        Ok(reply.ngos)
    }

    async fn convert_tokens(
        &self,
        req: ConvertTokensRequest,
    ) -> Result<ConvertTokensResponse, BackendError> {
        Self::post(CONVERT_TOKENS_PATH, &req).await
    }

    async fn donate(&self, req: DonateRequest) -> Result<DonateResponse, BackendError> {
        Self::post(DONATE_PATH, &req).await
    }
}
