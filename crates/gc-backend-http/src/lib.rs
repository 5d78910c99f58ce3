use async_trait::async_trait;
use gc_api_types::{
    BalanceResponse, ConvertTokensRequest, ConvertTokensResponse, DonateRequest, DonateResponse,
    Ngo, NgoListResponse, ValidateQrRequest, ValidateQrResponse, WalletAddress,
};
use gc_backend::{
    BackendError, CONVERT_TOKENS_PATH, DONATE_PATH, NGOS_PATH, RewardsBackend, VALIDATE_QR_PATH,
    balance_path, decode_body,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// HTTP adapter for the GreenChain rewards API.
///
/// Reads `GREENCHAIN_API_URL` from environment at construction time
/// (default: `http://localhost:5000`).
pub struct HttpRewardsBackend {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for HttpRewardsBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpRewardsBackend {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("GREENCHAIN_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Self::read(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        decode_body(status, &text)
    }
}

#[async_trait(?Send)]
impl RewardsBackend for HttpRewardsBackend {
    async fn validate_qr(
        &self,
        req: ValidateQrRequest,
    ) -> Result<ValidateQrResponse, BackendError> {
        self.post(VALIDATE_QR_PATH, &req).await
    }

    async fn balance(
        &self,
        wallet_address: &WalletAddress,
    ) -> Result<BalanceResponse, BackendError> {
        self.get(&balance_path(wallet_address)).await
    }

    async fn ngos(&self) -> Result<Vec<Ngo>, BackendError> {
        let list: NgoListResponse = self.get(NGOS_PATH).await?;
        Ok(list.ngos)
    }

    async fn convert_tokens(
        &self,
        req: ConvertTokensRequest,
    ) -> Result<ConvertTokensResponse, BackendError> {
        self.post(CONVERT_TOKENS_PATH, &req).await
    }

    async fn donate(&self, req: DonateRequest) -> Result<DonateResponse, BackendError> {
        self.post(DONATE_PATH, &req).await
    }
}
