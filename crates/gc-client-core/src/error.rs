use gc_backend::BackendError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Please install MetaMask from https://metamask.io/")]
    ProviderUnavailable,
    #[error("MetaMask wallet address not found: {0}")]
    ConnectionRejected(String),
    #[error("wallet connection already in progress")]
    ConnectionPending,
    #[error("saved wallet session expired or no longer matches the wallet")]
    SessionExpiredOrMismatched,
    #[error("Invalid QR code format. Must start with 'greenchain-claim-'")]
    InvalidQrFormat,
    #[error("Please enter a QR code")]
    MissingClaimCode,
    #[error("a claim is already being processed")]
    SubmissionInFlight,
    #[error("{0}")]
    Server(String),
    #[error("No camera found. Please ensure your device has a camera and grant camera permissions.")]
    CameraUnavailable,
    #[error("Failed to initialize QR scanner: {0}")]
    Scanner(String),
    #[error("Please connect your wallet first!")]
    NotConnected,
    #[error("Please enter an amount greater than zero")]
    InvalidAmount,
    #[error("Not enough tokens! You only have {available} tokens.")]
    InsufficientTokens { requested: u64, available: u64 },
    #[error("Not enough donation credits! You only have {available} credits.")]
    InsufficientCredits { requested: u64, available: u64 },
    #[error("Please select an NGO")]
    NoNgoSelected,
}

impl From<BackendError> for ClientError {
    fn from(err: BackendError) -> Self {
        ClientError::Server(err.to_string())
    }
}
