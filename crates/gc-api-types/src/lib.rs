use serde::{Deserialize, Serialize};
use std::fmt;

/// Public wallet address as reported by the wallet provider.
///
/// The provider's spelling is kept verbatim; comparisons that decide whether
/// two addresses name the same account go through [`WalletAddress::matches`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateQrRequest {
    pub qr_code: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateQrResponse {
    #[serde(default)]
    pub message: String,
    pub tokens_minted: u64,
    pub new_balance: u64,
    #[serde(default)]
    pub transaction_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceResponse {
    pub token_balance: u64,
    pub credits_balance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ngo {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgoListResponse {
    #[serde(default)]
    pub ngos: Vec<Ngo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertTokensRequest {
    pub wallet_address: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvertTokensResponse {
    #[serde(default)]
    pub message: String,
    pub new_token_balance: u64,
    pub new_credits_balance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonateRequest {
    pub wallet_address: String,
    pub ngo_address: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonateResponse {
    #[serde(default)]
    pub message: String,
    pub new_credits_balance: u64,
}

/// Status fields shared by every backend reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyStatus {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_matching_ignores_case() {
        let stored = WalletAddress::new("0xabcDEF");
        assert!(stored.matches("0xABCdef"));
        assert!(!stored.matches("0xabcdee"));
    }

    #[test]
    fn validate_reply_ignores_status_fields() {
        let raw = r#"{"success":true,"message":"ok","tokens_minted":5,"new_balance":15,"transaction_hash":"0x1"}"#;
        let reply: ValidateQrResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.new_balance, 15);
        assert_eq!(reply.tokens_minted, 5);
        assert_eq!(reply.transaction_hash, "0x1");
    }

    #[test]
    fn address_serializes_as_plain_string() {
        let body = DonateRequest {
            wallet_address: WalletAddress::new("0xabc").to_string(),
            ngo_address: "0xngo".to_owned(),
            amount: 3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["wallet_address"], "0xabc");
        assert_eq!(json["amount"], 3);
    }
}
