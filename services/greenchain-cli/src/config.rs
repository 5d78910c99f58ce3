pub(crate) const DEFAULT_SESSION_DB: &str = "./greenchain-session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliConfig {
    /// `None` lets the HTTP backend fall back to its own default.
    pub(crate) api_url: Option<String>,
    pub(crate) session_db: String,
    pub(crate) wallet_address: Option<String>,
}

impl CliConfig {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api_url: non_empty("GREENCHAIN_API_URL"),
            session_db: non_empty("GREENCHAIN_SESSION_DB")
                .unwrap_or_else(|| DEFAULT_SESSION_DB.to_owned()),
            wallet_address: non_empty("GREENCHAIN_WALLET_ADDRESS")
                .map(|value| value.trim().to_owned()),
        }
    }
}
