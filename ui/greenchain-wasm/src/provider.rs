//! `window.ethereum` (EIP-1193) wallet provider.

use crate::dom;
use async_trait::async_trait;
use gc_client_core::{ProviderError, WalletProvider};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

const INJECTION_KEY: &str = "ethereum";

#[derive(Serialize)]
struct RpcRequest {
    method: &'static str,
}

pub struct InjectedEthereum;

impl InjectedEthereum {
    fn object(&self) -> Option<JsValue> {
        js_sys::Reflect::get(&dom::window(), &JsValue::from_str(INJECTION_KEY))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }

    async fn request(&self, method: &'static str) -> Result<JsValue, ProviderError> {
        let ethereum = self
            .object()
            .ok_or_else(|| ProviderError("no injected wallet".to_string()))?;

        let request_fn = js_sys::Reflect::get(&ethereum, &JsValue::from_str("request"))
            .map_err(|e| ProviderError(format!("request not found: {e:?}")))?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| ProviderError("request is not a function".to_string()))?;

        let args = serde_wasm_bindgen::to_value(&RpcRequest { method })
            .map_err(|e| ProviderError(e.to_string()))?;
        let promise = request_fn
            .call1(&ethereum, &args)
            .map_err(|e| ProviderError(rejection_message(&e)))?
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| ProviderError(format!("{method} did not return a promise")))?;

        JsFuture::from(promise)
            .await
            .map_err(|e| ProviderError(rejection_message(&e)))
    }

    async fn accounts(&self, method: &'static str) -> Result<Vec<String>, ProviderError> {
        let value = self.request(method).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ProviderError(e.to_string()))
    }
}

/// EIP-1193 errors carry a `message`; fall back to the debug form.
fn rejection_message(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

#[async_trait(?Send)]
impl WalletProvider for InjectedEthereum {
    fn is_available(&self) -> bool {
        self.object().is_some()
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.accounts("eth_requestAccounts").await
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.accounts("eth_accounts").await
    }

    async fn signer_address(&self) -> Result<String, ProviderError> {
        self.accounts("eth_accounts")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError("wallet exposed no signer".to_string()))
    }

    fn selected_address(&self) -> Option<String> {
        let ethereum = self.object()?;
        js_sys::Reflect::get(&ethereum, &JsValue::from_str("selectedAddress"))
            .ok()?
            .as_string()
            .filter(|address| !address.is_empty())
    }
}
