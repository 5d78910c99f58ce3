use async_trait::async_trait;
use std::time::Duration;

/// Host-provided delay. Browser hosts use a JS timeout, native hosts tokio.
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}
