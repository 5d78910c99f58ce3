use crate::error::ClientError;
use gc_api_types::{BalanceResponse, WalletAddress};
use gc_backend::RewardsBackend;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub token_balance: u64,
    pub donation_credits: u64,
}

impl From<BalanceResponse> for BalanceSnapshot {
    fn from(reply: BalanceResponse) -> Self {
        Self {
            token_balance: reply.token_balance,
            donation_credits: reply.credits_balance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Current(BalanceSnapshot),
    /// A newer request or server update landed first; this reply was dropped.
    Superseded,
}

/// Server-authoritative balances.
///
/// Every write replaces fields with values the server reported. Each write
/// source takes a new generation; a refresh reply is only applied if no other
/// generation was taken while it was in flight.
pub struct BalanceSync {
    backend: Rc<dyn RewardsBackend>,
    snapshot: Cell<BalanceSnapshot>,
    generation: Cell<u64>,
}

impl BalanceSync {
    pub fn new(backend: Rc<dyn RewardsBackend>) -> Self {
        Self {
            backend,
            snapshot: Cell::new(BalanceSnapshot::default()),
            generation: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> BalanceSnapshot {
        self.snapshot.get()
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    pub async fn refresh(
        &self,
        address: Option<&WalletAddress>,
    ) -> Result<RefreshOutcome, ClientError> {
        let address = address.ok_or(ClientError::NotConnected)?;
        let stamp = self.next_generation();

        let reply = self.backend.balance(address).await;
        if stamp != self.generation.get() {
            debug!("dropping balance reply #{stamp}, newer data is #{}", self.generation.get());
            return Ok(RefreshOutcome::Superseded);
        }

        let snapshot = BalanceSnapshot::from(reply?);
        self.snapshot.set(snapshot);
        Ok(RefreshOutcome::Current(snapshot))
    }

    /// Apply balances returned by a mutating call. Fields the call did not
    /// report keep their last server value.
    pub fn apply(
        &self,
        token_balance: Option<u64>,
        donation_credits: Option<u64>,
    ) -> BalanceSnapshot {
        self.next_generation();
        let current = self.snapshot.get();
        let updated = BalanceSnapshot {
            token_balance: token_balance.unwrap_or(current.token_balance),
            donation_credits: donation_credits.unwrap_or(current.donation_credits),
        };
        self.snapshot.set(updated);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use gc_backend::BackendError;

    fn address() -> WalletAddress {
        WalletAddress::new("0xabc")
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot_wholesale() {
        let backend = Rc::new(FakeBackend::default());
        let sync = BalanceSync::new(backend.clone());

        backend.push_balance(Ok((10, 4)));
        sync.refresh(Some(&address())).await.unwrap();
        backend.push_balance(Ok((3, 0)));
        let outcome = sync.refresh(Some(&address())).await.unwrap();

        let expected = BalanceSnapshot {
            token_balance: 3,
            donation_credits: 0,
        };
        assert_eq!(outcome, RefreshOutcome::Current(expected));
        assert_eq!(sync.snapshot(), expected);
    }

    #[tokio::test]
    async fn refresh_without_address_fails_fast() {
        let backend = Rc::new(FakeBackend::default());
        let sync = BalanceSync::new(backend.clone());

        assert_eq!(sync.refresh(None).await, Err(ClientError::NotConnected));
        assert_eq!(backend.calls(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn server_error_keeps_previous_snapshot() {
        let backend = Rc::new(FakeBackend::default());
        let sync = BalanceSync::new(backend.clone());

        backend.push_balance(Ok((7, 1)));
        sync.refresh(Some(&address())).await.unwrap();
        backend.push_balance(Err(BackendError::Rejected("not found".to_owned())));

        assert_eq!(
            sync.refresh(Some(&address())).await,
            Err(ClientError::Server("not found".to_owned()))
        );
        assert_eq!(sync.snapshot().token_balance, 7);
    }

    #[tokio::test]
    async fn reply_older_than_server_update_is_dropped() {
        let backend = Rc::new(FakeBackend::default());
        let sync = Rc::new(BalanceSync::new(backend.clone()));

        backend.push_balance(Ok((1, 1)));
        let gate = backend.hold_next_balance();
        let pending = {
            let sync = sync.clone();
            async move { sync.refresh(Some(&address())).await }
        };
        let release = async {
            tokio::task::yield_now().await;
            sync.apply(Some(50), None);
            gate.open();
        };

        let (outcome, ()) = tokio::join!(pending, release);
        assert_eq!(outcome, Ok(RefreshOutcome::Superseded));
        assert_eq!(sync.snapshot().token_balance, 50);
    }

    #[tokio::test]
    async fn older_refresh_landing_last_is_dropped() {
        let backend = Rc::new(FakeBackend::default());
        let sync = BalanceSync::new(backend.clone());

        backend.push_balance(Ok((1, 1)));
        backend.push_balance(Ok((9, 3)));
        let gate = backend.hold_next_balance();

        let first = address();
        let older = sync.refresh(Some(&first));
        let newer = async {
            let outcome = sync.refresh(Some(&address())).await;
            gate.open();
            outcome
        };
        let (older, newer) = tokio::join!(older, newer);

        let expected = BalanceSnapshot {
            token_balance: 9,
            donation_credits: 3,
        };
        assert_eq!(newer, Ok(RefreshOutcome::Current(expected)));
        assert_eq!(older, Ok(RefreshOutcome::Superseded));
        assert_eq!(sync.snapshot(), expected);
    }

    #[test]
    fn apply_keeps_unreported_fields() {
        let sync = BalanceSync::new(Rc::new(FakeBackend::default()));
        sync.apply(Some(10), Some(5));
        let after = sync.apply(None, Some(2));
        assert_eq!(
            after,
            BalanceSnapshot {
                token_balance: 10,
                donation_credits: 2
            }
        );
    }
}
