//! Live balance watch.
//!
//! A watch polls one `BalanceQuery` on a background task and publishes every
//! new value on its own channel. Dropping the watch aborts the task, so a
//! replaced watch can never deliver a value for its old query.

use std::{sync::Arc, time::Duration};

use alloy::primitives::U256;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use super::gateway::ContractReader;
use crate::types::BalanceQuery;

/// Cancelable subscription to the balance for one query.
#[derive(Debug)]
pub struct BalanceWatch {
    query: BalanceQuery,
    updates: watch::Receiver<Option<U256>>,
    task: JoinHandle<()>,
}

impl BalanceWatch {
    /// Start polling `query` every `period`. The first read is immediate.
    pub fn spawn(reader: Arc<dyn ContractReader>, query: BalanceQuery, period: Duration) -> Self {
        let (tx, updates) = watch::channel(None);
        let task = tokio::spawn(poll_balance(reader, query, period, tx));

        tracing::debug!(user = %query.user, token = %query.token, "Balance watch started");

        Self { query, updates, task }
    }

    pub fn query(&self) -> &BalanceQuery {
        &self.query
    }

    /// Last value fetched for this query.
    pub fn latest(&self) -> Option<U256> {
        *self.updates.borrow()
    }

    /// Receiver notified whenever the balance changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<U256>> {
        self.updates.clone()
    }
}

impl Drop for BalanceWatch {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(user = %self.query.user, token = %self.query.token, "Balance watch stopped");
    }
}

async fn poll_balance(
    reader: Arc<dyn ContractReader>,
    query: BalanceQuery,
    period: Duration,
    tx: watch::Sender<Option<U256>>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tx.closed() => break,
        }

        match reader.balance_of(&query).await {
            Ok(balance) => {
                tx.send_if_modified(|current| {
                    if *current == Some(balance) {
                        return false;
                    }
                    *current = Some(balance);
                    true
                });
            }
            // Keep showing the last value; the next tick retries.
            Err(e) => tracing::warn!(token = %query.token, error = %e, "Balance read failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use alloy::primitives::{address, Address};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Returns an increasing balance on every read; fails on the second read.
    struct CountingReader {
        reads: AtomicU64,
    }

    #[async_trait]
    impl ContractReader for CountingReader {
        async fn balance_of(&self, _query: &BalanceQuery) -> Result<U256> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 2 {
                return Err(AppError::Transport("connection reset".to_string()));
            }
            Ok(U256::from(n * 100))
        }

        async fn token_decimals(&self, _token: Address) -> Result<u8> {
            Ok(18)
        }
    }

    fn query() -> BalanceQuery {
        BalanceQuery {
            contract: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            user: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            token: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_publishes_and_keeps_last_value_on_error() {
        let reader = Arc::new(CountingReader { reads: AtomicU64::new(0) });
        let watch = BalanceWatch::spawn(reader.clone(), query(), Duration::from_secs(4));
        let mut updates = watch.subscribe();

        assert_eq!(watch.latest(), None);

        updates.changed().await.unwrap();
        assert_eq!(watch.latest(), Some(U256::from(100u64)));

        // Second read fails, third succeeds with 300.
        updates.changed().await.unwrap();
        assert_eq!(watch.latest(), Some(U256::from(300u64)));
        assert_eq!(reader.reads.load(Ordering::SeqCst), 3);
        assert_eq!(watch.query(), &query());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_watch_stops_polling() {
        let reader = Arc::new(CountingReader { reads: AtomicU64::new(0) });
        let watch = BalanceWatch::spawn(reader.clone(), query(), Duration::from_secs(4));
        let mut updates = watch.subscribe();
        updates.changed().await.unwrap();

        drop(watch);

        // The sender lives in the aborted task, so the channel closes.
        assert!(updates.changed().await.is_err());

        let reads = reader.reads.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(reader.reads.load(Ordering::SeqCst), reads);
    }
}
