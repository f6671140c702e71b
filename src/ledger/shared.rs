// Shared ledger handle for concurrent callers

use crate::consensus::CancelToken;
use crate::core::{Block, TransactionSignature};
use crate::error::{MiningError, TransactionError};
use crate::ledger::Ledger;
use secp256k1::PublicKey;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tokio::task::{JoinError, JoinHandle};

/// Cloneable handle to one ledger.
///
/// Submissions and mining rounds take the write lock, so a round's reward,
/// nonce search and seal never interleave with another writer. Reads take the
/// read lock and never observe a half-sealed block.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        value: f64,
        signature: Option<TransactionSignature>,
        public_key: Option<PublicKey>,
    ) -> Result<(), TransactionError> {
        self.inner.write().await.submit_transaction(
            sender,
            recipient,
            value,
            signature.as_ref(),
            public_key.as_ref(),
        )
    }

    pub async fn balance(&self, address: &str) -> f64 {
        self.inner.read().await.balance(address)
    }

    /// Snapshot of the chain at the time of the call
    pub async fn chain(&self) -> Vec<Block> {
        self.inner.read().await.chain().to_vec()
    }

    pub async fn last_block(&self) -> Block {
        self.inner.read().await.last_block().clone()
    }

    pub async fn pool_len(&self) -> usize {
        self.inner.read().await.pool().len()
    }

    pub async fn mine_block(&self, miner_address: &str) -> Result<Block, MiningError> {
        self.mine_block_with_token(miner_address, CancelToken::new()).await
    }

    /// Run one mining round on the blocking pool, holding the write lock
    /// until the block is sealed or the search is cancelled.
    pub async fn mine_block_with_token(
        &self,
        miner_address: &str,
        token: CancelToken,
    ) -> Result<Block, MiningError> {
        let ledger = self.inner.clone().write_owned().await;
        Self::join(Self::spawn_round(ledger, miner_address, token).await)
    }

    /// Mine with a wall-clock limit on the nonce search.
    ///
    /// The clock starts once the write lock is held, so time spent queued
    /// behind other writers does not count against `limit`.
    pub async fn mine_block_with_timeout(
        &self,
        miner_address: &str,
        limit: Duration,
    ) -> Result<Block, MiningError> {
        let ledger = self.inner.clone().write_owned().await;
        let token = CancelToken::new();
        let mut round = Self::spawn_round(ledger, miner_address, token.clone());

        match tokio::time::timeout(limit, &mut round).await {
            Ok(joined) => Self::join(joined),
            Err(_) => {
                log::warn!("action=mining, status=timeout, limit={:?}", limit);
                token.cancel();
                Self::join(round.await)
            }
        }
    }

    fn spawn_round(
        mut ledger: OwnedRwLockWriteGuard<Ledger>,
        miner_address: &str,
        token: CancelToken,
    ) -> JoinHandle<Result<Block, MiningError>> {
        let miner_address = miner_address.to_string();
        tokio::task::spawn_blocking(move || {
            ledger
                .mine_block_cancellable(&miner_address, &token)
                .cloned()
        })
    }

    fn join(
        joined: Result<Result<Block, MiningError>, JoinError>,
    ) -> Result<Block, MiningError> {
        joined.map_err(|e| MiningError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LedgerConfig, MINING_SENDER};
    use crate::core::{Transaction, sign_transaction};
    use secp256k1::rand::rngs::OsRng;
    use secp256k1::{Secp256k1, SecretKey};

    fn shared(difficulty: usize) -> SharedLedger {
        SharedLedger::new(
            Ledger::with_config(LedgerConfig::default().with_difficulty(difficulty)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_mine_and_transfer() {
        let ledger = shared(2);
        let secret_key = SecretKey::new(&mut OsRng);
        let public_key = secret_key.public_key(&Secp256k1::new());

        ledger.mine_block("A").await.unwrap();
        assert_eq!(ledger.balance("A").await, 1.0);

        let sig = sign_transaction(&secret_key, &Transaction::new("A", "B", 0.5));
        ledger
            .submit_transaction("A", "B", 0.5, Some(sig), Some(public_key))
            .await
            .unwrap();
        let block = ledger.mine_block("A").await.unwrap();

        assert_eq!(block.transactions.len(), 2);
        assert_eq!(ledger.balance("A").await, 1.5);
        assert_eq!(ledger.balance("B").await, 0.5);
        assert_eq!(ledger.last_block().await, block);
    }

    #[tokio::test]
    async fn test_timeout_cancels_and_restores_pool() {
        // No nonce will ever satisfy 64 leading zeros in practice
        let ledger = shared(64);
        ledger
            .submit_transaction(MINING_SENDER, "A", 1.0, None, None)
            .await
            .unwrap();

        let result = ledger
            .mine_block_with_timeout("miner", Duration::from_millis(50))
            .await;

        assert!(matches!(result, Err(MiningError::Cancelled { .. })));
        assert_eq!(ledger.pool_len().await, 1);
        assert_eq!(ledger.chain().await.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_not_reached() {
        let ledger = shared(1);
        let block = ledger
            .mine_block_with_timeout("A", Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(block.transactions[0].recipient, "A");
    }

    #[tokio::test]
    async fn test_timeout_starts_after_lock_is_acquired() {
        let ledger = shared(1);
        let guard = ledger.inner.clone().write_owned().await;
        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            drop(guard);
        });

        // Queued behind the writer for longer than the limit
        let block = ledger
            .mine_block_with_timeout("A", Duration::from_millis(200))
            .await
            .unwrap();
        release.await.unwrap();

        assert_eq!(block.transactions[0].recipient, "A");
        assert_eq!(ledger.chain().await.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rounds_keep_chain_linked() {
        let ledger = shared(2);

        let mut handles = Vec::new();
        for i in 0..8 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                let miner = format!("miner-{}", i % 2);
                ledger
                    .submit_transaction(MINING_SENDER, &miner, 0.25, None, None)
                    .await
                    .unwrap();
                ledger.mine_block(&miner).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let chain = ledger.chain().await;
        assert_eq!(chain.len(), 9);
        assert_eq!(crate::consensus::verify_chain(&chain, 2), Ok(()));
        let total = ledger.balance("miner-0").await + ledger.balance("miner-1").await;
        assert_eq!(total, 8.0 * 1.0 + 8.0 * 0.25);
    }
}
