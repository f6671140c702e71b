// Ledger store: the chain plus the pending pool

use crate::config::{ConfigError, LedgerConfig};
use crate::consensus::{CancelToken, ChainError, Miner, MiningResult, verify_chain};
use crate::core::{Block, Hash256, Transaction, TransactionSignature, now_nanos, verify_signature};
use crate::error::{EmptyChainError, MiningError, TransactionError};
use crate::ledger::TransactionPool;
use secp256k1::PublicKey;
use serde::Serialize;
use std::fmt;

/// In-memory ledger. Every mutation of the chain or pool goes through here.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    pool: TransactionPool,
    config: LedgerConfig,
    miner: Miner,
}

impl Ledger {
    /// Create a ledger with the default config
    pub fn new() -> Self {
        Self::build(LedgerConfig::default())
    }

    /// Create a ledger after validating `config`
    pub fn with_config(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Genesis links to the hash of the zero-valued block and carries no transactions
    fn build(config: LedgerConfig) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pool: TransactionPool::new(),
            miner: Miner::new(config.difficulty),
            config,
        };
        ledger.seal_block(0, Block::default().hash());
        ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read-only view of the chain, genesis first
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Read-only view of pending transactions
    pub fn pool(&self) -> &[Transaction] {
        self.pool.as_slice()
    }

    pub fn try_last_block(&self) -> Result<&Block, EmptyChainError> {
        self.chain.last().ok_or(EmptyChainError)
    }

    /// Most recently sealed block.
    ///
    /// # Panics
    ///
    /// Panics if the chain is empty, which means the ledger was never initialized.
    pub fn last_block(&self) -> &Block {
        self.try_last_block().unwrap_or_else(|e| panic!("{}", e))
    }

    /// Admit a transaction into the pool.
    ///
    /// Transactions from the reward sender skip the signature and balance
    /// checks. Everyone else needs a valid signature and enough spendable
    /// balance. A rejection leaves the pool untouched.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        value: f64,
        signature: Option<&TransactionSignature>,
        public_key: Option<&PublicKey>,
    ) -> Result<(), TransactionError> {
        let transaction = Transaction::new(sender, recipient, value);

        if let Err(e) = self.check_admission(&transaction, signature, public_key) {
            log::warn!(
                "action=add_transaction, status=rejected, sender={}, recipient={}, error={}",
                sender, recipient, e
            );
            return Err(e);
        }

        log::debug!(
            "action=add_transaction, status=success, sender={}, recipient={}, value={}",
            sender,
            recipient,
            value
        );
        self.pool.push(transaction);
        Ok(())
    }

    /// Boolean form of [`Ledger::submit_transaction`]
    pub fn add_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        value: f64,
        signature: Option<&TransactionSignature>,
        public_key: Option<&PublicKey>,
    ) -> bool {
        self.submit_transaction(sender, recipient, value, signature, public_key).is_ok()
    }

    fn check_admission(
        &self,
        transaction: &Transaction,
        signature: Option<&TransactionSignature>,
        public_key: Option<&PublicKey>,
    ) -> Result<(), TransactionError> {
        if !transaction.has_valid_value() {
            return Err(TransactionError::InvalidValue(transaction.value));
        }

        if transaction.sender == self.config.reward_sender {
            return Ok(());
        }

        verify_signature(public_key, signature, transaction)?;

        let available = self.spendable_balance(&transaction.sender);
        if available < transaction.value {
            return Err(TransactionError::InsufficientBalance {
                sender: transaction.sender.clone(),
                available,
                value: transaction.value,
            });
        }

        Ok(())
    }

    /// Seal the current pool into a new block and clear the pool.
    ///
    /// The nonce is trusted: callers must have found it against exactly the
    /// current pool and `previous_hash`.
    pub fn seal_block(&mut self, nonce: u64, previous_hash: Hash256) -> &Block {
        let timestamp = match self.chain.last() {
            Some(last) => now_nanos().max(last.timestamp),
            None => now_nanos(),
        };
        let transactions = self.pool.take();
        self.chain.push(Block::new(timestamp, nonce, previous_hash, transactions));
        self.last_block()
    }

    /// Confirmed balance: every incoming value minus every outgoing value
    pub fn balance(&self, address: &str) -> f64 {
        let mut total = 0.0;
        for block in &self.chain {
            for tx in &block.transactions {
                if tx.recipient == address {
                    total += tx.value;
                }
                if tx.sender == address {
                    total -= tx.value;
                }
            }
        }
        total
    }

    /// Confirmed balance minus what `address` already has pending in the pool
    pub fn spendable_balance(&self, address: &str) -> f64 {
        self.balance(address) - self.pool.pending_outgoing(address)
    }

    /// Search a nonce for the current pool on top of the last block
    pub fn proof_of_work(&self) -> MiningResult {
        let transactions = self.pool.snapshot();
        let previous_hash = self.last_block().hash();
        self.miner.find_nonce(&transactions, previous_hash)
    }

    /// Mine one round, crediting the configured miner address
    pub fn mine(&mut self) -> Result<&Block, MiningError> {
        let miner_address = self.config.miner_address.clone();
        self.mine_block(&miner_address)
    }

    /// Reward the miner, find a nonce, and seal the block
    pub fn mine_block(&mut self, miner_address: &str) -> Result<&Block, MiningError> {
        self.mine_block_cancellable(miner_address, &CancelToken::new())
    }

    /// [`Ledger::mine_block`] with a cancellable nonce search.
    /// On cancellation the reward is withdrawn and the pool is left as it was.
    pub fn mine_block_cancellable(
        &mut self,
        miner_address: &str,
        token: &CancelToken,
    ) -> Result<&Block, MiningError> {
        let pool_len = self.pool.len();
        let reward_sender = self.config.reward_sender.clone();
        let reward = self.config.mining_reward;

        if let Err(e) = self.submit_transaction(&reward_sender, miner_address, reward, None, None) {
            log::error!("action=mining, status=failure, error={}", e);
            return Err(e.into());
        }

        let transactions = self.pool.snapshot();
        let previous_hash = self.last_block().hash();

        let result = match self.miner.find_nonce_cancellable(&transactions, previous_hash, token) {
            Ok(result) => result,
            Err(e) => {
                self.pool.truncate(pool_len);
                log::warn!("action=mining, status=failure, error={}", e);
                return Err(e);
            }
        };

        log::debug!(
            "Found nonce {} after {} attempts in {:?}",
            result.nonce,
            result.attempts,
            result.duration
        );
        log::info!(
            "action=mining, status=success, hash_rate={:.0}",
            result.hash_rate()
        );
        Ok(self.seal_block(result.nonce, previous_hash))
    }

    /// Check linkage and proofs of the whole chain
    pub fn verify(&self) -> Result<(), ChainError> {
        verify_chain(&self.chain, self.config.difficulty)
    }

    /// `{"chains":[...]}` export of every block
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct ChainView<'a> {
            chains: &'a [Block],
        }

        serde_json::to_string(&ChainView { chains: &self.chain })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, block) in self.chain.iter().enumerate() {
            writeln!(f, "{} Chain {} {}", "=".repeat(25), i, "=".repeat(25))?;
            write!(f, "{}", block)?;
        }
        writeln!(f, "{}", "*".repeat(25))
    }
}
