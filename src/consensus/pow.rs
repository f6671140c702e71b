// Proof of Work implementation

use crate::config::MAX_DIFFICULTY;
use crate::core::{Block, Hash256, Transaction};
use crate::error::MiningError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Check whether `hash` starts with `difficulty` hex zeros
pub fn meets_difficulty(hash: &Hash256, difficulty: usize) -> bool {
    difficulty <= MAX_DIFFICULTY && hash.leading_zero_nibbles() >= difficulty
}

/// Check a nonce against a previous hash and transaction set.
///
/// The candidate block has its timestamp fixed at zero, so the result is
/// reproducible by anyone holding the sealed block.
pub fn validate_proof(
    nonce: u64,
    previous_hash: Hash256,
    transactions: &[Transaction],
    difficulty: usize,
) -> bool {
    let candidate = Block::candidate(nonce, previous_hash, transactions.to_vec());
    meets_difficulty(&candidate.hash(), difficulty)
}

/// Shared flag that stops a running nonce search
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Proof of Work miner
#[derive(Debug, Clone, Copy)]
pub struct Miner {
    /// Required leading zero hex digits
    pub difficulty: usize,
}

impl Miner {
    /// Create a new miner with fixed difficulty
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    /// Search nonces from zero until the proof predicate holds.
    /// Unbounded; see [`Miner::find_nonce_cancellable`] for a stoppable search.
    pub fn find_nonce(&self, transactions: &[Transaction], previous_hash: Hash256) -> MiningResult {
        self.search(transactions, previous_hash, None)
            .unwrap_or_else(|e| unreachable!("search without a token failed: {e}"))
    }

    /// Same search, checking `token` before every attempt
    pub fn find_nonce_cancellable(
        &self,
        transactions: &[Transaction],
        previous_hash: Hash256,
        token: &CancelToken,
    ) -> Result<MiningResult, MiningError> {
        self.search(transactions, previous_hash, Some(token))
    }

    /// Verify that a sealed block satisfies this miner's difficulty
    pub fn verify(&self, block: &Block) -> bool {
        meets_difficulty(&block.proof_hash(), self.difficulty)
    }

    fn search(
        &self,
        transactions: &[Transaction],
        previous_hash: Hash256,
        token: Option<&CancelToken>,
    ) -> Result<MiningResult, MiningError> {
        let start_time = Instant::now();
        let mut candidate = Block::candidate(0, previous_hash, transactions.to_vec());
        let mut attempts = 0u64;

        loop {
            if token.is_some_and(CancelToken::is_cancelled) {
                log::debug!("Mining cancelled after {} attempts", attempts);
                return Err(MiningError::Cancelled { attempts });
            }

            let hash = candidate.hash();
            attempts += 1;

            if meets_difficulty(&hash, self.difficulty) {
                return Ok(MiningResult {
                    nonce: candidate.nonce,
                    hash,
                    attempts,
                    duration: start_time.elapsed(),
                });
            }

            // Progress indicator every 100k attempts
            if attempts % 100_000 == 0 {
                let elapsed = start_time.elapsed();
                log::debug!(
                    "Mining attempts: {} ({:.1} KH/s)",
                    attempts,
                    attempts as f64 / elapsed.as_secs_f64() / 1000.0
                );
            }

            candidate.nonce += 1;
        }
    }
}

/// Mining result
#[derive(Debug, Clone)]
pub struct MiningResult {
    /// The nonce that was found
    pub nonce: u64,
    /// Proof hash of the zero-timestamp candidate
    pub hash: Hash256,
    /// Number of attempts
    pub attempts: u64,
    /// Time taken
    pub duration: Duration,
}

impl MiningResult {
    /// Calculate hash rate (hashes per second)
    pub fn hash_rate(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.attempts as f64 / secs
    }
}
