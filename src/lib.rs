// Single-node proof-of-work ledger

pub mod config;
pub mod consensus;
pub mod core;
pub mod error;
pub mod ledger;

// Re-exports for convenience
pub use crate::config::{ConfigError, LedgerConfig, MINING_DIFFICULTY, MINING_REWARD, MINING_SENDER};
pub use crate::consensus::{CancelToken, ChainError, Miner, MiningResult, validate_proof, verify_chain};
pub use crate::core::{Block, Hash256, SignatureError, Transaction, TransactionSignature};
pub use crate::core::{sign_transaction, verify_signature, verify_transaction_signature};
pub use crate::error::{EmptyChainError, MiningError, TransactionError};
pub use crate::ledger::{Ledger, SharedLedger, TransactionPool};
