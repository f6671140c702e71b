//! Error types for the ledger

use crate::core::SignatureError;
use thiserror::Error;

/// Why a transaction was not admitted to the pool
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error("Not enough balance in wallet {sender}: available {available}, requested {value}")]
    InsufficientBalance {
        sender: String,
        available: f64,
        value: f64,
    },

    #[error("Transaction signature verification failed: {0}")]
    SignatureVerification(#[from] SignatureError),

    #[error("Transaction value must be positive and finite, got {0}")]
    InvalidValue(f64),
}

/// Why a mining round did not seal a block
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    #[error("Mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    #[error("Mining reward rejected: {0}")]
    Reward(#[from] TransactionError),

    #[error("Mining task failed: {0}")]
    Task(String),
}

/// A chain operation ran before genesis existed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chain is empty; the ledger was never initialized")]
pub struct EmptyChainError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TransactionError::InsufficientBalance {
            sender: "A".to_string(),
            available: 0.0,
            value: 5.0,
        };
        assert!(err.to_string().contains("Not enough balance"));

        let err: TransactionError = SignatureError::Mismatch.into();
        assert!(matches!(err, TransactionError::SignatureVerification(SignatureError::Mismatch)));

        let err: MiningError = TransactionError::InvalidValue(-1.0).into();
        assert!(err.to_string().starts_with("Mining reward rejected"));
    }
}
