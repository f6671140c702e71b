// Proof-of-work and chain validation

pub mod pow;
pub mod validation;

pub use pow::{CancelToken, Miner, MiningResult, meets_difficulty, validate_proof};
pub use validation::{ChainError, verify_chain};
