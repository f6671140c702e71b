// Chain validation for independent verifiers

use crate::consensus::pow::meets_difficulty;
use crate::core::Block;
use thiserror::Error;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Chain has no blocks")]
    Empty,
    #[error("First block is not a genesis block")]
    InvalidGenesis,
    #[error("Block {index} does not link to the hash of block {}", .index - 1)]
    BrokenLink { index: usize },
    #[error("Block {index} has an invalid proof of work")]
    InvalidProofOfWork { index: usize },
    #[error("Block {index} is older than its predecessor")]
    InvalidTimestamp { index: usize },
}

/// Verify a whole chain without re-running the nonce search.
///
/// Genesis is exempt from the proof check; every later block must link to
/// its predecessor's hash and carry a proof meeting `difficulty`.
pub fn verify_chain(blocks: &[Block], difficulty: usize) -> Result<(), ChainError> {
    let genesis = blocks.first().ok_or(ChainError::Empty)?;
    if !genesis.is_genesis() {
        return Err(ChainError::InvalidGenesis);
    }

    for (offset, pair) in blocks.windows(2).enumerate() {
        let (prev, block) = (&pair[0], &pair[1]);
        let index = offset + 1;

        if block.previous_hash != prev.hash() {
            return Err(ChainError::BrokenLink { index });
        }
        if block.timestamp < prev.timestamp {
            return Err(ChainError::InvalidTimestamp { index });
        }
        if !meets_difficulty(&block.proof_hash(), difficulty) {
            return Err(ChainError::InvalidProofOfWork { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::core::Hash256;
    use crate::ledger::Ledger;

    fn mined_chain() -> Vec<Block> {
        let mut ledger = Ledger::with_config(LedgerConfig::default().with_difficulty(2)).unwrap();
        ledger.mine_block("A").unwrap();
        ledger.mine_block("B").unwrap();
        ledger.chain().to_vec()
    }

    #[test]
    fn test_valid_chain() {
        assert_eq!(verify_chain(&mined_chain(), 2), Ok(()));
    }

    #[test]
    fn test_empty_chain() {
        assert_eq!(verify_chain(&[], 2), Err(ChainError::Empty));
    }

    #[test]
    fn test_invalid_genesis() {
        let mut chain = mined_chain();
        chain[0].previous_hash = Hash256::zero();
        assert_eq!(verify_chain(&chain, 2), Err(ChainError::InvalidGenesis));
    }

    #[test]
    fn test_tampered_block_breaks_link() {
        let mut chain = mined_chain();
        // The timestamp is outside the proof but inside the link hash
        chain[1].timestamp += 1;
        assert_eq!(verify_chain(&chain, 2), Err(ChainError::BrokenLink { index: 2 }));
    }

    #[test]
    fn test_tampered_tip_fails_proof() {
        let mut chain = mined_chain();
        let tip = chain.len() - 1;
        // Bump the nonce until the proof no longer holds
        while meets_difficulty(&chain[tip].proof_hash(), 2) {
            chain[tip].nonce += 1;
        }
        assert_eq!(
            verify_chain(&chain, 2),
            Err(ChainError::InvalidProofOfWork { index: tip })
        );
    }

    #[test]
    fn test_error_message() {
        let err = ChainError::BrokenLink { index: 3 };
        assert_eq!(err.to_string(), "Block 3 does not link to the hash of block 2");
    }
}
