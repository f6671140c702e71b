// ECDSA signatures over transactions

use crate::core::Transaction;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a transaction signature does not verify
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing public key")]
    MissingPublicKey,
    #[error("missing signature")]
    MissingSignature,
    #[error("malformed signature: {0}")]
    Malformed(String),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("signature does not match transaction")]
    Mismatch,
}

/// Raw (R, S) signature pair, each a 32-byte big-endian scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl TransactionSignature {
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Self { r, s }
    }

    fn to_ecdsa(self) -> Result<Signature, SignatureError> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        let mut sig = Signature::from_compact(&compact)
            .map_err(|e| SignatureError::Malformed(e.to_string()))?;
        // Accept high-S encodings as well
        sig.normalize_s();
        Ok(sig)
    }
}

impl From<Signature> for TransactionSignature {
    fn from(sig: Signature) -> Self {
        let compact = sig.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Self { r, s }
    }
}

/// R and S as 64 hex digits each, concatenated
impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", hex::encode(self.r), hex::encode(self.s))
    }
}

impl FromStr for TransactionSignature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| SignatureError::Malformed(e.to_string()))?;
        if bytes.len() != 64 {
            return Err(SignatureError::Malformed(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(Self { r, s })
    }
}

/// Parse a SEC1-encoded public key from hex (compressed or uncompressed)
pub fn parse_public_key(hex_str: &str) -> Result<PublicKey, SignatureError> {
    let bytes = hex::decode(hex_str).map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;
    PublicKey::from_slice(&bytes).map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))
}

/// Sign SHA256(canonical transaction) with the sender's key
pub fn sign_transaction(secret_key: &SecretKey, transaction: &Transaction) -> TransactionSignature {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(transaction.digest().0);
    secp.sign_ecdsa(&message, secret_key).into()
}

/// Verify a signature over SHA256(canonical transaction).
/// Absent inputs count as a failed verification.
pub fn verify_signature(
    public_key: Option<&PublicKey>,
    signature: Option<&TransactionSignature>,
    transaction: &Transaction,
) -> Result<(), SignatureError> {
    let public_key = public_key.ok_or(SignatureError::MissingPublicKey)?;
    let signature = signature.ok_or(SignatureError::MissingSignature)?.to_ecdsa()?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(transaction.digest().0);
    secp.verify_ecdsa(&message, &signature, public_key)
        .map_err(|_| SignatureError::Mismatch)
}

/// Boolean form of [`verify_signature`]
pub fn verify_transaction_signature(
    public_key: Option<&PublicKey>,
    signature: Option<&TransactionSignature>,
    transaction: &Transaction,
) -> bool {
    verify_signature(public_key, signature, transaction).is_ok()
}
