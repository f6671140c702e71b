// Core ledger data structures

mod types;
mod transaction;
mod block;
mod serialize;
mod hash;
pub mod signature;

pub use types::*;
pub use transaction::*;
pub use block::*;
pub use serialize::*;
pub use hash::*;
pub use signature::{
    SignatureError, TransactionSignature, parse_public_key, sign_transaction, verify_signature,
    verify_transaction_signature,
};
