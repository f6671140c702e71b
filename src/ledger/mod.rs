// Ledger store and its shared handle

mod blockchain;
mod pool;
mod shared;

pub use blockchain::Ledger;
pub use pool::TransactionPool;
pub use shared::SharedLedger;
