// Pending transaction pool

use crate::core::Transaction;

/// Admitted transactions waiting for the next block, in submission order
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    transactions: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Copy of the current contents, used as the mining input
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Drain the pool, leaving it empty
    pub fn take(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }

    /// Drop everything submitted after the first `len` entries
    pub fn truncate(&mut self, len: usize) {
        self.transactions.truncate(len);
    }

    /// Total value `address` is already committed to send
    pub fn pending_outgoing(&self, address: &str) -> f64 {
        self.transactions
            .iter()
            .filter(|tx| tx.sender == address)
            .map(|tx| tx.value)
            .sum()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_preserves_order_and_clears() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("A", "B", 1.0));
        pool.push(Transaction::new("C", "D", 2.0));

        let snapshot = pool.snapshot();
        let taken = pool.take();

        assert_eq!(taken, snapshot);
        assert_eq!(taken[0].sender, "A");
        assert_eq!(taken[1].sender, "C");
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pending_outgoing() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("A", "B", 1.0));
        pool.push(Transaction::new("B", "A", 4.0));
        pool.push(Transaction::new("A", "C", 0.5));

        assert_eq!(pool.pending_outgoing("A"), 1.5);
        assert_eq!(pool.pending_outgoing("B"), 4.0);
        assert_eq!(pool.pending_outgoing("Z"), 0.0);
    }

    #[test]
    fn test_truncate() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("A", "B", 1.0));
        pool.push(Transaction::new("C", "D", 2.0));
        pool.truncate(1);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.as_slice()[0].sender, "A");
    }
}
