// Block data structures

use crate::core::{Canonical, Hash256, Transaction, sha256, write_field, write_list};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

/// One sealed unit of the chain.
///
/// Field order here is the canonical order: the serde form and the canonical
/// encoding produce identical bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Creation time, nanoseconds since the UNIX epoch
    pub timestamp: i64,
    /// Nonce found by the proof-of-work search
    pub nonce: u64,
    /// Hash of the preceding block
    pub previous_hash: Hash256,
    /// Transactions in submission order
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a new block
    pub fn new(
        timestamp: i64,
        nonce: u64,
        previous_hash: Hash256,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            timestamp,
            nonce,
            previous_hash,
            transactions,
        }
    }

    /// Block with the timestamp pinned to zero, as used by the nonce search
    pub fn candidate(nonce: u64, previous_hash: Hash256, transactions: Vec<Transaction>) -> Self {
        Self::new(0, nonce, previous_hash, transactions)
    }

    /// SHA256 of the canonical encoding
    pub fn hash(&self) -> Hash256 {
        sha256(&self.canonical_bytes())
    }

    /// Hash of this block with its timestamp zeroed.
    /// This is the value the proof-of-work predicate is checked against.
    pub fn proof_hash(&self) -> Hash256 {
        let mut buf = Vec::new();
        self.write_with_timestamp(0, &mut buf)
            .expect("writing to a Vec never fails");
        sha256(&buf)
    }

    /// Check if this block has the genesis shape
    pub fn is_genesis(&self) -> bool {
        self.previous_hash == Block::default().hash() && self.transactions.is_empty()
    }

    fn write_with_timestamp<W: Write>(&self, timestamp: i64, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"{")?;
        write_field(writer, "timestamp", &timestamp)?;
        writer.write_all(b",")?;
        write_field(writer, "nonce", &self.nonce)?;
        writer.write_all(b",")?;
        write_field(writer, "previous_hash", &self.previous_hash)?;
        writer.write_all(b",\"transactions\":")?;
        write_list(writer, &self.transactions)?;
        writer.write_all(b"}")
    }
}

impl Canonical for Block {
    fn write_canonical<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_with_timestamp(self.timestamp, writer)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(44))?;
        writeln!(f, "| timestamp                 {}", self.timestamp)?;
        writeln!(f, "| nonce                     {}", self.nonce)?;
        writeln!(f, "| previous_hash             {}", self.previous_hash)?;
        for tx in &self.transactions {
            write!(f, "{}", tx)?;
        }
        writeln!(f, "{}", "-".repeat(44))
    }
}

/// Current wall-clock time in nanoseconds since the UNIX epoch
pub fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
