// Transaction data structures

use crate::core::{Address, Canonical, Hash256, sha256, write_field};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// A value transfer between two addresses.
///
/// Transactions carry no ID; they are identified by content through the
/// hash of the block that seals them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "sender_blockchain_address")]
    pub sender: Address,
    #[serde(rename = "recipient_blockchain_address")]
    pub recipient: Address,
    pub value: f64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(sender: impl Into<Address>, recipient: impl Into<Address>, value: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            value,
        }
    }

    /// Values must be finite and strictly positive
    pub fn has_valid_value(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }

    /// SHA256 of the canonical encoding; this is what gets signed
    pub fn digest(&self) -> Hash256 {
        sha256(&self.canonical_bytes())
    }
}

impl Canonical for Transaction {
    fn write_canonical<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"{")?;
        write_field(writer, "sender_blockchain_address", &self.sender)?;
        writer.write_all(b",")?;
        write_field(writer, "recipient_blockchain_address", &self.recipient)?;
        writer.write_all(b",")?;
        write_field(writer, "value", &self.value)?;
        writer.write_all(b"}")
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(40))?;
        writeln!(f, " sender_blockchain_address     {}", self.sender)?;
        writeln!(f, " recipient_blockchain_address  {}", self.recipient)?;
        writeln!(f, " value                         {:.1}", self.value)
    }
}
