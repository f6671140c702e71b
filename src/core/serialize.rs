// Canonical serialization used as hash input

use serde::Serialize;
use std::io::{self, Write};

/// Types with a fixed, deterministic byte encoding.
///
/// The encoding is compact JSON written field by field in a fixed order, so
/// it never depends on how a serializer happens to order struct fields.
pub trait Canonical {
    fn write_canonical<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_canonical(&mut buf)
            .expect("writing to a Vec never fails");
        buf
    }
}

/// Write a JSON scalar (string or number) with serde_json's formatting
pub fn write_scalar<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(writer, value).map_err(io::Error::from)
}

/// Write `"key":value`
pub fn write_field<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    key: &str,
    value: &T,
) -> io::Result<()> {
    write_scalar(writer, key)?;
    writer.write_all(b":")?;
    write_scalar(writer, value)
}

/// Write a JSON array of canonical items
pub fn write_list<W: Write, T: Canonical>(writer: &mut W, items: &[T]) -> io::Result<()> {
    writer.write_all(b"[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        item.write_canonical(writer)?;
    }
    writer.write_all(b"]")
}
