//! Line serialization
//!
//! The raw activity files are consumed by tooling that documents the
//! record layout as `{"key": value, "key": value}`, so members are separated
//! by `", "` and keys by `": "` rather than serde_json's compact output.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Single-line JSON formatter with a space after every `,` and `:`
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize a value into one `\n`-terminated line
pub fn to_line<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut line = Vec::with_capacity(192);
    let mut serializer = serde_json::Serializer::with_formatter(&mut line, SpacedFormatter);
    value.serialize(&mut serializer)?;
    line.push(b'\n');
    Ok(line)
}
