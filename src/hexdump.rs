//! TI Code Loader register dumps
//!
//! Code Loader writes one register per line, the value as a 10 character
//! `0xXXXXXXXX` field at the very end of the line, DOS line endings.
//! Lines are consumed in file order, which is also the write order.

use crate::{errors::*, register::*};

/// Width of the hex field, `0x` prefix included
pub const HEX_FIELD_WIDTH: usize = 10;

/// Parse a register dump into a programming sequence.
///
/// Works on CRLF and LF text alike: the terminator is stripped first and the
/// value is taken from the last `HEX_FIELD_WIDTH` characters. Blank lines are skipped.
pub fn load_registers_from_hex_dump(source: &str) -> Result<RegisterSet, Error> {
    let mut words = [0u32; NUM_SLOTS];
    let mut found = 0;

    for (i, line) in source.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        let w = parse_line(line).ok_or(Error::MalformedHexLine { line: i + 1 })?;
        if found < NUM_SLOTS {
            words[found] = w;
        }
        found += 1;
    }

    if found != NUM_SLOTS {
        return Err(Error::RegisterCount { found });
    }
    Ok(RegisterSet::from_words(words))
}

/// Load a Code Loader register dump from disk
#[cfg(feature = "std")]
pub fn load_registers_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<RegisterSet, Error> {
    let text = std::fs::read_to_string(path)?;
    load_registers_from_hex_dump(&text)
}

fn parse_line(line: &str) -> Option<u32> {
    let start = line.len().checked_sub(HEX_FIELD_WIDTH)?;
    let field = line.get(start..)?.trim();
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    // from_str_radix would also take a sign
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
