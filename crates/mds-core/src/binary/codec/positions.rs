//! Sorted row-position lists.
//!
//! ```text
//! [u32 count][varint gap] × count
//! ```
//!
//! Each gap is the distance to the previous position (the first one is
//! relative to 0), written as an unsigned LEB128 varint. Dense runs of
//! non-null rows therefore cost one byte per row.

use bytes::{Buf, BufMut};

use super::{get_len, put_len};
use crate::error::{Error, Result};

/// Appends the encoded list to `out`.
///
/// `positions` must be strictly increasing.
pub fn encode(positions: &[u32], out: &mut Vec<u8>) {
    put_len(out, positions.len());
    let mut previous = 0u32;
    for &position in positions {
        debug_assert!(position >= previous, "positions must be sorted");
        put_varint(out, position - previous);
        previous = position;
    }
}

/// Decodes a complete position section.
///
/// # Errors
///
/// Returns [`Error::Corrupted`] on truncation, overflow, unsorted input or
/// trailing bytes.
pub fn decode(section: &[u8]) -> Result<Vec<u32>> {
    let mut buf = section;
    let count = get_len(&mut buf, "position count")?;
    // Every gap takes at least one byte.
    if count > buf.remaining() {
        return Err(Error::corrupted(format!(
            "position count {count} exceeds section size {}",
            buf.remaining()
        )));
    }

    let mut positions = Vec::with_capacity(count);
    let mut current = 0u32;
    for i in 0..count {
        let gap = get_varint(&mut buf)?;
        if i > 0 && gap == 0 {
            return Err(Error::corrupted("duplicate row position"));
        }
        current = current
            .checked_add(gap)
            .ok_or_else(|| Error::corrupted("row position overflows u32"))?;
        positions.push(current);
    }

    if buf.has_remaining() {
        return Err(Error::corrupted(format!(
            "{} trailing bytes after position list",
            buf.remaining()
        )));
    }
    Ok(positions)
}

#[allow(clippy::cast_possible_truncation)]
fn put_varint(out: &mut impl BufMut, mut value: u32) {
    while value >= 0x80 {
        out.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.put_u8(value as u8);
}

fn get_varint(buf: &mut &[u8]) -> Result<u32> {
    let mut value = 0u32;
    for shift in (0..35).step_by(7) {
        let Some((&byte, rest)) = buf.split_first() else {
            return Err(Error::corrupted("truncated position varint"));
        };
        *buf = rest;
        let bits = u32::from(byte & 0x7F);
        if shift == 28 && bits > 0x0F {
            return Err(Error::corrupted("position varint overflows u32"));
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::corrupted("position varint longer than 5 bytes"))
}
