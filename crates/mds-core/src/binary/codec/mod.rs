//! Low-level codecs shared by the makers.
//!
//! - [`positions`]: sorted row-position lists (gap + LEB128 varint)
//! - [`section`]: `[u32 length][payload]` section framing
//! - [`dump`]: flat typed value dumps
//!
//! Every reader checks the remaining length before touching the buffer, so
//! truncated input is reported as [`Error::Corrupted`] instead of panicking.

pub mod dump;
pub mod positions;
pub mod section;

#[cfg(test)]
mod tests;

use bytes::{Buf, BufMut, Bytes};

use crate::error::{Error, Result};

#[inline]
pub(crate) fn ensure(buf: &impl Buf, needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(Error::corrupted(format!(
            "truncated {what}: need {needed} bytes, {} left",
            buf.remaining()
        )));
    }
    Ok(())
}

pub(crate) fn get_u8(buf: &mut impl Buf, what: &str) -> Result<u8> {
    ensure(&*buf, 1, what)?;
    Ok(buf.get_u8())
}

pub(crate) fn get_u32(buf: &mut impl Buf, what: &str) -> Result<u32> {
    ensure(&*buf, 4, what)?;
    Ok(buf.get_u32())
}

pub(crate) fn get_i32(buf: &mut impl Buf, what: &str) -> Result<i32> {
    ensure(&*buf, 4, what)?;
    Ok(buf.get_i32())
}

/// Reads a `u32` length and converts it to `usize`.
pub(crate) fn get_len(buf: &mut impl Buf, what: &str) -> Result<usize> {
    let len = get_u32(buf, what)?;
    usize::try_from(len).map_err(|_| Error::corrupted(format!("{what} length {len} overflows")))
}

/// Splits `len` bytes off the front of `buf` without copying.
pub(crate) fn take(buf: &mut Bytes, len: usize, what: &str) -> Result<Bytes> {
    ensure(&*buf, len, what)?;
    Ok(buf.split_to(len))
}

/// Reads a `[u32 length][utf-8]` string.
pub(crate) fn get_str(buf: &mut Bytes, what: &str) -> Result<String> {
    let len = get_len(buf, what)?;
    let raw = take(buf, len, what)?;
    String::from_utf8(raw.to_vec()).map_err(|e| Error::corrupted(format!("{what} is not utf-8: {e}")))
}

/// Writes a `[u32 length][utf-8]` string.
pub(crate) fn put_str(out: &mut impl BufMut, value: &str) {
    put_len(out, value.len());
    out.put_slice(value.as_bytes());
}

/// Writes a `u32` length prefix.
///
/// Lengths never exceed `u32::MAX`: chunks are bounded by the `i32` header
/// fields long before that.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn put_len(out: &mut impl BufMut, len: usize) {
    out.put_u32(len as u32);
}
