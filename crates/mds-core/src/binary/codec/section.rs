//! Length-prefixed section framing.
//!
//! ```text
//! [u32 len₁][payload₁][u32 len₂][payload₂] ...
//! ```

use bytes::{BufMut, Bytes};

use super::{get_len, put_len, take};
use crate::error::{Error, Result};

/// Frames `sections` and concatenates them.
#[must_use]
pub fn frame(sections: &[&[u8]]) -> Vec<u8> {
    let total = sections.iter().map(|s| 4 + s.len()).sum();
    let mut out = Vec::with_capacity(total);
    for section in sections {
        put_len(&mut out, section.len());
        out.put_slice(section);
    }
    out
}

/// Splits a framed payload into exactly `expected` sections, zero-copy.
///
/// # Errors
///
/// Returns [`Error::Corrupted`] on truncation or if bytes remain after the
/// last expected section.
pub fn split(payload: &Bytes, expected: usize) -> Result<Vec<Bytes>> {
    let mut buf = payload.clone();
    let mut sections = Vec::with_capacity(expected);
    for i in 0..expected {
        let len = get_len(&mut buf, "section header")?;
        sections.push(take(&mut buf, len, &format!("section {i}"))?);
    }
    if !buf.is_empty() {
        return Err(Error::corrupted(format!(
            "{} trailing bytes after {expected} sections",
            buf.len()
        )));
    }
    Ok(sections)
}
