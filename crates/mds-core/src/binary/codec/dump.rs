//! Flat typed value dumps.
//!
//! Fixed-width types are written back to back, big-endian (floats as their
//! IEEE-754 bits). Strings and byte strings are `[u32 length][bytes]` each.

use bytes::{Buf, BufMut};

use super::{ensure, get_len, put_len};
use crate::column::{ColumnType, PrimitiveValue};
use crate::error::{Error, Result};

/// Appends one value to `out`.
pub fn write_value(value: &PrimitiveValue, out: &mut impl BufMut) {
    match value {
        PrimitiveValue::Boolean(v) => out.put_u8(u8::from(*v)),
        PrimitiveValue::Byte(v) => out.put_i8(*v),
        PrimitiveValue::Short(v) => out.put_i16(*v),
        PrimitiveValue::Integer(v) => out.put_i32(*v),
        PrimitiveValue::Long(v) => out.put_i64(*v),
        PrimitiveValue::Float(v) => out.put_f32(*v),
        PrimitiveValue::Double(v) => out.put_f64(*v),
        PrimitiveValue::String(v) => {
            put_len(out, v.len());
            out.put_slice(v.as_bytes());
        }
        PrimitiveValue::Bytes(v) => {
            put_len(out, v.len());
            out.put_slice(v);
        }
    }
}

/// Appends every value to `out`.
pub fn write_values(values: &[PrimitiveValue], out: &mut Vec<u8>) {
    out.reserve(values.iter().map(dump_len).sum());
    for value in values {
        write_value(value, out);
    }
}

/// Bytes one value occupies in a dump, framing included.
#[must_use]
pub fn dump_len(value: &PrimitiveValue) -> usize {
    match value {
        PrimitiveValue::String(_) | PrimitiveValue::Bytes(_) => 4 + value.byte_len(),
        other => other.byte_len(),
    }
}

/// Parses a complete dump of `column_type` values.
///
/// # Errors
///
/// - [`Error::Corrupted`] on truncation, invalid utf-8 or invalid booleans
/// - [`Error::Unsupported`] for types that have no flat dump
pub fn parse_values(column_type: ColumnType, section: &[u8]) -> Result<Vec<PrimitiveValue>> {
    if !column_type.is_primitive() {
        return Err(Error::Unsupported(format!(
            "{column_type} columns have no value dump"
        )));
    }
    let mut buf = section;
    if let Some(width) = column_type.byte_width() {
        if buf.len() % width != 0 {
            return Err(Error::corrupted(format!(
                "{column_type} dump of {} bytes is not a multiple of {width}",
                buf.len()
            )));
        }
        let mut values = Vec::with_capacity(buf.len() / width);
        while buf.has_remaining() {
            values.push(read_fixed(column_type, &mut buf)?);
        }
        return Ok(values);
    }

    let mut values = Vec::new();
    while buf.has_remaining() {
        let len = get_len(&mut buf, "value length")?;
        ensure(&buf, len, "value")?;
        let (raw, rest) = buf.split_at(len);
        buf = rest;
        values.push(match column_type {
            ColumnType::String => PrimitiveValue::String(
                std::str::from_utf8(raw)
                    .map_err(|e| Error::corrupted(format!("string value is not utf-8: {e}")))?
                    .to_string(),
            ),
            _ => PrimitiveValue::Bytes(raw.to_vec()),
        });
    }
    Ok(values)
}

fn read_fixed(column_type: ColumnType, buf: &mut &[u8]) -> Result<PrimitiveValue> {
    Ok(match column_type {
        ColumnType::Boolean => match buf.get_u8() {
            0 => PrimitiveValue::Boolean(false),
            1 => PrimitiveValue::Boolean(true),
            other => return Err(Error::corrupted(format!("invalid boolean byte {other}"))),
        },
        ColumnType::Byte => PrimitiveValue::Byte(buf.get_i8()),
        ColumnType::Short => PrimitiveValue::Short(buf.get_i16()),
        ColumnType::Integer => PrimitiveValue::Integer(buf.get_i32()),
        ColumnType::Long => PrimitiveValue::Long(buf.get_i64()),
        ColumnType::Float => PrimitiveValue::Float(buf.get_f32()),
        ColumnType::Double => PrimitiveValue::Double(buf.get_f64()),
        other => return Err(Error::Unsupported(format!("{other} is not fixed width"))),
    })
}
