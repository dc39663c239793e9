//! Canonical msgpack encoding.
//!
//! Transaction ids, group ids and signatures are all computed over the
//! canonical form, so every encoder in the workspace goes through [`MsgValue`]:
//!
//! - map keys are written in ascending byte order,
//! - map entries holding a zero/empty/false value are omitted,
//! - integers use the smallest msgpack representation,
//! - byte strings use the `bin` family, text uses `str`.

use rmp::encode;

use crate::CodecError;

/// Value tree for canonical msgpack encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgValue {
    /// Boolean
    Bool(bool),
    /// Unsigned integer
    Uint(u64),
    /// UTF-8 text
    Str(String),
    /// Raw bytes
    Bin(Vec<u8>),
    /// Ordered array (elements are never omitted)
    Array(Vec<MsgValue>),
    /// Map with static keys; canonicalized on write
    Map(Vec<(&'static str, MsgValue)>),
}

impl MsgValue {
    /// Whether the canonical encoder drops this value when it is a map entry
    pub fn is_empty(&self) -> bool {
        match self {
            MsgValue::Bool(b) => !b,
            MsgValue::Uint(n) => *n == 0,
            MsgValue::Str(s) => s.is_empty(),
            MsgValue::Bin(b) => b.is_empty(),
            MsgValue::Array(items) => items.is_empty(),
            MsgValue::Map(entries) => entries.iter().all(|(_, v)| v.is_empty()),
        }
    }

    /// Encode to canonical msgpack bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        write_value(&mut buf, self)?;
        Ok(buf)
    }
}

fn write_value(buf: &mut Vec<u8>, value: &MsgValue) -> Result<(), CodecError> {
    match value {
        MsgValue::Bool(b) => encode::write_bool(buf, *b).map_err(write_error)?,
        MsgValue::Uint(n) => {
            encode::write_uint(buf, *n).map_err(write_error)?;
        }
        MsgValue::Str(s) => encode::write_str(buf, s).map_err(write_error)?,
        MsgValue::Bin(bytes) => encode::write_bin(buf, bytes).map_err(write_error)?,
        MsgValue::Array(items) => {
            encode::write_array_len(buf, length_u32("array", items.len())?)
                .map_err(write_error)?;
            for item in items {
                write_value(buf, item)?;
            }
        }
        MsgValue::Map(entries) => {
            let mut present: Vec<&(&'static str, MsgValue)> =
                entries.iter().filter(|(_, v)| !v.is_empty()).collect();
            present.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            encode::write_map_len(buf, length_u32("map", present.len())?)
                .map_err(write_error)?;
            for (key, item) in present {
                encode::write_str(buf, key).map_err(write_error)?;
                write_value(buf, item)?;
            }
        }
    }
    Ok(())
}

fn length_u32(what: &'static str, len: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::TooLarge { what, len })
}

fn write_error(e: impl std::fmt::Display) -> CodecError {
    CodecError::Write(e.to_string())
}
