//! ABI decoding
//!
//! Decoding is strict: the input must be exactly the encoding of one value of
//! the requested type, with no trailing bytes.

use arc_primitives::{Address, U256};

use super::encode::MAX_ARRAY_ELEMENTS;
use super::types::{AbiType, Token};
use crate::SdkError;

/// Decode one value of `abi_type` from `data`
pub fn decode(abi_type: &AbiType, data: &[u8]) -> Result<Token, SdkError> {
    match abi_type {
        AbiType::Uint(bits) | AbiType::UFixed(bits, _) => {
            check_exact(data, bits / 8, abi_type)?;
            Ok(Token::Uint(U256::from_big_endian(data)))
        }
        AbiType::Byte => {
            check_exact(data, 1, abi_type)?;
            Ok(Token::Byte(data[0]))
        }
        AbiType::Bool => {
            check_exact(data, 1, abi_type)?;
            match data[0] {
                0x80 => Ok(Token::Bool(true)),
                0x00 => Ok(Token::Bool(false)),
                other => Err(SdkError::AbiDecode(format!("invalid bool byte 0x{:02x}", other))),
            }
        }
        AbiType::Address => {
            check_exact(data, Address::LEN, abi_type)?;
            let addr = Address::from_slice(data).map_err(|e| SdkError::AbiDecode(e.to_string()))?;
            Ok(Token::Address(addr))
        }
        AbiType::String => {
            let len = read_length(data)?;
            check_exact(data, 2 + len, abi_type)?;
            let s = std::str::from_utf8(&data[2..])
                .map_err(|e| SdkError::AbiDecode(format!("invalid UTF-8 in string: {}", e)))?;
            Ok(Token::String(s.to_string()))
        }
        AbiType::StaticArray(inner, len) => {
            if *len > MAX_ARRAY_ELEMENTS {
                return Err(SdkError::AbiDecode(format!(
                    "{} has more than {} elements",
                    abi_type, MAX_ARRAY_ELEMENTS
                )));
            }
            let types = vec![(**inner).clone(); *len];
            decode_tuple(&types, data).map(Token::Array)
        }
        AbiType::DynamicArray(inner) => {
            let len = read_length(data)?;
            let types = vec![(**inner).clone(); len];
            decode_tuple(&types, &data[2..]).map(Token::Array)
        }
        AbiType::Tuple(types) => decode_tuple(types, data).map(Token::Tuple),
    }
}

/// Split a tuple encoding into per-element slices and decode each
fn decode_tuple(types: &[AbiType], data: &[u8]) -> Result<Vec<Token>, SdkError> {
    let mut tokens = Vec::with_capacity(types.len());
    // (element index, tail offset) for dynamic elements
    let mut dynamic: Vec<(usize, usize)> = Vec::new();
    let mut pos = 0usize;

    let mut i = 0;
    while i < types.len() {
        if types[i] == AbiType::Bool {
            let run = types[i..]
                .iter()
                .take(8)
                .take_while(|t| **t == AbiType::Bool)
                .count();
            let packed = *data
                .get(pos)
                .ok_or_else(|| SdkError::AbiDecode("data too short for bool".to_string()))?;
            for bit in 0..run {
                tokens.push(Token::Bool(packed & (0x80u8 >> bit) != 0));
            }
            if packed & (0xffu8.checked_shr(run as u32).unwrap_or(0)) != 0 {
                return Err(SdkError::AbiDecode(format!(
                    "unused bits set in packed bool byte 0x{:02x}",
                    packed
                )));
            }
            pos += 1;
            i += run;
        } else if types[i].is_dynamic() {
            let head = data
                .get(pos..pos + 2)
                .ok_or_else(|| SdkError::AbiDecode("data too short for offset".to_string()))?;
            let offset = u16::from_be_bytes([head[0], head[1]]) as usize;
            dynamic.push((i, offset));
            // placeholder, replaced once tail bounds are known
            tokens.push(Token::Tuple(vec![]));
            pos += 2;
            i += 1;
        } else {
            let size = types[i]
                .static_size()
                .ok_or_else(|| SdkError::AbiDecode(format!("no static size for {}", types[i])))?;
            let chunk = data.get(pos..pos + size).ok_or_else(|| {
                SdkError::AbiDecode(format!("data too short for {}", types[i]))
            })?;
            tokens.push(decode(&types[i], chunk)?);
            pos += size;
            i += 1;
        }
    }

    let head_len = pos;
    if dynamic.is_empty() {
        if data.len() != head_len {
            return Err(SdkError::AbiDecode(format!(
                "expected {} bytes, got {}",
                head_len,
                data.len()
            )));
        }
        return Ok(tokens);
    }

    if dynamic[0].1 != head_len {
        return Err(SdkError::AbiDecode(format!(
            "first dynamic offset {} does not follow head of {} bytes",
            dynamic[0].1, head_len
        )));
    }
    for (n, &(index, start)) in dynamic.iter().enumerate() {
        let end = match dynamic.get(n + 1) {
            Some(&(_, next)) => next,
            None => data.len(),
        };
        if start > end || end > data.len() {
            return Err(SdkError::AbiDecode(format!(
                "dynamic offsets out of order: {}..{}",
                start, end
            )));
        }
        tokens[index] = decode(&types[index], &data[start..end])?;
    }

    Ok(tokens)
}

fn read_length(data: &[u8]) -> Result<usize, SdkError> {
    match data {
        [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo]) as usize),
        _ => Err(SdkError::AbiDecode("data too short for length prefix".to_string())),
    }
}

fn check_exact(data: &[u8], expected: usize, abi_type: &AbiType) -> Result<(), SdkError> {
    if data.len() != expected {
        return Err(SdkError::AbiDecode(format!(
            "{} expects {} bytes, got {}",
            abi_type,
            expected,
            data.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode, parse_type};

    #[test]
    fn test_decode_uint256() {
        let mut data = [0u8; 32];
        data[31] = 42;
        assert_eq!(decode(&AbiType::Uint(256), &data).unwrap(), Token::uint(42));
    }

    #[test]
    fn test_decode_uint_wrong_length() {
        assert!(matches!(
            decode(&AbiType::Uint(64), &[0u8; 7]),
            Err(SdkError::AbiDecode(_))
        ));
        assert!(matches!(
            decode(&AbiType::Uint(8), &[1, 2]),
            Err(SdkError::AbiDecode(_))
        ));
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(decode(&AbiType::Bool, &[0x80]).unwrap(), Token::Bool(true));
        assert_eq!(decode(&AbiType::Bool, &[0x00]).unwrap(), Token::Bool(false));
        assert!(decode(&AbiType::Bool, &[0x01]).is_err());
    }

    #[test]
    fn test_decode_byte() {
        assert_eq!(decode(&AbiType::Byte, &[0x01]).unwrap(), Token::Byte(1));
    }

    #[test]
    fn test_decode_address() {
        let token = decode(&AbiType::Address, &[9u8; 32]).unwrap();
        assert_eq!(token, Token::Address(Address::from_bytes([9u8; 32])));
        assert!(decode(&AbiType::Address, &[9u8; 31]).is_err());
    }

    #[test]
    fn test_decode_string() {
        let token = decode(&AbiType::String, &[0x00, 0x02, b'h', b'i']).unwrap();
        assert_eq!(token, Token::string("hi"));
        // declared length disagrees with payload
        assert!(decode(&AbiType::String, &[0x00, 0x03, b'h', b'i']).is_err());
        assert!(decode(&AbiType::String, &[0x00]).is_err());
    }

    #[test]
    fn test_decode_packed_bools() {
        let t = parse_type("(bool,bool,bool)").unwrap();
        assert_eq!(
            decode(&t, &[0b1010_0000]).unwrap(),
            Token::Tuple(vec![Token::Bool(true), Token::Bool(false), Token::Bool(true)])
        );
        assert!(decode(&t, &[0b1010_0001]).is_err());
    }

    #[test]
    fn test_decode_tuple_with_tail() {
        let t = parse_type("(uint16,string,bool)").unwrap();
        let data = [0x00, 0x07, 0x00, 0x05, 0x80, 0x00, 0x02, b'h', b'i'];
        assert_eq!(
            decode(&t, &data).unwrap(),
            Token::Tuple(vec![Token::uint(7), Token::string("hi"), Token::Bool(true)])
        );
    }

    #[test]
    fn test_decode_bad_offset() {
        let t = parse_type("(uint16,string)").unwrap();
        // offset points inside the head
        let data = [0x00, 0x07, 0x00, 0x03, 0x00, 0x00];
        assert!(decode(&t, &data).is_err());
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let t = parse_type("(uint8,uint8)").unwrap();
        assert!(decode(&t, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_decode_dynamic_array_of_strings() {
        let t = parse_type("string[]").unwrap();
        let value = Token::Array(vec![Token::string("a"), Token::string(""), Token::string("xyz")]);
        let data = encode(&t, &value).unwrap();
        assert_eq!(decode(&t, &data).unwrap(), value);
    }

    #[test]
    fn test_decode_oversized_static_array() {
        let huge = AbiType::StaticArray(Box::new(AbiType::Uint(256)), 1 << 60);
        let tuple = AbiType::Tuple(vec![huge.clone(), AbiType::Uint(8)]);
        assert!(matches!(decode(&tuple, &[0u8; 33]), Err(SdkError::AbiDecode(_))));
        assert!(matches!(decode(&huge, &[0u8; 33]), Err(SdkError::AbiDecode(_))));

        let strings = AbiType::StaticArray(Box::new(AbiType::String), 1 << 60);
        assert!(matches!(decode(&strings, &[0u8; 4]), Err(SdkError::AbiDecode(_))));
    }

    #[test]
    fn test_decode_byte_array() {
        let t = parse_type("byte[8]").unwrap();
        assert_eq!(decode(&t, b"VRC200\0\0").unwrap(), Token::byte_array(b"VRC200\0\0"));
    }
}
