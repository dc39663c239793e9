//! ABI encoding

use arc_primitives::U256;

use super::types::{AbiType, Token};
use crate::SdkError;

/// Largest `uint<N>` width carried by [`Token::Uint`]
pub const MAX_UINT_BITS: usize = 256;

/// Largest encoding that fits in one AVM byte string
pub const MAX_ENCODED_LEN: usize = 65535;

/// Most elements a static array may declare, one packed bool per bit
pub const MAX_ARRAY_ELEMENTS: usize = MAX_ENCODED_LEN * 8;

/// Encode a value under its declared type
pub fn encode(abi_type: &AbiType, token: &Token) -> Result<Vec<u8>, SdkError> {
    match (abi_type, token) {
        (AbiType::Uint(bits), Token::Uint(value)) | (AbiType::UFixed(bits, _), Token::Uint(value)) => {
            encode_uint(*bits, value)
        }
        (AbiType::Byte, Token::Byte(b)) => Ok(vec![*b]),
        (AbiType::Bool, Token::Bool(b)) => Ok(vec![if *b { 0x80 } else { 0x00 }]),
        (AbiType::Address, Token::Address(addr)) => Ok(addr.as_bytes().to_vec()),
        (AbiType::String, Token::String(s)) => {
            let mut result = encode_length(s.len())?;
            result.extend_from_slice(s.as_bytes());
            Ok(result)
        }
        (AbiType::StaticArray(inner, len), Token::Array(tokens)) => {
            if tokens.len() != *len {
                return Err(SdkError::ArgumentEncoding(format!(
                    "{} expects {} elements, got {}",
                    abi_type,
                    len,
                    tokens.len()
                )));
            }
            let types = vec![(**inner).clone(); *len];
            encode_tuple(&types, tokens)
        }
        (AbiType::DynamicArray(inner), Token::Array(tokens)) => {
            let types = vec![(**inner).clone(); tokens.len()];
            let mut result = encode_length(tokens.len())?;
            result.extend(encode_tuple(&types, tokens)?);
            Ok(result)
        }
        (AbiType::Tuple(types), Token::Tuple(tokens)) => {
            if tokens.len() != types.len() {
                return Err(SdkError::ArgumentEncoding(format!(
                    "{} expects {} elements, got {}",
                    abi_type,
                    types.len(),
                    tokens.len()
                )));
            }
            encode_tuple(types, tokens)
        }
        _ => Err(SdkError::ArgumentEncoding(format!(
            "value {:?} does not match type {}",
            token, abi_type
        ))),
    }
}

/// Head/tail tuple encoding with bool packing
fn encode_tuple(types: &[AbiType], tokens: &[Token]) -> Result<Vec<u8>, SdkError> {
    let mut heads: Vec<Vec<u8>> = Vec::new();
    let mut tails: Vec<Option<Vec<u8>>> = Vec::new();

    let mut i = 0;
    while i < types.len() {
        if types[i] == AbiType::Bool {
            // up to 8 consecutive bools share one byte, first bool in the high bit
            let run = types[i..]
                .iter()
                .take(8)
                .take_while(|t| **t == AbiType::Bool)
                .count();
            let mut packed = 0u8;
            for (bit, token) in tokens[i..i + run].iter().enumerate() {
                match token {
                    Token::Bool(true) => packed |= 0x80u8 >> bit,
                    Token::Bool(false) => {}
                    other => {
                        return Err(SdkError::ArgumentEncoding(format!(
                            "value {:?} does not match type bool",
                            other
                        )))
                    }
                }
            }
            heads.push(vec![packed]);
            tails.push(None);
            i += run;
        } else if types[i].is_dynamic() {
            heads.push(vec![0, 0]);
            tails.push(Some(encode(&types[i], &tokens[i])?));
            i += 1;
        } else {
            heads.push(encode(&types[i], &tokens[i])?);
            tails.push(None);
            i += 1;
        }
    }

    let head_len: usize = heads.iter().map(Vec::len).sum();
    let mut tail_len = 0usize;
    for (head, tail) in heads.iter_mut().zip(tails.iter()) {
        if let Some(tail) = tail {
            let offset = head_len + tail_len;
            let offset = u16::try_from(offset).map_err(|_| {
                SdkError::ArgumentEncoding(format!("dynamic offset {} exceeds 65535", offset))
            })?;
            head.copy_from_slice(&offset.to_be_bytes());
            tail_len += tail.len();
        }
    }

    let mut result = Vec::with_capacity(head_len + tail_len);
    for head in heads {
        result.extend(head);
    }
    for tail in tails.into_iter().flatten() {
        result.extend(tail);
    }
    Ok(result)
}

fn encode_uint(bits: usize, value: &U256) -> Result<Vec<u8>, SdkError> {
    if value.bits() > bits {
        return Err(SdkError::ArgumentEncoding(format!(
            "value {} does not fit in uint{}",
            value, bits
        )));
    }
    let mut full = [0u8; 32];
    value.to_big_endian(&mut full);
    Ok(full[32 - bits / 8..].to_vec())
}

fn encode_length(len: usize) -> Result<Vec<u8>, SdkError> {
    let len = u16::try_from(len)
        .map_err(|_| SdkError::ArgumentEncoding(format!("length {} exceeds 65535", len)))?;
    Ok(len.to_be_bytes().to_vec())
}

/// Compute method selector (first 4 bytes of SHA-512/256 of the signature)
pub fn method_selector(signature: &str) -> [u8; 4] {
    let hash = arc_crypto::sha512_256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Parse a type descriptor such as `uint256`, `byte[32]` or `(address,bool)`
pub fn parse_type(s: &str) -> Result<AbiType, SdkError> {
    let s = s.trim();

    if let Some(prefix) = s.strip_suffix("[]") {
        return Ok(AbiType::DynamicArray(Box::new(parse_type(prefix)?)));
    }
    if s.ends_with(']') {
        let open = s
            .rfind('[')
            .ok_or_else(|| SdkError::SpecParse(format!("unbalanced brackets in type: {}", s)))?;
        let len: usize = s[open + 1..s.len() - 1]
            .parse()
            .map_err(|_| SdkError::SpecParse(format!("invalid array length in type: {}", s)))?;
        let array = AbiType::StaticArray(Box::new(parse_type(&s[..open])?), len);
        check_encoded_len(&array, s)?;
        return Ok(array);
    }
    if let Some(inner) = s.strip_prefix('(') {
        let inner = inner
            .strip_suffix(')')
            .ok_or_else(|| SdkError::SpecParse(format!("unbalanced parentheses in type: {}", s)))?;
        return split_tuple(inner)?
            .into_iter()
            .map(parse_type)
            .collect::<Result<Vec<_>, _>>()
            .map(AbiType::Tuple)
            .and_then(|tuple| check_encoded_len(&tuple, s).map(|_| tuple));
    }

    match s {
        "byte" => return Ok(AbiType::Byte),
        "bool" => return Ok(AbiType::Bool),
        "address" => return Ok(AbiType::Address),
        "string" => return Ok(AbiType::String),
        _ => {}
    }

    if let Some(bits) = s.strip_prefix("uint") {
        return parse_bits(bits, s).map(AbiType::Uint);
    }
    if let Some(rest) = s.strip_prefix("ufixed") {
        let (bits, precision) = rest
            .split_once('x')
            .ok_or_else(|| SdkError::SpecParse(format!("invalid ufixed type: {}", s)))?;
        let bits = parse_bits(bits, s)?;
        let precision: usize = precision
            .parse()
            .map_err(|_| SdkError::SpecParse(format!("invalid ufixed precision: {}", s)))?;
        if !(1..=160).contains(&precision) {
            return Err(SdkError::SpecParse(format!("invalid ufixed precision: {}", s)));
        }
        return Ok(AbiType::UFixed(bits, precision));
    }

    Err(SdkError::SpecParse(format!("unrecognized type: {}", s)))
}

/// Reject static arrays and tuples whose head alone exceeds [`MAX_ENCODED_LEN`]
fn check_encoded_len(abi_type: &AbiType, full: &str) -> Result<(), SdkError> {
    if let AbiType::StaticArray(_, len) = abi_type {
        if *len > MAX_ARRAY_ELEMENTS {
            return Err(SdkError::SpecParse(format!(
                "array has more than {} elements: {}",
                MAX_ARRAY_ELEMENTS, full
            )));
        }
    }
    let head_len = match abi_type {
        AbiType::StaticArray(inner, len) if inner.is_dynamic() => len.checked_mul(2),
        AbiType::Tuple(types) if abi_type.is_dynamic() => types.iter().try_fold(0usize, |acc, t| {
            acc.checked_add(if t.is_dynamic() { 2 } else { t.static_size()? })
        }),
        other => other.static_size(),
    };
    match head_len {
        Some(len) if len <= MAX_ENCODED_LEN => Ok(()),
        _ => Err(SdkError::SpecParse(format!(
            "type exceeds {} encoded bytes: {}",
            MAX_ENCODED_LEN, full
        ))),
    }
}

fn parse_bits(bits: &str, full: &str) -> Result<usize, SdkError> {
    let bits: usize = bits
        .parse()
        .map_err(|_| SdkError::SpecParse(format!("invalid bit width in type: {}", full)))?;
    if bits == 0 || bits % 8 != 0 || bits > MAX_UINT_BITS {
        return Err(SdkError::SpecParse(format!(
            "unsupported bit width in type: {}",
            full
        )));
    }
    Ok(bits)
}

/// Split a tuple body on top-level commas
fn split_tuple(inner: &str) -> Result<Vec<&str>, SdkError> {
    if inner.is_empty() {
        return Ok(vec![]);
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(SdkError::SpecParse(format!("unbalanced parentheses: ({})", inner)));
        }
    }
    if depth != 0 {
        return Err(SdkError::SpecParse(format!("unbalanced parentheses: ({})", inner)));
    }
    parts.push(&inner[start..]);
    Ok(parts)
}
