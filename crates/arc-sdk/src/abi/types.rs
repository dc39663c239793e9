//! ABI type definitions

use arc_primitives::{Address, U256};
use std::fmt;

/// ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unsigned integer or fixed-point raw value (8-256 bits)
    Uint(U256),
    /// Single byte
    Byte(u8),
    /// Boolean
    Bool(bool),
    /// Address (32 bytes)
    Address(Address),
    /// UTF-8 string
    String(String),
    /// Static or dynamic array
    Array(Vec<Token>),
    /// Tuple; the empty tuple stands for a `void` return
    Tuple(Vec<Token>),
}

/// ABI type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// `uint<N>`, N a multiple of 8 in 8..=256
    Uint(usize),
    /// `ufixed<N>x<M>`, encoded like `uint<N>` with M decimal places
    UFixed(usize, usize),
    /// `byte`
    Byte,
    /// `bool`
    Bool,
    /// `address`
    Address,
    /// `string`
    String,
    /// `T[N]`
    StaticArray(Box<AbiType>, usize),
    /// `T[]`
    DynamicArray(Box<AbiType>),
    /// `(T1,T2,...)`
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::String | AbiType::DynamicArray(_) => true,
            AbiType::StaticArray(inner, _) => inner.is_dynamic(),
            AbiType::Tuple(types) => types.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Encoded size of a static type in bytes, `None` for dynamic types
    pub fn static_size(&self) -> Option<usize> {
        match self {
            AbiType::Uint(bits) | AbiType::UFixed(bits, _) => Some(bits / 8),
            AbiType::Byte | AbiType::Bool => Some(1),
            AbiType::Address => Some(Address::LEN),
            AbiType::String | AbiType::DynamicArray(_) => None,
            AbiType::StaticArray(inner, len) => {
                if **inner == AbiType::Bool {
                    Some(len.div_ceil(8))
                } else {
                    inner.static_size()?.checked_mul(*len)
                }
            }
            AbiType::Tuple(types) => tuple_static_size(types),
        }
    }

    /// `byte[N]` or `byte[]`, returned by contracts as raw text
    pub fn is_byte_array(&self) -> bool {
        match self {
            AbiType::StaticArray(inner, _) | AbiType::DynamicArray(inner) => {
                **inner == AbiType::Byte
            }
            _ => false,
        }
    }
}

fn tuple_static_size(types: &[AbiType]) -> Option<usize> {
    let mut size: usize = 0;
    let mut i = 0;
    while i < types.len() {
        if types[i] == AbiType::Bool {
            let run = types[i..].iter().take_while(|t| **t == AbiType::Bool).count();
            size = size.checked_add(run.div_ceil(8))?;
            i += run;
        } else {
            size = size.checked_add(types[i].static_size()?)?;
            i += 1;
        }
    }
    Some(size)
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::UFixed(bits, precision) => write!(f, "ufixed{}x{}", bits, precision),
            AbiType::Byte => f.write_str("byte"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::Address => f.write_str("address"),
            AbiType::String => f.write_str("string"),
            AbiType::StaticArray(inner, len) => write!(f, "{}[{}]", inner, len),
            AbiType::DynamicArray(inner) => write!(f, "{}[]", inner),
            AbiType::Tuple(types) => {
                f.write_str("(")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", t)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Token {
    /// Create a uint token from u64
    pub fn uint(value: u64) -> Self {
        Token::Uint(U256::from(value))
    }

    /// Create an address token
    pub fn address(addr: Address) -> Self {
        Token::Address(addr)
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a byte-array token (`byte[N]` / `byte[]`)
    pub fn byte_array(bytes: &[u8]) -> Self {
        Token::Array(bytes.iter().copied().map(Token::Byte).collect())
    }

    /// Integer value, if this is a uint token
    pub fn as_u256(&self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer value narrowed to u64, if it fits
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Token::Uint(v) if v.bits() <= 64 => Some(v.low_u64()),
            Token::Byte(b) => Some(u64::from(*b)),
            _ => None,
        }
    }

    /// Boolean value; a byte is true when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(*b),
            Token::Byte(b) => Some(*b != 0),
            _ => None,
        }
    }

    /// Text value, if this is a string token
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Address value, if this is an address token
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }
}
