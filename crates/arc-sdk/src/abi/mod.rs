//! ARC-4 ABI encoding and decoding
//!
//! This module provides functionality for:
//! - Parsing type descriptors (`uint256`, `byte[32]`, `(address,bool)[]`, ...)
//! - Encoding call arguments and decoding return values
//! - Computing method selectors
//!
//! # Example
//!
//! ```rust
//! use arc_sdk::abi::{encode, decode, method_selector, parse_type, Token};
//! use arc_primitives::Address;
//!
//! let selector = method_selector("arc200_balanceOf(address)uint256");
//! let arg = encode(&parse_type("address").unwrap(), &Token::Address(Address::ZERO)).unwrap();
//! assert_eq!(selector.len(), 4);
//! assert_eq!(arg.len(), 32);
//!
//! let balance = decode(&parse_type("uint256").unwrap(), &[0u8; 32]).unwrap();
//! assert_eq!(balance.as_u64(), Some(0));
//! ```

mod decode;
mod encode;
mod types;

pub use decode::decode;
pub use encode::{encode, method_selector, parse_type, MAX_ARRAY_ELEMENTS, MAX_ENCODED_LEN, MAX_UINT_BITS};
pub use types::{AbiType, Token};
