//! # arc-primitives
//!
//! Primitive types for the ARC200 client.
//!
//! This crate provides the fundamental data types used throughout the workspace:
//! 32-byte account addresses in their checksummed base32 text form, 32-byte
//! digests, and the 256-bit unsigned integer used for token amounts.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Application (smart contract) identifier
pub type AppId = u64;

/// Ledger round number
pub type Round = u64;

/// Amount in micro-units of the native asset
pub type MicroAlgos = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_basic() {
        let supply = U256::from(1_000_000u64);
        let spent = U256::from(250_000u64);
        assert_eq!(supply - spent, U256::from(750_000u64));
    }
}
