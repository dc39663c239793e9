//! Account address type (32-byte ed25519 public key)
//!
//! The text form is the RFC 4648 base32 encoding (no padding) of the public key
//! followed by the last 4 bytes of its SHA-512/256 digest, 58 characters in all.

use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Invalid base32 text
    #[error("invalid base32 string: {0}")]
    InvalidBase32(String),
    /// Invalid length
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },
    /// Checksum does not match the public key
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// 32-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 32;

    /// Size of the checksum appended in the text form
    pub const CHECKSUM_LEN: usize = 4;

    /// Length of the base32 text form
    pub const TEXT_LEN: usize = 58;

    /// Zero address (AAAA...Y5HFKQ)
    pub const ZERO: Address = Address([0u8; 32]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse the checksummed base32 text form
    pub fn from_string(s: &str) -> Result<Self, AddressError> {
        if s.len() != Self::TEXT_LEN {
            return Err(AddressError::InvalidLength {
                expected: Self::TEXT_LEN,
                got: s.len(),
            });
        }
        let decoded = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| AddressError::InvalidBase32(e.to_string()))?;
        if decoded.len() != Self::LEN + Self::CHECKSUM_LEN {
            return Err(AddressError::InvalidLength {
                expected: Self::LEN + Self::CHECKSUM_LEN,
                got: decoded.len(),
            });
        }

        let address = Self::from_slice(&decoded[..Self::LEN])?;
        if address.checksum() != decoded[Self::LEN..] {
            return Err(AddressError::ChecksumMismatch);
        }
        Ok(address)
    }

    /// Get as byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Last 4 bytes of SHA-512/256 over the public key
    pub fn checksum(&self) -> [u8; 4] {
        let digest = Sha512_256::digest(self.0);
        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&digest[digest.len() - Self::CHECKSUM_LEN..]);
        checksum
    }

    fn encode_text(&self) -> String {
        let mut buf = Vec::with_capacity(Self::LEN + Self::CHECKSUM_LEN);
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&self.checksum());
        BASE32_NOPAD.encode(&buf)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode_text())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_text())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
