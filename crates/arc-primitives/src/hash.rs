//! 32-byte digest type (transaction ids, group ids, genesis hash)

use data_encoding::BASE32_NOPAD;
use std::fmt;
use thiserror::Error;

/// Hash parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// Invalid base32 string
    #[error("invalid base32 string: {0}")]
    InvalidBase32(String),
    /// Invalid length
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },
}

/// 256-bit hash (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct H256([u8; 32]);

impl H256 {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Zero hash
    pub const ZERO: H256 = H256([0u8; 32]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        if slice.len() != Self::LEN {
            return Err(HashError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(H256(bytes))
    }

    /// Parse from the unpadded base32 form used for transaction ids
    pub fn from_base32(s: &str) -> Result<Self, HashError> {
        let bytes = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| HashError::InvalidBase32(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Unpadded base32, 52 characters
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(&self.0)
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h256_display_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xc6;
        bytes[31] = 0x7a;
        let hash = H256::from_bytes(bytes);
        let text = hash.to_hex();
        assert_eq!(text.len(), 66);
        assert!(text.starts_with("0xc600"));
        assert!(text.ends_with("007a"));
        assert_eq!(hash.to_string(), text);
        assert_eq!(format!("{:?}", H256::ZERO), format!("H256(0x{})", "00".repeat(32)));
    }

    #[test]
    fn test_h256_invalid_length() {
        assert_eq!(
            H256::from_slice(&[0u8; 31]),
            Err(HashError::InvalidLength {
                expected: 32,
                got: 31
            })
        );
    }

    #[test]
    fn test_h256_base32_roundtrip() {
        let hash = H256::from_bytes([0xab; 32]);
        let text = hash.to_base32();
        assert_eq!(text.len(), 52);
        assert!(!text.contains('='));
        assert_eq!(H256::from_base32(&text).unwrap(), hash);
    }

    #[test]
    fn test_h256_zero_base32() {
        assert_eq!(H256::ZERO.to_base32(), "A".repeat(52));
    }

    #[test]
    fn test_h256_base32_invalid() {
        assert!(matches!(
            H256::from_base32("not-base32"),
            Err(HashError::InvalidBase32(_))
        ));
    }
}
