//! SHA-512/256 hashing

use arc_primitives::H256;
use sha2::{Digest, Sha512_256};

/// Compute SHA-512/256 hash of the input data
pub fn sha512_256(data: &[u8]) -> H256 {
    let mut hasher = Sha512_256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Compute SHA-512/256 over `prefix || data`
///
/// The ledger separates hash domains with short ASCII tags such as `"TX"`
/// (transactions), `"TG"` (transaction groups) and `"appID"` (application
/// addresses).
pub fn sha512_256_prefixed(prefix: &[u8], data: &[u8]) -> H256 {
    let mut hasher = Sha512_256::new();
    hasher.update(prefix);
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== NIST test vectors ====================

    #[test]
    fn test_sha512_256_empty() {
        let hash = sha512_256(&[]);
        assert_eq!(
            hash.to_hex(),
            "0xc672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
        );
    }

    #[test]
    fn test_sha512_256_abc() {
        let hash = sha512_256(b"abc");
        assert_eq!(
            hash.to_hex(),
            "0x53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }

    // ==================== Method signatures ====================

    #[test]
    fn test_sha512_256_method_signature() {
        let hash = sha512_256(b"add(uint64,uint64)uint128");
        assert_eq!(&hash.as_bytes()[..4], &[0x8a, 0xa3, 0xb6, 0x1f]);
    }

    #[test]
    fn test_sha512_256_arc200_transfer() {
        let hash = sha512_256(b"arc200_transfer(address,uint256)bool");
        assert_eq!(&hash.as_bytes()[..4], &[0xda, 0x70, 0x25, 0xb9]);
    }

    // ==================== Domain separation ====================

    #[test]
    fn test_prefixed_matches_concatenation() {
        let mut joined = b"appID".to_vec();
        joined.extend_from_slice(&6_778_021u64.to_be_bytes());
        assert_eq!(
            sha512_256_prefixed(b"appID", &6_778_021u64.to_be_bytes()),
            sha512_256(&joined)
        );
    }

    #[test]
    fn test_prefix_changes_digest() {
        assert_ne!(
            sha512_256_prefixed(b"TX", b"payload"),
            sha512_256_prefixed(b"TG", b"payload")
        );
    }

    #[test]
    fn test_sha512_256_deterministic() {
        let data = b"VRC200";
        assert_eq!(sha512_256(data), sha512_256(data));
    }
}
