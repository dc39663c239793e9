//! Ed25519 signature operations

use arc_primitives::Address;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use crate::CryptoError;

/// Public key (32 bytes), also the raw form of an [`Address`]
pub type PublicKey = VerifyingKey;

/// Private key (32-byte seed)
pub type PrivateKey = SigningKey;

/// Ed25519 signature (64 bytes)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Size in bytes
    pub const LEN: usize = 64;

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Signature(bytes)
    }

    /// Parse from a slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 64] = slice.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!("expected 64 bytes, got {}", slice.len()))
        })?;
        Ok(Signature(bytes))
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Sign a message with a private key
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(private_key.sign(message).to_bytes())
}

/// Verify a signature against a public key
pub fn verify(
    message: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<(), CryptoError> {
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    public_key
        .verify(message, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Derive the account address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    Address::from_bytes(public_key.to_bytes())
}

/// Recover the verifying key behind an address
pub fn address_to_public_key(address: &Address) -> Result<PublicKey, CryptoError> {
    VerifyingKey::from_bytes(address.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}
