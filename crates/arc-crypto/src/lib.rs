//! # arc-crypto
//!
//! Cryptographic primitives for the ARC200 client.
//!
//! - SHA-512/256 hashing, plain and domain-separated
//! - Ed25519 signing/verification
//! - Address derivation from public keys

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::{sha512_256, sha512_256_prefixed};
pub use signature::{
    address_to_public_key, public_key_to_address, sign, verify, PrivateKey, PublicKey,
    Signature,
};
