//! Wallet and account management

use arc_crypto::{public_key_to_address, sign, verify, PrivateKey, PublicKey, Signature};
use arc_primitives::Address;
use arc_types::{SignedTransaction, Transaction, TransactionGroup};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::mnemonic::{self, SEED_LEN};
use crate::SdkError;

/// Wallet for managing the signing key
///
/// Note: Clone is intentionally not implemented to prevent accidental key duplication.
/// Share a wallet behind `Arc` instead.
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
}

impl Wallet {
    /// Create a new random wallet
    pub fn new_random() -> Self {
        Self::from_key(PrivateKey::generate(&mut OsRng))
    }

    /// Create a wallet from a raw 32-byte ed25519 seed
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self::from_key(PrivateKey::from_bytes(seed))
    }

    /// Create a wallet from a 25-word mnemonic
    pub fn from_mnemonic(phrase: &str) -> Result<Self, SdkError> {
        let mut seed = mnemonic::to_seed(phrase)?;
        let wallet = Self::from_seed(&seed);
        seed.zeroize();
        Ok(wallet)
    }

    fn from_key(private_key: PrivateKey) -> Self {
        let address = public_key_to_address(&private_key.verifying_key());
        Self {
            private_key,
            address,
        }
    }

    /// The 25-word mnemonic of this wallet's seed
    pub fn to_mnemonic(&self) -> String {
        let mut seed = self.private_key.to_bytes();
        let phrase = mnemonic::from_seed(&seed);
        seed.zeroize();
        phrase
    }

    /// Get the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the wallet's public key
    pub fn public_key(&self) -> PublicKey {
        self.private_key.verifying_key()
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Signature {
        sign(message, &self.private_key)
    }

    /// Verify a signature made by this wallet
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SdkError> {
        verify(message, signature, &self.public_key()).map_err(SdkError::from)
    }

    /// Sign one transaction
    pub fn sign_transaction(&self, txn: &Transaction) -> Result<SignedTransaction, SdkError> {
        if txn.header.sender != self.address {
            return Err(SdkError::SigningFailed(format!(
                "transaction sender {} is not the wallet address {}",
                txn.header.sender, self.address
            )));
        }
        let signature = self.sign(&txn.bytes_to_sign()?);
        Ok(SignedTransaction::new(txn.clone(), signature))
    }

    /// Sign every transaction of a group, preserving order
    pub fn sign_group(&self, group: &TransactionGroup) -> Result<Vec<SignedTransaction>, SdkError> {
        group
            .transactions()
            .iter()
            .map(|txn| self.sign_transaction(txn))
            .collect()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
