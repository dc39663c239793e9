//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Malformed or duplicate method specification
    #[error("Spec parse error: {0}")]
    SpecParse(String),

    /// Argument incompatible with its declared ABI type
    #[error("Argument encoding error: {0}")]
    ArgumentEncoding(String),

    /// ABI decoding error
    #[error("ABI decoding error: {0}")]
    AbiDecode(String),

    /// The ledger reported a failed transaction group
    #[error("Execution failed: {0}")]
    ExecutionFailure(String),

    /// Signed submission rejected
    #[error("Broadcast rejected: {0}")]
    Broadcast(String),

    /// Probe simulation failed before box references were known
    #[error("Resource discovery failed: {0}")]
    ResourceDiscovery(String),

    /// Method name not present in the registry
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the node
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// Status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid mnemonic or seed
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Transaction encoding error
    #[error("Codec error: {0}")]
    Codec(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for SdkError {
    fn from(e: base64::DecodeError) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<arc_types::CodecError> for SdkError {
    fn from(e: arc_types::CodecError) -> Self {
        SdkError::Codec(e.to_string())
    }
}

impl From<arc_crypto::CryptoError> for SdkError {
    fn from(e: arc_crypto::CryptoError) -> Self {
        SdkError::SigningFailed(e.to_string())
    }
}

impl From<arc_primitives::AddressError> for SdkError {
    fn from(e: arc_primitives::AddressError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<arc_primitives::HashError> for SdkError {
    fn from(e: arc_primitives::HashError) -> Self {
        SdkError::Serialization(e.to_string())
    }
}
