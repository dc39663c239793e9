//! Encoding errors

use thiserror::Error;

/// Error raised while encoding transactions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Underlying msgpack writer failed
    #[error("msgpack write failed: {0}")]
    Write(String),

    /// A collection does not fit the msgpack length prefix
    #[error("{what} too large: {len}")]
    TooLarge {
        /// What was being encoded
        what: &'static str,
        /// Offending length
        len: usize,
    },

    /// A box belongs to an application missing from the foreign-apps list
    #[error("box references application {0} which is not in the foreign apps list")]
    BoxAppNotReferenced(u64),

    /// Group with no transactions
    #[error("transaction group is empty")]
    EmptyGroup,

    /// Group exceeds the protocol limit
    #[error("transaction group has {0} transactions, limit is 16")]
    GroupTooLarge(usize),
}
