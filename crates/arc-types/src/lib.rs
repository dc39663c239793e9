//! # arc-types
//!
//! Transaction types for the ARC200 client.
//!
//! This crate provides:
//! - [`Transaction`](transaction::Transaction) - payment and application-call records
//! - [`SignedTransaction`](transaction::SignedTransaction) - signed (or simulate-only) wrappers
//! - [`TransactionGroup`](group::TransactionGroup) - atomic groups sharing a group id
//! - [`codec`] - canonical msgpack encoding used for ids, signing and submission

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
mod error;
pub mod group;
pub mod transaction;

pub use codec::MsgValue;
pub use error::CodecError;
pub use group::{compute_group_id, TransactionGroup, MAX_GROUP_SIZE};
pub use transaction::{
    application_address, ApplicationCall, BoxReference, OnComplete, Payment, SignedTransaction,
    Transaction, TransactionBody, TransactionHeader, TxType,
};
