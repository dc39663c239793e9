//! Atomic transaction groups

use arc_crypto::sha512_256_prefixed;
use arc_primitives::H256;

use crate::codec::MsgValue;
use crate::transaction::{SignedTransaction, Transaction};
use crate::CodecError;

/// Domain tag for group id hashing
pub const GROUP_TAG: &[u8] = b"TG";

/// Protocol limit on transactions per group
pub const MAX_GROUP_SIZE: usize = 16;

/// Compute the group id: SHA-512/256 over `"TG" || msgpack({"txlist": [txid, ...]})`
pub fn compute_group_id(transactions: &[Transaction]) -> Result<H256, CodecError> {
    if transactions.is_empty() {
        return Err(CodecError::EmptyGroup);
    }
    if transactions.len() > MAX_GROUP_SIZE {
        return Err(CodecError::GroupTooLarge(transactions.len()));
    }

    let txlist = transactions
        .iter()
        .map(|txn| {
            // ids are computed without any previously assigned group
            let mut ungrouped = txn.clone();
            ungrouped.header.group = None;
            Ok(MsgValue::Bin(ungrouped.raw_id()?.as_bytes().to_vec()))
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    let encoded = MsgValue::Map(vec![("txlist", MsgValue::Array(txlist))]).to_bytes()?;
    Ok(sha512_256_prefixed(GROUP_TAG, &encoded))
}

/// Ordered transactions sharing one group id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionGroup {
    transactions: Vec<Transaction>,
    group_id: H256,
}

impl TransactionGroup {
    /// Assign a shared group id to `transactions`
    pub fn new(mut transactions: Vec<Transaction>) -> Result<Self, CodecError> {
        let group_id = compute_group_id(&transactions)?;
        for txn in &mut transactions {
            txn.header.group = Some(group_id);
        }
        Ok(Self {
            transactions,
            group_id,
        })
    }

    /// Shared group id
    pub fn group_id(&self) -> H256 {
        self.group_id
    }

    /// Transactions in execution order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Always false for a constructed group
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Position of the last transaction
    pub fn last_index(&self) -> usize {
        self.transactions.len().saturating_sub(1)
    }

    /// Transaction ids in group order
    pub fn ids(&self) -> Result<Vec<String>, CodecError> {
        self.transactions.iter().map(Transaction::id).collect()
    }

    /// Simulate-only wrappers (no signatures)
    pub fn unsigned(&self) -> Vec<SignedTransaction> {
        self.transactions
            .iter()
            .cloned()
            .map(SignedTransaction::unsigned)
            .collect()
    }

    /// Concatenated encodings, the submission body for a signed group
    pub fn encode_signed(signed: &[SignedTransaction]) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        for txn in signed {
            bytes.extend(txn.encode()?);
        }
        Ok(bytes)
    }
}
