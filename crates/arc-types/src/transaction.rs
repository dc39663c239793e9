//! Transaction types
//!
//! Only the two transaction kinds the client emits are modelled: payments
//! (used to fund contract storage) and application calls.

use arc_crypto::{sha512_256_prefixed, Signature};
use arc_primitives::{Address, AppId, MicroAlgos, Round, H256};

use crate::codec::MsgValue;
use crate::CodecError;

/// Domain tag prepended to a transaction's encoding before hashing/signing
pub const TX_TAG: &[u8] = b"TX";

/// Domain tag for application account derivation
pub const APP_ID_TAG: &[u8] = b"appID";

/// Derive the custodial account address of an application
pub fn application_address(app_id: AppId) -> Address {
    Address::from_bytes(*sha512_256_prefixed(APP_ID_TAG, &app_id.to_be_bytes()).as_bytes())
}

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    /// Native-asset payment
    Payment,
    /// Application call
    ApplicationCall,
}

impl TxType {
    /// Wire tag (`"pay"` / `"appl"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Payment => "pay",
            TxType::ApplicationCall => "appl",
        }
    }
}

/// Fields shared by every transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHeader {
    /// Sender account
    pub sender: Address,
    /// Flat fee in micro-units
    pub fee: MicroAlgos,
    /// First round the transaction is valid in
    pub first_valid: Round,
    /// Last round the transaction is valid in
    pub last_valid: Round,
    /// Genesis id of the network
    pub genesis_id: String,
    /// Genesis hash of the network
    pub genesis_hash: H256,
    /// Group id, set when the transaction belongs to a group
    pub group: Option<H256>,
    /// Free-form note
    pub note: Vec<u8>,
}

/// Payment fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Receiver account
    pub receiver: Address,
    /// Amount in micro-units
    pub amount: MicroAlgos,
}

/// Application call completion action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnComplete {
    /// Plain call
    #[default]
    NoOp,
    /// Opt the sender in
    OptIn,
    /// Opt the sender out
    CloseOut,
    /// Clear the sender's local state
    ClearState,
    /// Replace the application programs
    UpdateApplication,
    /// Delete the application
    DeleteApplication,
}

impl OnComplete {
    /// Numeric wire value
    pub fn as_u64(&self) -> u64 {
        match self {
            OnComplete::NoOp => 0,
            OnComplete::OptIn => 1,
            OnComplete::CloseOut => 2,
            OnComplete::ClearState => 3,
            OnComplete::UpdateApplication => 4,
            OnComplete::DeleteApplication => 5,
        }
    }
}

/// Reference to a contract-owned storage box
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxReference {
    /// Owning application
    pub app_id: AppId,
    /// Box key
    pub name: Vec<u8>,
}

impl BoxReference {
    /// Create a box reference
    pub fn new(app_id: AppId, name: impl Into<Vec<u8>>) -> Self {
        Self {
            app_id,
            name: name.into(),
        }
    }
}

/// Application call fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationCall {
    /// Called application
    pub app_id: AppId,
    /// Completion action
    pub on_complete: OnComplete,
    /// Application arguments (selector first for ABI calls)
    pub app_args: Vec<Vec<u8>>,
    /// Other applications the call may touch
    pub foreign_apps: Vec<AppId>,
    /// Declared storage boxes
    pub boxes: Vec<BoxReference>,
}

impl ApplicationCall {
    /// Create a no-op call to `app_id`
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            ..Default::default()
        }
    }

    /// Set the application arguments
    pub fn with_args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.app_args = args;
        self
    }

    /// Declare a box, adding its application to the foreign apps when needed
    pub fn add_box(&mut self, reference: BoxReference) {
        if !self.owns(reference.app_id) && !self.foreign_apps.contains(&reference.app_id) {
            self.foreign_apps.push(reference.app_id);
        }
        if !self.boxes.contains(&reference) {
            self.boxes.push(reference);
        }
    }

    fn owns(&self, app_id: AppId) -> bool {
        app_id == 0 || app_id == self.app_id
    }

    /// Box app index: 0 for the called app, otherwise 1-based foreign-app position
    fn box_index(&self, app_id: AppId) -> Result<u64, CodecError> {
        if self.owns(app_id) {
            return Ok(0);
        }
        self.foreign_apps
            .iter()
            .position(|id| *id == app_id)
            .map(|pos| pos as u64 + 1)
            .ok_or(CodecError::BoxAppNotReferenced(app_id))
    }
}

/// Transaction-type specific fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    /// Payment
    Payment(Payment),
    /// Application call
    ApplicationCall(ApplicationCall),
}

/// Unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Common fields
    pub header: TransactionHeader,
    /// Type-specific fields
    pub body: TransactionBody,
}

impl Transaction {
    /// Create a payment
    pub fn payment(header: TransactionHeader, receiver: Address, amount: MicroAlgos) -> Self {
        Self {
            header,
            body: TransactionBody::Payment(Payment { receiver, amount }),
        }
    }

    /// Create an application call
    pub fn application_call(header: TransactionHeader, call: ApplicationCall) -> Self {
        Self {
            header,
            body: TransactionBody::ApplicationCall(call),
        }
    }

    /// Get the transaction type
    pub fn tx_type(&self) -> TxType {
        match &self.body {
            TransactionBody::Payment(_) => TxType::Payment,
            TransactionBody::ApplicationCall(_) => TxType::ApplicationCall,
        }
    }

    /// Application call fields, if this is an application call
    pub fn as_application_call(&self) -> Option<&ApplicationCall> {
        match &self.body {
            TransactionBody::ApplicationCall(call) => Some(call),
            TransactionBody::Payment(_) => None,
        }
    }

    /// Payment fields, if this is a payment
    pub fn as_payment(&self) -> Option<&Payment> {
        match &self.body {
            TransactionBody::Payment(payment) => Some(payment),
            TransactionBody::ApplicationCall(_) => None,
        }
    }

    /// Canonical value tree
    pub fn to_msgpack(&self) -> Result<MsgValue, CodecError> {
        let h = &self.header;
        let mut fields = vec![
            ("snd", MsgValue::Bin(h.sender.as_bytes().to_vec())),
            ("fee", MsgValue::Uint(h.fee)),
            ("fv", MsgValue::Uint(h.first_valid)),
            ("lv", MsgValue::Uint(h.last_valid)),
            ("gen", MsgValue::Str(h.genesis_id.clone())),
            ("gh", MsgValue::Bin(h.genesis_hash.as_bytes().to_vec())),
            ("note", MsgValue::Bin(h.note.clone())),
            ("type", MsgValue::Str(self.tx_type().as_str().to_string())),
        ];
        if let Some(group) = &h.group {
            fields.push(("grp", MsgValue::Bin(group.as_bytes().to_vec())));
        }

        match &self.body {
            TransactionBody::Payment(payment) => {
                fields.push(("rcv", MsgValue::Bin(payment.receiver.as_bytes().to_vec())));
                fields.push(("amt", MsgValue::Uint(payment.amount)));
            }
            TransactionBody::ApplicationCall(call) => {
                let boxes = call
                    .boxes
                    .iter()
                    .map(|b| {
                        Ok(MsgValue::Map(vec![
                            ("i", MsgValue::Uint(call.box_index(b.app_id)?)),
                            ("n", MsgValue::Bin(b.name.clone())),
                        ]))
                    })
                    .collect::<Result<Vec<_>, CodecError>>()?;

                fields.push(("apid", MsgValue::Uint(call.app_id)));
                fields.push(("apan", MsgValue::Uint(call.on_complete.as_u64())));
                fields.push((
                    "apaa",
                    MsgValue::Array(call.app_args.iter().cloned().map(MsgValue::Bin).collect()),
                ));
                fields.push((
                    "apfa",
                    MsgValue::Array(call.foreign_apps.iter().copied().map(MsgValue::Uint).collect()),
                ));
                fields.push(("apbx", MsgValue::Array(boxes)));
            }
        }

        Ok(MsgValue::Map(fields))
    }

    /// Canonical msgpack encoding
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        self.to_msgpack()?.to_bytes()
    }

    /// Bytes covered by the signature: `"TX" || encode()`
    pub fn bytes_to_sign(&self) -> Result<Vec<u8>, CodecError> {
        let mut data = TX_TAG.to_vec();
        data.extend(self.encode()?);
        Ok(data)
    }

    /// Raw 32-byte transaction id
    pub fn raw_id(&self) -> Result<H256, CodecError> {
        Ok(sha512_256_prefixed(TX_TAG, &self.encode()?))
    }

    /// Transaction id in its base32 text form
    pub fn id(&self) -> Result<String, CodecError> {
        Ok(self.raw_id()?.to_base32())
    }
}

/// Transaction with an optional signature
///
/// Without a signature the encoding is the simulate-only form `{"txn": ...}`,
/// accepted when simulation allows empty signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The transaction
    pub txn: Transaction,
    /// Ed25519 signature over [`Transaction::bytes_to_sign`]
    pub signature: Option<Signature>,
}

impl SignedTransaction {
    /// Wrap a signed transaction
    pub fn new(txn: Transaction, signature: Signature) -> Self {
        Self {
            txn,
            signature: Some(signature),
        }
    }

    /// Wrap a transaction without a signature
    pub fn unsigned(txn: Transaction) -> Self {
        Self {
            txn,
            signature: None,
        }
    }

    /// Whether a signature is attached
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Canonical value tree
    pub fn to_msgpack(&self) -> Result<MsgValue, CodecError> {
        let mut fields = vec![("txn", self.txn.to_msgpack()?)];
        if let Some(sig) = &self.signature {
            fields.push(("sig", MsgValue::Bin(sig.as_bytes().to_vec())));
        }
        Ok(MsgValue::Map(fields))
    }

    /// Canonical msgpack encoding
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        self.to_msgpack()?.to_bytes()
    }
}
