//! Transaction group builder
//!
//! Turns a method call into the group the ledger executes: an optional
//! funding payment to the application account followed by the application
//! call itself.

use arc_primitives::{Address, AppId, MicroAlgos, Round};
use arc_types::{
    application_address, ApplicationCall, BoxReference, Transaction, TransactionGroup,
    TransactionHeader,
};

use crate::abi::Token;
use crate::contract::MethodSpec;
use crate::types::TransactionParams;
use crate::SdkError;

/// Flat fee of the funding payment, independent of the call fee
pub const PAYMENT_FEE: MicroAlgos = 1000;

/// Default flat fee of the application call
pub const DEFAULT_FEE: MicroAlgos = 1000;

/// Rounds a built group stays valid for
pub const VALIDITY_WINDOW: Round = 1000;

/// Per-call settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallConfig {
    /// Payment to the application account placed before the call; 0 for none
    pub payment_amount: MicroAlgos,
    /// Flat fee of the application call
    pub fee: MicroAlgos,
    /// Simulate even when the method changes state
    pub simulate: bool,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            payment_amount: 0,
            fee: DEFAULT_FEE,
            simulate: false,
        }
    }
}

impl CallConfig {
    /// Same settings with a different payment amount
    pub fn with_payment(mut self, amount: MicroAlgos) -> Self {
        self.payment_amount = amount;
        self
    }

    /// Same settings with a different call fee
    pub fn with_fee(mut self, fee: MicroAlgos) -> Self {
        self.fee = fee;
        self
    }

    /// Same settings in simulation-only mode
    pub fn simulated(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }
}

/// Builds unsigned call groups for one sender and application
#[derive(Debug, Clone)]
pub struct GroupBuilder<'a> {
    sender: Address,
    app_id: AppId,
    params: &'a TransactionParams,
}

impl<'a> GroupBuilder<'a> {
    /// Create a builder from suggested parameters
    pub fn new(sender: Address, app_id: AppId, params: &'a TransactionParams) -> Self {
        Self {
            sender,
            app_id,
            params,
        }
    }

    fn header(&self, fee: MicroAlgos) -> TransactionHeader {
        TransactionHeader {
            sender: self.sender,
            fee,
            first_valid: self.params.last_round,
            last_valid: self.params.last_round + VALIDITY_WINDOW,
            genesis_id: self.params.genesis_id.clone(),
            genesis_hash: self.params.genesis_hash,
            group: None,
            note: vec![],
        }
    }

    /// Build the group for one call
    ///
    /// The application call is always the last transaction; the payment,
    /// present only when `config.payment_amount > 0`, is first.
    pub fn build(
        &self,
        method: &MethodSpec,
        args: &[Token],
        config: &CallConfig,
        boxes: &[BoxReference],
    ) -> Result<TransactionGroup, SdkError> {
        let app_args = method.encode_args(args)?;

        let mut call = ApplicationCall::new(self.app_id).with_args(app_args);
        for reference in boxes {
            call.add_box(reference.clone());
        }

        let mut transactions = Vec::with_capacity(2);
        if config.payment_amount > 0 {
            transactions.push(Transaction::payment(
                self.header(PAYMENT_FEE),
                application_address(self.app_id),
                config.payment_amount,
            ));
        }
        transactions.push(Transaction::application_call(self.header(config.fee), call));

        Ok(TransactionGroup::new(transactions)?)
    }
}
