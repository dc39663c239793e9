//! ARC200 token facade
//!
//! Typed wrappers over [`Contract::invoke`] for the standard ARC200 methods
//! and the `hasBalance` / `hasAllowance` / `touch` extension.

use std::sync::Arc;

use arc_primitives::{Address, AppId, MicroAlgos, U256};

use crate::abi::Token;
use crate::client::AlgodClient;
use crate::engine::{CallOutcome, Contract};
use crate::retry::FundingRetry;
use crate::wallet::Wallet;
use crate::SdkError;

/// Minimum-balance cost of a balance box (33 bytes: prefix + holder key)
pub const BALANCE_BOX_COST: MicroAlgos = 28_500;

/// Key size of a balance box
pub const BALANCE_BOX_SIZE: usize = 33;

/// Minimum-balance cost of an allowance box (32-byte hash of owner and spender)
pub const ALLOWANCE_BOX_COST: MicroAlgos = 28_100;

/// Key size of an allowance box
pub const ALLOWANCE_BOX_SIZE: usize = 32;

/// ARC200 token client
#[derive(Debug, Clone)]
pub struct Arc200 {
    contract: Contract,
}

impl Arc200 {
    /// Wrap a contract bound to a token application
    pub fn new(contract: Contract) -> Self {
        Self { contract }
    }

    /// Bind a token with the bundled ARC200 method set
    pub fn connect(app_id: AppId, client: AlgodClient, wallet: Arc<Wallet>) -> Result<Self, SdkError> {
        Ok(Self::new(Contract::arc200(app_id, client, wallet)?))
    }

    /// Underlying contract
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Underlying contract, for changing default settings
    pub fn contract_mut(&mut self) -> &mut Contract {
        &mut self.contract
    }

    async fn read(&self, method: &str, args: &[Token]) -> Result<Token, SdkError> {
        self.contract.invoke(method, args).await?.into_return_value()
    }

    // ==================== Metadata ====================

    /// Token name
    pub async fn name(&self) -> Result<String, SdkError> {
        text(self.read("arc200_name", &[]).await?)
    }

    /// Token symbol
    pub async fn symbol(&self) -> Result<String, SdkError> {
        text(self.read("arc200_symbol", &[]).await?)
    }

    /// Number of decimals
    pub async fn decimals(&self) -> Result<u8, SdkError> {
        let token = self.read("arc200_decimals", &[]).await?;
        token
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| unexpected("arc200_decimals", &token))
    }

    /// Total supply in base units
    pub async fn total_supply(&self) -> Result<U256, SdkError> {
        uint(self.read("arc200_totalSupply", &[]).await?, "arc200_totalSupply")
    }

    // ==================== Balances ====================

    /// Balance of `owner`
    pub async fn balance_of(&self, owner: &Address) -> Result<U256, SdkError> {
        let token = self.read("arc200_balanceOf", &[Token::Address(*owner)]).await?;
        uint(token, "arc200_balanceOf")
    }

    /// Amount `spender` may still move from `owner`
    pub async fn allowance(&self, owner: &Address, spender: &Address) -> Result<U256, SdkError> {
        let token = self
            .read("arc200_allowance", &[Token::Address(*owner), Token::Address(*spender)])
            .await?;
        uint(token, "arc200_allowance")
    }

    /// Whether a balance box exists for `owner`
    pub async fn has_balance(&self, owner: &Address) -> Result<bool, SdkError> {
        let token = self.read("hasBalance", &[Token::Address(*owner)]).await?;
        token.as_bool().ok_or_else(|| unexpected("hasBalance", &token))
    }

    /// Whether an allowance box exists for the pair
    pub async fn has_allowance(&self, owner: &Address, spender: &Address) -> Result<bool, SdkError> {
        let token = self
            .read("hasAllowance", &[Token::Address(*owner), Token::Address(*spender)])
            .await?;
        token.as_bool().ok_or_else(|| unexpected("hasAllowance", &token))
    }

    // ==================== Transfers ====================

    /// Move `amount` from the sender to `to`
    pub async fn transfer(&self, to: &Address, amount: U256) -> Result<CallOutcome, SdkError> {
        self.contract
            .invoke("arc200_transfer", &transfer_args(to, amount))
            .await
    }

    /// Move `amount` from `from` to `to` as an approved spender
    pub async fn transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<CallOutcome, SdkError> {
        self.contract
            .invoke("arc200_transferFrom", &transfer_from_args(from, to, amount))
            .await
    }

    /// Allow `spender` to move up to `amount` of the sender's tokens
    pub async fn approve(&self, spender: &Address, amount: U256) -> Result<CallOutcome, SdkError> {
        self.contract
            .invoke("arc200_approve", &transfer_args(spender, amount))
            .await
    }

    /// Extension no-op call
    pub async fn touch(&self) -> Result<CallOutcome, SdkError> {
        self.contract.invoke("touch", &[]).await
    }

    // ==================== Funded calls ====================

    /// [`transfer`](Self::transfer), retried once paying for the recipient's balance box
    pub async fn safe_transfer(&self, to: &Address, amount: U256) -> Result<CallOutcome, SdkError> {
        tracing::info!(from = %self.contract.sender_address(), to = %to, amount = %amount, "Transfer");
        self.funded("arc200_transfer", transfer_args(to, amount), BALANCE_BOX_COST)
            .await
    }

    /// [`transfer_from`](Self::transfer_from), retried once paying for the recipient's balance box
    pub async fn safe_transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<CallOutcome, SdkError> {
        tracing::info!(
            spender = %self.contract.sender_address(),
            from = %from,
            to = %to,
            amount = %amount,
            "TransferFrom"
        );
        self.funded(
            "arc200_transferFrom",
            transfer_from_args(from, to, amount),
            BALANCE_BOX_COST,
        )
        .await
    }

    /// [`approve`](Self::approve), retried once paying for the allowance box
    pub async fn safe_approve(&self, spender: &Address, amount: U256) -> Result<CallOutcome, SdkError> {
        tracing::info!(spender = %spender, amount = %amount, "Approve");
        self.funded("arc200_approve", transfer_args(spender, amount), ALLOWANCE_BOX_COST)
            .await
    }

    async fn funded(
        &self,
        method: &str,
        args: Vec<Token>,
        box_cost: MicroAlgos,
    ) -> Result<CallOutcome, SdkError> {
        FundingRetry::new(box_cost)
            .run(self.contract.config(), |config| {
                let args = args.clone();
                async move { self.contract.invoke_with(method, &args, &config).await }
            })
            .await
    }
}

fn transfer_args(to: &Address, amount: U256) -> Vec<Token> {
    vec![Token::Address(*to), Token::Uint(amount)]
}

fn transfer_from_args(from: &Address, to: &Address, amount: U256) -> Vec<Token> {
    vec![Token::Address(*from), Token::Address(*to), Token::Uint(amount)]
}

/// Fixed-width text fields are NUL padded
fn text(token: Token) -> Result<String, SdkError> {
    match token {
        Token::String(s) => Ok(s.split('\0').next().unwrap_or_default().to_string()),
        other => Err(unexpected("text", &other)),
    }
}

fn uint(token: Token, method: &str) -> Result<U256, SdkError> {
    token.as_u256().ok_or_else(|| unexpected(method, &token))
}

fn unexpected(method: &str, token: &Token) -> SdkError {
    SdkError::AbiDecode(format!("unexpected return value for {}: {:?}", method, token))
}
