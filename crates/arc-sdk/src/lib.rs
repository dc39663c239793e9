//! # arc-sdk
//!
//! Rust client for ARC200 token applications on an algod ledger.
//!
//! ## Features
//!
//! - **AlgodClient**: REST client for suggested params, simulation and submission
//! - **Wallet**: ed25519 account with 25-word mnemonic import/export
//! - **MethodRegistry**: ABI method descriptions loaded from JSON documents
//! - **GroupBuilder**: Optional funding payment plus one application call
//! - **Contract**: Simulate-only or simulate-then-send dispatch of any method
//! - **Arc200**: Typed token calls and funded transfers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use arc_sdk::{AlgodClient, Arc200, Wallet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AlgodClient::connect("https://testnet-api.voi.nodly.io", "")?;
//!     let wallet = Arc::new(Wallet::new_random());
//!     let owner = *wallet.address();
//!
//!     let token = Arc200::connect(6_778_021, client, wallet)?;
//!     println!("{} ({})", token.name().await?, token.symbol().await?);
//!     println!("Balance: {}", token.balance_of(&owner).await?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Generic Dispatch
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use arc_sdk::{abi::Token, AlgodClient, CallOutcome, Contract, Wallet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AlgodClient::new_mock();
//!     let wallet = Arc::new(Wallet::new_random());
//!     let owner = *wallet.address();
//!     let mut contract = Contract::arc200(6_778_021, client, wallet)?;
//!     contract.set_simulate(true);
//!
//!     match contract.invoke("arc200_balanceOf", &[Token::Address(owner)]).await? {
//!         CallOutcome::Simulated { return_value, .. } => println!("{:?}", return_value),
//!         other => println!("{:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod arc200;
mod client;
pub mod config;
pub mod contract;
pub mod decoder;
mod engine;
mod error;
pub mod mnemonic;
pub mod retry;
pub mod transport;
pub mod tx_builder;
pub mod types;
mod wallet;

// Re-export main types
pub use arc200::{
    Arc200, ALLOWANCE_BOX_COST, ALLOWANCE_BOX_SIZE, BALANCE_BOX_COST, BALANCE_BOX_SIZE,
};
pub use client::AlgodClient;
pub use config::ClientConfig;
pub use contract::{MethodRegistry, MethodSpec};
pub use engine::{CallOutcome, Contract};
pub use error::SdkError;
pub use retry::FundingRetry;
pub use transport::MockTransport;

/// Re-export Transport trait for custom implementations
pub use transport::Transport;
pub use tx_builder::{CallConfig, GroupBuilder};
pub use wallet::Wallet;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use arc_primitives::{Address, AppId, MicroAlgos, Round, H256, U256};
pub use arc_types::{SignedTransaction, Transaction, TransactionGroup};
