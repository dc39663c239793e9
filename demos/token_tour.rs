//! Walk through the ARC200 client against a live node
//!
//! Reads `~/.arc200/config.toml` and the `ALGOD_URL`, `ALGOD_TOKEN` and
//! `WALLET_MNEMONIC` environment variables. Every state-changing call is
//! simulated; set `ARC200_COMMIT=1` to broadcast instead.
//!
//! ```text
//! WALLET_MNEMONIC="..." cargo run --example token_tour
//! ```

use std::sync::Arc;

use anyhow::{bail, Result};
use arc_sdk::{AlgodClient, Arc200, CallOutcome, ClientConfig, U256};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const TOKEN_APP_ID: u64 = 6_778_021;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = ClientConfig::from_env()?;
    let wallet = Arc::new(config.wallet()?);
    let client = AlgodClient::from_config(&config)?;
    let owner = *wallet.address();

    let mut token = Arc200::connect(TOKEN_APP_ID, client, wallet)?;
    let commit = std::env::var("ARC200_COMMIT").is_ok_and(|v| v == "1");
    token.contract_mut().set_simulate(!commit);
    token.contract_mut().set_fee(config.fee);

    tracing::info!(app_id = TOKEN_APP_ID, owner = %owner, commit, "Connected");

    println!("Name:         {}", token.name().await?);
    println!("Symbol:       {}", token.symbol().await?);
    println!("Decimals:     {}", token.decimals().await?);
    println!("Total supply: {}", token.total_supply().await?);

    let balance = token.balance_of(&owner).await?;
    println!("Balance:      {}", balance);
    println!("Has balance:  {}", token.has_balance(&owner).await?);

    let spender = token.contract().application_address();
    println!("Allowance:    {}", token.allowance(&owner, &spender).await?);

    if balance.is_zero() {
        bail!("{} holds no tokens; nothing to transfer", owner);
    }

    report("transfer", token.safe_transfer(&owner, U256::from(1u64)).await?);
    report("approve", token.safe_approve(&spender, U256::from(1u64)).await?);
    report("touch", token.touch().await?);

    Ok(())
}

fn report(label: &str, outcome: CallOutcome) {
    match outcome {
        CallOutcome::Simulated { return_value, .. } => {
            println!("{:<12}  simulated -> {:?}", label, return_value)
        }
        CallOutcome::Sent { tx_id, .. } => println!("{:<12}  sent {}", label, tx_id),
        CallOutcome::Failed(e) => println!("{:<12}  failed: {}", label, e),
    }
}
