//! Simulation/execution engine
//!
//! [`Contract`] dispatches a named method of one application. Read-only
//! methods, and any method while simulation mode is on, are answered from a
//! simulation of the unsigned group. Other methods are simulated once to
//! discover the storage boxes they touch, rebuilt with those boxes declared,
//! signed and broadcast.

use arc_primitives::{Address, AppId, MicroAlgos};
use arc_types::{BoxReference, TransactionGroup};
use std::sync::Arc;

use crate::abi::Token;
use crate::client::AlgodClient;
use crate::contract::{MethodRegistry, MethodSpec};
use crate::decoder::decode_return;
use crate::tx_builder::{CallConfig, GroupBuilder};
use crate::types::{SimulateOptions, SimulateResponse, TransactionParams};
use crate::wallet::Wallet;
use crate::SdkError;

/// Outcome of one method call
#[derive(Debug)]
pub enum CallOutcome {
    /// Answered by simulation
    Simulated {
        /// Decoded return value; the empty tuple for `void`
        return_value: Token,
        /// Raw simulation result
        response: SimulateResponse,
    },
    /// Signed group accepted by the node
    Sent {
        /// Id reported by the node
        tx_id: String,
        /// Ids of every transaction in the group
        tx_ids: Vec<String>,
    },
    /// The call did not succeed
    Failed(SdkError),
}

impl CallOutcome {
    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        !matches!(self, CallOutcome::Failed(_))
    }

    /// Decoded return value of a simulated call
    pub fn return_value(&self) -> Option<&Token> {
        match self {
            CallOutcome::Simulated { return_value, .. } => Some(return_value),
            _ => None,
        }
    }

    /// Error of a failed call
    pub fn error(&self) -> Option<&SdkError> {
        match self {
            CallOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Return value of a simulated call, or the call's error
    pub fn into_return_value(self) -> Result<Token, SdkError> {
        match self {
            CallOutcome::Simulated { return_value, .. } => Ok(return_value),
            CallOutcome::Sent { tx_id, .. } => Err(SdkError::AbiDecode(format!(
                "broadcast call {} has no simulated return value",
                tx_id
            ))),
            CallOutcome::Failed(e) => Err(e),
        }
    }
}

/// Client bound to one application
///
/// Cloning is cheap; clones share the registry, client and wallet but carry
/// their own default [`CallConfig`].
#[derive(Debug, Clone)]
pub struct Contract {
    app_id: AppId,
    registry: Arc<MethodRegistry>,
    client: AlgodClient,
    wallet: Arc<Wallet>,
    config: CallConfig,
}

impl Contract {
    /// Bind an application to a method registry and signing wallet
    pub fn new(
        app_id: AppId,
        client: AlgodClient,
        registry: Arc<MethodRegistry>,
        wallet: Arc<Wallet>,
    ) -> Self {
        Self {
            app_id,
            registry,
            client,
            wallet,
            config: CallConfig::default(),
        }
    }

    /// Bind an ARC200 token (standard plus extension methods)
    pub fn arc200(app_id: AppId, client: AlgodClient, wallet: Arc<Wallet>) -> Result<Self, SdkError> {
        Ok(Self::new(app_id, client, Arc::new(MethodRegistry::arc200()?), wallet))
    }

    // ==================== Accessors ====================

    /// Application id
    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    /// Address that signs and pays for calls
    pub fn sender_address(&self) -> Address {
        *self.wallet.address()
    }

    /// Custodial account of the application
    pub fn application_address(&self) -> Address {
        self.client.application_address(self.app_id)
    }

    /// Methods this contract can dispatch
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Ledger client
    pub fn client(&self) -> &AlgodClient {
        &self.client
    }

    /// Default per-call settings
    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    // ==================== Settings ====================

    /// Default payment placed before each call
    pub fn set_payment_amount(&mut self, amount: MicroAlgos) {
        tracing::debug!(amount, "Setting payment amount");
        self.config.payment_amount = amount;
    }

    /// Default flat fee of the application call
    pub fn set_fee(&mut self, fee: MicroAlgos) {
        self.config.fee = fee;
    }

    /// Simulate state-changing calls instead of broadcasting them
    pub fn set_simulate(&mut self, simulate: bool) {
        self.config.simulate = simulate;
    }

    // ==================== Dispatch ====================

    /// Call `name` with the default settings
    pub async fn invoke(&self, name: &str, args: &[Token]) -> Result<CallOutcome, SdkError> {
        self.invoke_with(name, args, &self.config).await
    }

    /// Call `name` with explicit settings
    ///
    /// Every failure is reported as [`CallOutcome::Failed`] except a failed
    /// resource-discovery probe, which is returned as
    /// [`SdkError::ResourceDiscovery`].
    pub async fn invoke_with(
        &self,
        name: &str,
        args: &[Token],
        config: &CallConfig,
    ) -> Result<CallOutcome, SdkError> {
        let Some(method) = self.registry.get(name) else {
            tracing::warn!(method = name, "Unknown method");
            return Ok(CallOutcome::Failed(SdkError::UnknownMethod(name.to_string())));
        };

        if method.readonly || config.simulate {
            Ok(self.simulate_call(method, args, config).await)
        } else {
            self.send_call(method, args, config).await
        }
    }

    fn builder<'a>(&self, params: &'a TransactionParams) -> GroupBuilder<'a> {
        GroupBuilder::new(self.sender_address(), self.app_id, params)
    }

    async fn simulate_call(&self, method: &MethodSpec, args: &[Token], config: &CallConfig) -> CallOutcome {
        tracing::debug!(method = %method.name, app_id = self.app_id, "Simulating call");
        match self.try_simulate(method, args, config).await {
            Ok((return_value, response)) => CallOutcome::Simulated {
                return_value,
                response,
            },
            Err(e) => {
                tracing::warn!(method = %method.name, error = %e, "Simulated call failed");
                CallOutcome::Failed(e)
            }
        }
    }

    async fn try_simulate(
        &self,
        method: &MethodSpec,
        args: &[Token],
        config: &CallConfig,
    ) -> Result<(Token, SimulateResponse), SdkError> {
        let params = self.client.transaction_params().await?;
        let group = self.builder(&params).build(method, args, config, &[])?;
        let response = self
            .client
            .simulate(&group.unsigned(), SimulateOptions::discovery())
            .await?;
        let return_value = decode_return(&response, method)?;
        Ok((return_value, response))
    }

    async fn send_call(
        &self,
        method: &MethodSpec,
        args: &[Token],
        config: &CallConfig,
    ) -> Result<CallOutcome, SdkError> {
        tracing::debug!(
            method = %method.name,
            app_id = self.app_id,
            payment = config.payment_amount,
            "Sending call"
        );

        let params = self
            .client
            .transaction_params()
            .await
            .map_err(discovery_error)?;
        let builder = self.builder(&params);

        let probe = match builder.build(method, args, config, &[]) {
            Ok(group) => group,
            Err(e) => return Ok(CallOutcome::Failed(e)),
        };
        let boxes = match self.discover_boxes(&probe).await? {
            Ok(boxes) => boxes,
            Err(e) => {
                tracing::warn!(method = %method.name, error = %e, "Probe simulation failed");
                return Ok(CallOutcome::Failed(e));
            }
        };
        tracing::debug!(method = %method.name, boxes = boxes.len(), "Discovered boxes");

        let group = match builder.build(method, args, config, &boxes) {
            Ok(group) => group,
            Err(e) => return Ok(CallOutcome::Failed(e)),
        };

        match self.sign_and_send(&group).await {
            Ok((tx_id, tx_ids)) => {
                tracing::info!(method = %method.name, tx_id = %tx_id, "Call sent");
                Ok(CallOutcome::Sent { tx_id, tx_ids })
            }
            Err(e) => {
                tracing::warn!(method = %method.name, error = %e, "Broadcast failed");
                Ok(CallOutcome::Failed(e))
            }
        }
    }

    /// Simulate the probe group and collect the boxes it touched
    ///
    /// The outer error means the probe itself could not be run or read; the
    /// inner one means it ran and the ledger rejected it.
    async fn discover_boxes(
        &self,
        probe: &TransactionGroup,
    ) -> Result<Result<Vec<BoxReference>, SdkError>, SdkError> {
        let response = self
            .client
            .simulate(&probe.unsigned(), SimulateOptions::discovery())
            .await
            .map_err(discovery_error)?;

        if let Some(message) = response.failure_message() {
            return Ok(Err(SdkError::ExecutionFailure(message.to_string())));
        }
        response.unnamed_boxes().map(Ok).map_err(discovery_error)
    }

    async fn sign_and_send(&self, group: &TransactionGroup) -> Result<(String, Vec<String>), SdkError> {
        tracing::debug!(group = %group.group_id().to_base32(), size = group.len(), "Signing group");
        let signed = self.wallet.sign_group(group)?;
        let bytes = TransactionGroup::encode_signed(&signed)?;
        let tx_id = self.client.broadcast(&bytes).await?;
        Ok((tx_id, group.ids()?))
    }
}

fn discovery_error(e: SdkError) -> SdkError {
    match e {
        SdkError::ResourceDiscovery(_) => e,
        other => SdkError::ResourceDiscovery(other.to_string()),
    }
}
