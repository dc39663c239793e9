//! AlgodClient - ledger node client

use arc_primitives::{Address, AppId};
use arc_types::{MsgValue, SignedTransaction};
use serde::Deserialize;
use std::sync::Arc;

use crate::transport::{
    deserialize_response, MockTransport, Request, Transport, BINARY_CONTENT_TYPE,
    MSGPACK_CONTENT_TYPE, PARAMS_PATH, SEND_PATH, SIMULATE_PATH,
};
use crate::types::{SimulateOptions, SimulateResponse, TransactionParams};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::{config::ClientConfig, transport::HttpTransport};

/// Client for an algod node
///
/// Cloning is cheap: clones share the transport.
#[derive(Clone)]
pub struct AlgodClient {
    transport: Arc<dyn Transport>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

impl AlgodClient {
    /// Create a new client with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str, token: &str) -> Result<Self, SdkError> {
        Ok(Self::with_transport(HttpTransport::new(url, token)?))
    }

    /// Create an HTTP client from configuration
    #[cfg(feature = "http")]
    pub fn from_config(config: &ClientConfig) -> Result<Self, SdkError> {
        let transport =
            HttpTransport::with_timeout(&config.algod_url, &config.algod_token, config.request_timeout())?;
        tracing::debug!(url = %config.algod_url, "Connecting to algod");
        Ok(Self::with_transport(transport))
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    // ==================== Chain Info ====================

    /// Suggested parameters for new transactions
    pub async fn transaction_params(&self) -> Result<TransactionParams, SdkError> {
        let value = self.transport.request_json(Request::get(PARAMS_PATH)).await?;
        deserialize_response(value)
    }

    /// Custodial account of an application
    pub fn application_address(&self, app_id: AppId) -> Address {
        arc_types::application_address(app_id)
    }

    // ==================== Execution ====================

    /// Simulate one transaction group
    pub async fn simulate(
        &self,
        transactions: &[SignedTransaction],
        options: SimulateOptions,
    ) -> Result<SimulateResponse, SdkError> {
        let txns = transactions
            .iter()
            .map(SignedTransaction::to_msgpack)
            .collect::<Result<Vec<_>, _>>()?;

        let body = MsgValue::Map(vec![
            (
                "allow-empty-signatures",
                MsgValue::Bool(options.allow_empty_signatures),
            ),
            (
                "allow-unnamed-resources",
                MsgValue::Bool(options.allow_unnamed_resources),
            ),
            (
                "txn-groups",
                MsgValue::Array(vec![MsgValue::Map(vec![("txns", MsgValue::Array(txns))])]),
            ),
        ])
        .to_bytes()?;

        tracing::debug!(txns = transactions.len(), "Simulating group");
        let value = self
            .transport
            .request_json(Request::post(
                format!("{}?format=json", SIMULATE_PATH),
                body,
                MSGPACK_CONTENT_TYPE,
            ))
            .await?;
        deserialize_response(value)
    }

    /// Submit concatenated signed transactions, returning the node's txid
    pub async fn broadcast(&self, signed: &[u8]) -> Result<String, SdkError> {
        let value = self
            .transport
            .request_json(Request::post(SEND_PATH, signed.to_vec(), BINARY_CONTENT_TYPE))
            .await
            .map_err(|e| match e {
                SdkError::Http { message, .. } => SdkError::Broadcast(message),
                other => other,
            })?;
        let response: SubmitResponse = deserialize_response(value)?;
        tracing::info!(tx_id = %response.tx_id, "Broadcast accepted");
        Ok(response.tx_id)
    }
}

impl std::fmt::Debug for AlgodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgodClient").finish_non_exhaustive()
    }
}
