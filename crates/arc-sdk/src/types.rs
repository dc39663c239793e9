//! SDK types
//!
//! Node responses are read from the algod JSON API, whose field names are
//! kebab-case.

use arc_primitives::{AppId, H256, MicroAlgos, Round};
use arc_types::BoxReference;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

use crate::SdkError;

/// Suggested parameters for new transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionParams {
    /// Suggested fee per byte
    #[serde(default)]
    pub fee: MicroAlgos,
    /// Minimum flat fee
    #[serde(default)]
    pub min_fee: MicroAlgos,
    /// Network genesis id
    pub genesis_id: String,
    /// Network genesis hash
    #[serde(
        deserialize_with = "deserialize_base64_hash",
        serialize_with = "serialize_base64_hash"
    )]
    pub genesis_hash: H256,
    /// Latest round known to the node
    pub last_round: Round,
    /// Protocol version
    #[serde(default)]
    pub consensus_version: String,
}

fn deserialize_base64_hash<'de, D: Deserializer<'de>>(deserializer: D) -> Result<H256, D::Error> {
    let text = String::deserialize(deserializer)?;
    let bytes = BASE64.decode(text.as_bytes()).map_err(serde::de::Error::custom)?;
    H256::from_slice(&bytes).map_err(serde::de::Error::custom)
}

fn serialize_base64_hash<S: serde::Serializer>(hash: &H256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(hash.as_bytes()))
}

/// Simulation request switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulateOptions {
    /// Let execution touch resources the transactions do not declare
    pub allow_unnamed_resources: bool,
    /// Accept transactions without signatures
    pub allow_empty_signatures: bool,
}

impl SimulateOptions {
    /// Options used for every call simulation: both switches on
    pub fn discovery() -> Self {
        Self {
            allow_unnamed_resources: true,
            allow_empty_signatures: true,
        }
    }
}

/// Result of `POST /v2/transactions/simulate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulateResponse {
    /// One result per submitted group
    #[serde(default)]
    pub txn_groups: Vec<SimulateGroupResult>,
    /// Round the simulation ran against
    #[serde(default)]
    pub last_round: Round,
    /// Response format version
    #[serde(default)]
    pub version: u64,
}

/// Simulation result of one transaction group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulateGroupResult {
    /// Present when the group would be rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    /// Path to the failing transaction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_at: Vec<u64>,
    /// Per-transaction results
    #[serde(default)]
    pub txn_results: Vec<SimulateTxnResult>,
    /// Resources touched by the group that no transaction declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unnamed_resources_accessed: Option<UnnamedResources>,
}

/// Simulation result of one transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulateTxnResult {
    /// Execution result
    #[serde(default)]
    pub txn_result: PendingTxnResult,
    /// Resources touched by this transaction that it did not declare
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unnamed_resources_accessed: Option<UnnamedResources>,
}

/// Execution output of a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTxnResult {
    /// Base64 log entries, in emission order
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Undeclared resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnnamedResources {
    /// Undeclared boxes
    #[serde(default)]
    pub boxes: Vec<BoxAccess>,
}

/// A box touched during simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxAccess {
    /// Owning application
    pub app: AppId,
    /// Base64 box key
    pub name: String,
}

impl BoxAccess {
    /// Decode into a declarable box reference
    pub fn to_reference(&self) -> Result<BoxReference, SdkError> {
        Ok(BoxReference::new(self.app, BASE64.decode(self.name.as_bytes())?))
    }
}

impl SimulateResponse {
    /// First (and for this client, only) group
    pub fn group(&self) -> Option<&SimulateGroupResult> {
        self.txn_groups.first()
    }

    /// Failure message of the first group
    pub fn failure_message(&self) -> Option<&str> {
        self.group().and_then(|g| g.failure_message.as_deref())
    }

    /// Undeclared boxes of the first group, deduplicated, in first-seen order
    ///
    /// Boxes may be reported at group level or on individual transactions;
    /// both are collected.
    pub fn unnamed_boxes(&self) -> Result<Vec<BoxReference>, SdkError> {
        let Some(group) = self.group() else {
            return Ok(vec![]);
        };

        let accesses = group
            .unnamed_resources_accessed
            .iter()
            .chain(group.txn_results.iter().filter_map(|t| t.unnamed_resources_accessed.as_ref()))
            .flat_map(|resources| resources.boxes.iter());

        let mut boxes = Vec::new();
        for access in accesses {
            let reference = access.to_reference()?;
            if !boxes.contains(&reference) {
                boxes.push(reference);
            }
        }
        Ok(boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_params_from_json() {
        let value = json!({
            "consensus-version": "future",
            "fee": 0,
            "genesis-hash": "IXnoWtviVVJW5LGivNFc0Dq14V3kqaXuK2u5OQrdVZo=",
            "genesis-id": "voitest-v1",
            "last-round": 5_000_000,
            "min-fee": 1000
        });
        let params: TransactionParams = serde_json::from_value(value).unwrap();
        assert_eq!(params.genesis_id, "voitest-v1");
        assert_eq!(params.last_round, 5_000_000);
        assert_eq!(params.min_fee, 1000);
        assert_eq!(params.genesis_hash.as_bytes()[0], 0x21);
    }

    #[test]
    fn test_transaction_params_bad_hash() {
        let value = json!({
            "genesis-hash": "AAAA",
            "genesis-id": "x",
            "last-round": 1
        });
        assert!(serde_json::from_value::<TransactionParams>(value).is_err());
    }

    #[test]
    fn test_simulate_response_failure() {
        let value = json!({
            "txn-groups": [{
                "failure-message": "transaction rejected by ApprovalProgram",
                "failed-at": [0],
                "txn-results": []
            }]
        });
        let response: SimulateResponse = serde_json::from_value(value).unwrap();
        assert_eq!(
            response.failure_message(),
            Some("transaction rejected by ApprovalProgram")
        );
        assert_eq!(response.group().unwrap().failed_at, vec![0]);
    }

    #[test]
    fn test_unnamed_boxes_merged() {
        let value = json!({
            "txn-groups": [{
                "txn-results": [{
                    "txn-result": {"logs": []},
                    "unnamed-resources-accessed": {"boxes": [{"app": 7, "name": "YQ=="}]}
                }],
                "unnamed-resources-accessed": {
                    "boxes": [{"app": 7, "name": "YQ=="}, {"app": 7, "name": "Yg=="}]
                }
            }]
        });
        let response: SimulateResponse = serde_json::from_value(value).unwrap();
        let boxes = response.unnamed_boxes().unwrap();
        assert_eq!(
            boxes,
            vec![BoxReference::new(7, b"a".to_vec()), BoxReference::new(7, b"b".to_vec())]
        );
    }

    #[test]
    fn test_unnamed_boxes_empty() {
        assert!(SimulateResponse::default().unnamed_boxes().unwrap().is_empty());
        let response: SimulateResponse =
            serde_json::from_value(json!({"txn-groups": [{"txn-results": []}]})).unwrap();
        assert!(response.unnamed_boxes().unwrap().is_empty());
        assert_eq!(response.failure_message(), None);
    }

    #[test]
    fn test_unnamed_boxes_bad_name() {
        let value = json!({
            "txn-groups": [{
                "unnamed-resources-accessed": {"boxes": [{"app": 7, "name": "!!"}]}
            }]
        });
        let response: SimulateResponse = serde_json::from_value(value).unwrap();
        assert!(matches!(response.unnamed_boxes(), Err(SdkError::Serialization(_))));
    }

    #[test]
    fn test_discovery_options() {
        let options = SimulateOptions::discovery();
        assert!(options.allow_unnamed_resources);
        assert!(options.allow_empty_signatures);
        assert!(!SimulateOptions::default().allow_empty_signatures);
    }
}
