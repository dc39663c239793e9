//! Return-value decoding
//!
//! An ABI method returns by logging `prefix(4) || enc(value)` as the last log
//! entry of its application call.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::abi::{decode, Token};
use crate::contract::MethodSpec;
use crate::types::SimulateResponse;
use crate::SdkError;

/// Length of the return-log prefix
pub const RETURN_PREFIX_LEN: usize = 4;

/// Decode the return value of `method` from a simulation of its group
///
/// Byte-array returns (`byte[N]`, `byte[]`) are returned as text: the bytes
/// after the prefix are read as UTF-8 (lossily) with no other change.
pub fn decode_return(response: &SimulateResponse, method: &MethodSpec) -> Result<Token, SdkError> {
    if let Some(message) = response.failure_message() {
        return Err(SdkError::ExecutionFailure(message.to_string()));
    }

    let Some(return_type) = &method.returns else {
        return Ok(Token::Tuple(vec![]));
    };

    let payload = return_payload(response)?;
    if return_type.is_byte_array() {
        return Ok(Token::String(String::from_utf8_lossy(&payload).into_owned()));
    }
    decode(return_type, &payload)
}

/// Bytes after the prefix of the application call's last log
fn return_payload(response: &SimulateResponse) -> Result<Vec<u8>, SdkError> {
    let group = response
        .group()
        .ok_or_else(|| SdkError::AbiDecode("simulation returned no groups".to_string()))?;
    // application call is the last transaction of the group
    let txn = group
        .txn_results
        .last()
        .ok_or_else(|| SdkError::AbiDecode("simulation returned no transactions".to_string()))?;
    let log = txn
        .txn_result
        .logs
        .last()
        .ok_or_else(|| SdkError::AbiDecode("application call produced no logs".to_string()))?;

    let bytes = BASE64.decode(log.as_bytes())?;
    if bytes.len() < RETURN_PREFIX_LEN {
        return Err(SdkError::AbiDecode(format!(
            "return log of {} bytes is shorter than its prefix",
            bytes.len()
        )));
    }
    Ok(bytes[RETURN_PREFIX_LEN..].to_vec())
}
